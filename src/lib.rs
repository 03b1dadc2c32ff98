/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

pub mod error;

/// Exploration policies
pub mod exploration;

/// Hunt the Wumpus and its cave graphs
pub mod gym;

/// Experience
pub mod memory;

/// Greedy playback of a learned table
pub mod replay;

pub mod train;

/// Terminal replay viewer
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{Error, Result};
