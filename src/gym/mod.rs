pub mod wumpus;

pub use wumpus::HuntTheWumpus;
