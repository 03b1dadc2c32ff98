pub mod cave;
pub mod help;
pub mod log;

pub use cave::{CaveView, LastStep};
pub use log::Logs;
use ratatui::widgets::WidgetRef;

use super::util::Input;

pub trait Component: WidgetRef {
    /// **Returns** whether the component used the input
    fn handle_input(&mut self, input: Input) -> bool;
}
