mod app;
mod components;
mod tui;
mod util;

pub use app::App;
