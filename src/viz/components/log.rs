use crossterm::event::KeyCode;
use log::LevelFilter;
use ratatui::{prelude::*, widgets::WidgetRef};
use tui_logger::{TuiLoggerSmartWidget, TuiWidgetEvent, TuiWidgetState};

use crate::viz::util::Input;

use super::Component;

/// Log tab: replay steps at `info`, environment internals at `debug`
pub struct Logs {
    state: TuiWidgetState,
}

impl Default for Logs {
    fn default() -> Self {
        Self {
            state: TuiWidgetState::new()
                .set_default_display_level(LevelFilter::Info)
                .set_level_for_target("wumpus_rl::gym::wumpus", LevelFilter::Debug),
        }
    }
}

impl WidgetRef for Logs {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        TuiLoggerSmartWidget::default()
            .title_log("Replay")
            .title_target("Sources")
            .style(Style::default().white())
            .style_error(Style::default().light_red())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .style_debug(Style::default().dark_gray())
            .output_separator(' ')
            .state(&self.state)
            .render(area, buf);
    }
}

impl Component for Logs {
    fn handle_input(&mut self, input: Input) -> bool {
        let widget_event = match input {
            Input::Plus => TuiWidgetEvent::PlusKey,
            Input::Minus => TuiWidgetEvent::MinusKey,
            Input::Other(KeyCode::Char(' ')) => TuiWidgetEvent::SpaceKey,
            Input::Other(KeyCode::Esc) => TuiWidgetEvent::EscapeKey,
            Input::Other(KeyCode::PageUp) => TuiWidgetEvent::PrevPageKey,
            Input::Other(KeyCode::PageDown) => TuiWidgetEvent::NextPageKey,
            Input::Other(KeyCode::Up) => TuiWidgetEvent::UpKey,
            Input::Other(KeyCode::Down) => TuiWidgetEvent::DownKey,
            Input::Other(KeyCode::Left) => TuiWidgetEvent::LeftKey,
            Input::Other(KeyCode::Right) => TuiWidgetEvent::RightKey,
            Input::Other(KeyCode::Char('s')) => TuiWidgetEvent::HideKey,
            Input::Other(KeyCode::Char('f')) => TuiWidgetEvent::FocusKey,
            _ => return false,
        };

        self.state.transition(widget_event);
        true
    }
}
