use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;
use log::info;
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{help::render_help, CaveView, Component, LastStep, Logs},
    tui::Screen,
    util::{read_input, Input},
};
use crate::replay::Autoplay;

const TABS: [&str; 2] = ["Cave", "Logs"];
const MIN_DELAY: Duration = Duration::from_millis(20);
const MAX_DELAY: Duration = Duration::from_secs(5);

#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    Play,
    Paused,
    Done,
    Quit,
}

/// The root TUI component, stepping an [`Autoplay`] on a timer and rendering the cave
pub struct App {
    state: State,
    autoplay: Autoplay,
    delay: Duration,
    last_tick: Instant,
    last_step: Option<LastStep>,
    selected_tab: usize,
    show_help: bool,
    logs: Logs,
}

impl App {
    /// `delay` is the pause between two autoplay steps
    pub fn new(autoplay: Autoplay, delay: Duration) -> Self {
        Self {
            state: Default::default(),
            autoplay,
            delay: delay.clamp(MIN_DELAY, MAX_DELAY),
            last_tick: Instant::now(),
            last_step: None,
            selected_tab: 0,
            show_help: false,
            logs: Logs::default(),
        }
    }

    /// Take over the terminal until the user quits
    pub fn run(&mut self) -> io::Result<()> {
        let mut screen = Screen::enter()?;
        info!(
            "Episode 1/{} starts in room {}",
            self.autoplay.episodes(),
            self.autoplay.env().player_room()
        );

        while self.state != State::Quit {
            if self.state == State::Play && self.last_tick.elapsed() >= self.delay {
                self.advance();
                self.last_tick = Instant::now();
            }

            screen.draw(&*self)?;

            if event::poll(Duration::from_millis(16))? {
                if let Some(input) = read_input(&event::read()?) {
                    self.handle_input(input);
                }
            }
        }

        drop(screen);
        info!(
            "Won {} of {} episodes",
            self.autoplay.wins(),
            self.autoplay.episodes()
        );
        Ok(())
    }

    /// One step of autoplay, moving on to the next episode once the current one ends
    fn advance(&mut self) {
        if let Some(played) = self.autoplay.step() {
            let env = self.autoplay.env();
            info!(
                "{} -> room {} | arrows {} | reward {:+.2}",
                played.action,
                env.player_room(),
                env.arrows(),
                played.transition.reward
            );
            if played.transition.done {
                let outcome = if env.is_won() { "WIN" } else { "LOSE" };
                info!("Episode {} - {outcome}!", self.autoplay.episode());
            }
            self.last_step = Some(played.into());
        } else if self.autoplay.next_episode() {
            info!(
                "Episode {}/{} starts in room {}",
                self.autoplay.episode(),
                self.autoplay.episodes(),
                self.autoplay.env().player_room()
            );
            self.last_step = None;
        } else {
            self.state = State::Done;
        }
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Quit => self.state = State::Quit,
            Input::Help => self.show_help = !self.show_help,
            Input::NextTab => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
            Input::Pause => {
                self.state = match self.state {
                    State::Play => State::Paused,
                    State::Paused => State::Play,
                    other => other,
                }
            }
            Input::Step if self.state == State::Paused => self.advance(),
            _ if self.selected_tab == 1 => {
                self.logs.handle_input(input);
            }
            Input::Plus => self.delay = (self.delay * 2).min(MAX_DELAY),
            Input::Minus => self.delay = (self.delay / 2).max(MIN_DELAY),
            _ => {}
        }
    }

    fn progress(&self) -> f64 {
        let finished = self.autoplay.episode() - 1 + u32::from(self.autoplay.env().is_over());
        (f64::from(finished) / f64::from(self.autoplay.episodes())).min(1.0)
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Layout
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        // Menu
        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        // Main
        match self.selected_tab {
            0 => CaveView::new(&self.autoplay, self.last_step.as_ref()).render(main_area, buf),
            1 => self.logs.render_ref(main_area, buf),
            _ => {}
        }

        if self.show_help {
            render_help(main_area, buf, self.selected_tab);
        }

        // Progress Bar
        let title = match self.state {
            State::Paused => String::from("Progress (paused)"),
            State::Done => String::from("Progress (done, press q to quit)"),
            _ => format!("Progress ({} ms/step)", self.delay.as_millis()),
        };
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(title),
            )
            .gauge_style(Color::Cyan)
            .ratio(self.progress())
            .render(progress_area, buf);
    }
}
