use ratatui::{prelude::*, widgets::*};

use crate::{
    gym::wumpus::{Action, Event},
    replay::{Autoplay, Played},
};

/// The most recent step, kept around for display
pub struct LastStep {
    pub action: Action,
    pub reward: f32,
    pub events: Vec<Event>,
}

impl From<Played> for LastStep {
    fn from(played: Played) -> Self {
        Self {
            action: played.action,
            reward: played.transition.reward,
            events: played.transition.info,
        }
    }
}

/// Room table on the left, the player's status on the right
pub struct CaveView<'a> {
    autoplay: &'a Autoplay,
    last: Option<&'a LastStep>,
}

impl<'a> CaveView<'a> {
    pub fn new(autoplay: &'a Autoplay, last: Option<&'a LastStep>) -> Self {
        Self { autoplay, last }
    }

    fn status(&self) -> Vec<Line<'a>> {
        let env = self.autoplay.env();
        let mut lines = vec![
            Line::from(vec![
                Span::from("Episode ").bold(),
                Span::raw(format!(
                    "{}/{}  ({} won)",
                    self.autoplay.episode(),
                    self.autoplay.episodes(),
                    self.autoplay.wins()
                )),
            ]),
            Line::from(vec![
                Span::from("Room    ").bold(),
                Span::raw(env.player_room().to_string()),
            ]),
            Line::from(vec![
                Span::from("Arrows  ").bold(),
                Span::raw(env.arrows().to_string()),
            ]),
            Line::from(vec![
                Span::from("Steps   ").bold(),
                Span::raw(format!("{}/{}", env.steps(), env.config().max_steps)),
            ]),
            Line::default(),
        ];

        let messages = env.percepts().messages();
        if messages.is_empty() {
            lines.push(Line::styled("Nothing unusual nearby.", Style::default().dark_gray()));
        }
        lines.extend(messages.into_iter().map(|m| Line::styled(m, Style::default().light_yellow())));
        lines.push(Line::default());

        if let Some(last) = self.last {
            lines.push(Line::from(vec![
                Span::from("Action  ").bold(),
                Span::raw(last.action.to_string()),
            ]));
            lines.push(Line::from(vec![
                Span::from("Reward  ").bold(),
                Span::raw(format!("{:+.2}", last.reward)),
            ]));
            lines.extend(
                last.events
                    .iter()
                    .map(|e| Line::styled(format!("  {e:?}"), Style::default().dark_gray())),
            );
        }

        if env.is_over() {
            lines.push(Line::default());
            lines.push(if env.is_won() {
                Line::styled("WIN", Style::default().light_green().bold())
            } else {
                Line::styled("LOSE", Style::default().light_red().bold())
            });
        }

        lines
    }
}

impl Widget for CaveView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [rooms_area, status_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(area);

        let env = self.autoplay.env();
        let cave = env.cave();
        let here = env.player_room();
        let nearby = cave.neighbors(here);

        let rows = cave.rooms().map(|room| {
            let tunnels = cave
                .neighbors(room)
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let contents = match (room == here, env.threat_in(room)) {
                (true, Some(threat)) => format!("you, {threat}"),
                (true, None) => String::from("you"),
                (false, Some(threat)) => threat.to_string(),
                (false, None) => String::new(),
            };

            let style = if room == here {
                Style::default().light_green().bold()
            } else if nearby.contains(&room) {
                Style::default().white()
            } else {
                Style::default().dark_gray()
            };
            Row::new(vec![room.to_string(), tunnels, contents]).style(style)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(14),
                Constraint::Fill(1),
            ],
        )
        .header(Row::new(vec!["Room", "Tunnels", "Contents"]).style(Style::default().cyan().bold()))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title("Cave"),
        );
        Widget::render(table, rooms_area, buf);

        Paragraph::new(self.status())
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .padding(Padding::horizontal(1))
                    .title("Hunter"),
            )
            .wrap(Wrap { trim: false })
            .render(status_area, buf);
    }
}
