use ratatui::{prelude::*, widgets::*};

fn key_line(key: &'static str, action: &'static str) -> Vec<Span<'static>> {
    vec![Span::from(key).light_cyan().bold(), Span::raw(action)]
}

pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let lines = vec![
        key_line("  q  ", " : Quit the viewer"),
        key_line("  h  ", " : Toggle help popup"),
        key_line(" Tab ", " : Switch tabs"),
        key_line("  p  ", " : Pause or resume autoplay"),
        key_line("  n  ", " : Take a single step while paused"),
    ];

    let additional_lines = match selected_tab {
        0 => vec![key_line(" +/- ", " : Slow down or speed up autoplay")],
        1 => vec![
            key_line("  s  ", " : Toggles target selector widget hidden/visible"),
            key_line("  f  ", " : Toggle focus on the selected target only"),
            key_line("⬆ / ⬇", " : Switch log target"),
            key_line("⬅ / ➡", " : Reduce/increase shown log messages by one level"),
            key_line("- / +", " : Reduce/increase captured log messages by one level"),
            key_line("PgUp ", " : Enter Page Mode and scroll approx. half page up in log history"),
            key_line("PgDn ", " : Only in page mode, scroll 10 events down in log history"),
            key_line(" Esc ", " : Exit page mode and go back to scrolling mode"),
            key_line("Space", " : Toggles hiding of targets, which have logfilter set to off"),
        ],
        _ => vec![],
    };

    let lines = [lines, additional_lines]
        .concat()
        .into_iter()
        .map(Line::from)
        .collect::<Vec<_>>();

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length((lines.len() + 4) as u16),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(100),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::proportional(1))
                .title("Help"),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}
