use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// A key press, as the replay viewer understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Input {
    Quit,
    Help,
    NextTab,
    Pause,
    Step,
    Plus,
    Minus,
    Other(KeyCode),
}

/// Translate a terminal event; anything but a key press is `None`
pub(super) fn read_input(event: &Event) -> Option<Input> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let input = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
        KeyCode::Char('q') => Input::Quit,
        KeyCode::Char('h') => Input::Help,
        KeyCode::Tab => Input::NextTab,
        KeyCode::Char('p') => Input::Pause,
        KeyCode::Char('n') => Input::Step,
        KeyCode::Char('+') | KeyCode::Char('=') => Input::Plus,
        KeyCode::Char('-') | KeyCode::Char('_') => Input::Minus,
        code => Input::Other(code),
    };
    Some(input)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn viewer_keys() {
        assert_eq!(
            read_input(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Input::Quit)
        );
        assert_eq!(
            read_input(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
        assert_eq!(
            read_input(&press(KeyCode::Char('='), KeyModifiers::NONE)),
            Some(Input::Plus)
        );
        assert_eq!(
            read_input(&press(KeyCode::PageUp, KeyModifiers::NONE)),
            Some(Input::Other(KeyCode::PageUp))
        );
    }

    #[test]
    fn releases_and_resizes_are_ignored() {
        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert_eq!(read_input(&release), None);
        assert_eq!(read_input(&Event::Resize(80, 24)), None);
    }
}
