use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    PortNext,
    PortPrev,
    BaudNext,
    BaudPrev,
    Refresh,
    ToggleConnection,
    ToggleLogging,
    ScrollUp,
    ScrollDown,
    Follow,
    None,
}

/// Map a key event to an action. Only the initial press counts, so a held
/// key does not toggle the port or the log file repeatedly.
pub fn map_key(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => Action::PortNext,
        KeyCode::Up | KeyCode::Char('k') => Action::PortPrev,
        KeyCode::Right | KeyCode::Char('l') => Action::BaudNext,
        KeyCode::Left | KeyCode::Char('h') => Action::BaudPrev,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Enter | KeyCode::Char('c') => Action::ToggleConnection,
        KeyCode::Char('s') => Action::ToggleLogging,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        KeyCode::End => Action::Follow,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn toggles_and_navigation() {
        assert_eq!(map_key(press(KeyCode::Enter)), Action::ToggleConnection);
        assert_eq!(map_key(press(KeyCode::Char('c'))), Action::ToggleConnection);
        assert_eq!(map_key(press(KeyCode::Char('s'))), Action::ToggleLogging);
        assert_eq!(map_key(press(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(map_key(press(KeyCode::Down)), Action::PortNext);
        assert_eq!(map_key(press(KeyCode::Left)), Action::BaudPrev);
        assert_eq!(map_key(press(KeyCode::End)), Action::Follow);
        assert_eq!(map_key(press(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn ctrl_c_quits_plain_c_connects() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Action::Quit);
        assert_eq!(map_key(press(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn repeats_and_releases_are_ignored() {
        let repeat = KeyEvent {
            code: KeyCode::Char('s'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Repeat,
            state: KeyEventState::NONE,
        };
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            ..repeat
        };
        assert_eq!(map_key(repeat), Action::None);
        assert_eq!(map_key(release), Action::None);
    }
}
