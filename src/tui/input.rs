use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Toggle,
    SwitchPane,
    AddPattern,
    RemovePattern,
    SavePatterns,
    Copy,
    WriteOutput,
    Rescan,
    ToggleHelp,
    Quit,
    /// Ctrl-C: leave without counting as a normal exit.
    Abort,
    SubmitText,
    Cancel,
    Backspace,
    CursorLeft,
    CursorRight,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, text_mode: bool) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Abort;
    }

    if text_mode {
        return match key.code {
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Left => Action::CursorLeft,
            KeyCode::Right => Action::CursorRight,
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Home | KeyCode::Char('g') => Action::Move(Direction::Top),
        KeyCode::End | KeyCode::Char('G') => Action::Move(Direction::Bottom),
        KeyCode::Enter | KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Tab => Action::SwitchPane,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('a') | KeyCode::Char('i') => Action::AddPattern,
        KeyCode::Char('x') | KeyCode::Char('d') | KeyCode::Delete => Action::RemovePattern,
        KeyCode::Char('s') => Action::SavePatterns,
        KeyCode::Char('y') | KeyCode::Char('c') => Action::Copy,
        KeyCode::Char('w') => Action::WriteOutput,
        KeyCode::Char('r') => Action::Rescan,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn space_toggles_in_normal_mode() {
        assert_eq!(action_for_key(key(KeyCode::Char(' ')), false), Action::Toggle);
    }

    #[test]
    fn letters_are_text_in_prompt() {
        assert_eq!(
            action_for_key(key(KeyCode::Char('q')), true),
            Action::InputChar('q')
        );
        assert_eq!(action_for_key(key(KeyCode::Enter), true), Action::SubmitText);
    }

    #[test]
    fn ctrl_c_aborts_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(ctrl_c, false), Action::Abort);
        assert_eq!(action_for_key(ctrl_c, true), Action::Abort);
    }
}
