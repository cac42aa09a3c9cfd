use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Close the modal, else clear the focused input, else quit
    Back,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Submit,
    NextField,
    PrevField,
    OpenContent,
    OpenDiff,
    Copy,
    CopyLink,
    Refresh,
    Input(char),
    DeleteChar,
    None,
}

/// Poll for a key press, waiting at most `timeout`
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == event::KeyEventKind::Press
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

pub(crate) fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Back,

        (KeyCode::Char('p'), KeyModifiers::CONTROL) | (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) | (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Tab, _) => Action::NextField,
        (KeyCode::BackTab, _) => Action::PrevField,
        (KeyCode::Char('o'), KeyModifiers::CONTROL) => Action::OpenContent,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::OpenDiff,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::Copy,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::CopyLink,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Refresh,

        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => Action::Input(c),
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_and_back() {
        assert_eq!(key_to_action(ctrl('c')), Action::Quit);
        assert_eq!(key_to_action(plain(KeyCode::Esc)), Action::Back);
    }

    #[test]
    fn test_navigation() {
        assert_eq!(key_to_action(plain(KeyCode::Up)), Action::MoveUp);
        assert_eq!(key_to_action(ctrl('p')), Action::MoveUp);
        assert_eq!(key_to_action(plain(KeyCode::Down)), Action::MoveDown);
        assert_eq!(key_to_action(ctrl('n')), Action::MoveDown);
        assert_eq!(key_to_action(plain(KeyCode::PageUp)), Action::PageUp);
        assert_eq!(key_to_action(plain(KeyCode::PageDown)), Action::PageDown);
    }

    #[test]
    fn test_drilldown_and_copy_keys() {
        assert_eq!(key_to_action(ctrl('o')), Action::OpenContent);
        assert_eq!(key_to_action(ctrl('d')), Action::OpenDiff);
        assert_eq!(key_to_action(ctrl('y')), Action::Copy);
        assert_eq!(key_to_action(ctrl('u')), Action::CopyLink);
        assert_eq!(key_to_action(ctrl('r')), Action::Refresh);
    }

    #[test]
    fn test_form_keys() {
        assert_eq!(key_to_action(plain(KeyCode::Enter)), Action::Submit);
        assert_eq!(key_to_action(plain(KeyCode::Tab)), Action::NextField);
        assert_eq!(key_to_action(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)), Action::PrevField);
        assert_eq!(key_to_action(plain(KeyCode::Char('a'))), Action::Input('a'));
        assert_eq!(key_to_action(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)), Action::Input('A'));
        assert_eq!(key_to_action(plain(KeyCode::Backspace)), Action::DeleteChar);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(key_to_action(plain(KeyCode::F(1))), Action::None);
    }
}
