//! Keyboard routing: maps a key and the focused element's category to an action.

use crate::stopwatch::Intent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Char(char),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FocusCategory {
    TextInput,
    Other,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum KeyAction {
    /// Run a stopwatch intent. The key's default behavior is suppressed.
    Dispatch(Intent),
    /// Leave the focused text field, committing its edit.
    Blur,
    /// Let the focused text field handle the key.
    PassThrough,
    FocusNextNote,
    ToggleTheme,
    Quit,
    Ignore,
}

pub fn route(key: Key, focus: FocusCategory) -> KeyAction {
    if focus == FocusCategory::TextInput {
        return match key {
            Key::Enter | Key::Escape => KeyAction::Blur,
            Key::Tab => KeyAction::FocusNextNote,
            _ => KeyAction::PassThrough,
        };
    }

    match key {
        Key::Space => KeyAction::Dispatch(Intent::Toggle),
        Key::Enter | Key::Char('l') => KeyAction::Dispatch(Intent::RecordLap),
        Key::Char('r') => KeyAction::Dispatch(Intent::Reset),
        Key::Char('t') => KeyAction::ToggleTheme,
        Key::Tab => KeyAction::FocusNextNote,
        Key::Char('q') | Key::Escape => KeyAction::Quit,
        _ => KeyAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_keys() {
        assert_eq!(
            route(Key::Space, FocusCategory::Other),
            KeyAction::Dispatch(Intent::Toggle)
        );
        assert_eq!(
            route(Key::Enter, FocusCategory::Other),
            KeyAction::Dispatch(Intent::RecordLap)
        );
        assert_eq!(
            route(Key::Char('r'), FocusCategory::Other),
            KeyAction::Dispatch(Intent::Reset)
        );
        assert_eq!(route(Key::Char('q'), FocusCategory::Other), KeyAction::Quit);
        assert_eq!(route(Key::Char('x'), FocusCategory::Other), KeyAction::Ignore);
    }

    #[test]
    fn test_text_input_swallows_shortcuts() {
        assert_eq!(route(Key::Enter, FocusCategory::TextInput), KeyAction::Blur);
        assert_eq!(route(Key::Escape, FocusCategory::TextInput), KeyAction::Blur);
        assert_eq!(route(Key::Space, FocusCategory::TextInput), KeyAction::PassThrough);
        assert_eq!(route(Key::Char('r'), FocusCategory::TextInput), KeyAction::PassThrough);
        assert_eq!(route(Key::Backspace, FocusCategory::TextInput), KeyAction::PassThrough);
    }

    #[test]
    fn test_tab_moves_between_notes() {
        assert_eq!(route(Key::Tab, FocusCategory::Other), KeyAction::FocusNextNote);
        assert_eq!(route(Key::Tab, FocusCategory::TextInput), KeyAction::FocusNextNote);
    }
}
