use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Action;

/// Key-to-action mapping. Holds the pending half of `gg`.
#[derive(Debug, Default)]
pub struct KeyMap {
    pending_g: bool,
}

impl KeyMap {
    /// Translate one key press. While the prompt is open keys are text.
    pub fn map(&mut self, key: KeyEvent, prompt_open: bool) -> Option<Action> {
        if prompt_open {
            self.pending_g = false;
            return match key.code {
                KeyCode::Esc => Some(Action::Dismiss),
                KeyCode::Enter => Some(Action::PromptSubmit),
                KeyCode::Backspace => Some(Action::PromptBackspace),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Action::PromptChar(c))
                }
                _ => None,
            };
        }

        if key.code == KeyCode::Char('g') {
            let second = self.pending_g;
            self.pending_g = !second;
            return second.then_some(Action::CursorTop);
        }
        self.pending_g = false;

        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char(' ') | KeyCode::Char('p') => Action::TogglePlay,
            KeyCode::Right | KeyCode::Char('l') => Action::Next,
            KeyCode::Left | KeyCode::Char('h') => Action::Previous,
            KeyCode::Up | KeyCode::Char('+') => Action::VolumeUp,
            KeyCode::Down | KeyCode::Char('-') => Action::VolumeDown,
            KeyCode::Char('m') => Action::ToggleMute,
            KeyCode::Char('r') => Action::ToggleRepeat,
            KeyCode::Char('s') => Action::ToggleShuffle,
            KeyCode::Char('f') => Action::ToggleFavorite,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('j') => Action::CursorDown,
            KeyCode::Char('k') => Action::CursorUp,
            KeyCode::Char('G') => Action::CursorBottom,
            KeyCode::Enter => Action::PlaySelected,
            KeyCode::Char(',') => Action::SeekBack,
            KeyCode::Char('.') => Action::SeekForward,
            KeyCode::Char('[') => Action::RateDown,
            KeyCode::Char(']') => Action::RateUp,
            KeyCode::Char('=') => Action::ResetRate,
            KeyCode::Tab => Action::CycleView,
            KeyCode::Char('o') => Action::OpenPrompt,
            KeyCode::Char('d') | KeyCode::Delete => Action::RemoveSelected,
            KeyCode::Esc => Action::Dismiss,
            KeyCode::Char('q') => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn player_shortcuts() {
        let mut keys = KeyMap::default();
        let cases = [
            (KeyCode::Char(' '), Action::TogglePlay),
            (KeyCode::Char('p'), Action::TogglePlay),
            (KeyCode::Right, Action::Next),
            (KeyCode::Char('l'), Action::Next),
            (KeyCode::Left, Action::Previous),
            (KeyCode::Up, Action::VolumeUp),
            (KeyCode::Char('-'), Action::VolumeDown),
            (KeyCode::Char('m'), Action::ToggleMute),
            (KeyCode::Char('r'), Action::ToggleRepeat),
            (KeyCode::Char('s'), Action::ToggleShuffle),
            (KeyCode::Char('f'), Action::ToggleFavorite),
            (KeyCode::Char('?'), Action::ToggleHelp),
            (KeyCode::Tab, Action::CycleView),
            (KeyCode::Delete, Action::RemoveSelected),
            (KeyCode::Char('q'), Action::Quit),
        ];
        for (code, expected) in cases {
            assert_eq!(keys.map(press(code), false), Some(expected), "{code:?}");
        }
    }

    #[test]
    fn double_g_jumps_to_top() {
        let mut keys = KeyMap::default();
        assert_eq!(keys.map(press(KeyCode::Char('g')), false), None);
        assert_eq!(
            keys.map(press(KeyCode::Char('g')), false),
            Some(Action::CursorTop)
        );

        // Anything in between cancels the prefix.
        keys.map(press(KeyCode::Char('g')), false);
        keys.map(press(KeyCode::Char('j')), false);
        assert_eq!(keys.map(press(KeyCode::Char('g')), false), None);
    }

    #[test]
    fn prompt_takes_text() {
        let mut keys = KeyMap::default();
        assert_eq!(
            keys.map(press(KeyCode::Char('q')), true),
            Some(Action::PromptChar('q'))
        );
        assert_eq!(keys.map(press(KeyCode::Enter), true), Some(Action::PromptSubmit));
        assert_eq!(keys.map(press(KeyCode::Esc), true), Some(Action::Dismiss));
        assert_eq!(keys.map(press(KeyCode::Tab), true), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut keys = KeyMap::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(keys.map(key, false), Some(Action::Quit));
        assert_eq!(keys.map(press(KeyCode::F(5)), false), None);
    }
}
