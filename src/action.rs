use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::TextEdit;

/// What a key press asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Reset,
    NextDifficulty,
    PreviousDifficulty,
    Edit(TextEdit),
    Quit,
}

impl Action {
    /// Maps a key to an action. `input_enabled` decides whether plain keys
    /// go to the input box or drive the controls.
    pub fn from_key(key: KeyEvent, input_enabled: bool) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Self::Quit),
                KeyCode::Char('s') => Some(Self::Start),
                KeyCode::Char('r') => Some(Self::Reset),
                KeyCode::Char('u') if input_enabled => Some(Self::Edit(TextEdit::Clear)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc => Some(Self::Quit),
            KeyCode::F(5) => Some(Self::Start),
            KeyCode::F(6) => Some(Self::Reset),
            KeyCode::Tab => Some(Self::NextDifficulty),
            KeyCode::BackTab => Some(Self::PreviousDifficulty),
            _ if input_enabled => match key.code {
                KeyCode::Char(c) => Some(Self::Edit(TextEdit::Insert(c))),
                KeyCode::Enter => Some(Self::Edit(TextEdit::Insert('\n'))),
                KeyCode::Backspace => Some(Self::Edit(TextEdit::Backspace)),
                _ => None,
            },
            KeyCode::Enter | KeyCode::Char('s') => Some(Self::Start),
            KeyCode::Char('r') => Some(Self::Reset),
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Right | KeyCode::Down => Some(Self::NextDifficulty),
            KeyCode::Left | KeyCode::Up => Some(Self::PreviousDifficulty),
            _ => None,
        }
    }
}
