use std::time::Instant;

use crate::corpus::Difficulty;
use crate::evaluator::Evaluation;
use crate::timer::SessionTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No paragraph; input disabled
    Idle,
    /// Paragraph shown, timer armed, input enabled
    Running,
    /// Paragraph typed out; timer cancelled, input disabled
    Completed,
}

/// An edit to the contents of the input box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Clear,
}

/// Everything that belongs to one test attempt
#[derive(Debug, Clone)]
pub struct Session {
    pub difficulty: Difficulty,
    pub paragraph: String,
    pub typed: String,
    pub status: SessionStatus,
    pub timer: Option<SessionTimer>,
    pub elapsed_display_secs: u64,
    pub last_evaluation: Option<Evaluation>,
}

impl Session {
    pub fn idle(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            paragraph: String::new(),
            typed: String::new(),
            status: SessionStatus::Idle,
            timer: None,
            elapsed_display_secs: 0,
            last_evaluation: None,
        }
    }

    /// A fresh running session. Whatever timer the previous session held is
    /// dropped together with it.
    pub fn running(difficulty: Difficulty, paragraph: &str, now: Instant) -> Self {
        Self {
            paragraph: paragraph.to_string(),
            status: SessionStatus::Running,
            timer: Some(SessionTimer::start(now)),
            ..Self::idle(difficulty)
        }
    }

    pub fn input_enabled(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn has_started(&self) -> bool {
        self.status != SessionStatus::Idle
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.timer.as_ref().map(SessionTimer::started_at)
    }

    /// Fractional seconds since start, 0 when no timer is armed
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        self.timer
            .as_ref()
            .map_or(0.0, |timer| timer.elapsed_secs(now))
    }

    pub fn apply(&mut self, edit: TextEdit) {
        match edit {
            TextEdit::Insert(c) => self.typed.push(c),
            TextEdit::Backspace => {
                self.typed.pop();
            }
            TextEdit::Clear => self.typed.clear(),
        }
    }

    /// Stops the timer and locks the input box.
    pub fn complete(&mut self) {
        self.timer = None;
        self.status = SessionStatus::Completed;
    }
}
