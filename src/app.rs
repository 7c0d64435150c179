use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::corpus::{select_paragraph, Difficulty};
use crate::evaluator::{evaluate, is_complete, Track};
use crate::session::{Session, SessionStatus, TextEdit};
use crate::timer::{Clock, SystemClock};

/// Controller owning the session and everything the screen shows
pub struct App {
    pub difficulty: Difficulty,
    pub session: Session,
    pub should_quit: bool,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("difficulty", &self.difficulty)
            .field("session", &self.session)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_parts(difficulty, Box::new(SystemClock), StdRng::from_entropy())
    }

    /// Build with an explicit time source and random generator.
    pub fn with_parts(difficulty: Difficulty, clock: Box<dyn Clock>, rng: StdRng) -> Self {
        Self {
            difficulty,
            session: Session::idle(difficulty),
            should_quit: false,
            clock,
            rng,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    pub fn input_enabled(&self) -> bool {
        self.session.input_enabled()
    }

    pub fn paragraph(&self) -> &str {
        &self.session.paragraph
    }

    pub fn typed(&self) -> &str {
        &self.session.typed
    }

    /// `None` until the first edit of a test, and after a reset
    pub fn paragraph_track(&self) -> Option<Track> {
        self.session.last_evaluation.map(|e| e.track)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Moves the dropdown selection. A running test keeps its paragraph.
    pub fn cycle_difficulty(&mut self, forward: bool) {
        self.difficulty = if forward {
            self.difficulty.next()
        } else {
            self.difficulty.previous()
        };
    }

    pub fn start_test(&mut self) {
        let paragraph = select_paragraph(self.difficulty, &mut self.rng);
        let now = self.clock.now();
        // replacing the session drops any previously armed timer
        self.session = Session::running(self.difficulty, paragraph, now);
        if let Some(timer) = self.session.timer.as_mut() {
            if let Some(secs) = timer.poll(now) {
                self.session.elapsed_display_secs = secs;
            }
        }
        info!("test started: difficulty={} paragraph={paragraph:?}", self.difficulty);
    }

    pub fn reset_test(&mut self) {
        if self.session.timer.is_some() {
            debug!("timer cancelled by reset");
        }
        self.session = Session::idle(self.difficulty);
        info!("test reset");
    }

    /// Applies an edit to the input box and recomputes the statistics.
    /// Ignored while the input box is disabled.
    pub fn on_text_changed(&mut self, edit: TextEdit) {
        if !self.input_enabled() {
            return;
        }
        self.session.apply(edit);

        let elapsed = self.session.elapsed_secs(self.clock.now());
        let evaluation = evaluate(&self.session.typed, &self.session.paragraph, elapsed);
        self.session.last_evaluation = Some(evaluation);

        if is_complete(&self.session.typed, &self.session.paragraph) {
            self.session.complete();
            info!(
                "test completed: wpm={:.2} accuracy={:.2}% elapsed={elapsed:.2}s",
                evaluation.wpm, evaluation.accuracy
            );
        }
    }

    /// Updates the elapsed time counter when a one-second firing is due.
    /// Returns true if the counter changed.
    pub fn on_tick(&mut self) -> bool {
        let now = self.clock.now();
        match self.session.timer.as_mut().and_then(|t| t.poll(now)) {
            Some(secs) if secs != self.session.elapsed_display_secs => {
                self.session.elapsed_display_secs = secs;
                true
            }
            _ => false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn time_label(&self) -> String {
        format!("Time: {}s", self.session.elapsed_display_secs)
    }

    pub fn wpm_label(&self) -> String {
        match self.session.last_evaluation {
            Some(e) => format!("WPM: {:.2}", e.wpm),
            None => String::from("WPM: 0"),
        }
    }

    pub fn accuracy_label(&self) -> String {
        match self.session.last_evaluation {
            Some(e) => format!("Accuracy: {:.2}%", e.accuracy),
            None => String::from("Accuracy: 0%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualClock;
    use std::rc::Rc;
    use std::time::Duration;

    fn test_app(difficulty: Difficulty) -> (App, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        let app = App::with_parts(
            difficulty,
            Box::new(Rc::clone(&clock)),
            StdRng::seed_from_u64(1),
        );
        (app, clock)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.on_text_changed(TextEdit::Insert(c));
        }
    }

    #[test]
    fn test_new_app_is_idle_with_zero_labels() {
        let (app, _) = test_app(Difficulty::Medium);
        assert_eq!(app.status(), SessionStatus::Idle);
        assert!(!app.input_enabled());
        assert_eq!(app.paragraph(), "");
        assert_eq!(app.time_label(), "Time: 0s");
        assert_eq!(app.wpm_label(), "WPM: 0");
        assert_eq!(app.accuracy_label(), "Accuracy: 0%");
        assert_eq!(app.paragraph_track(), None);
    }

    #[test]
    fn test_start_picks_paragraph_from_selected_difficulty() {
        let (mut app, _) = test_app(Difficulty::Hard);
        app.start_test();
        assert_eq!(app.status(), SessionStatus::Running);
        assert!(app.input_enabled());
        assert!(Difficulty::Hard.paragraphs().contains(&app.paragraph()));
        assert_eq!(app.typed(), "");
        assert_eq!(app.time_label(), "Time: 0s");
    }

    #[test]
    fn test_typing_ignored_before_start() {
        let (mut app, _) = test_app(Difficulty::Easy);
        app.on_text_changed(TextEdit::Insert('T'));
        assert_eq!(app.typed(), "");
        assert_eq!(app.wpm_label(), "WPM: 0");
    }

    #[test]
    fn test_live_stats_and_track() {
        let (mut app, clock) = test_app(Difficulty::Easy);
        app.start_test();
        let paragraph = app.paragraph().to_string();
        let first_word = paragraph.split_whitespace().next().unwrap().to_string();

        clock.advance(Duration::from_secs(30));
        type_str(&mut app, &first_word);
        assert_eq!(app.paragraph_track(), Some(Track::OnTrack));
        assert_eq!(app.wpm_label(), "WPM: 2.00");

        app.on_text_changed(TextEdit::Insert('#'));
        assert_eq!(app.paragraph_track(), Some(Track::OffTrack));

        app.on_text_changed(TextEdit::Backspace);
        assert_eq!(app.paragraph_track(), Some(Track::OnTrack));
    }

    #[test]
    fn test_completion_disables_input_and_cancels_timer() {
        let (mut app, clock) = test_app(Difficulty::Medium);
        app.start_test();
        let paragraph = app.paragraph().to_string();

        clock.advance(Duration::from_secs(20));
        type_str(&mut app, &paragraph);

        assert_eq!(app.status(), SessionStatus::Completed);
        assert!(!app.input_enabled());
        assert!(app.session.timer.is_none());
        assert_eq!(app.accuracy_label(), "Accuracy: 100.00%");

        // further typing is ignored
        app.on_text_changed(TextEdit::Insert('x'));
        assert_eq!(app.typed(), paragraph);

        // and ticks no longer move the counter
        clock.advance(Duration::from_secs(5));
        assert!(!app.on_tick());
    }

    #[test]
    fn test_completion_accepts_trailing_newline() {
        let (mut app, _) = test_app(Difficulty::Easy);
        app.start_test();
        let paragraph = app.paragraph().to_string();
        let without_last: String = {
            let mut p = paragraph.clone();
            p.pop();
            p
        };
        type_str(&mut app, &without_last);
        app.on_text_changed(TextEdit::Insert('\n'));
        assert_eq!(app.status(), SessionStatus::Running);
        app.on_text_changed(TextEdit::Backspace);
        let last = paragraph.chars().last().unwrap();
        app.on_text_changed(TextEdit::Insert(last));
        assert_eq!(app.status(), SessionStatus::Completed);
    }

    #[test]
    fn test_tick_updates_time_label() {
        let (mut app, clock) = test_app(Difficulty::Easy);
        assert!(!app.on_tick());

        app.start_test();
        clock.advance(Duration::from_millis(500));
        assert!(!app.on_tick());
        assert_eq!(app.time_label(), "Time: 0s");

        clock.advance(Duration::from_millis(700));
        assert!(app.on_tick());
        assert_eq!(app.time_label(), "Time: 1s");

        clock.advance(Duration::from_secs(2));
        assert!(app.on_tick());
        assert_eq!(app.time_label(), "Time: 3s");
    }

    #[test]
    fn test_reset_mid_test_clears_everything() {
        let (mut app, clock) = test_app(Difficulty::Easy);
        app.start_test();
        clock.advance(Duration::from_secs(3));
        app.on_tick();
        type_str(&mut app, "The");

        app.reset_test();

        assert_eq!(app.status(), SessionStatus::Idle);
        assert!(!app.input_enabled());
        assert_eq!(app.paragraph(), "");
        assert_eq!(app.typed(), "");
        assert!(app.session.timer.is_none());
        assert_eq!(app.time_label(), "Time: 0s");
        assert_eq!(app.wpm_label(), "WPM: 0");
        assert_eq!(app.accuracy_label(), "Accuracy: 0%");
        assert_eq!(app.paragraph_track(), None);

        // a tick left over from the old test does nothing
        clock.advance(Duration::from_secs(1));
        assert!(!app.on_tick());
        assert_eq!(app.time_label(), "Time: 0s");
    }

    #[test]
    fn test_restart_replaces_timer() {
        let (mut app, clock) = test_app(Difficulty::Easy);
        app.start_test();
        clock.advance(Duration::from_secs(4));
        app.on_tick();
        assert_eq!(app.time_label(), "Time: 4s");

        app.reset_test();
        app.start_test();
        let restarted = app.session.started_at();
        assert_eq!(restarted, Some(clock.now()));
        assert_eq!(app.time_label(), "Time: 0s");

        clock.advance(Duration::from_millis(1500));
        assert!(app.on_tick());
        assert_eq!(app.time_label(), "Time: 1s");
        // only one firing per second from the single armed timer
        assert!(!app.on_tick());
    }

    #[test]
    fn test_start_while_running_starts_over() {
        let (mut app, clock) = test_app(Difficulty::Easy);
        app.start_test();
        type_str(&mut app, "Th");
        clock.advance(Duration::from_secs(2));

        app.start_test();
        assert_eq!(app.typed(), "");
        assert_eq!(app.wpm_label(), "WPM: 0");
        assert_eq!(app.session.started_at(), Some(clock.now()));
    }

    #[test]
    fn test_difficulty_change_applies_on_next_start() {
        let (mut app, _) = test_app(Difficulty::Easy);
        app.start_test();
        let first = app.paragraph().to_string();

        app.cycle_difficulty(true);
        app.cycle_difficulty(true);
        assert_eq!(app.difficulty, Difficulty::Hard);
        assert_eq!(app.paragraph(), first);
        assert_eq!(app.session.difficulty, Difficulty::Easy);

        app.start_test();
        assert!(Difficulty::Hard.paragraphs().contains(&app.paragraph()));

        app.cycle_difficulty(false);
        assert_eq!(app.difficulty, Difficulty::Medium);
        app.set_difficulty(Difficulty::Easy);
        assert_eq!(app.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_clear_edit_resets_progress() {
        let (mut app, _) = test_app(Difficulty::Easy);
        app.start_test();
        type_str(&mut app, "xyz");
        app.on_text_changed(TextEdit::Clear);
        assert_eq!(app.typed(), "");
        assert_eq!(app.paragraph_track(), Some(Track::OnTrack));
        assert_eq!(app.accuracy_label(), "Accuracy: 0.00%");
    }
}
