/// Whether the typed text still agrees with the paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    OnTrack,
    OffTrack,
}

/// Statistics for one snapshot of typed text against the reference paragraph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub correct_words: usize,
    pub wpm: f64,
    pub correct_chars: usize,
    pub accuracy: f64,
    pub track: Track,
}

/// Number of words equal to the reference word at the same position.
pub fn correct_words(typed: &str, reference: &str) -> usize {
    typed
        .split_whitespace()
        .zip(reference.split_whitespace())
        .filter(|(t, r)| t == r)
        .count()
}

/// Number of characters equal to the reference character at the same position.
/// Stops at the shorter of the two texts.
pub fn correct_chars(typed: &str, reference: &str) -> usize {
    typed
        .chars()
        .zip(reference.chars())
        .filter(|(t, r)| t == r)
        .count()
}

pub fn track(typed: &str, reference: &str) -> Track {
    if reference.starts_with(typed) {
        Track::OnTrack
    } else {
        Track::OffTrack
    }
}

/// Trimmed typed text must equal the paragraph exactly.
pub fn is_complete(typed: &str, reference: &str) -> bool {
    typed.trim() == reference
}

/// Recomputes every statistic from scratch.
///
/// `elapsed_secs` is floored at one second and the reference length at one
/// character, so the result is always finite.
pub fn evaluate(typed: &str, reference: &str, elapsed_secs: f64) -> Evaluation {
    let elapsed_secs = if elapsed_secs.is_finite() {
        elapsed_secs.max(1.0)
    } else {
        1.0
    };

    let correct_words = correct_words(typed, reference);
    let wpm = (correct_words as f64 / elapsed_secs) * 60.0;

    let correct_chars = correct_chars(typed, reference);
    let reference_len = reference.chars().count().max(1);
    let accuracy = (correct_chars as f64 / reference_len as f64) * 100.0;

    Evaluation {
        correct_words,
        wpm,
        correct_chars,
        accuracy,
        track: track(typed, reference),
    }
}
