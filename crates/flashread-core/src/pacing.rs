//! Delay before the cursor advances past the chunk currently on screen.

use crate::config::PlaybackConfig;
use crate::text_utils::{contains_clause_break, contains_sentence_end};
use crate::tokenizer::Token;

/// Multiplier applied to the base interval when a chunk ends a sentence.
pub const SENTENCE_END_MULTIPLIER: f64 = 2.5;
/// Multiplier applied when a chunk contains a comma or semicolon.
pub const CLAUSE_BREAK_MULTIPLIER: f64 = 1.5;

/// `round(60000 / wpm)`, the interval for an unpunctuated chunk.
pub fn base_interval_ms(words_per_minute: u32) -> u64 {
    (60_000.0 / f64::from(words_per_minute.max(1))).round() as u64
}

/// Interval for a chunk given its joined text. Sentence-ending marks win over
/// clause breaks when both are present.
pub fn compute_interval_ms(chunk_text: &str, config: &PlaybackConfig) -> u64 {
    let base = base_interval_ms(config.words_per_minute);
    if !config.slow_at_punctuation {
        return base;
    }
    let multiplier = if contains_sentence_end(chunk_text) {
        SENTENCE_END_MULTIPLIER
    } else if contains_clause_break(chunk_text) {
        CLAUSE_BREAK_MULTIPLIER
    } else {
        return base;
    };
    (base as f64 * multiplier).round() as u64
}

/// Same as [`compute_interval_ms`] over tokens, joined the way they are displayed.
pub fn interval_for_chunk(chunk: &[Token], config: &PlaybackConfig) -> u64 {
    let text = chunk
        .iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    compute_interval_ms(&text, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn config(wpm: u32, slow: bool) -> PlaybackConfig {
        PlaybackConfig {
            words_per_minute: wpm,
            slow_at_punctuation: slow,
            ..PlaybackConfig::default()
        }
    }

    #[test]
    fn punctuation_scales_the_base_interval() {
        let cfg = config(60, true);
        assert_eq!(compute_interval_ms("Hello,", &cfg), 1500);
        assert_eq!(compute_interval_ms("world.", &cfg), 2500);
        assert_eq!(compute_interval_ms("Go", &cfg), 1000);
        assert_eq!(compute_interval_ms("now!", &cfg), 2500);
    }

    #[test]
    fn sentence_end_takes_priority_over_comma() {
        let cfg = config(60, true);
        assert_eq!(compute_interval_ms("yes, done.", &cfg), 2500);
        assert_eq!(compute_interval_ms("wait; what?", &cfg), 2500);
    }

    #[test]
    fn disabled_slowdown_returns_base() {
        let cfg = config(60, false);
        assert_eq!(compute_interval_ms("world.", &cfg), 1000);
        assert_eq!(compute_interval_ms("Hello,", &cfg), 1000);
    }

    #[test]
    fn base_interval_rounds_to_nearest_millisecond() {
        assert_eq!(base_interval_ms(200), 300);
        assert_eq!(base_interval_ms(180), 333);
        assert_eq!(base_interval_ms(70), 857);
        assert_eq!(compute_interval_ms("end.", &config(180, true)), 833);
    }

    #[test]
    fn interval_never_grows_as_speed_increases() {
        for sample in ["plain", "comma,", "stop."] {
            let mut previous = u64::MAX;
            for wpm in (20..=1000).step_by(10) {
                let interval = compute_interval_ms(sample, &config(wpm, true));
                assert!(interval <= previous, "{sample} at {wpm} wpm");
                previous = interval;
            }
        }
    }

    #[test]
    fn token_chunks_are_joined_before_checking() {
        let stream = tokenize("one, two three");
        let cfg = config(60, true);
        assert_eq!(interval_for_chunk(stream.slice(0..2), &cfg), 1500);
        assert_eq!(interval_for_chunk(stream.slice(1..3), &cfg), 1000);
        assert_eq!(interval_for_chunk(stream.slice(0..1), &cfg), 1500);
    }
}
