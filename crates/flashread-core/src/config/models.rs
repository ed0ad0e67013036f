use super::defaults;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const MIN_WPM: u32 = 20;
pub const MAX_WPM: u32 = 1000;
pub const WPM_STEP: u32 = 10;
pub const MIN_CHUNK_SIZE: usize = 1;
pub const MAX_CHUNK_SIZE: usize = 5;
pub const MIN_HALF_WIDTH: usize = 1;
pub const MAX_HALF_WIDTH: usize = 500;

/// Round to the nearest multiple of ten (halves round up), then clamp to
/// `[MIN_WPM, MAX_WPM]`.
pub fn normalize_wpm(value: i64) -> u32 {
    let step = i64::from(WPM_STEP);
    let rounded = value.saturating_add(step / 2).div_euclid(step) * step;
    rounded.clamp(i64::from(MIN_WPM), i64::from(MAX_WPM)) as u32
}

pub fn clamp_chunk_size(value: i64) -> usize {
    value.clamp(MIN_CHUNK_SIZE as i64, MAX_CHUNK_SIZE as i64) as usize
}

pub fn clamp_half_width(value: i64) -> usize {
    value.clamp(MIN_HALF_WIDTH as i64, MAX_HALF_WIDTH as i64) as usize
}

/// Pacing and chunking settings read by the playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PlaybackConfig {
    pub words_per_minute: u32,
    pub chunk_size: usize,
    pub slow_at_punctuation: bool,
    pub break_at_sentence_end: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            words_per_minute: defaults::default_words_per_minute(),
            chunk_size: defaults::default_chunk_size(),
            slow_at_punctuation: defaults::default_slow_at_punctuation(),
            break_at_sentence_end: defaults::default_break_at_sentence_end(),
        }
    }
}

impl PlaybackConfig {
    /// Copy with speed and chunk size brought into their valid ranges.
    pub fn validated(self) -> Self {
        PlaybackConfig {
            words_per_minute: normalize_wpm(i64::from(self.words_per_minute)),
            chunk_size: clamp_chunk_size(self.chunk_size as i64),
            ..self
        }
    }
}

/// High-level app configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub words_per_minute: u32,
    pub chunk_size: usize,
    pub slow_at_punctuation: bool,
    pub break_at_sentence_end: bool,
    pub window_half_width: usize,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            words_per_minute: defaults::default_words_per_minute(),
            chunk_size: defaults::default_chunk_size(),
            slow_at_punctuation: defaults::default_slow_at_punctuation(),
            break_at_sentence_end: defaults::default_break_at_sentence_end(),
            window_half_width: defaults::default_window_half_width(),
            log_level: defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    /// Engine settings derived from this config, already validated.
    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            words_per_minute: self.words_per_minute,
            chunk_size: self.chunk_size,
            slow_at_punctuation: self.slow_at_punctuation,
            break_at_sentence_end: self.break_at_sentence_end,
        }
        .validated()
    }

    /// Clamp every numeric field the way runtime changes are clamped.
    pub fn validated(mut self) -> Self {
        let playback = self.playback();
        self.words_per_minute = playback.words_per_minute;
        self.chunk_size = playback.chunk_size;
        self.window_half_width = clamp_half_width(self.window_half_width as i64);
        self
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wpm_rounds_to_nearest_ten_then_clamps() {
        assert_eq!(normalize_wpm(200), 200);
        assert_eq!(normalize_wpm(204), 200);
        assert_eq!(normalize_wpm(205), 210);
        assert_eq!(normalize_wpm(15), 20);
        assert_eq!(normalize_wpm(-40), 20);
        assert_eq!(normalize_wpm(996), 1000);
        assert_eq!(normalize_wpm(5000), 1000);
        assert_eq!(normalize_wpm(i64::MAX), 1000);
    }

    #[test]
    fn chunk_size_and_half_width_clamp() {
        assert_eq!(clamp_chunk_size(0), 1);
        assert_eq!(clamp_chunk_size(3), 3);
        assert_eq!(clamp_chunk_size(9), 5);
        assert_eq!(clamp_half_width(0), 1);
        assert_eq!(clamp_half_width(10_000), 500);
    }

    #[test]
    fn app_config_validation_covers_every_numeric_field() {
        let config = AppConfig {
            words_per_minute: 1234,
            chunk_size: 0,
            window_half_width: 0,
            ..AppConfig::default()
        }
        .validated();
        assert_eq!(config.words_per_minute, 1000);
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.window_half_width, 1);
    }
}
