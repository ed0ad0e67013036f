use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

/// On-disk layout of the config file.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    playback: PlaybackTable,
    #[serde(default)]
    window: WindowTable,
    #[serde(default)]
    logging: LoggingTable,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            words_per_minute: tables.playback.words_per_minute,
            chunk_size: tables.playback.chunk_size,
            slow_at_punctuation: tables.playback.slow_at_punctuation,
            break_at_sentence_end: tables.playback.break_at_sentence_end,
            window_half_width: tables.window.half_width,
            log_level: tables.logging.log_level,
        }
        .validated()
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            playback: PlaybackTable {
                words_per_minute: config.words_per_minute,
                chunk_size: config.chunk_size,
                slow_at_punctuation: config.slow_at_punctuation,
                break_at_sentence_end: config.break_at_sentence_end,
            },
            window: WindowTable {
                half_width: config.window_half_width,
            },
            logging: LoggingTable {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PlaybackTable {
    #[serde(default = "defaults::default_words_per_minute")]
    words_per_minute: u32,
    #[serde(default = "defaults::default_chunk_size")]
    chunk_size: usize,
    #[serde(default = "defaults::default_slow_at_punctuation")]
    slow_at_punctuation: bool,
    #[serde(default = "defaults::default_break_at_sentence_end")]
    break_at_sentence_end: bool,
}

impl Default for PlaybackTable {
    fn default() -> Self {
        PlaybackTable {
            words_per_minute: defaults::default_words_per_minute(),
            chunk_size: defaults::default_chunk_size(),
            slow_at_punctuation: defaults::default_slow_at_punctuation(),
            break_at_sentence_end: defaults::default_break_at_sentence_end(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct WindowTable {
    #[serde(default = "defaults::default_window_half_width")]
    half_width: usize,
}

impl Default for WindowTable {
    fn default() -> Self {
        WindowTable {
            half_width: defaults::default_window_half_width(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingTable {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingTable {
    fn default() -> Self {
        LoggingTable {
            log_level: defaults::default_log_level(),
        }
    }
}
