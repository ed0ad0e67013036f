use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!(
                wpm = cfg.words_per_minute,
                chunk_size = cfg.chunk_size,
                "Parsed configuration from disk"
            );
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let tables: ConfigTables = toml::from_str(contents).context("Failed to parse config")?;
    Ok(AppConfig::from(tables))
}

pub fn serialize_config(config: &AppConfig) -> Result<String> {
    toml::to_string(&ConfigTables::from(config)).context("Failed to serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn parses_tables_and_fills_defaults() {
        let config = parse_config(
            r#"
            [playback]
            words_per_minute = 347
            break_at_sentence_end = true

            [logging]
            log_level = "info"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.words_per_minute, 350);
        assert_eq!(config.chunk_size, 1);
        assert!(config.slow_at_punctuation);
        assert!(config.break_at_sentence_end);
        assert_eq!(config.window_half_width, 40);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse_config("").expect("empty is valid"), AppConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped_on_load() {
        let config = parse_config(
            r#"
            [playback]
            words_per_minute = 5
            chunk_size = 12

            [window]
            half_width = 0
            "#,
        )
        .expect("valid config");
        assert_eq!(config.words_per_minute, 20);
        assert_eq!(config.chunk_size, 5);
        assert_eq!(config.window_half_width, 1);
    }

    #[test]
    fn invalid_toml_is_an_error_and_missing_file_falls_back() {
        assert!(parse_config("[playback\nwords_per_minute = ").is_err());
        let missing = std::env::temp_dir().join("flashread-config-that-does-not-exist.toml");
        assert_eq!(load_config(&missing), AppConfig::default());
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = AppConfig {
            words_per_minute: 420,
            chunk_size: 3,
            break_at_sentence_end: true,
            window_half_width: 12,
            log_level: LogLevel::Warn,
            ..AppConfig::default()
        };
        let text = serialize_config(&config).expect("serializable");
        assert!(text.contains("[playback]"));
        assert_eq!(parse_config(&text).expect("round trip"), config);
    }
}
