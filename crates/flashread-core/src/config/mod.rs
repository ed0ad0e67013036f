//! Configuration loading for the reader.
//!
//! User-tunable settings are loaded from a TOML file (`conf/config.toml` by
//! default). Missing or invalid entries fall back to defaults, and every loaded
//! value goes through the same validation as a runtime settings change.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{
    AppConfig, LogLevel, MAX_CHUNK_SIZE, MAX_HALF_WIDTH, MAX_WPM, MIN_CHUNK_SIZE,
    MIN_HALF_WIDTH, MIN_WPM, PlaybackConfig, WPM_STEP, clamp_chunk_size, clamp_half_width,
    normalize_wpm,
};
