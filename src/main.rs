//! Terminal speed reader.
//!
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Ingest the requested file (plain text or PDF).
//! - Play it back one chunk at a time until the end or Ctrl+C.

mod player;

use crate::player::{OutputMode, Player};
use anyhow::{Context, Result, anyhow};
use flashread_core::config::load_config;
use flashread_core::ingest::ingest_path;
use flashread_core::session::{SettingsPatch, WELCOME_TEXT};
use flashread_core::{IngestOutcome, Session, SessionCommand};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str =
    "Usage: flashread [--json] [--wpm <n>] [--chunk <n>] [--from <word-index>] [path-to-text-or-pdf]";

#[derive(Debug, Default)]
struct Args {
    path: Option<PathBuf>,
    output_json: bool,
    words_per_minute: Option<i32>,
    chunk_size: Option<i32>,
    start_index: Option<usize>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        level = %config.log_level,
        words_per_minute = config.words_per_minute,
        chunk_size = config.chunk_size,
        "Starting speed reader"
    );

    let mut session = Session::new(&config);
    match &args.path {
        Some(path) => {
            let ticket = session.begin_ingest();
            info!(
                path = %path.display(),
                request_id = ticket.request_id(),
                "Opening source"
            );
            let result = ingest_path(path);
            match session
                .complete_ingest(ticket, result)
                .with_context(|| format!("Failed to load {}", path.display()))?
            {
                IngestOutcome::Applied(event) => info!(
                    tokens = event.snapshot.token_count,
                    "Loaded source"
                ),
                IngestOutcome::Discarded => warn!("Source load was superseded"),
            }
        }
        None => {
            session.apply_command(SessionCommand::EditText {
                text: WELCOME_TEXT.to_string(),
            });
        }
    }

    if args.words_per_minute.is_some() || args.chunk_size.is_some() {
        session.apply_command(SessionCommand::ApplySettings {
            patch: SettingsPatch {
                words_per_minute: args.words_per_minute,
                chunk_size: args.chunk_size,
                ..SettingsPatch::default()
            },
        });
    }
    if let Some(index) = args.start_index {
        session.apply_command(SessionCommand::SeekToken { index });
    }

    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop);
    if let Err(err) = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl+C signal handler: {err}");
    }

    let output = if args.output_json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    Player::new(&mut session, output, io::stdout()).run(&stop)?;
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => parsed.output_json = true,
            "--wpm" => parsed.words_per_minute = Some(parse_value(&mut args, "--wpm")?),
            "--chunk" => parsed.chunk_size = Some(parse_value(&mut args, "--chunk")?),
            "--from" => parsed.start_index = Some(parse_value(&mut args, "--from")?),
            "-h" | "--help" => return Err(anyhow!(USAGE)),
            flag if flag.starts_with("--") => {
                return Err(anyhow!("Unknown option {flag}\n{USAGE}"));
            }
            path => {
                if parsed.path.is_some() {
                    return Err(anyhow!(USAGE));
                }
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(anyhow!("File not found: {}", path.display()));
                }
                parsed.path = Some(path);
            }
        }
    }
    Ok(parsed)
}

fn parse_value<T>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .next()
        .ok_or_else(|| anyhow!("Missing value for {flag}\n{USAGE}"))?;
    raw.parse()
        .with_context(|| format!("Invalid value for {flag}: {raw}"))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.reload(parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
