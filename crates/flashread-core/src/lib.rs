//! Rapid serial visual presentation engine.
//!
//! Text is tokenized once, then a session walks a cursor through the tokens on a
//! punctuation-aware clock. Everything here is synchronous: timers are requested
//! as [`clock::TimerEffect`]s and fired back into the session by the caller.

pub mod bindings;
pub mod cache;
pub mod chunk;
pub mod clock;
pub mod config;
pub mod ingest;
pub mod library;
pub mod orp;
pub mod pacing;
pub mod session;
pub mod text_utils;
pub mod tokenizer;
pub mod window;

pub use bindings::export_ts_bindings;
pub use session::{IngestOutcome, IngestTicket, Session, SessionCommand, SessionEvent};
