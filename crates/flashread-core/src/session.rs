//! Reading session.
//!
//! Owns the text, its token stream, the playback clock, bookmarks and history.
//! Every command returns a snapshot plus the timer effects the caller must apply.

use crate::cache::TokenCache;
use crate::chunk::{build_chunk, chunk_text};
use crate::clock::{PlaybackClock, TickOutcome, TimerEffect};
use crate::config::{self, AppConfig, PlaybackConfig};
use crate::ingest::{IngestError, IngestedText};
use crate::library::{
    Bookmark, Bookmarks, History, HistoryEntry, HistorySummary, unix_timestamp,
};
use crate::orp::EmphasisSplit;
use crate::text_utils::leading_words;
use crate::tokenizer::{TokenStream, token_index_at_offset};
use crate::window::{RenderWindow, render_window};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

/// Words used for a bookmark label or history name when none is given.
const PREVIEW_WORDS: usize = 5;

/// Shown on a fresh session before anything is loaded.
pub const WELCOME_TEXT: &str = "Paste or load text to start reading with Rapid Serial Visual Presentation. \
Adjust the speed, step back to words you missed, and click any word to jump to it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SettingsView {
    pub words_per_minute: u32,
    pub chunk_size: usize,
    pub slow_at_punctuation: bool,
    pub break_at_sentence_end: bool,
    pub window_half_width: usize,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct SettingsPatch {
    #[ts(optional)]
    pub words_per_minute: Option<i32>,
    #[ts(optional)]
    pub chunk_size: Option<i32>,
    #[ts(optional)]
    pub slow_at_punctuation: Option<bool>,
    #[ts(optional)]
    pub break_at_sentence_end: Option<bool>,
    #[ts(optional)]
    pub window_half_width: Option<i32>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub source_name: Option<String>,
    pub token_count: usize,
    pub cursor: usize,
    pub playing: bool,
    pub chunk_text: String,
    pub chunk_indices: Vec<usize>,
    pub emphasis: Option<EmphasisSplit>,
    #[ts(type = "number")]
    pub interval_ms: u64,
    pub settings: SettingsView,
    pub window: RenderWindow,
    pub bookmarks: Vec<Bookmark>,
    pub history: Vec<HistorySummary>,
    pub progress_pct: f64,
    pub remaining_secs: f64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(tag = "command", rename_all = "snake_case")]
#[ts(export)]
pub enum SessionCommand {
    GetSnapshot,
    TogglePlayback,
    Tick {
        #[ts(type = "number")]
        tick_id: u64,
    },
    SeekToken {
        index: usize,
    },
    SeekOffset {
        offset: usize,
    },
    StepBack,
    StepForward,
    EditText {
        text: String,
    },
    ClearText,
    ApplySettings {
        patch: SettingsPatch,
    },
    AddBookmark {
        label: String,
    },
    LoadBookmark {
        index: usize,
    },
    RemoveBookmark {
        index: usize,
    },
    SaveToHistory,
    LoadHistory {
        index: usize,
    },
    RemoveHistory {
        index: usize,
    },
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "reader_get_snapshot",
            Self::TogglePlayback => "reader_toggle_playback",
            Self::Tick { .. } => "reader_tick",
            Self::SeekToken { .. } => "reader_seek_token",
            Self::SeekOffset { .. } => "reader_seek_offset",
            Self::StepBack => "reader_step_back",
            Self::StepForward => "reader_step_forward",
            Self::EditText { .. } => "reader_edit_text",
            Self::ClearText => "reader_clear_text",
            Self::ApplySettings { .. } => "reader_apply_settings",
            Self::AddBookmark { .. } => "reader_add_bookmark",
            Self::LoadBookmark { .. } => "reader_load_bookmark",
            Self::RemoveBookmark { .. } => "reader_remove_bookmark",
            Self::SaveToHistory => "reader_save_to_history",
            Self::LoadHistory { .. } => "reader_load_history",
            Self::RemoveHistory { .. } => "reader_remove_history",
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SessionEvent {
    #[ts(type = "string")]
    pub action: &'static str,
    pub snapshot: SessionSnapshot,
    pub effects: Vec<TimerEffect>,
}

/// Handle for one in-flight ingestion. Only the most recent ticket may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestTicket {
    request_id: u64,
}

impl IngestTicket {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }
}

#[derive(Debug, Clone)]
pub enum IngestOutcome {
    Applied(SessionEvent),
    /// The text changed, or a newer ingestion started, after this one began.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct Session {
    text: String,
    tokens: TokenStream,
    source_name: Option<String>,
    playback: PlaybackConfig,
    window_half_width: usize,
    clock: PlaybackClock,
    bookmarks: Bookmarks,
    history: History,
    cache: TokenCache,
    ingest_request_id: u64,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        let config = config.clone().validated();
        Self {
            text: String::new(),
            tokens: TokenStream::default(),
            source_name: None,
            playback: config.playback(),
            window_half_width: config.window_half_width,
            clock: PlaybackClock::new(),
            bookmarks: Bookmarks::default(),
            history: History::default(),
            cache: TokenCache::default(),
            ingest_request_id: 0,
        }
    }

    pub fn with_text(config: &AppConfig, text: impl Into<String>) -> Self {
        let mut session = Self::new(config);
        let mut effects = Vec::new();
        session.replace_text(text.into(), None, &mut effects);
        session
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn cursor(&self) -> usize {
        self.clock.cursor()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        self.playback
    }

    pub fn settings_view(&self) -> SettingsView {
        SettingsView {
            words_per_minute: self.playback.words_per_minute,
            chunk_size: self.playback.chunk_size,
            slow_at_punctuation: self.playback.slow_at_punctuation,
            break_at_sentence_end: self.playback.break_at_sentence_end,
            window_half_width: self.window_half_width,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let cursor = self.clock.cursor();
        let chunk = build_chunk(&self.tokens, cursor, &self.playback);
        let token_count = self.tokens.len();
        let progress_pct = if token_count == 0 {
            0.0
        } else {
            cursor as f64 / token_count as f64 * 100.0
        };
        let remaining_words = token_count.saturating_sub(cursor);
        let remaining_secs =
            remaining_words as f64 * 60.0 / f64::from(self.playback.words_per_minute.max(1));

        SessionSnapshot {
            source_name: self.source_name.clone(),
            token_count,
            cursor,
            playing: self.clock.is_playing(),
            chunk_text: chunk_text(chunk),
            chunk_indices: (cursor..cursor + chunk.len()).collect(),
            emphasis: chunk.first().map(|token| EmphasisSplit::of(&token.text)),
            interval_ms: self.clock.current_interval_ms(&self.tokens, &self.playback),
            settings: self.settings_view(),
            window: render_window(
                &self.text,
                &self.tokens,
                cursor,
                self.window_half_width,
                self.playback.chunk_size,
            ),
            bookmarks: self.bookmarks.as_slice().to_vec(),
            history: self.history.summaries(),
            progress_pct,
            remaining_secs,
        }
    }

    pub fn apply_command(&mut self, command: SessionCommand) -> SessionEvent {
        let action = command.action();
        let mut effects = Vec::new();
        match command {
            SessionCommand::GetSnapshot => {}
            SessionCommand::TogglePlayback => self.toggle_playback(&mut effects),
            SessionCommand::Tick { tick_id } => self.tick(tick_id, &mut effects),
            SessionCommand::SeekToken { index } => self.seek_token(index, &mut effects),
            SessionCommand::SeekOffset { offset } => self.seek_offset(offset, &mut effects),
            SessionCommand::StepBack => self.step_back(&mut effects),
            SessionCommand::StepForward => self.step_forward(&mut effects),
            SessionCommand::EditText { text } => self.edit_text(text, &mut effects),
            SessionCommand::ClearText => self.clear_text(&mut effects),
            SessionCommand::ApplySettings { patch } => {
                self.apply_settings_patch(patch, &mut effects)
            }
            SessionCommand::AddBookmark { label } => self.add_bookmark(label),
            SessionCommand::LoadBookmark { index } => self.load_bookmark(index, &mut effects),
            SessionCommand::RemoveBookmark { index } => self.remove_bookmark(index),
            SessionCommand::SaveToHistory => self.save_to_history(),
            SessionCommand::LoadHistory { index } => self.load_history(index, &mut effects),
            SessionCommand::RemoveHistory { index } => self.remove_history(index),
        }
        SessionEvent {
            action,
            snapshot: self.snapshot(),
            effects,
        }
    }

    pub fn toggle_playback(&mut self, effects: &mut Vec<TimerEffect>) {
        self.clock.toggle(&self.tokens, &self.playback, effects);
    }

    pub fn tick(&mut self, tick_id: u64, effects: &mut Vec<TimerEffect>) {
        if let TickOutcome::Advanced(cursor) =
            self.clock.tick(tick_id, &self.tokens, &self.playback, effects)
        {
            debug!(tick_id, cursor, "Advanced cursor");
        }
    }

    pub fn seek_token(&mut self, index: usize, effects: &mut Vec<TimerEffect>) {
        self.clock.seek(index, &self.tokens, effects);
    }

    /// Seek to the word containing character `offset` of the text. Used only by
    /// callers that have no token index to offer.
    pub fn seek_offset(&mut self, offset: usize, effects: &mut Vec<TimerEffect>) {
        let index = token_index_at_offset(&self.text, &self.tokens, offset);
        debug!(offset, index, "Resolved offset seek");
        self.clock.seek(index, &self.tokens, effects);
    }

    pub fn step_back(&mut self, effects: &mut Vec<TimerEffect>) {
        self.clock.step_back(&self.tokens, &self.playback, effects);
    }

    pub fn step_forward(&mut self, effects: &mut Vec<TimerEffect>) {
        self.clock.step_forward(&self.tokens, &self.playback, effects);
    }

    /// Replace the text with an edited version. Re-submitting identical text while
    /// paused keeps the reader's place.
    pub fn edit_text(&mut self, text: String, effects: &mut Vec<TimerEffect>) {
        if !self.clock.is_playing() && text == self.text {
            debug!(cursor = self.clock.cursor(), "Ignoring unchanged text edit");
            return;
        }
        self.replace_text(text, None, effects);
    }

    pub fn clear_text(&mut self, effects: &mut Vec<TimerEffect>) {
        self.replace_text(String::new(), None, effects);
    }

    pub fn apply_settings_patch(&mut self, patch: SettingsPatch, effects: &mut Vec<TimerEffect>) {
        let before = self.playback;
        if let Some(wpm) = patch.words_per_minute {
            self.playback.words_per_minute = config::normalize_wpm(i64::from(wpm));
        }
        if let Some(chunk_size) = patch.chunk_size {
            self.playback.chunk_size = config::clamp_chunk_size(i64::from(chunk_size));
        }
        if let Some(slow) = patch.slow_at_punctuation {
            self.playback.slow_at_punctuation = slow;
        }
        if let Some(break_at_end) = patch.break_at_sentence_end {
            self.playback.break_at_sentence_end = break_at_end;
        }
        if let Some(half_width) = patch.window_half_width {
            self.window_half_width = config::clamp_half_width(i64::from(half_width));
        }

        if self.playback != before {
            info!(
                words_per_minute = self.playback.words_per_minute,
                chunk_size = self.playback.chunk_size,
                slow_at_punctuation = self.playback.slow_at_punctuation,
                break_at_sentence_end = self.playback.break_at_sentence_end,
                "Applied playback settings"
            );
            self.clock.reschedule(&self.tokens, &self.playback, effects);
        }
    }

    pub fn add_bookmark(&mut self, label: String) {
        if self.tokens.is_empty() {
            debug!("Ignoring bookmark on empty text");
            return;
        }
        let token_index = self.clock.cursor();
        let label = if label.trim().is_empty() {
            self.preview_at(token_index)
        } else {
            label.trim().to_string()
        };
        info!(token_index, label = %label, "Added bookmark");
        self.bookmarks.add(Bookmark {
            label,
            token_index,
            timestamp: unix_timestamp(),
        });
    }

    pub fn load_bookmark(&mut self, index: usize, effects: &mut Vec<TimerEffect>) {
        let Some(token_index) = self.bookmarks.get(index).map(|bookmark| bookmark.token_index)
        else {
            warn!(index, "Bookmark index out of range");
            return;
        };
        self.clock.seek(token_index, &self.tokens, effects);
    }

    pub fn remove_bookmark(&mut self, index: usize) {
        match self.bookmarks.remove(index) {
            Some(bookmark) => info!(index, label = %bookmark.label, "Removed bookmark"),
            None => warn!(index, "Bookmark index out of range"),
        }
    }

    pub fn save_to_history(&mut self) {
        if self.text.trim().is_empty() {
            debug!("Ignoring history save of empty text");
            return;
        }
        let name = self
            .source_name
            .clone()
            .unwrap_or_else(|| leading_words(&self.text, PREVIEW_WORDS));
        info!(name = %name, "Saved text to history");
        let evicted = self.history.push(HistoryEntry {
            name,
            content: self.text.clone(),
            timestamp: unix_timestamp(),
        });
        if let Some(evicted) = evicted {
            debug!(name = %evicted.name, "Evicted oldest history entry");
        }
    }

    pub fn load_history(&mut self, index: usize, effects: &mut Vec<TimerEffect>) {
        let Some(entry) = self.history.get(index).cloned() else {
            warn!(index, "History index out of range");
            return;
        };
        info!(index, name = %entry.name, "Loading history entry");
        self.replace_text(entry.content, Some(entry.name), effects);
    }

    pub fn remove_history(&mut self, index: usize) {
        match self.history.remove(index) {
            Some(entry) => info!(index, name = %entry.name, "Removed history entry"),
            None => warn!(index, "History index out of range"),
        }
    }

    /// Start an ingestion. Any earlier ticket stops being current.
    pub fn begin_ingest(&mut self) -> IngestTicket {
        let request_id = self.bump_ingest_request();
        debug!(request_id, "Began ingestion");
        IngestTicket { request_id }
    }

    /// Apply a finished ingestion if `ticket` is still current. A failed ingestion
    /// leaves the session untouched.
    pub fn complete_ingest(
        &mut self,
        ticket: IngestTicket,
        result: Result<IngestedText, IngestError>,
    ) -> Result<IngestOutcome, IngestError> {
        if ticket.request_id != self.ingest_request_id {
            debug!(
                request_id = ticket.request_id,
                current = self.ingest_request_id,
                "Ignoring stale ingestion result"
            );
            return Ok(IngestOutcome::Discarded);
        }
        let ingested = result.inspect_err(|err| {
            warn!(request_id = ticket.request_id, "Ingestion failed: {err}");
        })?;

        let mut effects = Vec::new();
        self.replace_text(ingested.text, Some(ingested.source_name), &mut effects);
        Ok(IngestOutcome::Applied(SessionEvent {
            action: "reader_ingest",
            snapshot: self.snapshot(),
            effects,
        }))
    }

    fn replace_text(
        &mut self,
        text: String,
        source_name: Option<String>,
        effects: &mut Vec<TimerEffect>,
    ) {
        self.clock.reset(effects);
        self.tokens = self.cache.tokens_for(&text);
        self.text = text;
        self.source_name = source_name;
        self.bump_ingest_request();
        info!(
            tokens = self.tokens.len(),
            source = self.source_name.as_deref().unwrap_or(""),
            "Replaced text"
        );
    }

    fn bump_ingest_request(&mut self) -> u64 {
        self.ingest_request_id = self.ingest_request_id.wrapping_add(1).max(1);
        self.ingest_request_id
    }

    fn preview_at(&self, index: usize) -> String {
        self.tokens
            .slice(index..index.saturating_add(PREVIEW_WORDS))
            .iter()
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
