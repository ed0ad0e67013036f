//! Playback clock.
//!
//! A two-state machine (`Stopped`, `Playing`) that owns the cursor while playing.
//! The clock never sleeps itself: every transition appends [`TimerEffect`]s for
//! the driver to carry out. At most one tick is pending at a time, identified by a
//! `tick_id`; a tick that arrives with any other id is stale and ignored, so a
//! cancelled timer can never move the cursor.

use crate::chunk::build_chunk;
use crate::config::PlaybackConfig;
use crate::pacing::interval_for_chunk;
use crate::tokenizer::TokenStream;
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// The single outstanding timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PendingTick {
    #[ts(type = "number")]
    pub tick_id: u64,
    #[ts(type = "number")]
    pub delay_ms: u64,
}

/// Work the driver must perform outside the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum TimerEffect {
    ScheduleTick {
        #[ts(type = "number")]
        tick_id: u64,
        #[ts(type = "number")]
        delay_ms: u64,
    },
    CancelTick {
        #[ts(type = "number")]
        tick_id: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cursor moved to the contained index and the next tick is scheduled.
    Advanced(usize),
    /// The stream is exhausted; playback stopped with the cursor left in place.
    Finished(usize),
    /// Not the pending tick, or not playing.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: PlaybackState,
    cursor: usize,
    pending: Option<PendingTick>,
    next_tick_id: u64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
            cursor: 0,
            pending: None,
            next_tick_id: 1,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pending(&self) -> Option<PendingTick> {
        self.pending
    }

    /// Interval the clock would wait at the current cursor.
    pub fn current_interval_ms(&self, stream: &TokenStream, config: &PlaybackConfig) -> u64 {
        interval_for_chunk(build_chunk(stream, self.cursor, config), config)
    }

    /// Play/pause. Starting at the final token replays from the beginning; an empty
    /// stream never starts.
    pub fn toggle(
        &mut self,
        stream: &TokenStream,
        config: &PlaybackConfig,
        effects: &mut Vec<TimerEffect>,
    ) {
        if self.is_playing() {
            self.stop(effects);
            info!(cursor = self.cursor, "Paused playback");
            return;
        }
        let Some(last) = stream.last_index() else {
            debug!("Ignoring play request for empty stream");
            return;
        };
        if self.cursor >= last {
            self.cursor = 0;
        }
        self.state = PlaybackState::Playing;
        self.schedule(stream, config, effects);
        info!(cursor = self.cursor, "Started playback");
    }

    /// Handle a fired timer.
    pub fn tick(
        &mut self,
        tick_id: u64,
        stream: &TokenStream,
        config: &PlaybackConfig,
        effects: &mut Vec<TimerEffect>,
    ) -> TickOutcome {
        let is_current = self.pending.map(|pending| pending.tick_id) == Some(tick_id);
        if !self.is_playing() || !is_current {
            debug!(
                tick_id,
                pending = ?self.pending.map(|pending| pending.tick_id),
                "Ignoring stale tick"
            );
            return TickOutcome::Ignored;
        }
        self.pending = None;

        let next = self.cursor.saturating_add(config.chunk_size.max(1));
        if next >= stream.len() {
            self.state = PlaybackState::Stopped;
            info!(cursor = self.cursor, "Reached end of stream");
            return TickOutcome::Finished(self.cursor);
        }
        self.cursor = next;
        self.schedule(stream, config, effects);
        TickOutcome::Advanced(next)
    }

    /// Cancel the pending tick and stop. The cursor is kept for resuming.
    pub fn stop(&mut self, effects: &mut Vec<TimerEffect>) {
        if let Some(pending) = self.pending.take() {
            effects.push(TimerEffect::CancelTick {
                tick_id: pending.tick_id,
            });
        }
        self.state = PlaybackState::Stopped;
    }

    /// Stop and move to `index`, clamped into the stream.
    pub fn seek(&mut self, index: usize, stream: &TokenStream, effects: &mut Vec<TimerEffect>) {
        self.stop(effects);
        self.cursor = stream.clamp_index(index);
        debug!(requested = index, cursor = self.cursor, "Seeked");
    }

    pub fn step_back(
        &mut self,
        stream: &TokenStream,
        config: &PlaybackConfig,
        effects: &mut Vec<TimerEffect>,
    ) {
        let target = self.cursor.saturating_sub(config.chunk_size.max(1));
        self.seek(target, stream, effects);
    }

    pub fn step_forward(
        &mut self,
        stream: &TokenStream,
        config: &PlaybackConfig,
        effects: &mut Vec<TimerEffect>,
    ) {
        let target = self.cursor.saturating_add(config.chunk_size.max(1));
        self.seek(target, stream, effects);
    }

    /// Stop and return to the first token; used whenever the stream is replaced.
    pub fn reset(&mut self, effects: &mut Vec<TimerEffect>) {
        self.stop(effects);
        self.cursor = 0;
    }

    /// Replace the pending tick with one paced by the current config. Used after
    /// settings change mid-playback; does nothing while stopped.
    pub fn reschedule(
        &mut self,
        stream: &TokenStream,
        config: &PlaybackConfig,
        effects: &mut Vec<TimerEffect>,
    ) {
        if !self.is_playing() {
            return;
        }
        if let Some(pending) = self.pending.take() {
            effects.push(TimerEffect::CancelTick {
                tick_id: pending.tick_id,
            });
        }
        self.schedule(stream, config, effects);
    }

    fn schedule(
        &mut self,
        stream: &TokenStream,
        config: &PlaybackConfig,
        effects: &mut Vec<TimerEffect>,
    ) {
        let tick_id = self.next_tick_id;
        self.next_tick_id = self.next_tick_id.wrapping_add(1).max(1);
        let delay_ms = self.current_interval_ms(stream, config);
        self.pending = Some(PendingTick { tick_id, delay_ms });
        effects.push(TimerEffect::ScheduleTick { tick_id, delay_ms });
        debug!(tick_id, delay_ms, cursor = self.cursor, "Scheduled tick");
    }
}
