//! Terminal playback loop.
//!
//! Owns the only timer: sleeps for whatever the session last scheduled, then feeds
//! the tick back in. Cancel effects drop the pending timer before anything else
//! runs, so a cancelled tick is never delivered.

use anyhow::{Context, Result};
use flashread_core::clock::TimerEffect;
use flashread_core::{Session, SessionCommand, SessionEvent};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Upper bound on a single sleep so Ctrl+C is noticed promptly.
const POLL_SLICE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    tick_id: u64,
    due: Instant,
}

pub struct Player<'a, W: Write> {
    session: &'a mut Session,
    output: OutputMode,
    out: W,
    pending: Option<Pending>,
}

impl<'a, W: Write> Player<'a, W> {
    pub fn new(session: &'a mut Session, output: OutputMode, out: W) -> Self {
        Self {
            session,
            output,
            out,
            pending: None,
        }
    }

    /// Play from the current cursor until the stream ends or `stop` is raised.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        let event = self.session.apply_command(SessionCommand::TogglePlayback);
        self.handle(&event)?;

        while let Some(pending) = self.pending {
            if stop.load(Ordering::SeqCst) {
                let event = self.session.apply_command(SessionCommand::TogglePlayback);
                self.handle(&event)?;
                info!(cursor = event.snapshot.cursor, "Interrupted playback");
                break;
            }
            let now = Instant::now();
            if now < pending.due {
                thread::sleep((pending.due - now).min(POLL_SLICE));
                continue;
            }
            let event = self.session.apply_command(SessionCommand::Tick {
                tick_id: pending.tick_id,
            });
            self.handle(&event)?;
        }

        let snapshot = self.session.snapshot();
        info!(
            cursor = snapshot.cursor,
            tokens = snapshot.token_count,
            progress_pct = snapshot.progress_pct,
            "Playback stopped"
        );
        Ok(())
    }

    fn handle(&mut self, event: &SessionEvent) -> Result<()> {
        for effect in &event.effects {
            match *effect {
                TimerEffect::CancelTick { tick_id } => {
                    if self.pending.map(|pending| pending.tick_id) == Some(tick_id) {
                        debug!(tick_id, "Cancelled timer");
                        self.pending = None;
                    }
                }
                TimerEffect::ScheduleTick { tick_id, delay_ms } => {
                    self.pending = Some(Pending {
                        tick_id,
                        due: Instant::now() + Duration::from_millis(delay_ms),
                    });
                }
            }
        }
        if event.effects.is_empty() && !event.snapshot.playing {
            self.pending = None;
            // Final tick: the last chunk is already on screen.
            if self.output == OutputMode::Text {
                return Ok(());
            }
        }
        self.render(event)
    }

    fn render(&mut self, event: &SessionEvent) -> Result<()> {
        let out = &mut self.out;
        match self.output {
            OutputMode::Json => {
                let line = serde_json::to_string(event).context("Failed to encode event")?;
                writeln!(out, "{line}")?;
            }
            OutputMode::Text => {
                let snapshot = &event.snapshot;
                let Some(emphasis) = &snapshot.emphasis else {
                    writeln!(out, "{}", snapshot.chunk_text)?;
                    return Ok(());
                };
                let rest = snapshot
                    .chunk_text
                    .split_once(' ')
                    .map(|(_, rest)| rest)
                    .unwrap_or("");
                writeln!(
                    out,
                    "{:>6} {:>5.1}%  {}[{}]{} {}",
                    snapshot.cursor,
                    snapshot.progress_pct,
                    emphasis.before,
                    emphasis.anchor,
                    emphasis.after,
                    rest
                )?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashread_core::config::AppConfig;

    fn config(wpm: u32) -> AppConfig {
        AppConfig {
            words_per_minute: wpm,
            chunk_size: 1,
            slow_at_punctuation: false,
            ..AppConfig::default()
        }
    }

    fn event(session: &Session, effects: Vec<TimerEffect>) -> SessionEvent {
        SessionEvent {
            action: "reader_tick",
            snapshot: session.snapshot(),
            effects,
        }
    }

    fn pending_id<W: Write>(player: &Player<'_, W>) -> Option<u64> {
        player.pending.map(|pending| pending.tick_id)
    }

    #[test]
    fn keeps_a_single_pending_timer() {
        let mut session = Session::with_text(&config(300), "one two three");
        let snapshot_source = session.clone();
        let mut player = Player::new(&mut session, OutputMode::Json, Vec::new());

        player
            .handle(&event(
                &snapshot_source,
                vec![TimerEffect::ScheduleTick { tick_id: 1, delay_ms: 1000 }],
            ))
            .unwrap();
        assert_eq!(pending_id(&player), Some(1));

        player
            .handle(&event(&snapshot_source, vec![TimerEffect::CancelTick { tick_id: 7 }]))
            .unwrap();
        assert_eq!(pending_id(&player), Some(1));

        player
            .handle(&event(
                &snapshot_source,
                vec![TimerEffect::ScheduleTick { tick_id: 2, delay_ms: 1000 }],
            ))
            .unwrap();
        assert_eq!(pending_id(&player), Some(2));

        player
            .handle(&event(
                &snapshot_source,
                vec![
                    TimerEffect::CancelTick { tick_id: 2 },
                    TimerEffect::ScheduleTick { tick_id: 3, delay_ms: 1000 },
                ],
            ))
            .unwrap();
        assert_eq!(pending_id(&player), Some(3));

        player
            .handle(&event(&snapshot_source, vec![TimerEffect::CancelTick { tick_id: 3 }]))
            .unwrap();
        assert_eq!(pending_id(&player), None);

        let lines = String::from_utf8(player.out.clone()).unwrap();
        assert_eq!(lines.lines().count(), 5);
    }

    #[test]
    fn final_event_clears_the_timer_without_redrawing() {
        let mut session = Session::with_text(&config(300), "one two three");
        let stopped = session.clone();
        let mut player = Player::new(&mut session, OutputMode::Text, Vec::new());
        player.pending = Some(Pending {
            tick_id: 4,
            due: Instant::now(),
        });

        player.handle(&event(&stopped, Vec::new())).unwrap();

        assert_eq!(pending_id(&player), None);
        assert!(player.out.is_empty());
    }

    #[test]
    fn raised_stop_flag_pauses_playback() {
        let mut session = Session::with_text(&config(60), "one two three");
        let stop = AtomicBool::new(true);

        let mut player = Player::new(&mut session, OutputMode::Text, Vec::new());
        player.run(&stop).unwrap();
        assert_eq!(pending_id(&player), None);

        assert!(!session.is_playing());
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn plays_to_the_end_and_prints_each_chunk() {
        let mut session = Session::with_text(&config(1000), "alpha beta gamma");
        let stop = AtomicBool::new(false);

        let mut player = Player::new(&mut session, OutputMode::Text, Vec::new());
        player.run(&stop).unwrap();
        let output = String::from_utf8(player.out.clone()).unwrap();

        assert_eq!(output.lines().count(), 3);
        assert!(output.lines().next().unwrap().ends_with("al[p]ha "));
        assert!(!session.is_playing());
        assert_eq!(session.cursor(), 2);
    }
}
