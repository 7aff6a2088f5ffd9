//! Cancellable branch playback.
//!
//! Each started sequence gets a new generation number. Steps carry the
//! generation they were scheduled under and are dropped on delivery if a
//! newer sequence (or a cancel) has bumped the counter since.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::resolver::TraversalStep;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledStep {
    generation: u64,
    due_at: DateTime<Utc>,
    step: TraversalStep,
}

/// Holds the pending steps of at most one live sequence.
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    generation: u64,
    pending: VecDeque<ScheduledStep>,
    /// Steps of the live sequence handed out so far.
    delivered: usize,
}

impl PlaybackScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `generation` still names the live sequence.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.pending
            .iter()
            .any(|scheduled| scheduled.generation == self.generation)
    }

    /// `true` while the live sequence has steps queued but none delivered.
    #[must_use]
    pub fn awaiting_first_step(&self) -> bool {
        self.delivered == 0 && self.is_playing()
    }

    /// Replaces whatever is playing with `steps`, timed from `now`. Returns
    /// the new generation.
    pub fn start(&mut self, steps: &[TraversalStep], now: DateTime<Utc>) -> u64 {
        let superseded = self.cancel();
        if superseded > 0 {
            debug!(superseded, "in-flight branch playback superseded");
        }
        let mut due_at = now;
        for step in steps {
            due_at = add_delay(due_at, step.delay);
            self.pending.push_back(ScheduledStep {
                generation: self.generation,
                due_at,
                step: *step,
            });
        }
        self.generation
    }

    /// Drops every pending step. Returns how many were dropped.
    pub fn cancel(&mut self) -> usize {
        self.generation += 1;
        self.delivered = 0;
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// When the next live step becomes due.
    #[must_use]
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.pending
            .iter()
            .find(|scheduled| scheduled.generation == self.generation)
            .map(|scheduled| scheduled.due_at)
    }

    /// Removes and returns every live step due at or before `now`, in order.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<TraversalStep> {
        let mut fired = Vec::new();
        while self
            .pending
            .front()
            .is_some_and(|scheduled| scheduled.due_at <= now)
        {
            let Some(scheduled) = self.pending.pop_front() else {
                break;
            };
            if scheduled.generation != self.generation {
                debug!(page = %scheduled.step.page, "dropping stale playback step");
                continue;
            }
            fired.push(scheduled.step);
        }
        self.delivered += fired.len();
        fired
    }
}

fn add_delay(at: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(delay)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
