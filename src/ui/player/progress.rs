use std::time::Duration;
use tracing::{debug, trace};

use super::timer::TimerSlot;
use crate::utils::sanitize_seconds;

/// Scrub bar position, always finite and within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackProgress {
    pub fraction: f64,
    pub last_committed_fraction: f64,
    pub is_dragging: bool,
}

/// Time labels next to the scrub bar, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeDisplay {
    pub current_seconds: f64,
    pub total_seconds: f64,
}

impl TimeDisplay {
    fn new(current_seconds: f64, total_seconds: f64) -> Self {
        Self {
            current_seconds: sanitize_seconds(current_seconds),
            total_seconds: sanitize_seconds(total_seconds),
        }
    }

    pub fn fraction(&self) -> f64 {
        if self.total_seconds > 0.0 {
            clamp_fraction(self.current_seconds / self.total_seconds)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Dropped because the user is scrubbing
    Ignored,
    Updated,
    /// Position reached the end of the media
    Finished,
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Owns the scrub bar: follows engine ticks, or the user's finger while a
/// drag is in progress.
///
/// `PlaybackProgress::is_dragging` blocks ticks from the first drag event
/// until the grace period after the commit. `finger_down` only covers the
/// gesture itself, so a new drag inside the grace period is a fresh drag.
pub struct ProgressController {
    progress: PlaybackProgress,
    time: TimeDisplay,
    finger_down: bool,
    grace: Duration,
    grace_timer: TimerSlot,
}

impl ProgressController {
    pub fn new(grace: Duration, grace_timer: TimerSlot) -> Self {
        Self {
            progress: PlaybackProgress::default(),
            time: TimeDisplay::default(),
            finger_down: false,
            grace,
            grace_timer,
        }
    }

    pub fn progress(&self) -> PlaybackProgress {
        self.progress
    }

    pub fn time(&self) -> TimeDisplay {
        self.time
    }

    pub fn is_dragging(&self) -> bool {
        self.progress.is_dragging
    }

    pub fn on_engine_tick(&mut self, current_seconds: f64, total_seconds: f64) -> TickOutcome {
        if self.progress.is_dragging {
            trace!("Tick at {:.1}s ignored while dragging", current_seconds);
            return TickOutcome::Ignored;
        }

        self.time = TimeDisplay::new(current_seconds, total_seconds);
        let fraction = self.time.fraction();
        self.progress.fraction = fraction;
        self.progress.last_committed_fraction = fraction;

        if fraction >= 1.0 {
            debug!("Playback reached the end at {:.1}s", self.time.total_seconds);
            TickOutcome::Finished
        } else {
            TickOutcome::Updated
        }
    }

    /// Move the bar to a position the player jumped to on its own, e.g. a
    /// rewind. Ends any grace period so the new position shows immediately.
    pub fn jump_to(&mut self, current_seconds: f64, total_seconds: f64) -> TickOutcome {
        self.grace_timer.cancel();
        self.finger_down = false;
        self.progress.is_dragging = false;
        self.on_engine_tick(current_seconds, total_seconds)
    }

    pub fn drag_start(&mut self) {
        // A new drag during the grace period keeps ticks blocked
        self.grace_timer.cancel();
        self.finger_down = true;
        self.progress.is_dragging = true;
    }

    /// `delta` is the horizontal translation as a share of the bar width
    pub fn drag_changed(&mut self, delta: f64) {
        if !self.finger_down {
            self.drag_start();
        }
        let delta = if delta.is_finite() { delta } else { 0.0 };
        self.progress.fraction = clamp_fraction(self.progress.last_committed_fraction + delta);
    }

    /// Commit the drag. Returns where the engine should seek to, or `None`
    /// when there was no drag or the media length is unknown.
    pub fn drag_end(&mut self, total_seconds: f64) -> Option<f64> {
        if !self.finger_down {
            return None;
        }

        self.finger_down = false;
        self.progress.last_committed_fraction = self.progress.fraction;
        self.grace_timer.schedule(self.grace);

        let total_seconds = sanitize_seconds(total_seconds);
        if total_seconds <= 0.0 {
            debug!("Drag committed without a known duration, not seeking");
            return None;
        }

        let target = self.progress.fraction * total_seconds;
        self.time = TimeDisplay::new(target, total_seconds);
        Some(target)
    }

    /// Grace period after a committed drag elapsed
    pub fn on_grace_elapsed(&mut self, generation: u64) {
        if self.grace_timer.fire(generation) {
            trace!("Drag grace period over, following engine again");
            self.progress.is_dragging = false;
        }
    }

    pub fn cancel_timers(&mut self) {
        self.grace_timer.cancel();
    }
}
