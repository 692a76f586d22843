use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::SeekDirection;
use super::timer::TimerSlot;
use crate::utils::sanitize_seconds;

/// Transient indicator shown after a double tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekIntent {
    #[default]
    Idle,
    SeekingForward,
    SeekingBackward,
}

impl From<SeekDirection> for SeekIntent {
    fn from(direction: SeekDirection) -> Self {
        match direction {
            SeekDirection::Forward => SeekIntent::SeekingForward,
            SeekDirection::Backward => SeekIntent::SeekingBackward,
        }
    }
}

/// Turns double taps into relative jumps and keeps the indicator up until
/// taps stop for a while. Repeated taps restart the countdown.
pub struct SeekGestureController {
    intent: SeekIntent,
    step_seconds: f64,
    dismiss_after: Duration,
    dismiss_timer: TimerSlot,
}

impl SeekGestureController {
    pub fn new(step_seconds: f64, dismiss_after: Duration, dismiss_timer: TimerSlot) -> Self {
        Self {
            intent: SeekIntent::Idle,
            step_seconds,
            dismiss_after,
            dismiss_timer,
        }
    }

    pub fn intent(&self) -> SeekIntent {
        self.intent
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.dismiss_timer.expires_at()
    }

    pub fn step_seconds(&self) -> f64 {
        self.step_seconds
    }

    /// Label under the indicator, e.g. "20 seconds"
    pub fn indicator_label(&self) -> String {
        format!("{} seconds", self.step_seconds.round() as i64)
    }

    /// Register a double tap and return the time to seek to, clamped to the
    /// media bounds
    pub fn double_tap(
        &mut self,
        direction: SeekDirection,
        current_seconds: f64,
        total_seconds: f64,
    ) -> f64 {
        let current = sanitize_seconds(current_seconds);
        let total = sanitize_seconds(total_seconds);
        let offset = match direction {
            SeekDirection::Forward => self.step_seconds,
            SeekDirection::Backward => -self.step_seconds,
        };
        let target = (current + offset).max(0.0).min(total);

        self.intent = direction.into();
        self.dismiss_timer.schedule(self.dismiss_after);
        debug!(
            "Double tap {:?}: {:.1}s -> {:.1}s of {:.1}s",
            direction, current, target, total
        );
        target
    }

    pub fn on_dismiss_elapsed(&mut self, generation: u64) {
        if self.dismiss_timer.fire(generation) {
            self.intent = SeekIntent::Idle;
        }
    }

    pub fn cancel_timers(&mut self) {
        self.dismiss_timer.cancel();
    }
}
