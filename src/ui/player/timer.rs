use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

use super::{PlayerInput, TimerKind};

/// Posts timer firings back into the player's inbox
#[derive(Debug, Clone)]
pub struct TimerScheduler {
    sender: mpsc::UnboundedSender<PlayerInput>,
}

impl TimerScheduler {
    pub fn new(sender: mpsc::UnboundedSender<PlayerInput>) -> Self {
        Self { sender }
    }
}

struct PendingTimer {
    generation: u64,
    expires_at: Instant,
    task: JoinHandle<()>,
}

/// Holds at most one outstanding timer of a given kind.
///
/// Scheduling replaces the pending timer. A fired timer reaches the inbox as
/// `PlayerInput::TimerFired` and only counts if its generation still matches
/// the pending one, so a timer either fires once or is cancelled, never both.
pub struct TimerSlot {
    kind: TimerKind,
    scheduler: TimerScheduler,
    pending: Option<PendingTimer>,
    next_generation: u64,
}

impl TimerSlot {
    pub fn new(kind: TimerKind, scheduler: TimerScheduler) -> Self {
        Self {
            kind,
            scheduler,
            pending: None,
            next_generation: 0,
        }
    }

    /// Cancel whatever is pending and start a new countdown
    pub fn schedule(&mut self, delay: Duration) {
        self.cancel();

        self.next_generation += 1;
        let generation = self.next_generation;
        let expires_at = Instant::now() + delay;
        let kind = self.kind;
        let sender = self.scheduler.sender.clone();

        let task = tokio::spawn(async move {
            sleep_until(expires_at).await;
            // Receiver gone means the player was dropped
            let _ = sender.send(PlayerInput::TimerFired { kind, generation });
        });

        trace!("Scheduled {:?} timer #{} in {:?}", kind, generation, delay);
        self.pending = Some(PendingTimer {
            generation,
            expires_at,
            task,
        });
    }

    /// No-op when nothing is pending
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            trace!("Cancelled {:?} timer #{}", self.kind, pending.generation);
            pending.task.abort();
        }
    }

    /// Accept a firing. Clears the slot before the caller runs the effect,
    /// so the effect may schedule again. Returns false for stale firings.
    pub fn fire(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                true
            }
            _ => {
                trace!("Ignoring stale {:?} timer #{}", self.kind, generation);
                false
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.expires_at)
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
