use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::timer::TimerSlot;

/// Auto-hide for the on-screen controls
pub struct VisibilityTimeoutController {
    visible: bool,
    timeout: Duration,
    hide_timer: TimerSlot,
}

impl VisibilityTimeoutController {
    pub fn new(timeout: Duration, hide_timer: TimerSlot) -> Self {
        Self {
            visible: false,
            timeout,
            hide_timer,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.hide_timer.expires_at()
    }

    /// Show the controls and restart the inactivity countdown
    pub fn show(&mut self) {
        self.visible = true;
        self.hide_timer.schedule(self.timeout);
    }

    pub fn toggle(&mut self) {
        if self.visible {
            self.visible = false;
            self.hide_timer.cancel();
        } else {
            self.show();
        }
    }

    /// Interaction that should postpone hiding without revealing anything
    pub fn touch(&mut self) {
        if self.visible {
            self.hide_timer.schedule(self.timeout);
        }
    }

    /// Keep the controls up indefinitely, e.g. while scrubbing
    pub fn hold(&mut self) {
        self.hide_timer.cancel();
    }

    pub fn on_timeout(&mut self, generation: u64) {
        if self.hide_timer.fire(generation) {
            debug!("Hiding controls after inactivity");
            self.visible = false;
        }
    }

    pub fn cancel_timers(&mut self) {
        self.hide_timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::player::timer::TimerScheduler;
    use crate::ui::player::{PlayerInput, TimerKind};
    use tokio::sync::mpsc;

    fn controller() -> (VisibilityTimeoutController, mpsc::UnboundedReceiver<PlayerInput>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let slot = TimerSlot::new(TimerKind::HideControls, TimerScheduler::new(sender));
        (
            VisibilityTimeoutController::new(Duration::from_secs(5), slot),
            receiver,
        )
    }

    fn deliver(
        controller: &mut VisibilityTimeoutController,
        rx: &mut mpsc::UnboundedReceiver<PlayerInput>,
    ) -> usize {
        let mut delivered = 0;
        while let Ok(input) = rx.try_recv() {
            if let PlayerInput::TimerFired { generation, .. } = input {
                controller.on_timeout(generation);
                delivered += 1;
            }
        }
        delivered
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_hides_after_timeout() {
        let (mut controller, mut rx) = controller();
        assert!(!controller.is_visible());

        controller.show();
        assert!(controller.is_visible());

        tokio::time::sleep(Duration::from_millis(5100)).await;
        deliver(&mut controller, &mut rx);
        assert!(!controller.is_visible());
        assert!(controller.expires_at().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_twice_measures_from_last_call() {
        let (mut controller, mut rx) = controller();
        controller.show();
        tokio::time::sleep(Duration::from_secs(3)).await;
        controller.show();
        let expected = Instant::now() + Duration::from_secs(5);
        assert_eq!(controller.expires_at(), Some(expected));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(deliver(&mut controller, &mut rx), 0, "only one timer is live");
        assert!(controller.is_visible());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(deliver(&mut controller, &mut rx), 1);
        assert!(!controller.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_hides_and_cancels() {
        let (mut controller, mut rx) = controller();
        controller.toggle();
        assert!(controller.is_visible());
        controller.toggle();
        assert!(!controller.is_visible());
        assert!(controller.expires_at().is_none());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(deliver(&mut controller, &mut rx), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_only_extends_visible_controls() {
        let (mut controller, mut rx) = controller();
        controller.touch();
        assert!(!controller.is_visible());
        assert!(controller.expires_at().is_none());

        controller.show();
        tokio::time::sleep(Duration::from_secs(4)).await;
        controller.touch();
        tokio::time::sleep(Duration::from_secs(4)).await;
        deliver(&mut controller, &mut rx);
        assert!(controller.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hold_keeps_controls_up() {
        let (mut controller, mut rx) = controller();
        controller.show();
        controller.hold();

        tokio::time::sleep(Duration::from_secs(10)).await;
        deliver(&mut controller, &mut rx);
        assert!(controller.is_visible());
    }
}
