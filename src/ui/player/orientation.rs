use std::sync::Arc;
use tracing::{debug, info};

use crate::constants::FULLSCREEN_PREFERENCE_KEY;
use crate::player::{DeviceOrientation, InterfaceOrientation, WindowGeometry};
use crate::services::PreferenceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationState {
    pub device_orientation: DeviceOrientation,
    pub forced_fullscreen: bool,
    pub persisted_fullscreen_preference: bool,
    pub is_landscape: bool,
}

/// Reconciles device rotation, the rotate button and the remembered
/// fullscreen preference into a single landscape flag.
///
/// The preference only records the landscape-ness of valid device
/// orientations. Forcing fullscreen from the button never writes it, so a
/// flat device right after rotating back to portrait cannot bring a stale
/// fullscreen back.
pub struct OrientationFullscreenController {
    device_orientation: DeviceOrientation,
    forced_fullscreen: bool,
    is_landscape: bool,
    preferences: Arc<dyn PreferenceStore>,
    window: Arc<dyn WindowGeometry>,
}

impl OrientationFullscreenController {
    pub fn new(preferences: Arc<dyn PreferenceStore>, window: Arc<dyn WindowGeometry>) -> Self {
        let mut controller = Self {
            device_orientation: DeviceOrientation::Unknown,
            forced_fullscreen: false,
            is_landscape: false,
            preferences,
            window,
        };
        controller.recompute();
        controller
    }

    pub fn is_landscape(&self) -> bool {
        self.is_landscape
    }

    pub fn forced_fullscreen(&self) -> bool {
        self.forced_fullscreen
    }

    pub fn device_orientation(&self) -> DeviceOrientation {
        self.device_orientation
    }

    pub fn persisted_preference(&self) -> bool {
        self.preferences.get_bool(FULLSCREEN_PREFERENCE_KEY)
    }

    pub fn state(&self) -> OrientationState {
        OrientationState {
            device_orientation: self.device_orientation,
            forced_fullscreen: self.forced_fullscreen,
            persisted_fullscreen_preference: self.persisted_preference(),
            is_landscape: self.is_landscape,
        }
    }

    /// Raw notification from the device motion sensors
    pub fn on_device_rotated(&mut self, orientation: DeviceOrientation) {
        self.device_orientation = orientation;

        if orientation.is_valid_interface_orientation() {
            if orientation.is_portrait() && self.forced_fullscreen {
                debug!("Rotated back to portrait, releasing forced fullscreen");
                self.forced_fullscreen = false;
            }
            self.persist(orientation.is_landscape());
        }

        self.recompute();
    }

    /// Rotate button. Returns the orientation requested from the window.
    ///
    /// Flips the layout currently shown. A landscape layout restored from
    /// the preference while the device lies flat counts as fullscreen, so
    /// the tap leaves it for portrait.
    pub fn force_screen_mode(&mut self) -> InterfaceOrientation {
        let target = if self.is_landscape {
            InterfaceOrientation::Portrait
        } else {
            InterfaceOrientation::LandscapeRight
        };
        self.forced_fullscreen = target == InterfaceOrientation::LandscapeRight;

        info!("Requesting {:?} (forced fullscreen: {})", target, self.forced_fullscreen);
        self.window.request_orientation(target);

        // Lay out for the requested orientation until the device reports back
        self.device_orientation = target.into();
        self.recompute();
        target
    }

    fn persist(&self, landscape: bool) {
        if self.persisted_preference() != landscape {
            debug!("Remembering landscape state: {}", landscape);
            self.preferences.set_bool(FULLSCREEN_PREFERENCE_KEY, landscape);
        }
    }

    fn recompute(&mut self) {
        self.is_landscape = if self.forced_fullscreen {
            true
        } else if self.device_orientation.is_valid_interface_orientation() {
            self.device_orientation.is_landscape()
        } else {
            self.persisted_preference()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::RecordingWindow;
    use crate::services::MemoryPreferenceStore;

    fn controller_with(
        persisted: bool,
    ) -> (
        OrientationFullscreenController,
        Arc<MemoryPreferenceStore>,
        Arc<RecordingWindow>,
    ) {
        let preferences = Arc::new(MemoryPreferenceStore::with_value(
            FULLSCREEN_PREFERENCE_KEY,
            persisted,
        ));
        let window = Arc::new(RecordingWindow::default());
        let controller = OrientationFullscreenController::new(preferences.clone(), window.clone());
        (controller, preferences, window)
    }

    #[test]
    fn test_rotation_to_landscape_then_flat() {
        let (mut controller, preferences, _) = controller_with(false);

        controller.on_device_rotated(DeviceOrientation::Portrait);
        assert!(!controller.is_landscape());

        controller.on_device_rotated(DeviceOrientation::LandscapeLeft);
        assert!(controller.is_landscape());
        assert!(preferences.get_bool(FULLSCREEN_PREFERENCE_KEY));

        controller.on_device_rotated(DeviceOrientation::FaceDown);
        assert!(controller.is_landscape(), "falls back to the preference");
        assert!(!controller.forced_fullscreen());
    }

    #[test]
    fn test_rotate_button_then_physical_portrait() {
        let (mut controller, preferences, window) = controller_with(false);
        controller.on_device_rotated(DeviceOrientation::Portrait);

        let target = controller.force_screen_mode();
        assert_eq!(target, InterfaceOrientation::LandscapeRight);
        assert!(controller.forced_fullscreen());
        assert!(controller.is_landscape());
        assert_eq!(window.requests(), vec![InterfaceOrientation::LandscapeRight]);
        assert!(
            !preferences.get_bool(FULLSCREEN_PREFERENCE_KEY),
            "forcing does not touch the preference"
        );

        controller.on_device_rotated(DeviceOrientation::Portrait);
        assert!(!controller.forced_fullscreen());
        assert!(!controller.is_landscape());
    }

    #[test]
    fn test_flat_after_release_does_not_reforce() {
        let (mut controller, _, _) = controller_with(false);
        controller.on_device_rotated(DeviceOrientation::Portrait);
        controller.force_screen_mode();
        assert!(controller.forced_fullscreen());
        controller.on_device_rotated(DeviceOrientation::Portrait);
        assert!(!controller.forced_fullscreen());

        controller.on_device_rotated(DeviceOrientation::FaceUp);
        assert!(!controller.forced_fullscreen());
        assert!(!controller.is_landscape());
    }

    #[test]
    fn test_rotate_button_toggles_back_to_portrait() {
        let (mut controller, _, window) = controller_with(false);
        controller.force_screen_mode();
        let target = controller.force_screen_mode();

        assert_eq!(target, InterfaceOrientation::Portrait);
        assert!(!controller.is_landscape());
        assert_eq!(
            window.requests(),
            vec![
                InterfaceOrientation::LandscapeRight,
                InterfaceOrientation::Portrait
            ]
        );
    }

    #[test]
    fn test_launch_flat_restores_preference() {
        let (controller, _, _) = controller_with(true);
        assert_eq!(controller.device_orientation(), DeviceOrientation::Unknown);
        assert!(controller.is_landscape());

        let (controller, _, _) = controller_with(false);
        assert!(!controller.is_landscape());
    }

    #[test]
    fn test_rotate_button_while_flat_in_landscape_exits() {
        let (mut controller, preferences, window) = controller_with(true);
        controller.on_device_rotated(DeviceOrientation::FaceUp);
        assert!(controller.is_landscape());
        assert!(!controller.forced_fullscreen());

        let target = controller.force_screen_mode();
        assert_eq!(target, InterfaceOrientation::Portrait);
        assert!(!controller.is_landscape());
        assert!(!controller.forced_fullscreen());
        assert_eq!(window.requests(), vec![InterfaceOrientation::Portrait]);
        assert!(preferences.get_bool(FULLSCREEN_PREFERENCE_KEY));

        let target = controller.force_screen_mode();
        assert_eq!(target, InterfaceOrientation::LandscapeRight);
        assert!(controller.forced_fullscreen());
        assert!(controller.is_landscape());
    }

    #[test]
    fn test_rotate_button_in_physical_landscape_goes_portrait() {
        let (mut controller, _, window) = controller_with(false);
        controller.on_device_rotated(DeviceOrientation::LandscapeLeft);

        assert_eq!(controller.force_screen_mode(), InterfaceOrientation::Portrait);
        assert!(!controller.is_landscape());
        assert_eq!(window.requests(), vec![InterfaceOrientation::Portrait]);
    }

    #[test]
    fn test_forced_survives_flat_device() {
        let (mut controller, _, _) = controller_with(false);
        controller.force_screen_mode();
        controller.on_device_rotated(DeviceOrientation::FaceUp);

        assert!(controller.forced_fullscreen());
        assert!(controller.is_landscape());
        let state = controller.state();
        assert!(!state.persisted_fullscreen_preference);
        assert_eq!(state.device_orientation, DeviceOrientation::FaceUp);
    }
}
