//! State machines behind the player surface.
//!
//! Each controller owns one slice of the player state and at most one timer.
//! They never talk to the engine themselves; `PlayerViewModel` turns their
//! results into engine commands.

mod controls_visibility;
mod orientation;
mod progress;
mod seek_gesture;
mod timer;

pub use controls_visibility::VisibilityTimeoutController;
pub use orientation::{OrientationFullscreenController, OrientationState};
pub use progress::{PlaybackProgress, ProgressController, TickOutcome, TimeDisplay};
pub use seek_gesture::{SeekGestureController, SeekIntent};
pub use timer::{TimerScheduler, TimerSlot};

use crate::player::{DeviceOrientation, PlaybackTime};

/// Side of the player surface that was double tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    /// Left half
    Backward,
    /// Right half
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    HideControls,
    DismissSeekIntent,
    FinishDrag,
}

/// Everything that can happen to a player, processed one at a time in
/// arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    // Presentation commands
    TogglePlayPause,
    DragStarted,
    DragChanged(f64),
    DragEnded,
    DoubleTap(SeekDirection),
    ToggleControls,
    ToggleForcedFullscreen,
    SetAutoPlay(bool),
    // Platform events
    DeviceRotated(DeviceOrientation),
    EngineTick(PlaybackTime),
    EndOfMedia,
    TimerFired { kind: TimerKind, generation: u64 },
    Shutdown,
}
