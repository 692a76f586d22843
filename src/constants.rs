// Player timing and storage constants
// Config defaults are derived from these so both stay in one place

// === Controls ===
/// Seconds of inactivity before the on-screen controls hide
pub const CONTROLS_TIMEOUT_SECS: u64 = 5;

// === Seeking ===
/// Relative jump of a double tap, in seconds
pub const SEEK_STEP_SECS: f64 = 20.0;
/// How long the seek indicator stays up after the last double tap
pub const SEEK_INDICATOR_TIMEOUT_MS: u64 = 1000;
/// Delay between committing a scrub and accepting engine ticks again
pub const DRAG_GRACE_MS: u64 = 200;

// === Engine ===
/// Interval of the periodic time observer
pub const TIME_OBSERVER_INTERVAL_MS: u64 = 1000;

// === Storage ===
/// Preference key holding the last known landscape state
pub const FULLSCREEN_PREFERENCE_KEY: &str = "isFullScreen";
/// Directory name under the platform config/cache dirs
pub const APP_DIR_NAME: &str = "reel-player";
