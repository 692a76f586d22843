pub mod errors;
pub mod time;

pub use errors::VideoPlayerError;
pub use time::{format_time, sanitize_seconds, seconds_to_duration};
