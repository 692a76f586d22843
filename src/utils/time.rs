use std::time::Duration;

/// Replace NaN, infinite and negative seconds with zero
pub fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Convert engine seconds to a `Duration` without panicking on bad input
pub fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::from_secs_f64(sanitize_seconds(seconds))
}

/// Format seconds as `mm:ss`. Minutes keep counting past an hour.
pub fn format_time(seconds: f64) -> String {
    let total_secs = sanitize_seconds(seconds) as u64;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
