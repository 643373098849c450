//! Time formatting for position and duration display.

/// Placeholder shown for an unknown time.
pub const UNKNOWN_TIME: &str = "--:--";

/// Formats seconds as `MM:SS`, or `H:MM:SS` from one hour up.
///
/// Fractions are truncated. NaN, infinite and negative inputs render as
/// [`UNKNOWN_TIME`].
///
/// # Examples
/// ```
/// # use heos_core::format::format_clock;
/// assert_eq!(format_clock(125.4), "02:05");
/// assert_eq!(format_clock(3723.0), "1:02:03");
/// assert_eq!(format_clock(f64::NAN), "--:--");
/// ```
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return UNKNOWN_TIME.to_string();
    }

    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Formats a position in milliseconds; absent renders as [`UNKNOWN_TIME`].
#[must_use]
pub fn format_position(position_ms: Option<u64>) -> String {
    position_ms.map_or_else(
        || UNKNOWN_TIME.to_string(),
        |ms| format_clock(ms as f64 / 1000.0),
    )
}

/// Formats a duration in milliseconds; absent or zero renders as [`UNKNOWN_TIME`].
#[must_use]
pub fn format_duration(duration_ms: Option<u64>) -> String {
    format_position(duration_ms.filter(|d| *d > 0))
}
