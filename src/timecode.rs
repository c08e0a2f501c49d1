// Time text for the duration/progress nodes. `MM:SS` below the hour mark,
// `H:MM:SS` above it, `00:00` for anything unusable.

/// Format seconds for display. Negative, `NaN`, and infinite inputs all
/// render as `00:00` rather than erroring.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let rest = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, rest)
    } else {
        format!("{:02}:{:02}", minutes, rest)
    }
}
