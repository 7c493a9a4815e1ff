//! Meeting duration display formatting.

/// Format a duration in seconds as `HH:MM:SS` (an hour or more) or `MM:SS`.
///
/// Invalid input (negative, NaN, infinite) formats as "00:00".
pub fn format_duration(duration_seconds: f64) -> String {
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return "00:00".to_string();
    }

    let total = duration_seconds as u64;
    if total >= 3600 {
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        let minutes = total / 60;
        let seconds = total % 60;
        format!("{minutes:02}:{seconds:02}")
    }
}
