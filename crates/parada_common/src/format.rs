//! pt-BR display formatting for durations and instants.

use chrono::{DateTime, Local, Timelike};

/// Card formatting: fractional minutes to `1h 02m 30s`, hours part
/// omitted when zero.
pub fn format_minutes(total_minutes: f64) -> String {
    let total_seconds = (total_minutes * 60.0).round() as i64;
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;

    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else {
        format!("{:02}m {:02}s", m, s)
    }
}

/// Table formatting: whole minutes to `2h 5min`, or `45 min` under an
/// hour.
pub fn format_duration_short(minutes: f64) -> String {
    let total_min = minutes.round() as i64;
    let h = total_min / 60;
    let m = total_min % 60;

    if h <= 0 {
        format!("{} min", m)
    } else {
        format!("{}h {}min", h, m)
    }
}

/// `dd/mm/yyyy`.
pub fn format_date(t: &DateTime<Local>) -> String {
    t.format("%d/%m/%Y").to_string()
}

/// 24-hour `HH:MM:SS`.
pub fn format_time(t: &DateTime<Local>) -> String {
    format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
}

/// `dd/mm/yyyy HH:MM:SS`, the history-table timestamp format.
pub fn format_date_time(t: &DateTime<Local>) -> String {
    format!("{} {}", format_date(t), format_time(t))
}
