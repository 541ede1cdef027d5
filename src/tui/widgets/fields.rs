//! Formatting helpers for key/value panels, timestamps and run status.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use ratatui::text::{Line, Span};

use super::table::CellTone;
use crate::tui::Theme;

/// Render `Key: value` pairs as styled lines.
pub fn field_lines(fields: &[(&str, String)], theme: &Theme) -> Vec<Line<'static>> {
    fields
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{}: ", key), theme.field_key()),
                Span::styled(value.clone(), theme.field_value()),
            ])
        })
        .collect()
}

/// `"3 hours ago (2024-05-01T10:00:00+02:00)"`, or empty when unset.
pub fn fmt_time(time: Option<DateTime<Utc>>) -> String {
    fmt_time_at(time, Utc::now())
}

pub fn fmt_time_at(time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match time {
        Some(t) => format!(
            "{} ({})",
            humanize_since(t, now),
            t.with_timezone(&Local).to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        None => String::new(),
    }
}

/// Compact local timestamp for table cells.
pub fn fmt_short_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format("%d %b %y %H:%M %Z").to_string())
        .unwrap_or_default()
}

/// Relative time in the style of "5 minutes ago" / "2 days from now".
pub fn humanize_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let delta = (now - then).num_seconds();
    let (secs, suffix) = if delta >= 0 {
        (delta, "ago")
    } else {
        (-delta, "from now")
    };

    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {} {}", unit, suffix)
        } else {
            format!("{} {}s {}", n, unit, suffix)
        }
    };

    match secs {
        0 => "now".to_string(),
        s if s < MINUTE => plural(s, "second"),
        s if s < HOUR => plural(s / MINUTE, "minute"),
        s if s < DAY => plural(s / HOUR, "hour"),
        s if s < WEEK => plural(s / DAY, "day"),
        s if s < MONTH => plural(s / WEEK, "week"),
        s if s < YEAR => plural(s / MONTH, "month"),
        s => plural(s / YEAR, "year"),
    }
}

/// Millisecond durations as `1m30s`, `850ms`, `0s`.
pub fn fmt_duration_ms(ms: Option<u64>) -> String {
    let ms = ms.unwrap_or_default();
    if ms == 0 {
        return "0s".to_string();
    }
    if ms < 1000 {
        return format!("{}ms", ms);
    }

    let total_secs = ms / 1000;
    let millis = ms % 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    let secs = if millis == 0 {
        format!("{}s", secs)
    } else {
        let fraction = format!("{:03}", millis);
        format!("{}.{}s", secs, fraction.trim_end_matches('0'))
    };

    match (hours, minutes) {
        (0, 0) => secs,
        (0, m) => format!("{}m{}", m, secs),
        (h, m) => format!("{}h{}m{}", h, m, secs),
    }
}

pub fn run_status_tone(status: &str) -> CellTone {
    match status {
        "errored" => CellTone::Error,
        "applied" | "planned_and_finished" => CellTone::Success,
        "planned" | "planning" => CellTone::Warning,
        "discarded" | "canceled" | "force_canceled" => CellTone::Muted,
        _ => CellTone::Plain,
    }
}

pub fn run_status_icon(status: &str) -> &'static str {
    match status {
        "errored" => "❌ ",
        "applied" | "planned_and_finished" => "✅ ",
        "planned" | "planning" => "⏳ ",
        "discarded" => "🗑️ ",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_humanize_since() {
        let now = Utc::now();
        assert_eq!(humanize_since(now, now), "now");
        assert_eq!(humanize_since(now - Duration::seconds(1), now), "1 second ago");
        assert_eq!(humanize_since(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(humanize_since(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(humanize_since(now - Duration::days(1), now), "1 day ago");
        assert_eq!(humanize_since(now - Duration::days(400), now), "1 year ago");
        assert_eq!(humanize_since(now + Duration::hours(2), now), "2 hours from now");
    }

    #[test]
    fn test_fmt_duration_ms() {
        assert_eq!(fmt_duration_ms(None), "0s");
        assert_eq!(fmt_duration_ms(Some(850)), "850ms");
        assert_eq!(fmt_duration_ms(Some(42_000)), "42s");
        assert_eq!(fmt_duration_ms(Some(90_500)), "1m30.5s");
        assert_eq!(fmt_duration_ms(Some(3_723_000)), "1h2m3s");
    }

    #[test]
    fn test_unset_time_is_empty() {
        assert_eq!(fmt_time(None), "");
        assert_eq!(fmt_short_time(None), "");
    }

    #[test]
    fn test_run_status_tone() {
        assert_eq!(run_status_tone("errored"), CellTone::Error);
        assert_eq!(run_status_tone("planned_and_finished"), CellTone::Success);
        assert_eq!(run_status_tone("planning"), CellTone::Warning);
        assert_eq!(run_status_tone("pending"), CellTone::Plain);
    }
}
