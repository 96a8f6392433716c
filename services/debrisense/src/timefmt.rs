//! Human-readable time formatting for panel headers

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

use crate::models::UpdateSchedule;

/// Parse a backend timestamp.
///
/// RFC 3339 strings keep their offset. Naive ISO strings (the backend's
/// default `isoformat()` output) are wall-clock time of the backend host,
/// read in the local timezone; a wall-clock time skipped by a DST change
/// falls back to UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| {
            naive
                .and_local_timezone(Local)
                .earliest()
                .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc))
        })
}

/// "Just now", "5 minutes ago", "3 hours ago", "2 days ago"
pub fn format_time_ago(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(time) = timestamp.and_then(parse_timestamp) else {
        return "Unknown".to_string();
    };

    let minutes = (now - time).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{} ago", plural(minutes, "minute"));
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} ago", plural(hours, "hour"));
    }
    format!("{} ago", plural(hours / 24, "day"))
}

/// Short forecast date such as `Aug 26`
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "Unknown".to_string();
    };
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|t| t.date_naive()));
    match date {
        Some(date) => date.format("%b %-d").to_string(),
        None => raw.to_string(),
    }
}

/// Relative time until the next backend refresh
pub fn format_next_update(schedule: Option<&UpdateSchedule>, now: DateTime<Utc>) -> String {
    let Some(next) = schedule
        .and_then(|s| s.next_update.as_deref())
        .and_then(parse_timestamp)
    else {
        return "Unknown".to_string();
    };

    let remaining = next - now;
    if remaining < chrono::Duration::zero() {
        return "Due now".to_string();
    }
    let minutes = remaining.num_minutes();
    if minutes < 60 {
        return format!("in {}", plural(minutes, "minute"));
    }
    format!("in {}", plural(minutes / 60, "hour"))
}

fn plural(count: i64, unit: &str) -> String {
    let s = if count == 1 { "" } else { "s" };
    format!("{} {}{}", count, unit, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Naive, like the backend's timestamps, so the buckets hold in any timezone.
    fn now() -> DateTime<Utc> {
        parse_timestamp("2025-08-26T12:00:00").unwrap()
    }

    fn local(hour: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2025, 8, 26, hour, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn naive_timestamps_are_local_wall_clock() {
        assert_eq!(
            parse_timestamp("2025-08-26T11:00:00.123456"),
            Some(local(11) + chrono::Duration::microseconds(123456))
        );
        assert_eq!(parse_timestamp("2025-08-26 11:00:00"), Some(local(11)));
    }

    #[test]
    fn offset_timestamps_keep_their_offset() {
        assert_eq!(
            parse_timestamp("2025-08-26T19:00:00+08:00"),
            Some(Utc.with_ymd_and_hms(2025, 8, 26, 11, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-08-26T11:00:00Z"),
            Some(Utc.with_ymd_and_hms(2025, 8, 26, 11, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn fresh_local_timestamp_is_just_now() {
        let stamp = Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.f").to_string();
        assert_eq!(format_time_ago(Some(&stamp), Utc::now()), "Just now");
    }

    #[test]
    fn time_ago_buckets() {
        assert_eq!(format_time_ago(None, now()), "Unknown");
        assert_eq!(format_time_ago(Some("garbage"), now()), "Unknown");
        assert_eq!(format_time_ago(Some("2025-08-26T11:59:30"), now()), "Just now");
        assert_eq!(format_time_ago(Some("2025-08-26T11:59:00"), now()), "1 minute ago");
        assert_eq!(format_time_ago(Some("2025-08-26T11:45:00"), now()), "15 minutes ago");
        assert_eq!(format_time_ago(Some("2025-08-26T09:00:00"), now()), "3 hours ago");
        assert_eq!(format_time_ago(Some("2025-08-24T12:00:00"), now()), "2 days ago");
    }

    #[test]
    fn future_timestamp_is_just_now() {
        assert_eq!(format_time_ago(Some("2025-08-26T12:30:00"), now()), "Just now");
    }

    #[test]
    fn forecast_dates() {
        assert_eq!(format_date(Some("2025-08-26")), "Aug 26");
        assert_eq!(format_date(Some("2025-09-01T00:00:00")), "Sep 1");
        assert_eq!(format_date(Some("tomorrow")), "tomorrow");
        assert_eq!(format_date(None), "Unknown");
    }

    #[test]
    fn next_update_wording() {
        let schedule = |ts: &str| UpdateSchedule {
            next_update: Some(ts.to_string()),
        };
        assert_eq!(format_next_update(None, now()), "Unknown");
        assert_eq!(
            format_next_update(Some(&UpdateSchedule::default()), now()),
            "Unknown"
        );
        assert_eq!(
            format_next_update(Some(&schedule("2025-08-26T11:59:30")), now()),
            "Due now"
        );
        assert_eq!(
            format_next_update(Some(&schedule("2025-08-26T12:25:00")), now()),
            "in 25 minutes"
        );
        assert_eq!(
            format_next_update(Some(&schedule("2025-08-26T15:10:00")), now()),
            "in 3 hours"
        );
        assert_eq!(
            format_next_update(Some(&schedule("2025-08-26T13:00:00")), now()),
            "in 1 hour"
        );
    }
}
