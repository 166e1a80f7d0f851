use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

// Whole-rupee amount with Indian digit grouping, e.g. "₹12,34,567".
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "₹NaN".to_string();
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{sign}₹∞");
    }

    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}₹{}", group_indian(&digits))
}

// Last three digits form one group; the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

// en-IN style timestamp, e.g. "19 Oct 2026, 02:30 pm". Accepts RFC 3339,
// naive local timestamps, and bare dates (read as UTC midnight).
pub fn format_date<Tz>(input: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let input = input.trim();
    let local = if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        parsed.with_timezone(tz)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        tz.from_local_datetime(&naive).earliest()?
    } else {
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?)
            .with_timezone(tz)
    };
    Some(local.format("%-d %b %Y, %I:%M %P").to_string())
}
