use std::error::Error;

use chrono::{DateTime, Utc};

/// Parse a duration string like "6m", "1y", "30d" into a Unix timestamp
/// representing that far back from `now`.
///
/// Approximations: 1 month = 30 days, 1 year = 365 days.
pub fn parse_since_from(s: &str, now: DateTime<Utc>) -> Result<i64, Box<dyn Error>> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty --since value".into());
    }

    let unit_at = s.char_indices().last().map_or(0, |(i, _)| i);
    let (num_str, unit) = s.split_at(unit_at);
    let n: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid --since value: {s:?} (expected e.g. 6m, 1y, 30d)"))?;

    let days = match unit {
        "d" => Some(n),
        "m" => n.checked_mul(30),
        "y" => n.checked_mul(365),
        _ => return Err(format!("unknown unit in --since: {s:?} (use d, m, or y)").into()),
    }
    .and_then(|d| i64::try_from(d).ok())
    .ok_or("--since value too large")?;

    let delta = chrono::Duration::try_days(days).ok_or("--since value too large")?;
    let then = now
        .checked_sub_signed(delta)
        .ok_or("--since value too large")?;
    Ok(then.timestamp())
}

pub fn parse_since(s: &str) -> Result<i64, Box<dyn Error>> {
    parse_since_from(s, Utc::now())
}

/// Render a unix timestamp as `YYYY-MM-DD`.
pub fn format_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "????-??-??".to_string())
}

#[cfg(test)]
#[path = "util_test.rs"]
mod tests;
