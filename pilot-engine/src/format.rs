//! Display helpers shared by log messages and plan output

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// How much of a UUID to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdLength {
    /// First 8 characters
    Short,
    Full,
}

impl IdLength {
    pub fn shorten(self, id: &str) -> &str {
        match self {
            IdLength::Short => id.get(..8).unwrap_or(id),
            IdLength::Full => id,
        }
    }
}

/// Renders nanoseconds the way the scheduler prints durations ("1m30s", "250ms")
pub fn format_nanos(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }

    let sign = if nanos < 0 { "-" } else { "" };
    let n = nanos.unsigned_abs();

    if n < 1_000 {
        return format!("{sign}{n}ns");
    }
    if n < 1_000_000 {
        return format!("{sign}{}µs", decimal(n, 1_000));
    }
    if n < 1_000_000_000 {
        return format!("{sign}{}ms", decimal(n, 1_000_000));
    }

    let hours = n / 3_600_000_000_000;
    let minutes = (n % 3_600_000_000_000) / 60_000_000_000;
    let seconds = decimal(n % 60_000_000_000, 1_000_000_000);

    let mut out = sign.to_string();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&format!("{seconds}s"));
    out
}

/// `value / unit` with the fractional part trimmed of trailing zeros
fn decimal(value: u64, unit: u64) -> String {
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return whole.to_string();
    }

    let width = unit.ilog10() as usize;
    let digits = format!("{:0width$}", fraction, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%m/%d/%y %H:%M:%S UTC").to_string()
}

/// Difference between two instants, truncated to whole seconds
pub fn format_time_difference(first: DateTime<Utc>, second: DateTime<Utc>) -> String {
    let second_unit = TimeDelta::seconds(1);
    let first = first.duration_trunc(second_unit).unwrap_or(first);
    let second = second.duration_trunc(second_unit).unwrap_or(second);
    let nanos = (second - first).num_nanoseconds().unwrap_or(i64::MAX);
    format_nanos(nanos)
}
