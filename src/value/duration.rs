//! Text form of durations: `[-][d.]hh:mm:ss[.fffffff]`, with the fraction in
//! ticks of 100 nanoseconds.

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;

const TICK_NANOS: i64 = 100;

static DURATION_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(-)?(?:(\d+)\.)?(\d{1,2}):(\d{1,2})(?::(\d{1,2})(?:\.(\d{1,7}))?)?$").ok()
});

/// Total length in milliseconds, sub-millisecond part included.
pub fn total_milliseconds(d: &TimeDelta) -> f64 {
    d.num_seconds() as f64 * 1000.0 + d.subsec_nanos() as f64 / 1_000_000.0
}

pub fn format_duration(d: &TimeDelta) -> String {
    let (sign, abs) = if *d < TimeDelta::zero() {
        ("-", -*d)
    } else {
        ("", *d)
    };

    let total_seconds = abs.num_seconds();
    let days = total_seconds / 86_400;
    let hours = (total_seconds / 3_600) % 24;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    let ticks = abs.subsec_nanos() as i64 / TICK_NANOS;

    let mut out = String::from(sign);
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if ticks > 0 {
        out.push_str(&format!(".{:07}", ticks));
    }
    out
}

/// Parses the text form. Hours must be below 24 and minutes and seconds below 60.
pub fn parse_duration(text: &str) -> Option<TimeDelta> {
    let pattern = DURATION_PATTERN.as_ref()?;
    let caps = pattern.captures(text)?;

    let field = |i: usize| -> Option<i64> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse::<i64>().ok())
    };

    let days = field(2)?;
    let hours = field(3)?;
    let minutes = field(4)?;
    let seconds = field(5)?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    // Right-pad the fraction to seven digits: ".5" is 5_000_000 ticks.
    let ticks = match caps.get(6) {
        Some(m) => format!("{:0<7}", m.as_str()).parse::<i64>().ok()?,
        None => 0,
    };

    let magnitude = TimeDelta::try_days(days)?
        .checked_add(&TimeDelta::hours(hours))?
        .checked_add(&TimeDelta::minutes(minutes))?
        .checked_add(&TimeDelta::seconds(seconds))?
        .checked_add(&TimeDelta::nanoseconds(ticks * TICK_NANOS))?;

    Some(if caps.get(1).is_some() { -magnitude } else { magnitude })
}
