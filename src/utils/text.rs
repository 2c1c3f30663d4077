use std::borrow::Cow;
use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

/// Pluralizes a piece of text.
pub fn pluralize(base: &str, count: u64) -> Cow<'_, str> {
    if count == 1 {
        base.into()
    } else {
        format!("{base}s").into()
    }
}

/// Renders a duration coarsely, in the largest whole unit that fits into it
/// (e.g. 230 seconds is "3 minutes").
pub fn natural_delta(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let (count, unit, singular) = match seconds {
        0 => return "a moment".to_string(),
        1..MINUTE => (seconds, "second", "a second"),
        MINUTE..HOUR => (seconds / MINUTE, "minute", "a minute"),
        HOUR..DAY => (seconds / HOUR, "hour", "an hour"),
        DAY..MONTH => (seconds / DAY, "day", "a day"),
        MONTH..YEAR => (seconds / MONTH, "month", "a month"),
        _ => (seconds / YEAR, "year", "a year"),
    };
    if count == 1 {
        singular.to_string()
    } else {
        format!("{count} {}", pluralize(unit, count))
    }
}
