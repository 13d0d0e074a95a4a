use std::fmt;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Remaining time decomposed into display fields.
///
/// Every field is derived from the cumulative millisecond total (`⌊ms / unit⌋` minus the
/// larger fields), never from calendar components, so `days` is unbounded and the smaller
/// fields always stay within their natural range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CountdownParts {
    /// Whole days.
    pub days: u64,
    /// Hours within the day, `0..24`.
    pub hours: u64,
    /// Minutes within the hour, `0..60`.
    pub minutes: u64,
    /// Seconds within the minute, `0..60`.
    pub seconds: u64,
}

impl CountdownParts {
    /// Decompose a remaining duration in milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        let days = ms / MS_PER_DAY;
        let hours = ms / MS_PER_HOUR - days * 24;
        let minutes = ms / MS_PER_MINUTE - days * 24 * 60 - hours * 60;
        let seconds =
            ms / MS_PER_SECOND - days * 24 * 60 * 60 - hours * 60 * 60 - minutes * 60;
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }
}

impl fmt::Display for CountdownParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Countdown value captured at resolution time and stepped once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining_ms: u64,
}

impl Countdown {
    /// Start a countdown from `remaining_ms`.
    pub fn from_millis(remaining_ms: u64) -> Self {
        Self { remaining_ms }
    }

    /// Milliseconds left.
    pub fn remaining_ms(self) -> u64 {
        self.remaining_ms
    }

    /// Display fields for the current value.
    pub fn parts(self) -> CountdownParts {
        CountdownParts::from_millis(self.remaining_ms)
    }

    /// Text painted on the frame for the current value.
    pub fn label(self) -> String {
        self.parts().to_string()
    }

    /// Advance by one second; saturates at zero.
    pub fn tick(&mut self) {
        self.remaining_ms = self.remaining_ms.saturating_sub(MS_PER_SECOND);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/time/duration.rs"]
mod tests;
