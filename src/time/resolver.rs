use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::foundation::error::{CountdownError, CountdownResult};
use crate::time::duration::Countdown;

/// Message painted once the target instant is reached.
pub const EXPIRED_MESSAGE: &str = "Date has passed!";

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Countdown state resolved once per generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeState {
    /// The target is not after "now"; a single static frame carries `message`.
    Expired {
        /// Text painted on the frame.
        message: String,
    },
    /// Milliseconds from "now" to the target, always `> 0`.
    Remaining {
        /// Remaining milliseconds at resolution time.
        duration_ms: u64,
    },
}

impl TimeState {
    /// Whether the countdown has already finished.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    /// Number of frames this state produces for a configured frame count.
    pub fn frame_count(&self, configured: u32) -> u32 {
        match self {
            Self::Expired { .. } => 1,
            Self::Remaining { .. } => configured,
        }
    }

    /// Frame texts in display order.
    ///
    /// `Remaining` yields `frames` labels, one second apart; `Expired` yields the message once
    /// regardless of `frames`.
    pub fn labels(&self, frames: u32) -> FrameLabels {
        match self {
            Self::Expired { message } => FrameLabels::Expired(Some(message.clone())),
            Self::Remaining { duration_ms } => FrameLabels::Counting {
                countdown: Countdown::from_millis(*duration_ms),
                left: frames,
            },
        }
    }
}

/// Iterator over the text of each frame. See [`TimeState::labels`].
#[derive(Clone, Debug)]
pub enum FrameLabels {
    /// Single message, then done.
    Expired(Option<String>),
    /// Countdown stepped one second per item.
    Counting {
        /// Value for the next label.
        countdown: Countdown,
        /// Labels still to produce.
        left: u32,
    },
}

impl Iterator for FrameLabels {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self {
            Self::Expired(message) => message.take(),
            Self::Counting { countdown, left } => {
                if *left == 0 {
                    return None;
                }
                let label = countdown.label();
                countdown.tick();
                *left -= 1;
                Some(label)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match self {
            Self::Expired(message) => usize::from(message.is_some()),
            Self::Counting { left, .. } => *left as usize,
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for FrameLabels {}

/// Parse a target timestamp.
///
/// Accepts RFC 3339, RFC 2822, ISO-8601 date-times with or without an offset (no offset means
/// UTC) and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_target_time(input: &str) -> CountdownResult<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return Err(CountdownError::time("target time is required"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(naive.and_utc());
    }

    Err(CountdownError::time(format!(
        "unrecognized target time \"{s}\""
    )))
}

/// Resolve `target` against `now`.
pub fn resolve_time(target: &str, now: DateTime<Utc>) -> CountdownResult<TimeState> {
    let target = parse_target_time(target)?;
    Ok(resolve_instant(target, now))
}

/// Resolve an already-parsed target against `now`.
pub fn resolve_instant(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeState {
    let difference = target.signed_duration_since(now).num_milliseconds();
    if difference <= 0 {
        TimeState::Expired {
            message: EXPIRED_MESSAGE.to_owned(),
        }
    } else {
        TimeState::Remaining {
            duration_ms: difference as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/time/resolver.rs"]
mod tests;
