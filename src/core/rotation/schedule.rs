//! Next-rotation date derivation.
//!
//! Pure functions of `(interval, cron, base)`. Calendar intervals use month
//! arithmetic so `MONTHLY` from Jan 31 lands on the last day of February.

use std::str::FromStr;

use chrono::{Duration, Months, Utc};
use tracing::warn;

use crate::core::constants::{FALLBACK_CUSTOM_DAYS, FALLBACK_DURATION_DAYS};
use crate::core::domain::RotationInterval;
use crate::core::types::Timestamp;
use crate::error::{Result, ValidationError};

/// A parsed duration interval such as `7d` or `1M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl Offset {
    /// `base` moved forward by this offset, or `None` on overflow.
    pub fn apply(self, base: Timestamp) -> Option<Timestamp> {
        match self {
            Self::Days(n) => base.checked_add_signed(Duration::try_days(i64::from(n))?),
            Self::Weeks(n) => base.checked_add_signed(Duration::try_weeks(i64::from(n))?),
            Self::Months(n) => base.checked_add_months(Months::new(n)),
            Self::Years(n) => base.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }
}

/// Parse `<N><unit>` where unit is `d`, `w`, `M`, `Y` or `y` and `N > 0`.
///
/// Returns `None` for anything else, including a zero count.
pub fn parse_duration(raw: &str) -> Option<Offset> {
    let raw = raw.trim();
    let unit = raw.chars().last()?;
    let count = &raw[..raw.len() - unit.len_utf8()];
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u32 = count.parse().ok()?;
    if n == 0 {
        return None;
    }

    match unit {
        'd' => Some(Offset::Days(n)),
        'w' => Some(Offset::Weeks(n)),
        'M' => Some(Offset::Months(n)),
        'Y' | 'y' => Some(Offset::Years(n)),
        _ => None,
    }
}

/// Parse a cron expression. Five-field expressions get a `0` seconds field.
///
/// # Errors
///
/// Returns `ValidationError::InvalidCron` if the expression does not parse.
pub fn parse_cron(expression: &str) -> Result<cron::Schedule> {
    let trimmed = expression.trim();
    let normalized = if trimmed.split_whitespace().count() == 5 {
        format!("0 {}", trimmed)
    } else {
        trimmed.to_string()
    };

    cron::Schedule::from_str(&normalized).map_err(|e| {
        ValidationError::InvalidCron {
            expression: expression.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Next rotation time after `last`, or after now when `last` is `None`.
///
/// Unparseable or zero durations fall back to 30 days. `custom` without a
/// cron, or with one that does not parse or never fires again, falls back
/// to 90 days.
pub fn calculate_next_rotation_date(
    interval: &RotationInterval,
    cron: Option<&str>,
    last: Option<Timestamp>,
) -> Timestamp {
    let base = last.unwrap_or_else(Utc::now);

    let next = match interval {
        RotationInterval::Daily => Offset::Days(1).apply(base),
        RotationInterval::Weekly => Offset::Weeks(1).apply(base),
        RotationInterval::Monthly => Offset::Months(1).apply(base),
        RotationInterval::Quarterly => Offset::Months(3).apply(base),
        RotationInterval::Annually => Offset::Years(1).apply(base),
        RotationInterval::Duration(raw) => match parse_duration(raw) {
            Some(offset) => offset.apply(base),
            None => {
                warn!(interval = %raw, "unparseable interval, using 30 days");
                None
            }
        },
        RotationInterval::Custom => {
            let next = cron.and_then(|expr| next_cron_occurrence(expr, base));
            return next.unwrap_or_else(|| fallback(base, FALLBACK_CUSTOM_DAYS));
        }
    };

    next.unwrap_or_else(|| fallback(base, FALLBACK_DURATION_DAYS))
}

fn next_cron_occurrence(expression: &str, base: Timestamp) -> Option<Timestamp> {
    match parse_cron(expression) {
        Ok(schedule) => schedule.after(&base).next(),
        Err(e) => {
            warn!(cron = %expression, error = %e, "invalid cron, using 90 days");
            None
        }
    }
}

fn fallback(base: Timestamp, days: i64) -> Timestamp {
    Duration::try_days(days)
        .and_then(|d| base.checked_add_signed(d))
        .unwrap_or(base)
}
