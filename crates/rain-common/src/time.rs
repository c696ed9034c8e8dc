//! Time handling for CF-convention forecast data.
//!
//! Forecast files carry a numeric time axis encoded as
//! `"<unit> since <reference datetime>"` plus an optional calendar
//! attribute. This module decodes those values to absolute UTC timestamps
//! and provides the 3-hourly rounding applied before daily grouping.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{RainError, RainResult};

/// CF calendar systems supported by the pipeline.
///
/// Source forecasts use the standard Gregorian calendar; the climate-model
/// calendars (`noleap`, `360_day`, ...) cannot be represented by a real
/// timeline and are rejected at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calendar {
    #[default]
    Standard,
    ProlepticGregorian,
}

impl Calendar {
    /// Parse a CF calendar attribute. A missing attribute defaults to
    /// `Standard`.
    pub fn parse(s: Option<&str>) -> RainResult<Self> {
        match s {
            None => Ok(Self::Standard),
            Some(name) => match name.to_lowercase().as_str() {
                "standard" | "gregorian" => Ok(Self::Standard),
                "proleptic_gregorian" => Ok(Self::ProlepticGregorian),
                other => Err(RainError::Decode(format!(
                    "unsupported calendar: {}",
                    other
                ))),
            },
        }
    }
}

/// Time unit of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> RainResult<Self> {
        match s.to_lowercase().as_str() {
            "second" | "seconds" | "s" => Ok(Self::Seconds),
            "minute" | "minutes" | "min" => Ok(Self::Minutes),
            "hour" | "hours" | "h" | "hr" => Ok(Self::Hours),
            "day" | "days" | "d" => Ok(Self::Days),
            other => Err(RainError::Decode(format!("unknown time unit: {}", other))),
        }
    }

    fn to_seconds(self, value: f64) -> f64 {
        match self {
            Self::Seconds => value,
            Self::Minutes => value * 60.0,
            Self::Hours => value * 3600.0,
            Self::Days => value * 86_400.0,
        }
    }
}

/// Decoder for a CF time axis: unit, reference epoch, and calendar.
#[derive(Debug, Clone)]
pub struct CfTimeDecoder {
    pub unit: TimeUnit,
    pub reference: DateTime<Utc>,
    pub calendar: Calendar,
}

impl CfTimeDecoder {
    /// Parse a CF units string such as `"hours since 2024-01-15 12:00:00"`,
    /// together with the optional calendar attribute.
    pub fn parse(units: &str, calendar: Option<&str>) -> RainResult<Self> {
        let lower = units.to_lowercase();
        let since = lower
            .find(" since ")
            .ok_or_else(|| RainError::Decode(format!("missing 'since' in units: {}", units)))?;

        let unit = TimeUnit::parse(units[..since].trim())?;
        let reference = parse_reference(units[since + 7..].trim())?;
        let calendar = Calendar::parse(calendar)?;

        Ok(Self {
            unit,
            reference,
            calendar,
        })
    }

    /// Decode a single numeric time value to an absolute UTC timestamp.
    ///
    /// Both supported calendars share chrono's proleptic Gregorian timeline,
    /// so the calendar needs no arithmetic of its own.
    pub fn decode(&self, value: f64) -> RainResult<DateTime<Utc>> {
        let seconds = self.unit.to_seconds(value);
        if !seconds.is_finite() {
            return Err(RainError::Decode(format!(
                "non-finite time value: {}",
                value
            )));
        }

        let whole = seconds.trunc() as i64;
        let nanos = ((seconds - whole as f64) * 1e9) as i64;
        self.reference
            .checked_add_signed(Duration::seconds(whole) + Duration::nanoseconds(nanos))
            .ok_or_else(|| RainError::Decode(format!("time value out of range: {}", value)))
    }

    /// Decode a whole time axis.
    pub fn decode_axis(&self, values: &[f64]) -> RainResult<Vec<DateTime<Utc>>> {
        values.iter().map(|&v| self.decode(v)).collect()
    }
}

/// Parse the reference datetime of a CF units string.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, and the `T`-separated ISO
/// form, with an optional trailing `Z`.
fn parse_reference(s: &str) -> RainResult<DateTime<Utc>> {
    let s = s.trim_end_matches('Z').replace('T', " ");

    if let Ok(ndt) = NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(RainError::Decode(format!(
        "unparseable reference datetime: {}",
        s
    )))
}

/// Round a timestamp to the nearest 3-hour boundary.
///
/// Exact midpoints (90 minutes past a boundary) round upward, i.e. half
/// away from zero on the positive timeline.
pub fn round_to_three_hours(dt: DateTime<Utc>) -> DateTime<Utc> {
    const STEP: i64 = 3 * 3600;

    let secs = dt.timestamp();
    let rem = secs.rem_euclid(STEP);
    let base = secs - rem;
    let rounded = if rem * 2 >= STEP { base + STEP } else { base };

    dt + Duration::seconds(rounded - secs) - Duration::nanoseconds(dt.timestamp_subsec_nanos() as i64)
}
