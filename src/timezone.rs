//! Conversion of UTC instants into local wall-clock time
//!
//! The tariff bands are defined in local time, so every observation is
//! converted through the zone database rather than a fixed offset.

use crate::error::{BorsihindError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};
use chrono_tz::Tz;

/// Zone the Estonian tariffs are defined in
pub const DEFAULT_TIMEZONE: &str = "Europe/Tallinn";

/// Local wall-clock fields of an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub weekday: Weekday,
    /// Calendar date used for holiday and effective-date lookups
    pub date: NaiveDate,
}

impl LocalTime {
    /// Saturday or Sunday
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }
}

/// Converts instants into a fixed target zone
#[derive(Debug, Clone, Copy)]
pub struct TimeZoneConverter {
    tz: Tz,
}

impl TimeZoneConverter {
    /// Create a converter for an IANA zone identifier
    pub fn new(zone_id: &str) -> Result<Self> {
        let tz = parse_tz(zone_id)?;
        Ok(Self { tz })
    }

    /// Zone used by this converter
    pub fn zone(&self) -> Tz {
        self.tz
    }

    /// Resolve the local wall-clock fields of `instant`
    pub fn to_local(&self, instant: DateTime<Utc>) -> LocalTime {
        let local = instant.with_timezone(&self.tz);
        LocalTime {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
            weekday: local.weekday(),
            date: local.date_naive(),
        }
    }

    /// Instant at which the local hour containing `instant` started.
    ///
    /// Derived from the local offset in effect at `instant`, so the two
    /// occurrences of a repeated autumn hour map to two different starts.
    pub fn hour_start(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let local = instant.with_timezone(&self.tz);
        let into_hour = Duration::minutes(i64::from(local.minute()))
            + Duration::seconds(i64::from(local.second()))
            + Duration::nanoseconds(i64::from(local.nanosecond()));
        instant - into_hour
    }
}

/// Parse an IANA zone identifier
pub fn parse_tz(zone_id: &str) -> Result<Tz> {
    zone_id.trim().parse::<Tz>().map_err(|_| {
        BorsihindError::invalid_configuration(format!("Unknown timezone: {}", zone_id))
    })
}
