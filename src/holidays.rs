//! Public holiday calendar
//!
//! Holidays are literal reference data (Estonian public holidays plus the
//! eves that are observed as full holidays). Nothing is derived at runtime,
//! so the calendar is only valid up to the last configured year and has to be
//! refreshed periodically.

use crate::logging::get_logger;
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set of dates billed at the off-peak rate regardless of weekday
#[derive(Debug)]
pub struct HolidayCalendar {
    dates: HashSet<NaiveDate>,
    horizon: Option<i32>,
    horizon_warned: AtomicBool,
}

impl HolidayCalendar {
    /// Build a calendar from a list of dates; duplicates are ignored
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        let dates: HashSet<NaiveDate> = dates.into_iter().collect();
        let horizon = dates.iter().map(Datelike::year).max();
        Self {
            dates,
            horizon,
            horizon_warned: AtomicBool::new(false),
        }
    }

    /// Whether `date` is a configured holiday
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.is_beyond_horizon(date) && !self.horizon_warned.swap(true, Ordering::Relaxed) {
            get_logger("holidays").warn(&format!(
                "Holiday data ends with year {:?}, {} is not covered; refresh the calendar",
                self.horizon, date
            ));
        }
        self.dates.contains(&date)
    }

    /// Last year present in the calendar
    pub fn horizon(&self) -> Option<i32> {
        self.horizon
    }

    /// Whether `date` lies after the last configured year
    pub fn is_beyond_horizon(&self, date: NaiveDate) -> bool {
        match self.horizon {
            Some(last) => date.year() > last,
            None => true,
        }
    }

    /// Configured holidays of one year, sorted
    pub fn dates_in_year(&self, year: i32) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .dates
            .iter()
            .copied()
            .filter(|d| d.year() == year)
            .collect();
        dates.sort_unstable();
        dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl Clone for HolidayCalendar {
    fn clone(&self) -> Self {
        Self::new(self.dates.iter().copied())
    }
}
