//! Effective-dated configuration records
//!
//! Rate tables and levy tables change on legal effective dates. Each record
//! carries an inclusive date range and at most one record of a series may
//! cover any given date.

use crate::error::{BorsihindError, Result};
use chrono::NaiveDate;

/// A record valid over `[effective_from, effective_until]`
pub trait EffectiveDated {
    fn effective_from(&self) -> NaiveDate;

    /// Last valid day; `None` means open-ended
    fn effective_until(&self) -> Option<NaiveDate>;

    fn covers(&self, date: NaiveDate) -> bool {
        date >= self.effective_from() && self.effective_until().is_none_or(|until| date <= until)
    }
}

/// Sort a series by start date and reject inverted or overlapping ranges.
///
/// `label` names the series in error messages (e.g. "tariff tables for V4").
pub fn ensure_disjoint<T: EffectiveDated>(records: &mut [T], label: &str) -> Result<()> {
    for record in records.iter() {
        if let Some(until) = record.effective_until()
            && until < record.effective_from()
        {
            return Err(BorsihindError::invalid_configuration(format!(
                "{}: range ends ({}) before it starts ({})",
                label,
                until,
                record.effective_from()
            )));
        }
    }

    records.sort_by_key(|r| r.effective_from());
    for pair in records.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        let disjoint = earlier
            .effective_until()
            .is_some_and(|until| until < later.effective_from());
        if !disjoint {
            return Err(BorsihindError::invalid_configuration(format!(
                "Overlapping {}: {} and {}",
                label,
                earlier.effective_from(),
                later.effective_from()
            )));
        }
    }
    Ok(())
}

/// Record of a sorted, disjoint series that covers `date`
pub fn find_covering<T: EffectiveDated>(records: &[T], date: NaiveDate) -> Option<&T> {
    // series are short (a handful of versions), a scan is enough
    records.iter().rev().find(|r| r.covers(date))
}
