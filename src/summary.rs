//! Upcoming price statistics for consumers
//!
//! Totals are reported in euro cents per kWh with the seller margin added,
//! starting from the interval that contains `now`.

use crate::output::Resolution;
use crate::types::NormalizedRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Relative rating of one interval within the summarized window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceRating {
    Low,
    Normal,
    High,
}

/// One upcoming interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub instant: DateTime<Utc>,
    pub hour: u32,
    pub minute: u32,
    pub total_cents: f64,
    pub rating: PriceRating,
}

/// Statistics over the current and following intervals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub current: SummaryEntry,
    pub average_cents: f64,
    pub min_cents: f64,
    pub max_cents: f64,
    pub entries: Vec<SummaryEntry>,
}

/// Value at `percentile` (0..=1) of ascending-sorted `sorted`
pub fn percentile_threshold(sorted: &[f64], percentile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if percentile <= 0.0 {
        return sorted.first().copied();
    }
    if percentile >= 1.0 {
        return sorted.last().copied();
    }
    let n = sorted.len();
    let idx = ((percentile * n as f64).floor() as isize - 1).clamp(0, (n - 1) as isize) as usize;
    sorted.get(idx).copied()
}

impl PriceSummary {
    /// Summarize records whose interval has not ended at `now`.
    ///
    /// `margin` is in EUR/kWh, like the records. Returns `None` when no
    /// interval is left.
    pub fn from_records(
        records: &[NormalizedRecord],
        resolution: Resolution,
        now: DateTime<Utc>,
        margin: f64,
    ) -> Option<Self> {
        let slot = Duration::minutes(resolution.slot_minutes());
        let mut upcoming: Vec<(&NormalizedRecord, f64)> = records
            .iter()
            .filter(|r| r.instant + slot > now)
            .map(|r| (r, to_cents(r.total() + margin)))
            .collect();
        upcoming.sort_by_key(|(r, _)| r.instant);
        if upcoming.is_empty() {
            return None;
        }

        let mut totals: Vec<f64> = upcoming.iter().map(|(_, t)| *t).collect();
        totals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let low = percentile_threshold(&totals, 0.33).unwrap_or(0.0);
        let high = percentile_threshold(&totals, 0.66).unwrap_or(0.0);

        let entries: Vec<SummaryEntry> = upcoming
            .iter()
            .map(|(r, total)| SummaryEntry {
                instant: r.instant,
                hour: r.hour,
                minute: r.minute,
                total_cents: *total,
                rating: if *total <= low {
                    PriceRating::Low
                } else if *total >= high {
                    PriceRating::High
                } else {
                    PriceRating::Normal
                },
            })
            .collect();

        let sum: f64 = totals.iter().sum();
        Some(Self {
            current: entries[0].clone(),
            average_cents: round_cents(sum / totals.len() as f64),
            min_cents: totals[0],
            max_cents: totals[totals.len() - 1],
            entries,
        })
    }

    /// One line per interval, for logs and the CLI
    pub fn overview(&self) -> String {
        let mut lines = vec![format!(
            "now={:.2} avg={:.2} min={:.2} max={:.2} (c/kWh)",
            self.current.total_cents, self.average_cents, self.min_cents, self.max_cents
        )];
        for entry in &self.entries {
            lines.push(format!(
                "  {:02}:{:02}  total={:.2}  rating={:?}",
                entry.hour, entry.minute, entry.total_cents, entry.rating
            ));
        }
        lines.join("\n")
    }
}

fn to_cents(eur: f64) -> f64 {
    round_cents(eur * 100.0)
}

fn round_cents(cents: f64) -> f64 {
    (cents * 100.0).round() / 100.0
}
