//! Decoding of already-downloaded day-ahead price documents
//!
//! The crate never talks to the exchange itself. A caller hands over the body
//! of a Nord Pool `DayAheadPrices` response (one per delivery day) and gets
//! price observations for one delivery area back.

use crate::error::{BorsihindError, Result};
use crate::logging::{LogContext, get_logger_with_context};
use crate::types::{Interval, PriceObservation};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Delivery area of the Estonian price
pub const DEFAULT_AREA: &str = "EE";

/// Length of the smallest market time unit in seconds
const SLOT_SECONDS: i64 = 15 * 60;

#[derive(Debug, Deserialize)]
struct DayAheadDocument {
    #[serde(rename = "multiAreaEntries", default)]
    multi_area_entries: Vec<AreaEntry>,
}

#[derive(Debug, Deserialize)]
struct AreaEntry {
    #[serde(rename = "deliveryStart")]
    delivery_start: DateTime<Utc>,
    #[serde(rename = "deliveryEnd", default)]
    delivery_end: Option<DateTime<Utc>>,
    #[serde(rename = "entryPerArea")]
    entry_per_area: HashMap<String, Option<f64>>,
}

/// Decode one `DayAheadPrices` document for `area`.
///
/// Entries without a price for the area are skipped. A document without
/// `multiAreaEntries` (no prices published yet) yields an empty list.
pub fn parse_day_ahead(json: &str, area: &str) -> Result<Vec<PriceObservation>> {
    let logger = get_logger_with_context(LogContext::new("feed").with_area(area));
    let document: DayAheadDocument = serde_json::from_str(json)
        .map_err(|e| BorsihindError::feed(format!("Malformed day-ahead document: {}", e)))?;

    let mut observations = Vec::with_capacity(document.multi_area_entries.len());
    let mut skipped = 0usize;
    for entry in document.multi_area_entries {
        let Some(price) = entry.entry_per_area.get(area).copied().flatten() else {
            skipped += 1;
            continue;
        };
        let interval = match entry.delivery_end {
            Some(end) => {
                let minutes = (end - entry.delivery_start).num_minutes();
                u32::try_from(minutes)
                    .ok()
                    .and_then(|m| Interval::try_from(m).ok())
                    .ok_or_else(|| {
                        BorsihindError::feed(format!(
                            "Unsupported delivery period of {} minutes at {}",
                            minutes,
                            entry.delivery_start.to_rfc3339()
                        ))
                    })?
            }
            None => Interval::Minutes15,
        };
        observations.push(PriceObservation::new(entry.delivery_start, price, interval));
    }

    if skipped > 0 {
        logger.warn(&format!(
            "Skipped {} entries without a price for area {}",
            skipped, area
        ));
    }
    observations.sort_by_key(|o| o.instant);
    Ok(observations)
}

/// Merge observations from several documents; later documents win on
/// duplicate instants. Result is ordered by instant.
pub fn merge_observations<I>(batches: I) -> Vec<PriceObservation>
where
    I: IntoIterator<Item = Vec<PriceObservation>>,
{
    let mut merged: BTreeMap<DateTime<Utc>, PriceObservation> = BTreeMap::new();
    for batch in batches {
        for obs in batch {
            merged.insert(obs.instant, obs);
        }
    }
    merged.into_values().collect()
}

/// Start of the 15-minute slot containing `now`
pub fn current_slot_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = now.timestamp();
    let floored = secs - secs.rem_euclid(SLOT_SECONDS);
    DateTime::from_timestamp(floored, 0).unwrap_or(now)
}

/// Drop observations that start before the current 15-minute slot
pub fn drop_elapsed(
    observations: &[PriceObservation],
    now: DateTime<Utc>,
) -> Vec<PriceObservation> {
    let cutoff = current_slot_start(now);
    observations
        .iter()
        .filter(|o| o.instant >= cutoff)
        .copied()
        .collect()
}
