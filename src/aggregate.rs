//! Hourly aggregation of quarter-hour market prices

use crate::error::Result;
use crate::logging::get_logger;
use crate::timezone::TimeZoneConverter;
use crate::types::{Interval, PriceObservation};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Averages sub-hourly observations into local clock hours
#[derive(Debug, Clone, Copy)]
pub struct PriceAggregator {
    converter: TimeZoneConverter,
}

impl PriceAggregator {
    pub fn new(converter: TimeZoneConverter) -> Self {
        Self { converter }
    }

    /// Group observations by the local hour they fall into and average each
    /// group. Partial hours are averaged over the members present.
    pub fn aggregate_hourly(
        &self,
        observations: &[PriceObservation],
    ) -> Result<Vec<PriceObservation>> {
        // keyed by the instant the local hour started; BTreeMap keeps them ordered
        let mut buckets: BTreeMap<DateTime<Utc>, Vec<f64>> = BTreeMap::new();
        for obs in observations {
            obs.validate()?;
            let start = self.converter.hour_start(obs.instant);
            buckets.entry(start).or_default().push(obs.raw_price);
        }

        let partial = buckets.values().filter(|prices| prices.len() < 4).count();
        if partial > 0 {
            get_logger("aggregate").debug(&format!(
                "{} of {} hours aggregated from fewer than four quarters",
                partial,
                buckets.len()
            ));
        }

        Ok(buckets
            .into_iter()
            .map(|(start, quarter_prices)| {
                PriceObservation::new(start, mean(&quarter_prices), Interval::Minutes60)
            })
            .collect())
    }
}

/// Mean of finite prices; near the f64 limits the sum would overflow, so the
/// terms are divided first
fn mean(prices: &[f64]) -> f64 {
    let count = prices.len() as f64;
    let sum: f64 = prices.iter().sum();
    if sum.is_finite() {
        sum / count
    } else {
        prices.iter().map(|p| p / count).sum()
    }
}
