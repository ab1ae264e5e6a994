//! Price normalization
//!
//! Turns exchange prices into consumer cost breakdowns: scales the market
//! price to EUR/kWh with VAT, resolves the grid fee for the local time and
//! attaches the levies in force on that day.

use crate::error::{BorsihindError, Result};
use crate::holidays::HolidayCalendar;
use crate::levies::LevySchedule;
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::tariff::{PlanId, TariffCalculator};
use crate::timezone::TimeZoneConverter;
use crate::types::{NormalizedRecord, PriceObservation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decimal places of every monetary output
pub const PRICE_DECIMALS: i32 = 4;

const PRICE_FACTOR: f64 = 10_000.0;

// Above 2^52 / 10^4 every f64 already has no digits past the fourth decimal
const ROUNDING_LIMIT: f64 = 4_503_599_627_370_496.0 / PRICE_FACTOR;

// Binary noise below this many units of 1e-4 is treated as an exact decimal
const TIE_SNAP: f64 = 1e6;

/// Round to four decimals, halves away from zero
///
/// `0.02015` is stored as `0.020149999...`, so the scaled value is snapped to
/// a fine grid first and decimal ties round the way they read.
pub fn round_price(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    let scaled = value * PRICE_FACTOR;
    let snapped = (scaled * TIE_SNAP).round() / TIE_SNAP;
    snapped.round() / PRICE_FACTOR
}

/// Conversion from exchange units to consumer units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScale {
    /// Tax-inclusive multiplier (1.24 = 24% VAT)
    pub scale_factor: f64,

    /// Divisor from the exchange unit to the consumer unit (MWh -> kWh)
    pub unit_divisor: f64,
}

impl Default for PriceScale {
    fn default() -> Self {
        Self {
            scale_factor: 1.24,
            unit_divisor: 1000.0,
        }
    }
}

impl PriceScale {
    pub fn validate(&self) -> Result<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(BorsihindError::invalid_configuration(format!(
                "Scale factor must be positive, got {}",
                self.scale_factor
            )));
        }
        if !self.unit_divisor.is_finite() || self.unit_divisor <= 0.0 {
            return Err(BorsihindError::invalid_configuration(format!(
                "Unit divisor must be positive, got {}",
                self.unit_divisor
            )));
        }
        Ok(())
    }

    /// Consumer price of a raw exchange price, rounded
    pub fn apply(&self, raw_price: f64) -> f64 {
        round_price(raw_price / self.unit_divisor * self.scale_factor)
    }
}

/// Builds [`NormalizedRecord`]s from price observations
#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    converter: TimeZoneConverter,
    calendar: Arc<HolidayCalendar>,
    calculator: TariffCalculator,
}

impl PriceNormalizer {
    pub fn new(
        converter: TimeZoneConverter,
        calendar: Arc<HolidayCalendar>,
        calculator: TariffCalculator,
    ) -> Self {
        Self {
            converter,
            calendar,
            calculator,
        }
    }

    /// Normalize every observation; fails on the first observation that
    /// cannot be priced. Output is ordered by instant.
    pub fn normalize(
        &self,
        observations: &[PriceObservation],
        plan: PlanId,
        scale: &PriceScale,
        levies: &LevySchedule,
    ) -> Result<Vec<NormalizedRecord>> {
        if observations.is_empty() {
            return Ok(Vec::new());
        }
        scale.validate()?;

        let logger = logger_for(plan);
        let mut records = observations
            .iter()
            .map(|obs| {
                self.normalize_one(obs, plan, scale, levies).inspect_err(|e| {
                    logger.error(&format!(
                        "Cannot price observation at {}: {}",
                        obs.instant.to_rfc3339(),
                        e
                    ));
                })
            })
            .collect::<Result<Vec<_>>>()?;
        records.sort_by_key(|r| r.instant);

        logger.debug(&format!("Normalized {} observations", records.len()));
        Ok(records)
    }

    /// Normalize a single observation
    pub fn normalize_one(
        &self,
        observation: &PriceObservation,
        plan: PlanId,
        scale: &PriceScale,
        levies: &LevySchedule,
    ) -> Result<NormalizedRecord> {
        observation.validate()?;

        let local = self.converter.to_local(observation.instant);
        let is_holiday = self.calendar.is_holiday(local.date);
        let grid_fee = self.calculator.fee_for(&local, is_holiday, plan)?;
        let levies = levies.levies_for(local.date)?;
        let energy_price = scale.apply(observation.raw_price);
        if !energy_price.is_finite() {
            return Err(BorsihindError::invalid_observation(format!(
                "Price {} at {} is out of range after scaling",
                observation.raw_price,
                observation.instant.to_rfc3339()
            )));
        }

        Ok(NormalizedRecord {
            instant: observation.instant,
            year: local.year,
            month: local.month,
            day: local.day,
            hour: local.hour,
            minute: local.minute,
            energy_price,
            grid_fee: round_price(grid_fee),
            renewable_tax: round_price(levies.renewable_tax),
            excise: round_price(levies.excise),
            supply_fee: levies.supply_fee.map(round_price),
            monthly_fee: levies.monthly_fee_per_hour.map(round_price),
        })
    }
}

fn logger_for(plan: PlanId) -> StructuredLogger {
    get_logger_with_context(LogContext::new("normalize").with_plan(plan.as_str()))
}
