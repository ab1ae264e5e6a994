//! Data carried through the pricing pipeline

use crate::error::{BorsihindError, Result};
use crate::normalize::round_price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a market time unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Interval {
    Minutes15,
    Minutes60,
}

impl Interval {
    pub fn minutes(&self) -> u32 {
        match self {
            Self::Minutes15 => 15,
            Self::Minutes60 => 60,
        }
    }
}

impl TryFrom<u32> for Interval {
    type Error = BorsihindError;

    fn try_from(minutes: u32) -> Result<Self> {
        match minutes {
            15 => Ok(Self::Minutes15),
            60 => Ok(Self::Minutes60),
            other => Err(BorsihindError::invalid_observation(format!(
                "Unsupported interval of {} minutes",
                other
            ))),
        }
    }
}

impl From<Interval> for u32 {
    fn from(interval: Interval) -> Self {
        interval.minutes()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.minutes())
    }
}

/// One day-ahead market price as published by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Start of the delivery interval
    pub instant: DateTime<Utc>,

    /// Market price in EUR/MWh, VAT excluded
    pub raw_price: f64,

    pub interval: Interval,
}

impl PriceObservation {
    pub fn new(instant: DateTime<Utc>, raw_price: f64, interval: Interval) -> Self {
        Self {
            instant,
            raw_price,
            interval,
        }
    }

    /// Reject prices that would turn into NaN downstream
    pub fn validate(&self) -> Result<()> {
        if self.raw_price.is_finite() {
            Ok(())
        } else {
            Err(BorsihindError::invalid_observation(format!(
                "Non-finite price {} at {}",
                self.raw_price,
                self.instant.to_rfc3339()
            )))
        }
    }
}

/// Consumer cost breakdown of one interval, all amounts in EUR/kWh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Source instant, used for ordering
    pub instant: DateTime<Utc>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub energy_price: f64,
    pub grid_fee: f64,
    pub renewable_tax: f64,
    pub excise: f64,
    pub supply_fee: Option<f64>,
    pub monthly_fee: Option<f64>,
}

impl NormalizedRecord {
    /// Sum of every component, rounded like the components
    pub fn total(&self) -> f64 {
        let sum = self.energy_price
            + self.grid_fee
            + self.renewable_tax
            + self.excise
            + self.supply_fee.unwrap_or(0.0)
            + self.monthly_fee.unwrap_or(0.0);
        round_price(sum)
    }
}
