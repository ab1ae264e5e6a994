//! Fixed levies added on top of the energy price and grid fee
//!
//! Levy amounts are set by law and change on effective dates, so they are
//! versioned the same way as the rate tables.

use crate::effective::{EffectiveDated, ensure_disjoint, find_covering};
use crate::error::{BorsihindError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Levy amounts in EUR per kWh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Levies {
    /// Renewable energy charge
    pub renewable_tax: f64,

    /// Electricity excise duty
    pub excise: f64,

    /// Security-of-supply fee, when in force
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_fee: Option<f64>,

    /// Monthly fixed fee spread over the hours of a month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_fee_per_hour: Option<f64>,
}

impl Levies {
    fn validate(&self) -> Result<()> {
        let amounts = [
            ("renewable_tax", Some(self.renewable_tax)),
            ("excise", Some(self.excise)),
            ("supply_fee", self.supply_fee),
            ("monthly_fee_per_hour", self.monthly_fee_per_hour),
        ];
        for (name, amount) in amounts {
            if let Some(value) = amount
                && (!value.is_finite() || value < 0.0)
            {
                return Err(BorsihindError::invalid_configuration(format!(
                    "Levy {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Levies valid over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevyTable {
    pub effective_from: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_until: Option<NaiveDate>,

    #[serde(flatten)]
    pub levies: Levies,
}

impl EffectiveDated for LevyTable {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_until(&self) -> Option<NaiveDate> {
        self.effective_until
    }
}

/// Effective-dated levy series
#[derive(Debug, Clone, Default)]
pub struct LevySchedule {
    tables: Vec<LevyTable>,
}

impl LevySchedule {
    pub fn new(mut tables: Vec<LevyTable>) -> Result<Self> {
        for table in &tables {
            table.levies.validate()?;
        }
        ensure_disjoint(&mut tables, "levy tables")?;
        Ok(Self { tables })
    }

    /// A schedule holding one set of levies for every date
    pub fn fixed(levies: Levies) -> Result<Self> {
        Self::new(vec![LevyTable {
            effective_from: NaiveDate::MIN,
            effective_until: None,
            levies,
        }])
    }

    /// Levies in force on `date`
    pub fn levies_for(&self, date: NaiveDate) -> Result<Levies> {
        find_covering(&self.tables, date)
            .map(|t| t.levies)
            .ok_or_else(|| {
                BorsihindError::missing_tariff_data(format!("No levy table covers {}", date))
            })
    }

    pub fn tables(&self) -> &[LevyTable] {
        &self.tables
    }
}
