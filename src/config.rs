//! Configuration management for Börsihind
//!
//! Loads, validates and saves the YAML configuration. Rate tables, levies and
//! holidays are plain data here; the defaults in [`defaults`] reproduce the
//! tariffs published by the Estonian grid operator.

mod defaults;

pub use defaults::{default_holidays, default_levies, default_tariffs};

use crate::error::{BorsihindError, Result};
use crate::feed::DEFAULT_AREA;
use crate::holidays::HolidayCalendar;
use crate::levies::{LevySchedule, LevyTable};
use crate::logging::parse_log_level;
use crate::normalize::PriceScale;
use crate::output::Resolution;
use crate::tariff::{PlanId, TariffScheduleRegistry, TariffTable};
use crate::timezone::{DEFAULT_TIMEZONE, TimeZoneConverter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA zone all calendar rules are evaluated in
    pub timezone: String,

    /// Market price conversion
    pub pricing: PricingConfig,

    /// Plans to produce output for
    pub plans: Vec<PlanId>,

    /// Effective-dated rate tables of every plan
    pub tariffs: Vec<TariffTable>,

    /// Effective-dated levy tables
    pub levies: Vec<LevyTable>,

    /// Dates priced as off-peak regardless of weekday
    pub holidays: Vec<NaiveDate>,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Output files
    pub output: OutputConfig,
}

/// Market price conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Tax-inclusive multiplier applied to the exchange price
    pub scale_factor: f64,

    /// Exchange unit per consumer unit (1000 for EUR/MWh -> EUR/kWh)
    pub unit_divisor: f64,

    /// Delivery area read from feed documents
    pub feed_area: String,

    /// Seller margin in EUR/kWh added to summary totals
    pub margin: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console level override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_level: Option<String>,

    /// Optional file level override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_level: Option<String>,

    /// Log file path or directory
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Where and at which resolutions plan files are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub hourly: bool,
    pub quarter_hourly: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let scale = PriceScale::default();
        Self {
            scale_factor: scale.scale_factor,
            unit_divisor: scale.unit_divisor,
            feed_area: DEFAULT_AREA.to_string(),
            margin: 0.0,
        }
    }
}

impl PricingConfig {
    pub fn scale(&self) -> PriceScale {
        PriceScale {
            scale_factor: self.scale_factor,
            unit_divisor: self.unit_divisor,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/borsihind.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "prices".to_string(),
            hourly: true,
            quarter_hourly: true,
        }
    }
}

impl OutputConfig {
    /// Enabled resolutions, quarter-hourly first
    pub fn resolutions(&self) -> Vec<Resolution> {
        let mut resolutions = Vec::with_capacity(2);
        if self.quarter_hourly {
            resolutions.push(Resolution::QuarterHourly);
        }
        if self.hourly {
            resolutions.push(Resolution::Hourly);
        }
        resolutions
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            pricing: PricingConfig::default(),
            plans: PlanId::ALL.to_vec(),
            tariffs: default_tariffs(),
            levies: default_levies(),
            holidays: default_holidays(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = ["borsihind.yaml", "/etc/borsihind/config.yaml"];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.converter()?;

        if !self.pricing.scale_factor.is_finite() || self.pricing.scale_factor <= 0.0 {
            return Err(BorsihindError::validation(
                "pricing.scale_factor",
                "Must be positive",
            ));
        }

        if !self.pricing.unit_divisor.is_finite() || self.pricing.unit_divisor <= 0.0 {
            return Err(BorsihindError::validation(
                "pricing.unit_divisor",
                "Must be positive",
            ));
        }

        if self.pricing.feed_area.trim().is_empty() {
            return Err(BorsihindError::validation(
                "pricing.feed_area",
                "Area code cannot be empty",
            ));
        }

        if self.plans.is_empty() {
            return Err(BorsihindError::validation(
                "plans",
                "At least one plan is required",
            ));
        }

        let priced = self.tariff_registry()?.plans();
        if let Some(plan) = self.plans.iter().find(|plan| !priced.contains(plan)) {
            return Err(BorsihindError::validation(
                "tariffs",
                format!("No rate table for plan {}", plan),
            ));
        }

        if self.levies.is_empty() {
            return Err(BorsihindError::validation(
                "levies",
                "At least one levy table is required",
            ));
        }
        self.levy_schedule()?;

        parse_log_level(&self.logging.level)?;

        if self.output.resolutions().is_empty() {
            return Err(BorsihindError::validation(
                "output",
                "Enable hourly or quarter_hourly output",
            ));
        }

        Ok(())
    }

    pub fn converter(&self) -> Result<TimeZoneConverter> {
        TimeZoneConverter::new(&self.timezone)
    }

    pub fn tariff_registry(&self) -> Result<TariffScheduleRegistry> {
        TariffScheduleRegistry::new(self.tariffs.clone())
    }

    pub fn levy_schedule(&self) -> Result<LevySchedule> {
        LevySchedule::new(self.levies.clone())
    }

    pub fn holiday_calendar(&self) -> HolidayCalendar {
        HolidayCalendar::new(self.holidays.iter().copied())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
