//! # Börsihind - day-ahead electricity price normalizer
//!
//! Turns Nord Pool day-ahead prices into consumer cost breakdowns for the
//! Estonian distribution plans: VAT-inclusive energy price, time-of-use grid
//! fee, renewable energy charge, excise and supply-security fee per interval.
//!
//! ## Architecture
//!
//! - `timezone`: instant to local wall-clock time
//! - `holidays`: dates priced as off-peak
//! - `tariff`: effective-dated rate tables and band resolution
//! - `levies`: effective-dated levies
//! - `aggregate`: quarter-hour to hourly averaging
//! - `normalize`: per-observation cost breakdown
//! - `feed`: decoding of downloaded day-ahead documents
//! - `output`: JSON rows and the storage seam
//! - `pipeline`: aggregate → normalize → serialize for every plan
//! - `summary`: upcoming price statistics
//! - `config`, `logging`, `error`: ambient plumbing

pub mod aggregate;
pub mod config;
pub mod effective;
pub mod error;
pub mod feed;
pub mod holidays;
pub mod levies;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod summary;
pub mod tariff;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{BorsihindError, Result};
pub use normalize::{PriceNormalizer, PriceScale};
pub use pipeline::Pipeline;
pub use tariff::{PlanId, TariffCalculator, TariffScheduleRegistry};
pub use types::{Interval, NormalizedRecord, PriceObservation};
