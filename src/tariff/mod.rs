//! Time-of-use distribution tariffs
//!
//! Plans and their band layouts live in `plan`, the effective-dated tables in
//! `registry`, and the per-timestamp fee lookup in `calculator`.

pub mod calculator;
pub mod plan;
pub mod registry;

pub use calculator::TariffCalculator;
pub use plan::{BandKind, PlanId, RateBand, RateBands};
pub use registry::{TariffScheduleRegistry, TariffTable};
