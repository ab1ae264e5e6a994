use super::plan::{PlanId, RateBand};
use super::registry::TariffScheduleRegistry;
use crate::error::{BorsihindError, Result};
use crate::timezone::LocalTime;
use std::sync::Arc;

/// Resolves the grid fee of a plan at a local wall-clock time
#[derive(Debug, Clone)]
pub struct TariffCalculator {
    registry: Arc<TariffScheduleRegistry>,
}

impl TariffCalculator {
    pub fn new(registry: Arc<TariffScheduleRegistry>) -> Self {
        Self { registry }
    }

    /// Band and rate in effect at `local`
    pub fn band_for(&self, local: &LocalTime, is_holiday: bool, plan: PlanId) -> Result<RateBand> {
        let table = self.registry.table_for(plan, local.date)?;
        let kind = table.bands.band_at(local.hour, local.weekday, is_holiday);
        let rate_per_unit = table.bands.rate(kind).ok_or_else(|| {
            BorsihindError::invalid_configuration(format!(
                "Plan {} ({}) has no rate for band {}",
                plan,
                table.bands.shape(),
                kind.as_str()
            ))
        })?;
        Ok(RateBand {
            kind,
            rate_per_unit,
        })
    }

    /// Grid fee per kWh in effect at `local`
    pub fn fee_for(&self, local: &LocalTime, is_holiday: bool, plan: PlanId) -> Result<f64> {
        Ok(self.band_for(local, is_holiday, plan)?.rate_per_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariff::plan::{BandKind, RateBands};
    use crate::tariff::registry::TariffTable;
    use chrono::{NaiveDate, Weekday};

    fn local(date: NaiveDate, hour: u32, weekday: Weekday) -> LocalTime {
        use chrono::Datelike;
        LocalTime {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour,
            minute: 0,
            weekday,
            date,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calculator() -> TariffCalculator {
        let from = date(2025, 7, 1);
        let registry = TariffScheduleRegistry::new(vec![
            TariffTable {
                plan: PlanId::V1,
                effective_from: from,
                effective_until: None,
                bands: RateBands::Flat { rate: 0.0957 },
            },
            TariffTable {
                plan: PlanId::V2,
                effective_from: from,
                effective_until: None,
                bands: RateBands::ThreeBand {
                    day: 0.0753,
                    peak: 0.0912,
                    night: 0.0435,
                },
            },
        ])
        .unwrap();
        TariffCalculator::new(Arc::new(registry))
    }

    #[test]
    fn test_flat_plan() {
        // 2025-07-06 is a Sunday
        let sunday = local(date(2025, 7, 6), 3, Weekday::Sun);
        let fee = calculator().fee_for(&sunday, true, PlanId::V1).unwrap();
        assert_eq!(fee, 0.0957);
    }

    #[test]
    fn test_three_band_night_and_day_differ() {
        let calc = calculator();
        // 2025-07-08 is a Tuesday
        let tuesday = |hour| local(date(2025, 7, 8), hour, Weekday::Tue);
        let night = calc.fee_for(&tuesday(3), false, PlanId::V2).unwrap();
        let day = calc.fee_for(&tuesday(14), false, PlanId::V2).unwrap();
        assert_eq!(night, 0.0435);
        assert_eq!(day, 0.0753);
        assert_ne!(night, day);

        let peak = calc.band_for(&tuesday(10), false, PlanId::V2).unwrap();
        assert_eq!(peak.kind, BandKind::DayPeak);
        assert_eq!(peak.rate_per_unit, 0.0912);
    }

    #[test]
    fn test_before_first_table_is_missing_data() {
        let early = local(date(2025, 6, 30), 12, Weekday::Mon);
        let err = calculator().fee_for(&early, false, PlanId::V2).unwrap_err();
        assert!(matches!(err, BorsihindError::MissingTariffData { .. }));
    }

    #[test]
    fn test_unconfigured_plan_is_missing_data() {
        let tuesday = local(date(2025, 7, 8), 12, Weekday::Tue);
        assert!(calculator().fee_for(&tuesday, false, PlanId::V5).is_err());
    }
}
