use super::plan::{PlanId, RateBand, RateBands};
use crate::effective::{EffectiveDated, ensure_disjoint, find_covering};
use crate::error::{BorsihindError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rate table of one plan, valid over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffTable {
    /// Plan this table prices
    pub plan: PlanId,

    /// First day the table applies
    pub effective_from: NaiveDate,

    /// Last day the table applies; open-ended when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_until: Option<NaiveDate>,

    /// Band layout and rates
    pub bands: RateBands,
}

impl EffectiveDated for TariffTable {
    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_until(&self) -> Option<NaiveDate> {
        self.effective_until
    }
}

/// Effective-dated rate tables keyed by plan
#[derive(Debug, Clone, Default)]
pub struct TariffScheduleRegistry {
    tables: HashMap<PlanId, Vec<TariffTable>>,
}

impl TariffScheduleRegistry {
    /// Build a registry, rejecting malformed ranges and overlaps within a plan
    pub fn new(tables: Vec<TariffTable>) -> Result<Self> {
        let mut by_plan: HashMap<PlanId, Vec<TariffTable>> = HashMap::new();
        for table in tables {
            table.bands.validate()?;
            by_plan.entry(table.plan).or_default().push(table);
        }
        for (plan, tables) in &mut by_plan {
            ensure_disjoint(tables, &format!("tariff tables for {}", plan))?;
        }
        Ok(Self { tables: by_plan })
    }

    /// Table in effect for `plan` on `date`
    pub fn table_for(&self, plan: PlanId, date: NaiveDate) -> Result<&TariffTable> {
        find_covering(self.tables(plan), date).ok_or_else(|| {
            BorsihindError::missing_tariff_data(format!(
                "No tariff table for plan {} covers {}",
                plan, date
            ))
        })
    }

    /// Bands and rates in effect for `plan` on `date`
    pub fn rates_for(&self, plan: PlanId, date: NaiveDate) -> Result<Vec<RateBand>> {
        Ok(self.table_for(plan, date)?.bands.bands())
    }

    /// All tables of a plan, oldest first
    pub fn tables(&self, plan: PlanId) -> &[TariffTable] {
        self.tables
            .get(&plan)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Plans with at least one table
    pub fn plans(&self) -> Vec<PlanId> {
        let mut plans: Vec<PlanId> = self.tables.keys().copied().collect();
        plans.sort();
        plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariff::plan::BandKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn v4(from: NaiveDate, until: Option<NaiveDate>, day: f64, night: f64) -> TariffTable {
        TariffTable {
            plan: PlanId::V4,
            effective_from: from,
            effective_until: until,
            bands: RateBands::TwoBand { day, night },
        }
    }

    #[test]
    fn test_resolves_table_by_date() {
        let registry = TariffScheduleRegistry::new(vec![
            v4(date(2025, 7, 1), None, 0.0458, 0.026),
            v4(date(2024, 1, 1), Some(date(2025, 6, 30)), 0.045, 0.0256),
        ])
        .unwrap();

        let old = registry.table_for(PlanId::V4, date(2025, 6, 30)).unwrap();
        assert_eq!(old.bands.rate(BandKind::Night), Some(0.0256));

        let new = registry.table_for(PlanId::V4, date(2025, 7, 1)).unwrap();
        assert_eq!(new.bands.rate(BandKind::Night), Some(0.026));

        let bands = registry.rates_for(PlanId::V4, date(2030, 1, 1)).unwrap();
        assert_eq!(bands.len(), 2);
        let oldest = &registry.tables(PlanId::V4)[0];
        assert_eq!(oldest.effective_from, date(2024, 1, 1));
    }

    #[test]
    fn test_gap_is_missing_tariff_data() {
        let registry = TariffScheduleRegistry::new(vec![
            v4(date(2024, 1, 1), Some(date(2024, 12, 31)), 0.045, 0.0256),
            v4(date(2025, 2, 1), None, 0.0458, 0.026),
        ])
        .unwrap();
        let err = registry
            .table_for(PlanId::V4, date(2025, 1, 15))
            .unwrap_err();
        assert!(matches!(err, BorsihindError::MissingTariffData { .. }));

        let err = registry
            .rates_for(PlanId::V1, date(2025, 3, 1))
            .unwrap_err();
        assert!(matches!(err, BorsihindError::MissingTariffData { .. }));
    }

    #[test]
    fn test_overlap_is_rejected() {
        let err = TariffScheduleRegistry::new(vec![
            v4(date(2024, 1, 1), Some(date(2025, 7, 1)), 0.045, 0.0256),
            v4(date(2025, 7, 1), None, 0.0458, 0.026),
        ])
        .unwrap_err();
        assert!(matches!(err, BorsihindError::InvalidConfiguration { .. }));

        // two open-ended tables always overlap
        let open_ended = vec![
            v4(date(2024, 1, 1), None, 0.045, 0.0256),
            v4(date(2025, 7, 1), None, 0.0458, 0.026),
        ];
        assert!(TariffScheduleRegistry::new(open_ended).is_err());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let inverted = v4(date(2025, 1, 1), Some(date(2024, 1, 1)), 0.045, 0.0256);
        assert!(TariffScheduleRegistry::new(vec![inverted]).is_err());
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let negative = v4(date(2025, 1, 1), None, 0.045, -1.0);
        assert!(TariffScheduleRegistry::new(vec![negative]).is_err());
    }

    #[test]
    fn test_same_range_on_different_plans_is_fine() {
        let mut v2 = v4(date(2025, 7, 1), None, 0.0753, 0.0435);
        v2.plan = PlanId::V2;
        let v4 = v4(date(2025, 7, 1), None, 0.0458, 0.026);
        let registry = TariffScheduleRegistry::new(vec![v2, v4]).unwrap();
        assert_eq!(registry.plans(), vec![PlanId::V2, PlanId::V4]);
    }
}
