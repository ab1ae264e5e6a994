//! Reference data of the Estonian grid operator's published price lists

use crate::levies::{Levies, LevyTable};
use crate::tariff::{PlanId, RateBands, TariffTable};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// One price list version: the same layout for all four plans
struct PriceList {
    from: NaiveDate,
    until: Option<NaiveDate>,
    v1: f64,
    v2: (f64, f64),
    v4: (f64, f64),
    v5: (f64, f64, f64, f64),
}

impl PriceList {
    fn tables(&self) -> [TariffTable; 4] {
        let table = |plan, bands| TariffTable {
            plan,
            effective_from: self.from,
            effective_until: self.until,
            bands,
        };
        [
            table(PlanId::V1, RateBands::Flat { rate: self.v1 }),
            table(
                PlanId::V2,
                RateBands::TwoBand {
                    day: self.v2.0,
                    night: self.v2.1,
                },
            ),
            table(
                PlanId::V4,
                RateBands::TwoBand {
                    day: self.v4.0,
                    night: self.v4.1,
                },
            ),
            table(
                PlanId::V5,
                RateBands::FourBand {
                    day: self.v5.0,
                    day_peak: self.v5.1,
                    night: self.v5.2,
                    weekend_peak: self.v5.3,
                },
            ),
        ]
    }
}

/// Rate tables of V1, V2, V4 and V5, three price list versions
pub fn default_tariffs() -> Vec<TariffTable> {
    let lists = [
        PriceList {
            from: date(2023, 1, 1),
            until: Some(date(2023, 12, 31)),
            v1: 0.0865,
            v2: (0.1042, 0.0606),
            v4: (0.0443, 0.0252),
            v5: (0.0617, 0.0953, 0.0354, 0.0552),
        },
        PriceList {
            from: date(2024, 1, 1),
            until: Some(date(2025, 6, 30)),
            v1: 0.0942,
            v2: (0.0741, 0.0428),
            v4: (0.0450, 0.0256),
            v5: (0.0645, 0.0998, 0.0370, 0.0578),
        },
        PriceList {
            from: date(2025, 7, 1),
            until: None,
            v1: 0.0957,
            v2: (0.0753, 0.0435),
            v4: (0.0458, 0.0260),
            v5: (0.0656, 0.1014, 0.0376, 0.0588),
        },
    ];
    lists.iter().flat_map(PriceList::tables).collect()
}

/// Renewable energy charge, excise and supply-security fee by period
pub fn default_levies() -> Vec<LevyTable> {
    vec![
        LevyTable {
            effective_from: date(2023, 1, 1),
            effective_until: Some(date(2023, 12, 31)),
            levies: Levies {
                renewable_tax: 0.0149,
                excise: 0.0012,
                supply_fee: None,
                monthly_fee_per_hour: None,
            },
        },
        LevyTable {
            effective_from: date(2024, 1, 1),
            effective_until: Some(date(2025, 6, 30)),
            levies: Levies {
                renewable_tax: 0.0128,
                excise: 0.0018,
                supply_fee: None,
                monthly_fee_per_hour: None,
            },
        },
        LevyTable {
            effective_from: date(2025, 7, 1),
            effective_until: None,
            levies: Levies {
                renewable_tax: 0.0104,
                excise: 0.0026,
                supply_fee: Some(0.0094),
                monthly_fee_per_hour: None,
            },
        },
    ]
}

// Public holidays and the eves observed as holidays, 2023-2027
#[rustfmt::skip]
const HOLIDAYS: [(i32, u32, u32); 60] = [
    (2023, 1, 1), (2023, 2, 24), (2023, 4, 7), (2023, 4, 9), (2023, 5, 1), (2023, 5, 28),
    (2023, 6, 23), (2023, 6, 24), (2023, 8, 20), (2023, 12, 24), (2023, 12, 25), (2023, 12, 26),
    (2024, 1, 1), (2024, 2, 24), (2024, 3, 29), (2024, 3, 31), (2024, 5, 1), (2024, 5, 19),
    (2024, 6, 23), (2024, 6, 24), (2024, 8, 20), (2024, 12, 24), (2024, 12, 25), (2024, 12, 26),
    (2025, 1, 1), (2025, 2, 24), (2025, 4, 18), (2025, 4, 20), (2025, 5, 1), (2025, 6, 8),
    (2025, 6, 23), (2025, 6, 24), (2025, 8, 20), (2025, 12, 24), (2025, 12, 25), (2025, 12, 26),
    (2026, 1, 1), (2026, 2, 24), (2026, 4, 3), (2026, 4, 5), (2026, 5, 1), (2026, 5, 24),
    (2026, 6, 23), (2026, 6, 24), (2026, 8, 20), (2026, 12, 24), (2026, 12, 25), (2026, 12, 26),
    (2027, 1, 1), (2027, 2, 24), (2027, 3, 26), (2027, 3, 28), (2027, 5, 1), (2027, 5, 16),
    (2027, 6, 23), (2027, 6, 24), (2027, 8, 20), (2027, 12, 24), (2027, 12, 25), (2027, 12, 26),
];

pub fn default_holidays() -> Vec<NaiveDate> {
    HOLIDAYS.iter().map(|&(y, m, d)| date(y, m, d)).collect()
}
