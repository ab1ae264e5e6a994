use borsihind::aggregate::PriceAggregator;
use borsihind::config::Config;
use borsihind::normalize::{PriceScale, round_price};
use borsihind::pipeline::Pipeline;
use borsihind::tariff::PlanId;
use borsihind::types::{Interval, PriceObservation};
use borsihind::{BorsihindError, PriceNormalizer, TariffCalculator};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

fn pipeline() -> Pipeline {
    Pipeline::from_config(&Config::default()).unwrap()
}

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap()
}

fn hours_from(start: DateTime<Utc>, count: i64) -> Vec<PriceObservation> {
    (0..count)
        .map(|h| PriceObservation::new(start + Duration::hours(h), 40.0, Interval::Minutes60))
        .collect()
}

#[test]
fn sunday_night_breakdown() {
    // Sunday 2025-07-06 03:00 local
    let obs = PriceObservation::new(utc(2025, 7, 6, 0), 50.0, Interval::Minutes60);
    let records = pipeline().normalize(&[obs], PlanId::V4).unwrap();
    let record = &records[0];

    assert_eq!((record.year, record.month, record.day), (2025, 7, 6));
    assert_eq!((record.hour, record.minute), (3, 0));
    assert_eq!(record.grid_fee, 0.026);
    assert_eq!(record.energy_price, round_price(50.0 * 1.24 / 1000.0));
    assert_eq!(record.renewable_tax, 0.0104);
    assert_eq!(record.excise, 0.0026);
    assert_eq!(record.supply_fee, Some(0.0094));
    assert_eq!(record.total(), 0.1104);
}

#[test]
fn older_levies_have_no_supply_fee() {
    // Tuesday 2024-03-12 12:00 local (UTC+2)
    let obs = PriceObservation::new(utc(2024, 3, 12, 10), 100.0, Interval::Minutes60);
    let record = &pipeline().normalize(&[obs], PlanId::V2).unwrap()[0];
    assert_eq!(record.hour, 12);
    assert_eq!(record.grid_fee, 0.0741);
    assert_eq!(record.renewable_tax, 0.0128);
    assert_eq!(record.excise, 0.0018);
    assert_eq!(record.supply_fee, None);
    assert_eq!(record.energy_price, 0.124);
}

#[test]
fn negative_prices_round_half_away_from_zero() {
    let scale = PriceScale::default();
    assert_eq!(scale.apply(-5.0), -0.0062);
    assert_eq!(round_price(round_price(-0.00625)), round_price(-0.00625));
}

#[test]
fn quarter_hours_to_hourly_records() {
    let quarters = quarters_from(utc(2025, 7, 9, 9), &[10.0, 20.0, 30.0, 40.0]);
    let hourly = aggregator().aggregate_hourly(&quarters).unwrap();
    assert_eq!(hourly.len(), 1);
    assert_eq!(hourly[0].raw_price, 25.0);

    let records = pipeline().normalize(&hourly, PlanId::V5).unwrap();
    assert_eq!(records[0].hour, 12);
    assert_eq!(records[0].minute, 0);
    assert_eq!(records[0].energy_price, 0.031);
    assert_eq!(records[0].grid_fee, 0.0656);
}

fn aggregator() -> PriceAggregator {
    PriceAggregator::new(Config::default().converter().unwrap())
}

fn quarters_from(start: DateTime<Utc>, prices: &[f64]) -> Vec<PriceObservation> {
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let instant = start + Duration::minutes(15 * i as i64);
            PriceObservation::new(instant, *p, Interval::Minutes15)
        })
        .collect()
}

#[test]
fn extreme_prices_stay_finite_through_the_stages() {
    let quarters = quarters_from(utc(2025, 7, 9, 9), &[1e308; 4]);
    let hourly = aggregator().aggregate_hourly(&quarters).unwrap();
    assert_eq!(hourly[0].raw_price, 1e308);

    let records = pipeline().normalize(&hourly, PlanId::V1).unwrap();
    assert!(records[0].energy_price.is_finite());
    assert!(records[0].total().is_finite());
}

#[test]
fn price_overflowing_the_scale_is_rejected() {
    let scale = PriceScale {
        scale_factor: 1e10,
        unit_divisor: 1e-300,
    };
    let config = Config::default();
    let registry = Arc::new(config.tariff_registry().unwrap());
    let normalizer = PriceNormalizer::new(
        config.converter().unwrap(),
        Arc::new(config.holiday_calendar()),
        TariffCalculator::new(registry),
    );
    let levies = config.levy_schedule().unwrap();
    let obs = PriceObservation::new(utc(2025, 7, 9, 9), 1e10, Interval::Minutes60);
    let err = normalizer
        .normalize(&[obs], PlanId::V1, &scale, &levies)
        .unwrap_err();
    assert!(matches!(err, BorsihindError::InvalidObservation { .. }));
}

#[test]
fn dst_days_keep_local_hours() {
    // Spring forward on 2025-03-30: 03:00 local does not exist
    let spring = hours_from(utc(2025, 3, 29, 23), 4);
    let hours: Vec<u32> = pipeline()
        .normalize(&spring, PlanId::V1)
        .unwrap()
        .iter()
        .map(|r| r.hour)
        .collect();
    assert_eq!(hours, vec![1, 2, 4, 5]);

    // Fall back on 2025-10-26: 03:00 local occurs twice
    let autumn = hours_from(utc(2025, 10, 25, 23), 3);
    let hours: Vec<u32> = pipeline()
        .normalize(&autumn, PlanId::V1)
        .unwrap()
        .iter()
        .map(|r| r.hour)
        .collect();
    assert_eq!(hours, vec![2, 3, 3]);
}
