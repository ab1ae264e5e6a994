use borsihind::config::Config;
use borsihind::tariff::{BandKind, PlanId, TariffCalculator};
use borsihind::timezone::TimeZoneConverter;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::sync::Arc;

fn calculator(config: &Config) -> TariffCalculator {
    TariffCalculator::new(Arc::new(config.tariff_registry().unwrap()))
}

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap()
}

fn local_midnight(converter: &TimeZoneConverter, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap();
    converter
        .zone()
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn every_holiday_hour_is_night_for_two_band_plans() {
    let config = Config::default();
    let converter = config.converter().unwrap();
    let calendar = config.holiday_calendar();
    let calculator = calculator(&config);

    for holiday in &config.holidays {
        let mut instant = local_midnight(&converter, *holiday);
        let end = local_midnight(&converter, *holiday + Duration::days(1));
        while instant < end {
            let local = converter.to_local(instant);
            assert_eq!(local.date, *holiday);
            assert!(calendar.is_holiday(local.date));
            for plan in [PlanId::V2, PlanId::V4] {
                let band = calculator.band_for(&local, true, plan).unwrap();
                assert_eq!(band.kind, BandKind::Night, "{} {}", plan, local.hour);
            }
            instant += Duration::hours(1);
        }
    }
}

#[test]
fn holiday_wednesday_differs_from_plain_wednesday() {
    let config = Config::default();
    let converter = config.converter().unwrap();
    let calendar = config.holiday_calendar();
    let calculator = calculator(&config);

    // 12:00 local on 2025-08-20 (holiday) and 2025-08-27, both Wednesdays
    let holiday = converter.to_local(utc(2025, 8, 20, 9));
    let plain = converter.to_local(utc(2025, 8, 27, 9));
    assert_eq!(holiday.weekday, plain.weekday);

    let on_holiday = calculator
        .fee_for(&holiday, calendar.is_holiday(holiday.date), PlanId::V4)
        .unwrap();
    let on_weekday = calculator
        .fee_for(&plain, calendar.is_holiday(plain.date), PlanId::V4)
        .unwrap();
    assert_eq!(on_holiday, 0.026);
    assert_eq!(on_weekday, 0.0458);
}

#[test]
fn calendar_horizon() {
    let calendar = Config::default().holiday_calendar();
    let next_year = NaiveDate::from_ymd_opt(2028, 1, 1).unwrap();
    assert_eq!(calendar.horizon(), Some(2027));
    assert!(calendar.is_beyond_horizon(next_year));
    // Outside the horizon nothing is a holiday
    assert!(!calendar.is_holiday(next_year));
    assert_eq!(calendar.dates_in_year(2026).len(), 12);
}
