use borsihind::error::BorsihindError;

#[test]
fn error_constructors_core() {
    assert!(matches!(
        BorsihindError::invalid_configuration("x"),
        BorsihindError::InvalidConfiguration { .. }
    ));
    assert!(matches!(
        BorsihindError::missing_tariff_data("x"),
        BorsihindError::MissingTariffData { .. }
    ));
    assert!(matches!(
        BorsihindError::invalid_observation("x"),
        BorsihindError::InvalidObservation { .. }
    ));
}

#[test]
fn error_constructors_adapters() {
    assert!(matches!(BorsihindError::config("x"), BorsihindError::Config { .. }));
    let ser = BorsihindError::Serialization {
        message: "s".into(),
    };
    assert!(matches!(ser, BorsihindError::Serialization { .. }));
    assert!(matches!(BorsihindError::io("x"), BorsihindError::Io { .. }));
    assert!(matches!(BorsihindError::feed("x"), BorsihindError::Feed { .. }));
    assert!(matches!(BorsihindError::task("x"), BorsihindError::Task { .. }));
    assert!(matches!(
        BorsihindError::validation("f", "m"),
        BorsihindError::Validation { .. }
    ));
}

#[test]
fn conversions() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(BorsihindError::from(io), BorsihindError::Io { .. }));

    let json = serde_json::from_str::<u32>("nope").unwrap_err();
    assert!(matches!(
        BorsihindError::from(json),
        BorsihindError::Serialization { .. }
    ));

    let parse = "not a date".parse::<chrono::NaiveDate>().unwrap_err();
    assert!(matches!(
        BorsihindError::from(parse),
        BorsihindError::Validation { .. }
    ));
}

#[test]
fn display_messages() {
    let e = BorsihindError::validation("field", "bad");
    let s = format!("{}", e);
    assert!(s.contains("Validation error"));

    let e = BorsihindError::missing_tariff_data("V4 on 2019-01-01");
    assert_eq!(format!("{}", e), "Missing tariff data: V4 on 2019-01-01");
}
