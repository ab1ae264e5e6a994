use crate::error::{BorsihindError, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First hour of the night window (inclusive)
pub const NIGHT_START_HOUR: u32 = 22;
/// Hour the night window ends (exclusive)
pub const NIGHT_END_HOUR: u32 = 7;
/// Weekend/holiday peak window of four-band plans, `[16:00, 20:00)`
pub const WEEKEND_PEAK_START_HOUR: u32 = 16;
pub const WEEKEND_PEAK_END_HOUR: u32 = 20;
/// Weekday peak hours (hour starts) of peak-aware plans
pub const DAY_PEAK_HOURS: [u32; 7] = [9, 10, 11, 16, 17, 18, 19];

/// Distribution plans offered by the grid operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanId {
    V1,
    V2,
    V4,
    V5,
}

impl PlanId {
    /// Every supported plan, in publication order
    pub const ALL: [PlanId; 4] = [PlanId::V1, PlanId::V2, PlanId::V4, PlanId::V5];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "V1",
            Self::V2 => "V2",
            Self::V4 => "V4",
            Self::V5 => "V5",
        }
    }

    /// Human readable plan name as published ("Võrk 4")
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::V1 => "Võrk 1",
            Self::V2 => "Võrk 2",
            Self::V4 => "Võrk 4",
            Self::V5 => "Võrk 5",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = BorsihindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "V1" => Ok(Self::V1),
            "V2" => Ok(Self::V2),
            "V4" => Ok(Self::V4),
            "V5" => Ok(Self::V5),
            other => Err(BorsihindError::invalid_configuration(format!(
                "Unknown plan identifier: {}",
                other
            ))),
        }
    }
}

/// Named fee level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    Flat,
    Day,
    DayPeak,
    Night,
    WeekendPeak,
}

impl BandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Day => "day",
            Self::DayPeak => "day_peak",
            Self::Night => "night",
            Self::WeekendPeak => "weekend_peak",
        }
    }
}

/// A band together with its rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBand {
    pub kind: BandKind,
    /// EUR per kWh
    pub rate_per_unit: f64,
}

impl RateBand {
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Rate table of one plan, one variant per plan shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RateBands {
    Flat {
        rate: f64,
    },
    TwoBand {
        day: f64,
        night: f64,
    },
    ThreeBand {
        day: f64,
        peak: f64,
        night: f64,
    },
    FourBand {
        day: f64,
        day_peak: f64,
        night: f64,
        weekend_peak: f64,
    },
}

fn in_night_window(hour: u32) -> bool {
    hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR
}

fn in_weekend_peak(hour: u32) -> bool {
    hour >= WEEKEND_PEAK_START_HOUR && hour < WEEKEND_PEAK_END_HOUR
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

impl RateBands {
    /// Band in effect for a local hour start.
    ///
    /// Rules are evaluated top-down: flat plans ignore the clock, holidays and
    /// weekends are off-peak (four-band plans keep an afternoon peak there),
    /// then the night window, then weekday peak hours.
    pub fn band_at(&self, hour: u32, weekday: Weekday, is_holiday: bool) -> BandKind {
        let off_peak_day = is_holiday || is_weekend(weekday);
        match self {
            Self::Flat { .. } => BandKind::Flat,
            Self::TwoBand { .. } => {
                if off_peak_day || in_night_window(hour) {
                    BandKind::Night
                } else {
                    BandKind::Day
                }
            }
            Self::ThreeBand { .. } => {
                if off_peak_day || in_night_window(hour) {
                    BandKind::Night
                } else if DAY_PEAK_HOURS.contains(&hour) {
                    BandKind::DayPeak
                } else {
                    BandKind::Day
                }
            }
            Self::FourBand { .. } => {
                if off_peak_day {
                    if in_weekend_peak(hour) {
                        BandKind::WeekendPeak
                    } else {
                        BandKind::Night
                    }
                } else if in_night_window(hour) {
                    BandKind::Night
                } else if DAY_PEAK_HOURS.contains(&hour) {
                    BandKind::DayPeak
                } else {
                    BandKind::Day
                }
            }
        }
    }

    /// Rate of `kind`, if this shape defines it
    pub fn rate(&self, kind: BandKind) -> Option<f64> {
        match (self, kind) {
            (Self::Flat { rate }, BandKind::Flat) => Some(*rate),
            (Self::TwoBand { day, .. }, BandKind::Day) => Some(*day),
            (Self::TwoBand { night, .. }, BandKind::Night) => Some(*night),
            (Self::ThreeBand { day, .. }, BandKind::Day) => Some(*day),
            (Self::ThreeBand { peak, .. }, BandKind::DayPeak) => Some(*peak),
            (Self::ThreeBand { night, .. }, BandKind::Night) => Some(*night),
            (Self::FourBand { day, .. }, BandKind::Day) => Some(*day),
            (Self::FourBand { day_peak, .. }, BandKind::DayPeak) => Some(*day_peak),
            (Self::FourBand { night, .. }, BandKind::Night) => Some(*night),
            (Self::FourBand { weekend_peak, .. }, BandKind::WeekendPeak) => Some(*weekend_peak),
            _ => None,
        }
    }

    /// All bands of this shape with their rates
    pub fn bands(&self) -> Vec<RateBand> {
        let band = |kind, rate_per_unit| RateBand {
            kind,
            rate_per_unit,
        };
        match *self {
            Self::Flat { rate } => vec![band(BandKind::Flat, rate)],
            Self::TwoBand { day, night } => {
                vec![band(BandKind::Day, day), band(BandKind::Night, night)]
            }
            Self::ThreeBand { day, peak, night } => vec![
                band(BandKind::Day, day),
                band(BandKind::DayPeak, peak),
                band(BandKind::Night, night),
            ],
            Self::FourBand {
                day,
                day_peak,
                night,
                weekend_peak,
            } => vec![
                band(BandKind::Day, day),
                band(BandKind::DayPeak, day_peak),
                band(BandKind::Night, night),
                band(BandKind::WeekendPeak, weekend_peak),
            ],
        }
    }

    /// Shape name used in logs and configuration
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Flat { .. } => "flat",
            Self::TwoBand { .. } => "two_band",
            Self::ThreeBand { .. } => "three_band",
            Self::FourBand { .. } => "four_band",
        }
    }

    /// Rates must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for band in self.bands() {
            if !band.rate_per_unit.is_finite() || band.rate_per_unit < 0.0 {
                return Err(BorsihindError::invalid_configuration(format!(
                    "Rate for band {} must be a non-negative number, got {}",
                    band.name(),
                    band.rate_per_unit
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR: RateBands = RateBands::FourBand {
        day: 0.0656,
        day_peak: 0.1014,
        night: 0.0376,
        weekend_peak: 0.0588,
    };

    #[test]
    fn test_plan_parsing() {
        assert_eq!("v4".parse::<PlanId>().unwrap(), PlanId::V4);
        assert_eq!(" V5 ".parse::<PlanId>().unwrap(), PlanId::V5);
        assert!(matches!(
            "V3".parse::<PlanId>(),
            Err(BorsihindError::InvalidConfiguration { .. })
        ));
        assert_eq!(PlanId::V2.to_string(), "V2");
        assert_eq!(PlanId::V4.display_name(), "Võrk 4");
    }

    #[test]
    fn test_flat_ignores_clock() {
        let flat = RateBands::Flat { rate: 0.0957 };
        for hour in 0..24 {
            assert_eq!(flat.band_at(hour, Weekday::Wed, false), BandKind::Flat);
            assert_eq!(flat.band_at(hour, Weekday::Sun, true), BandKind::Flat);
        }
    }

    #[test]
    fn test_night_window_boundaries() {
        let two = RateBands::TwoBand {
            day: 0.0458,
            night: 0.026,
        };
        assert_eq!(two.band_at(22, Weekday::Tue, false), BandKind::Night);
        assert_eq!(two.band_at(21, Weekday::Tue, false), BandKind::Day);
        assert_eq!(two.band_at(6, Weekday::Tue, false), BandKind::Night);
        assert_eq!(two.band_at(7, Weekday::Tue, false), BandKind::Day);
        assert_eq!(two.band_at(0, Weekday::Tue, false), BandKind::Night);
    }

    #[test]
    fn test_four_band_weekend_peak_window() {
        assert_eq!(FOUR.band_at(15, Weekday::Sat, false), BandKind::Night);
        assert_eq!(FOUR.band_at(16, Weekday::Sat, false), BandKind::WeekendPeak);
        assert_eq!(FOUR.band_at(19, Weekday::Sun, false), BandKind::WeekendPeak);
        assert_eq!(FOUR.band_at(20, Weekday::Sun, false), BandKind::Night);
        assert_eq!(FOUR.band_at(3, Weekday::Sun, false), BandKind::Night);
        // holiday on a weekday behaves like a weekend
        assert_eq!(FOUR.band_at(17, Weekday::Wed, true), BandKind::WeekendPeak);
        assert_eq!(FOUR.band_at(10, Weekday::Wed, true), BandKind::Night);
    }

    #[test]
    fn test_four_band_weekday_peaks() {
        assert_eq!(FOUR.band_at(8, Weekday::Mon, false), BandKind::Day);
        assert_eq!(FOUR.band_at(9, Weekday::Mon, false), BandKind::DayPeak);
        assert_eq!(FOUR.band_at(11, Weekday::Mon, false), BandKind::DayPeak);
        assert_eq!(FOUR.band_at(12, Weekday::Mon, false), BandKind::Day);
        assert_eq!(FOUR.band_at(16, Weekday::Fri, false), BandKind::DayPeak);
        assert_eq!(FOUR.band_at(19, Weekday::Fri, false), BandKind::DayPeak);
        assert_eq!(FOUR.band_at(20, Weekday::Fri, false), BandKind::Day);
        assert_eq!(FOUR.band_at(22, Weekday::Fri, false), BandKind::Night);
    }

    #[test]
    fn test_every_resolved_band_has_a_rate() {
        let shapes = [
            RateBands::Flat { rate: 0.1 },
            RateBands::TwoBand {
                day: 0.2,
                night: 0.1,
            },
            RateBands::ThreeBand {
                day: 0.2,
                peak: 0.3,
                night: 0.1,
            },
            FOUR,
        ];
        for shape in &shapes {
            for hour in 0..24 {
                for weekday in [Weekday::Mon, Weekday::Sat] {
                    for holiday in [false, true] {
                        let kind = shape.band_at(hour, weekday, holiday);
                        assert!(shape.rate(kind).is_some(), "{} {:?}", shape.shape(), kind);
                    }
                }
            }
        }
    }

    #[test]
    fn test_validate_rejects_negative_rates() {
        let negative = RateBands::TwoBand {
            day: 0.04,
            night: -0.01,
        };
        assert!(negative.validate().is_err());
        assert!(RateBands::Flat { rate: f64::NAN }.validate().is_err());
        assert!(FOUR.validate().is_ok());
    }

    #[test]
    fn test_yaml_shape_tag() {
        let yaml = "shape: two_band\nday: 0.0458\nnight: 0.026\n";
        let bands: RateBands = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            bands,
            RateBands::TwoBand {
                day: 0.0458,
                night: 0.026
            }
        );
    }
}
