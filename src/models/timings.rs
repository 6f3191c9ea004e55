use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Moonsighting Committee Worldwide.
pub const DEFAULT_METHOD: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Sunset,
    Maghrib,
    Isha,
    Imsak,
    Midnight,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 9] {
        [
            PrayerName::Fajr,
            PrayerName::Sunrise,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Sunset,
            PrayerName::Maghrib,
            PrayerName::Isha,
            PrayerName::Imsak,
            PrayerName::Midnight,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Sunrise => "Sunrise",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Sunset => "Sunset",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
            PrayerName::Imsak => "Imsak",
            PrayerName::Midnight => "Midnight",
        }
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One day's timings exactly as the calendar API returned them.
/// The strings are not reparsed; some upstream values carry a zone suffix
/// such as `"05:02 (PKT)"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimingsRecord {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub sunset: String,
    pub maghrib: String,
    pub isha: String,
    pub imsak: String,
    pub midnight: String,
}

impl TimingsRecord {
    pub fn get(&self, name: PrayerName) -> &str {
        match name {
            PrayerName::Fajr => &self.fajr,
            PrayerName::Sunrise => &self.sunrise,
            PrayerName::Dhuhr => &self.dhuhr,
            PrayerName::Asr => &self.asr,
            PrayerName::Sunset => &self.sunset,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isha => &self.isha,
            PrayerName::Imsak => &self.imsak,
            PrayerName::Midnight => &self.midnight,
        }
    }

    /// All nine entries in display order.
    pub fn entries(&self) -> Vec<(PrayerName, &str)> {
        PrayerName::all()
            .into_iter()
            .map(|name| (name, self.get(name)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinatesError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuneParseError {
    #[error("expected 8 tuning offsets, got {0}")]
    Count(usize),
    #[error("'{0}' is not a whole number of minutes")]
    Offset(String),
}

/// Minute adjustments applied upstream, in the API's field order:
/// Imsak, Fajr, Sunrise, Dhuhr, Asr, Maghrib, Sunset, Isha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuneOffsets([i32; 8]);

impl Default for TuneOffsets {
    fn default() -> Self {
        Self([0, 2, 0, 5, 1, 3, 0, -1])
    }
}

impl fmt::Display for TuneOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl FromStr for TuneOffsets {
    type Err = TuneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 8 {
            return Err(TuneParseError::Count(parts.len()));
        }
        let mut offsets = [0i32; 8];
        for (slot, part) in offsets.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| TuneParseError::Offset(part.to_string()))?;
        }
        Ok(Self(offsets))
    }
}

impl Serialize for TuneOffsets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TuneOffsets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
