//! Weather condition buckets for the card weather badge
//!
//! The weather lookup itself happens outside the core; this module only maps
//! what it returns (temperature and WMO weather code) onto what a card shows.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Showers,
    Thunderstorm,
    /// Any code outside the buckets above
    Cloudy,
}

impl WeatherCondition {
    /// Maps a WMO weather interpretation code.
    pub fn from_wmo_code(code: u16) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            1..=3 => WeatherCondition::PartlyCloudy,
            45 | 48 => WeatherCondition::Fog,
            51 | 53 | 55 => WeatherCondition::Drizzle,
            61 | 63 | 65 => WeatherCondition::Rain,
            71 | 73 | 75 => WeatherCondition::Snow,
            80..=82 => WeatherCondition::Showers,
            95 | 96 | 99 => WeatherCondition::Thunderstorm,
            _ => WeatherCondition::Cloudy,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::PartlyCloudy => "partly cloudy",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Drizzle => "drizzle",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Showers => "showers",
            WeatherCondition::Thunderstorm => "thunderstorm",
            WeatherCondition::Cloudy => "cloudy",
        }
    }
}

/// Current conditions as reported by a weather service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Degrees Celsius
    pub temperature: f64,
    pub weather_code: u16,
}

/// Weather badge state of a list card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum WeatherSlot {
    /// Lookup not answered yet
    #[default]
    Pending,
    Ready {
        condition: WeatherCondition,
        temperature_c: i64,
    },
    /// Lookup failed; the badge is not shown
    Hidden,
}

impl From<WeatherReport> for WeatherSlot {
    #[allow(clippy::cast_possible_truncation)]
    fn from(report: WeatherReport) -> Self {
        WeatherSlot::Ready {
            condition: WeatherCondition::from_wmo_code(report.weather_code),
            temperature_c: report.temperature.round() as i64,
        }
    }
}

impl fmt::Display for WeatherSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherSlot::Pending => f.write_str("…"),
            WeatherSlot::Ready {
                condition,
                temperature_c,
            } => write!(f, "{temperature_c}°C {}", condition.label()),
            WeatherSlot::Hidden => Ok(()),
        }
    }
}
