//! Stop record and its value types

use std::fmt;

use chrono::Utc;
use geo::Point;
use serde::{Deserialize, Serialize};

use super::de;
use crate::Error;

/// Name shown for stops saved without one.
pub const DEFAULT_STOP_NAME: &str = "Unnamed Location";

pub type StopId = String;

/// Geographic position in degrees.
///
/// Serialized flat as `lat` / `lng`, the way stops are stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    /// Creates a position, rejecting out-of-range or non-finite coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, Error> {
        let position = Self { lat, lng };
        position.validate()?;
        Ok(position)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidPosition {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

impl From<Position> for Point<f64> {
    fn from(position: Position) -> Self {
        Point::new(position.lng, position.lat)
    }
}

impl From<Point<f64>> for Position {
    fn from(point: Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lng: point.x(),
        }
    }
}

/// How the traveller reaches a stop from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    Biking,
    Car,
    Boat,
    Plane,
}

impl TravelMode {
    pub const ALL: [TravelMode; 5] = [
        TravelMode::Walking,
        TravelMode::Biking,
        TravelMode::Car,
        TravelMode::Boat,
        TravelMode::Plane,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Biking => "biking",
            TravelMode::Car => "car",
            TravelMode::Boat => "boat",
            TravelMode::Plane => "plane",
        }
    }

    /// Case-sensitive, matching the stored spelling.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == value)
    }

    /// Average speed in km/h.
    pub fn speed_kmh(self) -> f64 {
        match self {
            TravelMode::Walking => 5.0,
            TravelMode::Biking => 15.0,
            TravelMode::Car => 40.0,
            TravelMode::Boat => 30.0,
            TravelMode::Plane => 500.0,
        }
    }

    /// Icon class used on map time labels.
    pub fn icon(self) -> &'static str {
        match self {
            TravelMode::Walking => "fa-solid fa-person-walking",
            TravelMode::Biking => "fa-solid fa-person-biking",
            TravelMode::Car => "fa-solid fa-car",
            TravelMode::Boat => "fa-solid fa-sailboat",
            TravelMode::Plane => "fa-solid fa-plane",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activities {
    #[serde(default, deserialize_with = "de::nullable")]
    pub morning: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub afternoon: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub all_day: String,
}

impl Activities {
    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty() && self.all_day.is_empty()
    }
}

/// One itinerary entry.
///
/// Free-text fields use the empty string for "not set". `travel_time` is a
/// manual override for the leg arriving at this stop; when empty the leg
/// time is estimated from `travel_mode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default, deserialize_with = "de::nullable")]
    pub id: StopId,
    #[serde(flatten)]
    pub position: Position,
    #[serde(default = "de::default_name", deserialize_with = "de::stop_name")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub image_url: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub travel_time: String,
    #[serde(
        default,
        deserialize_with = "de::travel_mode",
        skip_serializing_if = "Option::is_none"
    )]
    pub travel_mode: Option<TravelMode>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub place_to_stay: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub activities: Activities,
    #[serde(default, deserialize_with = "de::nullable")]
    pub kids_activity: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub food_options: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub fun_fact: String,
    #[serde(default, deserialize_with = "de::bool_like")]
    pub disabled: bool,
}

impl Stop {
    /// A stop with only a position, e.g. from a map click.
    pub fn new(position: Position) -> Self {
        Self {
            id: StopId::new(),
            position,
            name: DEFAULT_STOP_NAME.to_string(),
            image_url: String::new(),
            travel_time: String::new(),
            travel_mode: None,
            place_to_stay: String::new(),
            activities: Activities::default(),
            kids_activity: String::new(),
            food_options: String::new(),
            fun_fact: String::new(),
            disabled: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<StopId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Manual travel time, if one was entered.
    pub fn manual_travel_time(&self) -> Option<&str> {
        let trimmed = self.travel_time.trim();
        (!trimmed.is_empty()).then_some(self.travel_time.as_str())
    }

    /// Fills the fields a stored record may legitimately omit.
    pub(crate) fn normalize(&mut self) {
        if self.name.is_empty() {
            self.name = DEFAULT_STOP_NAME.to_string();
        }
    }
}

/// Id for a stop created interactively: milliseconds since the epoch.
pub fn generate_id() -> StopId {
    Utc::now().timestamp_millis().to_string()
}

/// Id for an imported record that came without one.
pub fn synthesize_id() -> StopId {
    format!("{}-{:08x}", generate_id(), rand::random::<u32>())
}
