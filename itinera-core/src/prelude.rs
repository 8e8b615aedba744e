pub use crate::{Error, LOCATIONS_KEY, THEME_KEY};

// Re-export key components
pub use crate::estimator::{distance_km, estimate_leg, estimate_travel_time};
pub use crate::interchange::{Decoded, ExportFile, InterchangeFormat};
pub use crate::planner::{Command, Confirm, Outcome, Planner};
pub use crate::search::{GeocodeMatch, Generation, SearchSequencer};
pub use crate::store::{FileStore, Itinerary, ItineraryStore, KeyValueStore, MemoryStore};
pub use crate::views::{Card, ListLayer, MapLayer, Marker, MarkerIcon, Viewport, Views};
pub use crate::weather::{WeatherCondition, WeatherReport, WeatherSlot};

// Stop record and its value types
pub use crate::model::{Activities, Position, Stop, StopId, Theme, TravelMode};
