//! Core of the itinera travel planner: stops, their persistence, the derived
//! map and list views, and itinerary import/export.

pub mod error;
pub mod estimator;
pub mod interchange;
pub mod model;
pub mod planner;
pub mod prelude;
pub mod search;
pub mod store;
pub mod views;
pub mod weather;

pub use error::Error;

/// Storage slot holding the itinerary as a JSON array.
pub const LOCATIONS_KEY: &str = "travel_planner_locations";
/// Storage slot holding the theme name.
pub const THEME_KEY: &str = "travel_planner_theme";
