//! Data model of an itinerary
//!
//! Contains the stop record, its value types and the map theme.

pub(crate) mod de;
pub mod stop;
pub mod theme;

pub use stop::{
    Activities, DEFAULT_STOP_NAME, Position, Stop, StopId, TravelMode, generate_id, synthesize_id,
};
pub use theme::Theme;
