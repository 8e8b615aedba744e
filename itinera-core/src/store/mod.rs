//! Itinerary state and its persistence
//!
//! `Itinerary` holds the ordered stops and the pure sequence operations,
//! `ItineraryStore` wraps it with load/save against a `KeyValueStore`.

mod itinerary;
mod itinerary_store;
mod persistence;

pub use itinerary::Itinerary;
pub use itinerary_store::ItineraryStore;
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
