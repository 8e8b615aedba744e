//! Derived views of the itinerary
//!
//! Both layers are rebuilt from scratch after every mutation. Building twice
//! from the same itinerary and theme gives identical output.

mod list_layer;
mod map_geojson;
mod map_layer;

pub use list_layer::{Card, CardRow, DEFAULT_CARD_IMAGE, ListLayer};
pub use map_layer::{
    DEFAULT_VIEWPORT, MapLayer, Marker, MarkerIcon, PathLine, Popup, PopupLine, TimeLabel,
    Viewport,
};

use serde::Serialize;

use crate::model::{Stop, Theme};

/// Both render-ready projections of one itinerary state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    pub map: MapLayer,
    pub list: ListLayer,
}

impl Views {
    pub fn build(stops: &[Stop], theme: Theme) -> Self {
        let numbers = sequence_numbers(stops);
        Self {
            map: MapLayer::build(stops, &numbers, theme),
            list: ListLayer::build(stops, &numbers),
        }
    }
}

/// 1-based position of each stop among enabled stops; `None` for disabled ones.
pub fn sequence_numbers(stops: &[Stop]) -> Vec<Option<usize>> {
    let mut next = 0;
    stops
        .iter()
        .map(|stop| {
            stop.is_enabled().then(|| {
                next += 1;
                next
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn stops(disabled: &[bool]) -> Vec<Stop> {
        disabled
            .iter()
            .enumerate()
            .map(|(i, &disabled)| {
                let mut stop = Stop::new(Position {
                    lat: i as f64,
                    lng: i as f64,
                })
                .with_id(format!("s{i}"));
                stop.disabled = disabled;
                stop
            })
            .collect()
    }

    #[test]
    fn test_numbering_skips_disabled() {
        assert!(sequence_numbers(&[]).is_empty());
        assert_eq!(sequence_numbers(&stops(&[true])), [None]);
        assert_eq!(
            sequence_numbers(&stops(&[false, true, false, true, true, false])),
            [Some(1), None, Some(2), None, None, Some(3)]
        );
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let stops = stops(&[false, true, false]);
        let first = serde_json::to_string(&Views::build(&stops, Theme::Light)).unwrap();
        let second = serde_json::to_string(&Views::build(&stops, Theme::Light)).unwrap();
        assert_eq!(first, second);
    }
}
