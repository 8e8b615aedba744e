use geo::{Centroid, Line, Point};
use itertools::Itertools;
use serde::Serialize;

use crate::estimator::estimate_leg;
use crate::model::{Position, Stop, StopId, Theme, TravelMode};

/// Draw priority of numbered markers.
const ENABLED_Z: i32 = 1000;
/// Draw priority of disabled markers, below every numbered one.
const DISABLED_Z: i32 = 0;

/// Zoom used when focusing a single stop.
pub const FOCUS_ZOOM: u8 = 10;

/// Map viewport before the user moves it.
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    center: Position {
        lat: 48.8566,
        lng: 2.3522,
    },
    zoom: 5,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Position,
    pub zoom: u8,
}

impl Viewport {
    /// Viewport centered on a stop, e.g. after its card was clicked.
    pub fn focus(stop: &Stop) -> Self {
        Self {
            center: stop.position,
            zoom: FOCUS_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub theme: Theme,
    pub markers: Vec<Marker>,
    /// Present only with at least two enabled stops
    pub path: Option<PathLine>,
    pub time_labels: Vec<TimeLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub stop_id: StopId,
    pub position: Position,
    pub icon: MarkerIcon,
    pub popup: Popup,
    pub z_priority: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkerIcon {
    Numbered { number: usize },
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<PopupLine>,
    /// Shown instead of `lines` when the stop has no activities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupLine {
    pub label: &'static str,
    pub text: String,
}

/// Dashed line through the enabled stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLine {
    pub positions: Vec<Position>,
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    pub dash_array: &'static str,
    pub line_cap: &'static str,
}

/// Travel time shown halfway along a leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeLabel {
    pub position: Position,
    pub text: String,
    pub mode: Option<TravelMode>,
    pub icon: Option<&'static str>,
    pub color: &'static str,
}

impl MapLayer {
    /// `numbers` holds the enabled-only sequence number of each stop.
    pub(super) fn build(stops: &[Stop], numbers: &[Option<usize>], theme: Theme) -> Self {
        let markers = stops
            .iter()
            .zip(numbers)
            .map(|(stop, number)| Marker::new(stop, *number))
            .collect();

        let active: Vec<&Stop> = stops.iter().filter(|stop| stop.is_enabled()).collect();

        let path = (active.len() > 1).then(|| PathLine {
            positions: active.iter().map(|stop| stop.position).collect(),
            color: theme.line_color(),
            weight: 3,
            opacity: 0.7,
            dash_array: "10, 10",
            line_cap: "round",
        });

        let time_labels = active
            .iter()
            .tuple_windows()
            .filter_map(|(prev, next)| TimeLabel::for_leg(prev, next, theme))
            .collect();

        Self {
            theme,
            markers,
            path,
            time_labels,
        }
    }
}

impl Marker {
    fn new(stop: &Stop, number: Option<usize>) -> Self {
        let (icon, z_priority) = match number {
            Some(number) => (MarkerIcon::Numbered { number }, ENABLED_Z),
            None => (MarkerIcon::Disabled, DISABLED_Z),
        };
        Self {
            stop_id: stop.id.clone(),
            position: stop.position,
            icon,
            popup: Popup::new(stop),
            z_priority,
        }
    }
}

impl Popup {
    /// Placeholder line for a stop without activities.
    pub const NO_ACTIVITIES: &'static str = "No activities set";

    fn new(stop: &Stop) -> Self {
        let activities = &stop.activities;
        let lines: Vec<PopupLine> = [
            ("All Day", &activities.all_day),
            ("Morning", &activities.morning),
            ("Afternoon", &activities.afternoon),
        ]
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(label, text)| PopupLine {
            label,
            text: text.clone(),
        })
        .collect();

        let placeholder = lines.is_empty().then_some(Self::NO_ACTIVITIES);
        Self {
            title: stop.name.clone(),
            lines,
            placeholder,
        }
    }
}

impl TimeLabel {
    /// Label for the leg `prev -> next`: the manual travel time of `next`,
    /// else an estimate when `next` has a travel mode, else nothing.
    fn for_leg(prev: &Stop, next: &Stop, theme: Theme) -> Option<Self> {
        let text = match (next.manual_travel_time(), next.travel_mode) {
            (Some(manual), _) => manual.to_string(),
            (None, Some(mode)) => estimate_leg(prev.position, next.position, Some(mode)),
            (None, None) => return None,
        };

        let midpoint = Line::new(Point::from(prev.position), Point::from(next.position)).centroid();

        Some(Self {
            position: midpoint.into(),
            text,
            mode: next.travel_mode,
            icon: next.travel_mode.map(TravelMode::icon),
            color: theme.text_color(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{Views, sequence_numbers};

    fn stop(id: &str, lat: f64, lng: f64) -> Stop {
        Stop::new(Position { lat, lng }).with_id(id).with_name(id)
    }

    fn layer(stops: &[Stop], theme: Theme) -> MapLayer {
        MapLayer::build(stops, &sequence_numbers(stops), theme)
    }

    #[test]
    fn test_empty_and_single_stop_have_no_path() {
        let empty = layer(&[], Theme::Dark);
        assert!(empty.markers.is_empty());
        assert!(empty.path.is_none());

        let single = layer(&[stop("a", 1.0, 1.0)], Theme::Dark);
        assert_eq!(single.markers.len(), 1);
        assert!(single.path.is_none());
        assert!(single.time_labels.is_empty());
    }

    #[test]
    fn test_disabled_stops_leave_path_and_numbering() {
        let mut stops = vec![
            stop("a", 0.0, 0.0),
            stop("b", 1.0, 1.0),
            stop("c", 2.0, 2.0),
            stop("d", 3.0, 3.0),
        ];
        stops[1].disabled = true;
        stops[3].disabled = true;

        let map = layer(&stops, Theme::Dark);
        let icons: Vec<_> = map.markers.iter().map(|m| m.icon).collect();
        assert_eq!(
            icons,
            [
                MarkerIcon::Numbered { number: 1 },
                MarkerIcon::Disabled,
                MarkerIcon::Numbered { number: 2 },
                MarkerIcon::Disabled,
            ]
        );
        assert!(map.markers[1].z_priority < map.markers[0].z_priority);

        let path = map.path.unwrap();
        assert_eq!(
            path.positions,
            [stops[0].position, stops[2].position]
        );
        assert_eq!(path.color, "#00d2ff");
    }

    #[test]
    fn test_all_disabled_has_no_path() {
        let mut stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0)];
        for stop in &mut stops {
            stop.disabled = true;
        }
        let map = layer(&stops, Theme::Light);
        assert!(map.path.is_none());
        assert!(map.markers.iter().all(|m| m.icon == MarkerIcon::Disabled));
    }

    #[test]
    fn test_time_label_sources() {
        let mut stops = vec![
            stop("a", 0.0, 0.0),
            stop("b", 0.0, 2.0),
            stop("c", 2.0, 2.0),
            stop("d", 4.0, 2.0),
        ];
        // b: manual time wins over mode
        stops[1].travel_time = "3h ferry".to_string();
        stops[1].travel_mode = Some(TravelMode::Boat);
        // c: estimate from mode
        stops[2].travel_mode = Some(TravelMode::Plane);
        // d: nothing set, no label

        let map = layer(&stops, Theme::Light);
        assert_eq!(map.time_labels.len(), 2);

        let ferry = &map.time_labels[0];
        assert_eq!(ferry.text, "3h ferry");
        assert_eq!(ferry.position, Position { lat: 0.0, lng: 1.0 });
        assert_eq!(ferry.icon, Some("fa-solid fa-sailboat"));
        assert_eq!(ferry.color, "#000000");

        let flight = &map.time_labels[1];
        assert_eq!(flight.text, estimate_leg(stops[1].position, stops[2].position, Some(TravelMode::Plane)));
        assert_eq!(flight.position, Position { lat: 1.0, lng: 2.0 });
    }

    #[test]
    fn test_time_labels_bridge_disabled_stops() {
        let mut stops = vec![stop("a", 0.0, 0.0), stop("b", 5.0, 5.0), stop("c", 0.0, 4.0)];
        stops[1].disabled = true;
        stops[2].travel_time = "1h".to_string();

        let map = layer(&stops, Theme::Dark);
        assert_eq!(map.time_labels.len(), 1);
        assert_eq!(map.time_labels[0].position, Position { lat: 0.0, lng: 2.0 });
        assert_eq!(map.time_labels[0].color, "#f8fafc");
    }

    #[test]
    fn test_popup_lines() {
        let mut with = stop("a", 0.0, 0.0);
        with.activities.morning = "Market".to_string();
        with.activities.all_day = "Hike".to_string();
        let popup = Popup::new(&with);
        let labels: Vec<_> = popup.lines.iter().map(|l| l.label).collect();
        assert_eq!(labels, ["All Day", "Morning"]);
        assert_eq!(popup.placeholder, None);

        let empty = Popup::new(&stop("b", 0.0, 0.0));
        assert!(empty.lines.is_empty());
        assert_eq!(empty.placeholder, Some("No activities set"));

        let map = layer(&[stop("c", 1.0, 1.0)], Theme::Light);
        assert_eq!(map.markers[0].popup.placeholder, Some("No activities set"));
    }

    #[test]
    fn test_theme_only_changes_colors() {
        let mut stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0)];
        stops[1].travel_mode = Some(TravelMode::Car);
        let dark = Views::build(&stops, Theme::Dark).map;
        let light = Views::build(&stops, Theme::Light).map;
        assert_eq!(dark.markers, light.markers);
        assert_ne!(dark.path.unwrap().color, light.path.unwrap().color);
    }

    #[test]
    fn test_focus_viewport() {
        let s = stop("a", 45.0, 7.0);
        let view = Viewport::focus(&s);
        assert_eq!(view.center, s.position);
        assert_eq!(view.zoom, FOCUS_ZOOM);
        assert_eq!(DEFAULT_VIEWPORT.zoom, 5);
    }
}
