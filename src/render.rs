//! Plain-text rendering of the derived views.

use std::fmt::Write as _;

use itinera_core::views::{ListLayer, MapLayer, MarkerIcon, Viewport};
use itinera_core::weather::WeatherSlot;

pub fn list(list: &ListLayer) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", list.header);
    if list.is_empty() {
        out.push_str("  No stops yet. Add one with `itinera add --lat <LAT> --lng <LNG>`.\n");
        return out;
    }

    for card in &list.cards {
        let marker = match card.number {
            Some(number) => format!("{number:>3}."),
            None => "  -".to_string(),
        };
        let mut title = format!("{marker} {}", card.title);
        if card.disabled {
            title.push_str(" (disabled)");
        }
        if let weather @ WeatherSlot::Ready { .. } = card.weather {
            let _ = write!(title, "  [{weather}]");
        }
        let _ = writeln!(out, "{title}");
        let _ = writeln!(
            out,
            "     id {}  at {:.4}, {:.4}",
            card.stop_id, card.position.lat, card.position.lng
        );

        for row in card.meta.iter().chain(&card.details) {
            let _ = writeln!(out, "     {}", row.text);
        }
        if let Some(fact) = &card.fun_fact {
            let _ = writeln!(out, "     Fun fact: {fact}");
        }
    }
    out
}

pub fn map(map: &MapLayer, viewport: Viewport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Map ({} theme) centered at {:.4}, {:.4}, zoom {}",
        map.theme, viewport.center.lat, viewport.center.lng, viewport.zoom
    );

    for marker in &map.markers {
        let label = match marker.icon {
            MarkerIcon::Numbered { number } => format!("#{number}"),
            MarkerIcon::Disabled => "off".to_string(),
        };
        let _ = writeln!(
            out,
            "  [{label:>3}] {} ({:.4}, {:.4})",
            marker.popup.title, marker.position.lat, marker.position.lng
        );
        for line in &marker.popup.lines {
            let _ = writeln!(out, "        {}: {}", line.label, line.text);
        }
        if let Some(placeholder) = marker.popup.placeholder {
            let _ = writeln!(out, "        {placeholder}");
        }
    }

    match &map.path {
        Some(path) => {
            let _ = writeln!(
                out,
                "  Path through {} stops ({})",
                path.positions.len(),
                path.color
            );
        }
        None => out.push_str("  No path: fewer than two enabled stops\n"),
    }

    for label in &map.time_labels {
        let mode = label.mode.map(|m| format!(" by {m}")).unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}{mode} at ({:.4}, {:.4})",
            label.text, label.position.lat, label.position.lng
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinera_core::model::{Position, Stop, Theme, TravelMode};
    use itinera_core::views::{DEFAULT_VIEWPORT, Views};

    fn views() -> Views {
        let mut stops = vec![
            Stop::new(Position { lat: 38.7223, lng: -9.1393 })
                .with_id("1")
                .with_name("Lisbon"),
            Stop::new(Position { lat: 41.1579, lng: -8.6291 })
                .with_id("2")
                .with_name("Porto"),
            Stop::new(Position { lat: 37.0194, lng: -7.9304 })
                .with_id("3")
                .with_name("Faro"),
        ];
        stops[0].activities.morning = "Tram 28".to_string();
        stops[1].travel_mode = Some(TravelMode::Car);
        stops[2].disabled = true;
        Views::build(&stops, Theme::Dark)
    }

    #[test]
    fn test_list_text() {
        let text = list(&views().list);
        assert!(text.starts_with("3 Stops\n"));
        assert!(text.contains("  1. Lisbon\n"));
        assert!(text.contains("  2. Porto\n"));
        assert!(text.contains("  - Faro (disabled)\n"));
        assert!(text.contains("     Tram 28\n"));
    }

    #[test]
    fn test_empty_list_hint() {
        let empty = Views::build(&[], Theme::Dark);
        assert!(list(&empty.list).contains("No stops yet"));
    }

    #[test]
    fn test_map_text() {
        let text = map(&views().map, DEFAULT_VIEWPORT);
        assert!(text.starts_with("Map (dark theme) centered at 48.8566, 2.3522, zoom 5\n"));
        assert!(text.contains("[ #1] Lisbon"));
        assert!(text.contains("[off] Faro"));
        assert!(text.contains("Morning: Tram 28"));
        assert!(text.contains("[ #2] Porto (41.1579, -8.6291)\n        No activities set\n"));
        assert!(text.contains("Path through 2 stops (#00d2ff)"));
        assert!(text.contains(" by car at "));
    }
}
