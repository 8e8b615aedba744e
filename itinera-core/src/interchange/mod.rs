//! Export and import of itineraries
//!
//! Three interchange formats carry the same stop records:
//!
//! - plain JSON array, identical to the persisted form
//! - `GeoJSON` `FeatureCollection` with one point feature per stop
//! - KML document with one placemark per stop
//!
//! Decoding checks the top-level shape first and never touches the current
//! itinerary; applying a decoded itinerary is up to the caller.

mod feature_collection;
mod json_array;
mod kml;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::Error;
use crate::model::Stop;
use crate::store::Itinerary;

/// Base name of exported files.
pub const EXPORT_FILE_STEM: &str = "travel_planner_itinerary";

const SHAPE_HINT: &str =
    "expected a JSON array of stops, a GeoJSON FeatureCollection or a KML document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterchangeFormat {
    Json,
    GeoJson,
    Kml,
}

impl InterchangeFormat {
    pub fn extension(self) -> &'static str {
        match self {
            InterchangeFormat::Json => "json",
            InterchangeFormat::GeoJson => "geojson",
            InterchangeFormat::Kml => "kml",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            InterchangeFormat::Json => "application/json",
            InterchangeFormat::GeoJson => "application/geo+json",
            InterchangeFormat::Kml => "application/vnd.google-earth.kml+xml",
        }
    }

    pub fn file_name(self) -> String {
        format!("{EXPORT_FILE_STEM}.{}", self.extension())
    }

    /// Format a parsed JSON document is shaped as, if any.
    fn of_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Array(_) => Some(InterchangeFormat::Json),
            JsonValue::Object(object)
                if object.get("type").and_then(JsonValue::as_str) == Some("FeatureCollection")
                    && object.get("features").is_some_and(JsonValue::is_array) =>
            {
                Some(InterchangeFormat::GeoJson)
            }
            _ => None,
        }
    }
}

impl fmt::Display for InterchangeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for InterchangeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(InterchangeFormat::Json),
            "geojson" => Ok(InterchangeFormat::GeoJson),
            "kml" => Ok(InterchangeFormat::Kml),
            other => Err(Error::UnsupportedFormat(format!("unknown format {other:?}"))),
        }
    }
}

/// Encoded itinerary ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub format: InterchangeFormat,
    pub file_name: String,
    pub media_type: &'static str,
    pub contents: String,
}

/// Itinerary read from an import file, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub format: InterchangeFormat,
    pub itinerary: Itinerary,
}

/// Encodes `stops` in travel order.
pub fn encode(stops: &[Stop], format: InterchangeFormat) -> Result<ExportFile, Error> {
    let contents = match format {
        InterchangeFormat::Json => json_array::encode(stops)?,
        InterchangeFormat::GeoJson => feature_collection::encode(stops)?,
        InterchangeFormat::Kml => kml::encode(stops)?,
    };
    log::debug!("Encoded {} stops as {format}", stops.len());
    Ok(ExportFile {
        format,
        file_name: format.file_name(),
        media_type: format.media_type(),
        contents,
    })
}

/// Decodes an import file of any supported format, detected from its shape.
pub fn decode(text: &str) -> Result<Decoded, Error> {
    let text = strip_bom(text);
    if text.starts_with('<') {
        return Ok(Decoded {
            format: InterchangeFormat::Kml,
            itinerary: Itinerary::from_records(kml::decode(text)?)?,
        });
    }

    let value: JsonValue = serde_json::from_str(text)?;
    let format = InterchangeFormat::of_json(&value)
        .ok_or_else(|| Error::UnsupportedFormat(SHAPE_HINT.to_string()))?;
    decode_json(format, value)
}

/// Decodes an import file that must be in `format`.
pub fn decode_as(format: InterchangeFormat, text: &str) -> Result<Itinerary, Error> {
    let text = strip_bom(text);
    if format == InterchangeFormat::Kml {
        return Itinerary::from_records(kml::decode(text)?);
    }

    let value: JsonValue = serde_json::from_str(text)?;
    if InterchangeFormat::of_json(&value) != Some(format) {
        return Err(Error::UnsupportedFormat(format!(
            "document is not a {format} itinerary"
        )));
    }
    decode_json(format, value).map(|decoded| decoded.itinerary)
}

fn decode_json(format: InterchangeFormat, value: JsonValue) -> Result<Decoded, Error> {
    let records = match format {
        InterchangeFormat::Json => json_array::decode(value)?,
        InterchangeFormat::GeoJson => feature_collection::decode(value)?,
        InterchangeFormat::Kml => {
            return Err(Error::UnsupportedFormat(
                "KML is not a JSON document".to_string(),
            ));
        }
    };
    Ok(Decoded {
        format,
        itinerary: Itinerary::from_records(records)?,
    })
}

fn strip_bom(text: &str) -> &str {
    text.trim_start_matches('\u{feff}').trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, TravelMode};

    const ALL: [InterchangeFormat; 3] = [
        InterchangeFormat::Json,
        InterchangeFormat::GeoJson,
        InterchangeFormat::Kml,
    ];

    fn bare(id: &str, lat: f64, lng: f64) -> Stop {
        Stop::new(Position { lat, lng }).with_id(id)
    }

    fn populated(id: &str) -> Stop {
        let mut stop = bare(id, -33.8688, 151.2093).with_name("Sydney <Harbour> & \"Opera\"");
        stop.image_url = "https://example.org/img?a=1&b='2'".to_string();
        stop.travel_time = "  ~14h flight ".to_string();
        stop.travel_mode = Some(TravelMode::Plane);
        stop.place_to_stay = "Hotel Ü".to_string();
        stop.activities.morning = "Bondi\nbeach".to_string();
        stop.activities.afternoon = "Ferry to Manly".to_string();
        stop.activities.all_day = "Blue Mountains".to_string();
        stop.kids_activity = "Taronga Zoo".to_string();
        stop.food_options = "Fish & chips".to_string();
        stop.fun_fact = "It's <big>".to_string();
        stop.disabled = true;
        stop
    }

    fn fixtures() -> Vec<Vec<Stop>> {
        vec![
            vec![],
            vec![bare("1", 0.0, 0.0)],
            vec![
                bare("1700000000000", 48.8566, 2.3522).with_name("Paris"),
                populated("b"),
                bare("c", 90.0, -180.0),
                bare("d", 45.4642, 9.19),
            ],
        ]
    }

    #[test]
    fn test_roundtrip_every_format() {
        for format in ALL {
            for stops in fixtures() {
                let file = encode(&stops, format).unwrap();
                let decoded = decode(&file.contents).unwrap();
                assert_eq!(decoded.format, format);
                assert_eq!(decoded.itinerary.stops(), stops.as_slice(), "{format}");

                let strict = decode_as(format, &file.contents).unwrap();
                assert_eq!(strict.stops(), stops.as_slice(), "{format}");
            }
        }
    }

    #[test]
    fn test_unknown_shapes_are_rejected() {
        for text in [
            r#"{"type": "Feature"}"#,
            r#"{"type": "FeatureCollection"}"#,
            r#"{"stops": []}"#,
            "42",
            "\"text\"",
        ] {
            assert!(
                matches!(decode(text), Err(Error::UnsupportedFormat(_))),
                "{text} accepted"
            );
        }
    }

    #[test]
    fn test_unparsable_input_is_an_error() {
        assert!(matches!(decode("{not json"), Err(Error::JsonError(_))));
        assert!(matches!(decode("<kml><Document>"), Err(Error::KmlError(_))));
        assert!(decode("").is_err());
    }

    #[test]
    fn test_decode_as_checks_shape() {
        let file = encode(&[bare("a", 1.0, 2.0)], InterchangeFormat::GeoJson).unwrap();
        assert!(matches!(
            decode_as(InterchangeFormat::Json, &file.contents),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(decode_as(InterchangeFormat::Kml, &file.contents).is_err());
    }

    #[test]
    fn test_export_metadata() {
        let file = encode(&[], InterchangeFormat::Kml).unwrap();
        assert_eq!(file.file_name, "travel_planner_itinerary.kml");
        assert_eq!(file.media_type, "application/vnd.google-earth.kml+xml");
        assert_eq!("GeoJSON".parse::<InterchangeFormat>().unwrap(), InterchangeFormat::GeoJson);
        assert!("gpx".parse::<InterchangeFormat>().is_err());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let file = encode(&[bare("a", 1.0, 2.0)], InterchangeFormat::Json).unwrap();
        let with_bom = format!("\u{feff}{}", file.contents);
        assert_eq!(decode(&with_bom).unwrap().itinerary.len(), 1);
    }

    #[test]
    fn test_kml_records_are_validated() {
        let text = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
              <Placemark><Point><coordinates>2.35,48.85,0</coordinates></Point></Placemark>
              <Placemark><name></name><Point><coordinates>9.19,45.46,0</coordinates></Point></Placemark>
              <Placemark>
                <name>Rome</name>
                <Point><coordinates>12.5,41.9,0</coordinates></Point>
                <ExtendedData><Data name="id"><value>r</value></Data></ExtendedData>
              </Placemark>
              <Placemark>
                <name>Rome again</name>
                <Point><coordinates>12.5,41.9,0</coordinates></Point>
                <ExtendedData><Data name="id"><value>r</value></Data></ExtendedData>
              </Placemark>
            </Document></kml>"#;

        let decoded = decode(text).unwrap();
        assert_eq!(decoded.format, InterchangeFormat::Kml);
        let stops = decoded.itinerary.stops();
        assert_eq!(stops.len(), 4);
        assert!(!stops[0].id.is_empty());
        assert_ne!(stops[0].id, stops[1].id);
        assert_eq!(stops[1].name, "Unnamed Location");
        assert_eq!(stops[2].id, "r");
        assert_ne!(stops[3].id, "r");

        let strict = decode_as(InterchangeFormat::Kml, text).unwrap();
        assert_eq!(strict.len(), 4);
    }

    #[test]
    fn test_kml_position_out_of_range() {
        let text = "<kml><Placemark><Point><coordinates>0,95,0</coordinates></Point></Placemark></kml>";
        assert!(matches!(decode(text), Err(Error::InvalidPosition { .. })));
        assert!(matches!(
            decode_as(InterchangeFormat::Kml, text),
            Err(Error::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_kml_export_refuses_control_characters() {
        let stop = bare("a", 1.0, 2.0).with_name("bell\u{7}");
        assert!(matches!(
            encode(&[stop.clone()], InterchangeFormat::Kml),
            Err(Error::InvalidData(_))
        ));
        assert!(encode(&[stop], InterchangeFormat::Json).is_ok());
    }
}
