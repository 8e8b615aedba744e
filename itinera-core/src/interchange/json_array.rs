use serde_json::Value as JsonValue;

use crate::Error;
use crate::model::Stop;

pub(super) fn encode(stops: &[Stop]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(stops)?)
}

pub(super) fn decode(value: JsonValue) -> Result<Vec<Stop>, Error> {
    let JsonValue::Array(items) = value else {
        return Err(Error::UnsupportedFormat("expected a JSON array".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::InvalidData(format!("stop {}: {e}", index + 1)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_STOP_NAME, TravelMode};
    use serde_json::json;

    #[test]
    fn test_sparse_records_default() {
        let stops = decode(json!([
            { "lat": 41.9, "lng": 12.5 },
            { "id": "x", "lat": 40.4, "lng": -3.7, "name": "", "travelMode": "car", "disabled": "false" }
        ]))
        .unwrap();

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id, "");
        assert_eq!(stops[0].name, DEFAULT_STOP_NAME);
        assert_eq!(stops[1].name, DEFAULT_STOP_NAME);
        assert_eq!(stops[1].travel_mode, Some(TravelMode::Car));
        assert!(!stops[1].disabled);
    }

    #[test]
    fn test_bad_record_names_its_index() {
        let err = decode(json!([{ "lat": 1.0, "lng": 1.0 }, { "lat": "north" }])).unwrap_err();
        match err {
            Error::InvalidData(message) => assert!(message.starts_with("stop 2:"), "{message}"),
            other => panic!("Expected InvalidData, got {other:?}"),
        }
    }

    #[test]
    fn test_output_is_pretty_array() {
        let text = encode(&[]).unwrap();
        assert_eq!(text, "[]");
    }
}
