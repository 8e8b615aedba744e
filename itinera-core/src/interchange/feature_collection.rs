//! `GeoJSON` form: a `FeatureCollection` with one `Point` feature per stop.
//!
//! The geometry carries the position as `[lng, lat]`; every other stop field
//! is kept verbatim in the feature properties.

use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use serde_json::{Value as JsonValue, json};

use crate::Error;
use crate::model::Stop;

pub(super) fn encode(stops: &[Stop]) -> Result<String, Error> {
    let features = stops
        .iter()
        .map(stop_feature)
        .collect::<Result<Vec<_>, _>>()?;

    let collection = FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    };
    serde_json::to_string_pretty(&collection).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn stop_feature(stop: &Stop) -> Result<Feature, Error> {
    let JsonValue::Object(mut properties) = serde_json::to_value(stop)? else {
        return Err(Error::GeoJsonError(
            "stop did not serialize to an object".to_string(),
        ));
    };
    properties.remove("lat");
    properties.remove("lng");

    let point = Point::from(stop.position);
    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&point)),
        "properties": properties,
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

pub(super) fn decode(value: JsonValue) -> Result<Vec<Stop>, Error> {
    let collection: FeatureCollection =
        serde_json::from_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            feature_stop(feature)
                .map_err(|e| Error::GeoJsonError(format!("feature {}: {e}", index + 1)))
        })
        .collect()
}

fn feature_stop(feature: Feature) -> Result<Stop, String> {
    let geometry = feature.geometry.ok_or("missing geometry")?;
    let (lng, lat) = match &geometry.value {
        GeoJsonValue::Point(coords) if coords.len() >= 2 => (coords[0], coords[1]),
        GeoJsonValue::Point(_) => return Err("point needs two coordinates".to_string()),
        _ => return Err("geometry is not a Point".to_string()),
    };

    let mut properties: JsonObject = feature.properties.unwrap_or_default();
    properties.insert("lat".to_string(), json!(lat));
    properties.insert("lng".to_string(), json!(lng));

    serde_json::from_value(JsonValue::Object(properties)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_STOP_NAME, Position};

    #[test]
    fn test_coordinates_are_lng_lat() {
        let stop = Stop::new(Position { lat: 48.85, lng: 2.35 }).with_id("p");
        let text = encode(&[stop]).unwrap();
        let value: JsonValue = serde_json::from_str(&text).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let feature = &value["features"][0];
        assert_eq!(feature["geometry"]["type"], "Point");
        assert_eq!(feature["geometry"]["coordinates"], json!([2.35, 48.85]));
        assert_eq!(feature["properties"]["id"], "p");
        assert!(feature["properties"].get("lat").is_none());
    }

    #[test]
    fn test_feature_without_properties() {
        let stops = decode(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [13.4, 52.5, 34.0] },
                "properties": null
            }]
        }))
        .unwrap();

        assert_eq!(stops[0].position, Position { lat: 52.5, lng: 13.4 });
        assert_eq!(stops[0].name, DEFAULT_STOP_NAME);
        assert_eq!(stops[0].id, "");
    }

    #[test]
    fn test_non_point_geometry_is_rejected() {
        let err = decode(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
                "properties": {}
            }]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::GeoJsonError(_)));
    }

    #[test]
    fn test_missing_geometry_is_rejected() {
        let result = decode(json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "geometry": null, "properties": { "name": "x" } }]
        }));
        assert!(result.is_err());
    }
}
