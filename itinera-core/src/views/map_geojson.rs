use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::map_layer::{MapLayer, Marker, MarkerIcon, PathLine, TimeLabel};
use crate::Error;

impl MapLayer {
    /// Converts the layer to a `GeoJSON` `FeatureCollection`, for map
    /// widgets that take GeoJSON sources.
    ///
    /// Markers and time labels become points, the path a line string.
    /// Styling goes into the properties.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.markers.len() + self.time_labels.len() + 1);

        if let Some(path) = &self.path {
            features.push(path_feature(path)?);
        }
        for marker in &self.markers {
            features.push(marker_feature(marker)?);
        }
        for label in &self.time_labels {
            features.push(label_feature(label)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn path_feature(path: &PathLine) -> Result<Feature, Error> {
    let line: LineString<f64> = path
        .positions
        .iter()
        .map(|position| Point::from(*position))
        .collect();

    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&line)),
        "properties": {
            "layer": "path",
            "color": path.color,
            "weight": path.weight,
            "opacity": path.opacity,
            "dashArray": path.dash_array,
            "lineCap": path.line_cap,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn marker_feature(marker: &Marker) -> Result<Feature, Error> {
    let point = Point::from(marker.position);
    let number = match marker.icon {
        MarkerIcon::Numbered { number } => Some(number),
        MarkerIcon::Disabled => None,
    };

    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&point)),
        "properties": {
            "layer": "marker",
            "stopId": marker.stop_id,
            "number": number,
            "disabled": number.is_none(),
            "zPriority": marker.z_priority,
            "title": marker.popup.title,
            "lines": marker.popup.lines,
            "placeholder": marker.popup.placeholder,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn label_feature(label: &TimeLabel) -> Result<Feature, Error> {
    let point = Point::from(label.position);

    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&point)),
        "properties": {
            "layer": "travel_time",
            "text": label.text,
            "mode": label.mode,
            "icon": label.icon,
            "color": label.color,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
