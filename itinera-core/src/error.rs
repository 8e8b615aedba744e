use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid position: lat={lat}, lng={lng}")]
    InvalidPosition { lat: f64, lng: f64 },
    #[error("Index {index} out of range for itinerary of {len} stops")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Unsupported import format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("KML error: {0}")]
    KmlError(#[from] roxmltree::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
