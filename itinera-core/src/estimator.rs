//! Great-circle distance and travel time estimates between stops

use crate::model::{Position, TravelMode};

/// Mean Earth radius used for stop-to-stop distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed speed when a leg has no travel mode.
pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// Haversine distance in kilometers.
pub fn distance_km(a: Position, b: Position) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = (sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng).min(1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Human-readable travel time for a leg of `distance_km` kilometers.
///
/// Under an hour the result is in minutes (`~42min`), under a day in hours
/// and minutes (`~3h 15min`, or `~3h` when the minutes round to zero),
/// otherwise in days with one decimal (`~2.3 days`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_travel_time(distance_km: f64, mode: Option<TravelMode>) -> String {
    let speed = mode.map_or(DEFAULT_SPEED_KMH, TravelMode::speed_kmh);
    let hours = (distance_km / speed).max(0.0);

    if hours < 1.0 {
        let minutes = (hours * 60.0).round() as u64;
        format!("~{minutes}min")
    } else if hours < 24.0 {
        let whole = hours.floor();
        let minutes = ((hours - whole) * 60.0).round() as u64;
        let whole = whole as u64;
        if minutes > 0 {
            format!("~{whole}h {minutes}min")
        } else {
            format!("~{whole}h")
        }
    } else {
        let days = (hours / 24.0 * 10.0).round() / 10.0;
        format!("~{days} days")
    }
}

/// Estimated time for the leg between two stops.
pub fn estimate_leg(from: Position, to: Position, mode: Option<TravelMode>) -> String {
    estimate_travel_time(distance_km(from, to), mode)
}
