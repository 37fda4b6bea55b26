//! Quantities derived from a single state vector

use serde::{Deserialize, Serialize};

use crate::error::{EphemerisError, Result};
use crate::types::StateVector;

/// Mean Earth radius in km
pub const MEAN_EARTH_RADIUS: f64 = 6371.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub speed: f64,
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Altitude {
    pub value: f64,
    pub units: String,
}

/// Point on the surface beneath the station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPoint {
    pub latitude: f64,
    /// Not wrapped into [-180, 180]
    pub longitude: f64,
    pub altitude: Altitude,
}

/// Magnitude of the velocity vector, in the X_DOT units.
pub fn speed(vector: &StateVector) -> Speed {
    let (vx, vy, vz) = (vector.x_dot.value, vector.y_dot.value, vector.z_dot.value);
    Speed {
        speed: (vx * vx + vy * vy + vz * vz).sqrt(),
        units: vector.x_dot.units.clone(),
    }
}

/// Latitude, longitude and altitude under the station.
///
/// Longitude subtracts Earth's rotation since 12:00 using the hour and
/// minute at byte offsets 9..11 and 12..14 of the epoch string, then adds
/// a fixed 24 degrees. This assumes the `YYYY-DDDTHH:MM` layout exactly.
pub fn sub_point(vector: &StateVector) -> Result<SubPoint> {
    let (x, y, z) = (vector.x.value, vector.y.value, vector.z.value);

    let hours = epoch_field(&vector.epoch, 9..11)?;
    let minutes = epoch_field(&vector.epoch, 12..14)?;

    let latitude = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let longitude = y.atan2(x).to_degrees()
        - ((hours - 12.0) + (minutes / 60.0)) * (360.0 / 24.0)
        + 24.0;
    let altitude = (x * x + y * y + z * z).sqrt() - MEAN_EARTH_RADIUS;

    Ok(SubPoint {
        latitude,
        longitude,
        altitude: Altitude {
            value: altitude,
            units: vector.x.units.clone(),
        },
    })
}

fn epoch_field(epoch: &str, range: std::ops::Range<usize>) -> Result<f64> {
    epoch
        .get(range)
        .and_then(|s| s.parse::<u32>().ok())
        .map(f64::from)
        .ok_or_else(|| EphemerisError::MalformedEpoch(epoch.to_string()))
}
