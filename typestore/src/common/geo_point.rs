use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::fmt::{Display, Formatter};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting latitudes outside [-90, 90] and longitudes
    /// outside [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> StoreResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            log::error!("Latitude {} is out of range [-90, 90]", latitude);
            return Err(StoreError::new(
                &format!("Latitude {} is out of range [-90, 90]", latitude),
                ErrorKind::ValidationError,
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            log::error!("Longitude {} is out of range [-180, 180]", longitude);
            return Err(StoreError::new(
                &format!("Longitude {} is out of range [-180, 180]", longitude),
                ErrorKind::ValidationError,
            ));
        }
        Ok(GeoPoint { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.latitude, self.longitude)
    }
}
