//! Great-circle distance between coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius used by the haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
///
/// # Examples
///
/// ```
/// use depot::Coordinate;
///
/// let a = Coordinate::new(50.0, 50.0);
/// assert_eq!(a.distance_to(a), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without range checks.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting values outside the valid degree ranges.
    ///
    /// # Errors
    ///
    /// Returns a validation error if latitude is outside [-90, 90] or
    /// longitude is outside [-180, 180], or either is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use depot::Coordinate;
    ///
    /// assert!(Coordinate::checked(55.75, 37.62).is_ok());
    /// assert!(Coordinate::checked(91.0, 0.0).is_err());
    /// ```
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Self::new(latitude, longitude);
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Checks that both components are finite and within range.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending component.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Validation {
                field: "latitude".into(),
                message: format!("{} is outside [-90, 90]", self.latitude),
            });
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Validation {
                field: "longitude".into(),
                message: format!("{} is outside [-180, 180]", self.longitude),
            });
        }
        Ok(())
    }

    /// Returns the great-circle distance to another coordinate in kilometers.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        distance(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

fn hav(theta: f64) -> f64 {
    (theta / 2.0).sin().powi(2)
}

/// Haversine distance between two coordinates in kilometers.
///
/// Symmetric, and zero for identical coordinates.
///
/// # Examples
///
/// ```
/// use depot::geo::distance;
/// use depot::Coordinate;
///
/// let a = Coordinate::new(50.0, 50.0);
/// let b = Coordinate::new(60.0, 60.0);
/// let d = distance(a, b);
/// assert!((d - 1278.7).abs() < 1.0);
/// assert_eq!(d, distance(b, a));
/// ```
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = hav(delta_lat) + lat1.cos() * lat2.cos() * hav(delta_lon);
    // Rounding can push h a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
