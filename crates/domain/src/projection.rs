//! Geodetic to local planar projection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Meters per degree of latitude used by the equirectangular approximation.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Converts latitude/longitude (degrees) into planar meters.
pub trait Projector: Send + Sync {
    /// Projects a geodetic position to `(x, y)` meters, x east and y north.
    fn project(&self, lat: f64, lng: f64) -> (f64, f64);
}

/// Equirectangular projection around a fixed origin.
///
/// Accurate to well under a percent over the few tens of kilometers a
/// two-vessel encounter spans.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EquirectangularProjector {
    origin_lat: f64,
    origin_lng: f64,
    cos_origin_lat: f64,
}

impl EquirectangularProjector {
    /// Creates a projector centered on `(origin_lat, origin_lng)`.
    pub fn new(origin_lat: f64, origin_lng: f64) -> Self {
        Self {
            origin_lat,
            origin_lng,
            cos_origin_lat: origin_lat.to_radians().cos(),
        }
    }

    /// The projection origin as `(lat, lng)`.
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_lat, self.origin_lng)
    }
}

impl Projector for EquirectangularProjector {
    fn project(&self, lat: f64, lng: f64) -> (f64, f64) {
        let x = (lng - self.origin_lng) * METERS_PER_DEGREE * self.cos_origin_lat;
        let y = (lat - self.origin_lat) * METERS_PER_DEGREE;
        (x, y)
    }
}
