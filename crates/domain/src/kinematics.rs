//! Vessel kinematics and static vessel properties.

use ship_domain_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a sample was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Position {
    /// Latitude and longitude in degrees.
    Geodetic { lat: f64, lng: f64 },
    /// Local tangent-plane coordinates in meters (x east, y north).
    Planar { x: f64, y: f64 },
}

/// One kinematic report of a vessel at a discrete time step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicSample {
    /// Observed position.
    pub position: Position,

    /// Speed over ground in knots.
    pub sog: f64,

    /// Course over ground in radians, compass convention (0 = north, clockwise).
    pub cog: f64,

    /// Unix timestamp in seconds.
    pub timestamp: i64,
}

impl KinematicSample {
    /// Creates a sample from a geodetic position and a course in degrees.
    pub fn geodetic(lat: f64, lng: f64, sog: f64, cog_deg: f64, timestamp: i64) -> Self {
        Self {
            position: Position::Geodetic { lat, lng },
            sog,
            cog: cog_deg.to_radians(),
            timestamp,
        }
    }

    /// Creates a sample from a planar position and a course in degrees.
    pub fn planar(x: f64, y: f64, sog: f64, cog_deg: f64, timestamp: i64) -> Self {
        Self {
            position: Position::Planar { x, y },
            sog,
            cog: cog_deg.to_radians(),
            timestamp,
        }
    }

    /// Course over ground in degrees.
    pub fn cog_degrees(&self) -> f64 {
        self.cog.to_degrees()
    }
}

/// Static properties of a vessel, constant for a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VesselProfile {
    length: f64,
}

impl VesselProfile {
    /// Creates a profile, rejecting non-positive or non-finite lengths.
    pub fn new(length: f64) -> Result<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "vessel length must be a positive finite number of meters, got {}",
                length
            )));
        }
        Ok(Self { length })
    }

    /// Length overall in meters.
    pub fn length(&self) -> f64 {
        self.length
    }
}
