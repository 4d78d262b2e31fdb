//! Quadrant radii of the ship domain.
//!
//! The four radii follow the empirical power-law fits of the quaternion ship
//! domain: two speed-dependent coefficients, the advance coefficient `k_AD` and
//! the tactical diameter coefficient `k_DT`, are scaled by the vessel length.
//!
//! ```text
//! k_AD = 10^(0.3591·log10(V) + 0.0952)
//! k_DT = 10^(0.5441·log10(V) − 0.0795)
//!
//! fore      = (1 + 1.34·sqrt(k_AD² + (k_DT/2)²)) · L
//! aft       = (1 + 0.67·sqrt(k_AD² + (k_DT/2)²)) · L
//! starboard = (0.2 + k_DT) · L
//! port      = (0.2 + 0.75·k_DT) · L
//! ```

use ship_domain_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Speed-dependent coefficients of the domain model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DomainCoefficients {
    /// Advance coefficient.
    pub k_ad: f64,
    /// Tactical diameter coefficient.
    pub k_dt: f64,
}

/// Direction-dependent extents of a ship domain, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DomainRadii {
    /// Extent ahead of the vessel.
    pub fore: f64,
    /// Extent astern.
    pub aft: f64,
    /// Extent to the right-hand side.
    pub starboard: f64,
    /// Extent to the left-hand side.
    pub port: f64,
}

impl DomainRadii {
    /// Creates radii, rejecting non-finite or non-positive values.
    pub fn new(fore: f64, aft: f64, starboard: f64, port: f64) -> Result<Self> {
        for (name, value) in [
            ("fore", fore),
            ("aft", aft),
            ("starboard", starboard),
            ("port", port),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{} radius must be a positive finite number, got {}",
                    name, value
                )));
            }
        }

        Ok(Self {
            fore,
            aft,
            starboard,
            port,
        })
    }

    /// Creates radii without validation.
    ///
    /// Used for probing boundary behaviour; the builder does not special-case
    /// zero radii.
    pub fn new_unchecked(fore: f64, aft: f64, starboard: f64, port: f64) -> Self {
        Self {
            fore,
            aft,
            starboard,
            port,
        }
    }

    /// Largest of the four radii.
    pub fn max_extent(&self) -> f64 {
        self.fore.max(self.aft).max(self.starboard).max(self.port)
    }
}

/// Computes the speed-dependent coefficients `k_AD` and `k_DT`.
///
/// # Errors
/// `Error::InvalidParameter` if `speed` is not a positive finite number of knots.
pub fn domain_coefficients(speed: f64) -> Result<DomainCoefficients> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "speed must be a positive finite number of knots, got {}",
            speed
        )));
    }

    let log_v = speed.log10();
    Ok(DomainCoefficients {
        k_ad: 10f64.powf(0.3591 * log_v + 0.0952),
        k_dt: 10f64.powf(0.5441 * log_v - 0.0795),
    })
}

/// Computes the four domain radii for a vessel of `length` meters sailing at `speed` knots.
///
/// # Errors
/// `Error::InvalidParameter` if either argument is non-positive or non-finite.
/// A stopped vessel has no defined domain under this model.
///
/// # Example
/// ```rust
/// use ship_domain::compute_radii;
///
/// let r = compute_radii(100.0, 10.0).unwrap();
/// assert!(r.fore > r.aft);
/// assert!(r.starboard > r.port);
/// ```
pub fn compute_radii(length: f64, speed: f64) -> Result<DomainRadii> {
    if !length.is_finite() || length <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "vessel length must be a positive finite number of meters, got {}",
            length
        )));
    }

    let DomainCoefficients { k_ad, k_dt } = domain_coefficients(speed)?;
    let advance = (k_ad * k_ad + (k_dt / 2.0) * (k_dt / 2.0)).sqrt();

    DomainRadii::new(
        (1.0 + 1.34 * advance) * length,
        (1.0 + 0.67 * advance) * length,
        (0.2 + k_dt) * length,
        (0.2 + 0.75 * k_dt) * length,
    )
}
