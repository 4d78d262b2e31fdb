//! Vessel length lookup.
//!
//! AIS position reports do not carry the hull length, so it comes from a
//! separate static table keyed by MMSI. The registry is built once, handed to
//! the scenario driver and only read afterwards.

use crate::kinematics::VesselProfile;
use ship_domain_core::Result;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable MMSI → length mapping.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VesselRegistry {
    lengths: HashMap<String, f64>,
}

impl VesselRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a vessel length. Consumes and returns the registry so
    /// entries can only be added while it is being built.
    pub fn with_vessel(mut self, mmsi: impl Into<String>, length: f64) -> Self {
        self.lengths.insert(mmsi.into(), length);
        self
    }

    /// Length in meters of the vessel, if known.
    pub fn length(&self, mmsi: &str) -> Option<f64> {
        self.lengths.get(mmsi.trim()).copied()
    }

    /// Validated profile of the vessel. `None` if the vessel is unknown.
    pub fn profile(&self, mmsi: &str) -> Option<Result<VesselProfile>> {
        self.length(mmsi).map(VesselProfile::new)
    }

    /// Number of vessels in the registry.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Returns true if the registry holds no vessels.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for VesselRegistry {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            lengths: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
