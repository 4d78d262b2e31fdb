//! Overlap detection between two domain polygons.
//!
//! The detector runs in two phases:
//!
//! 1. **Broad phase**: axis-aligned bounding boxes; disjoint boxes cannot overlap.
//! 2. **Narrow phase**: polygon intersection through a [`Clipper`]. The default
//!    [`IOverlayClipper`] uses `i_overlay`, which handles touching and
//!    coincident edges and returns every disjoint part of the intersection.
//!
//! Intersection parts with no measurable area (shared edges or single shared
//! points) are discarded, so touching domains do not count as overlapping.

use crate::polygon::{ring_to_geo_polygon, DomainPolygon};
use geo::Area;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use ship_domain_core::robust::{dedup_ring, is_collinear_ring, signed_area_robust};
use ship_domain_core::{Error, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One connected part of a clipping result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClippedShape {
    /// Outer boundary.
    pub exterior: Vec<(f64, f64)>,
    /// Interior boundaries, if the clipper produced any.
    pub holes: Vec<Vec<(f64, f64)>>,
}

/// Polygon intersection backend used by [`OverlapDetector`].
pub trait Clipper: Send + Sync {
    /// Returns the intersection of two simple rings as a list of connected shapes.
    fn intersection(&self, a: &[(f64, f64)], b: &[(f64, f64)]) -> Vec<ClippedShape>;
}

/// [`Clipper`] backed by `i_overlay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IOverlayClipper;

impl Clipper for IOverlayClipper {
    fn intersection(&self, a: &[(f64, f64)], b: &[(f64, f64)]) -> Vec<ClippedShape> {
        let subject: Vec<Vec<[f64; 2]>> = vec![a.iter().map(|&(x, y)| [x, y]).collect()];
        let clip: Vec<[f64; 2]> = b.iter().map(|&(x, y)| [x, y]).collect();

        let shapes = subject.overlay(&[clip], OverlayRule::Intersect, FillRule::NonZero);

        shapes
            .into_iter()
            .filter_map(|shape| {
                let mut contours = shape
                    .into_iter()
                    .map(|contour| contour.into_iter().map(|[x, y]| (x, y)).collect::<Vec<_>>());
                let exterior = contours.next()?;
                Some(ClippedShape {
                    exterior,
                    holes: contours.collect(),
                })
            })
            .collect()
    }
}

/// Configuration of the overlap detector.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlapConfig {
    /// Intersection parts with an area at or below this value (m²) are ignored.
    pub area_epsilon: f64,

    /// Vertices closer than this (m, per coordinate) count as the same vertex
    /// when checking for degenerate input.
    pub vertex_tolerance: f64,

    /// Relative slack allowed when checking the intersection area against the
    /// smaller input polygon.
    pub area_tolerance: f64,

    /// Return an error instead of a warning when the intersection cannot be classified.
    pub strict_topology: bool,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            area_epsilon: 1e-6,
            vertex_tolerance: 1e-9,
            area_tolerance: 1e-4,
            strict_topology: false,
        }
    }
}

impl OverlapConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum area for an intersection part to count.
    pub fn with_area_epsilon(mut self, epsilon: f64) -> Self {
        self.area_epsilon = epsilon.max(0.0);
        self
    }

    /// Sets the vertex coincidence tolerance.
    pub fn with_vertex_tolerance(mut self, tolerance: f64) -> Self {
        self.vertex_tolerance = tolerance.max(0.0);
        self
    }

    /// Sets the relative area tolerance.
    pub fn with_area_tolerance(mut self, tolerance: f64) -> Self {
        self.area_tolerance = tolerance.max(0.0);
        self
    }

    /// Turns unclassifiable intersections into hard errors.
    pub fn with_strict_topology(mut self, strict: bool) -> Self {
        self.strict_topology = strict;
        self
    }
}

/// An intersection the detector could not classify and treated as no overlap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopologyWarning {
    /// What was wrong with the clipper output.
    pub reason: String,
}

impl TopologyWarning {
    /// Converts the warning into the matching error.
    pub fn into_error(self) -> Error {
        Error::UnsupportedIntersectionTopology(self.reason)
    }
}

impl fmt::Display for TopologyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported intersection topology: {}", self.reason)
    }
}

/// Overlap between two vessel domains for one frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverlapResult {
    /// Closed rings of the intersection, one per disjoint part.
    pub rings: Vec<Vec<(f64, f64)>>,

    /// True iff the intersection has strictly positive area.
    pub is_overlapping: bool,

    /// Distance between the two vessel positions in meters.
    pub distance: f64,

    /// Total intersection area over all rings, in m².
    pub area: f64,

    /// Set when the clipper output could not be classified.
    pub warning: Option<TopologyWarning>,
}

impl OverlapResult {
    /// A result with no intersection.
    pub fn disjoint(distance: f64) -> Self {
        Self {
            rings: Vec::new(),
            is_overlapping: false,
            distance,
            area: 0.0,
            warning: None,
        }
    }

    /// Number of disjoint intersection parts.
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Returns true if the result was produced by the topology fallback.
    pub fn has_warning(&self) -> bool {
        self.warning.is_some()
    }
}

/// Computes the intersection of two domain polygons.
#[derive(Debug, Clone, Default)]
pub struct OverlapDetector<C = IOverlayClipper> {
    config: OverlapConfig,
    clipper: C,
}

impl OverlapDetector<IOverlayClipper> {
    /// Creates a detector backed by `i_overlay`.
    pub fn new(config: OverlapConfig) -> Self {
        Self {
            config,
            clipper: IOverlayClipper,
        }
    }
}

impl<C: Clipper> OverlapDetector<C> {
    /// Creates a detector with a custom clipping backend.
    pub fn with_clipper(config: OverlapConfig, clipper: C) -> Self {
        Self { config, clipper }
    }

    /// Returns the detector configuration.
    pub fn config(&self) -> &OverlapConfig {
        &self.config
    }

    /// Detects and measures the overlap of two domains.
    ///
    /// # Errors
    /// - `Error::DegenerateGeometry` if either polygon has fewer than three
    ///   distinct vertices or encloses no area.
    /// - `Error::UnsupportedIntersectionTopology` if the clipper output cannot be
    ///   classified and `strict_topology` is set. Otherwise such output is logged
    ///   and reported as a non-overlapping result with a warning.
    pub fn detect(&self, a: &DomainPolygon, b: &DomainPolygon) -> Result<OverlapResult> {
        self.validate(a, "first")?;
        self.validate(b, "second")?;

        let (ax, ay) = a.center();
        let (bx, by) = b.center();
        let distance = (ax - bx).hypot(ay - by);

        // Broad phase
        let (Some(box_a), Some(box_b)) = (a.aabb(), b.aabb()) else {
            return Ok(OverlapResult::disjoint(distance));
        };
        if !box_a.intersects(&box_b) {
            return Ok(OverlapResult::disjoint(distance));
        }

        // Narrow phase
        let shapes = self.clipper.intersection(a.vertices(), b.vertices());
        match self.classify(shapes, a, b) {
            Ok((rings, area)) => Ok(OverlapResult {
                is_overlapping: !rings.is_empty(),
                rings,
                distance,
                area,
                warning: None,
            }),
            Err(warning) => {
                if self.config.strict_topology {
                    return Err(warning.into_error());
                }
                log::warn!("{}; treating the pair as non-overlapping", warning);
                Ok(OverlapResult {
                    warning: Some(warning),
                    ..OverlapResult::disjoint(distance)
                })
            }
        }
    }

    fn validate(&self, polygon: &DomainPolygon, which: &str) -> Result<()> {
        if let Some(&(x, y)) = polygon
            .vertices()
            .iter()
            .find(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(Error::DegenerateGeometry(format!(
                "{} polygon has a non-finite vertex ({}, {})",
                which, x, y
            )));
        }

        let distinct = dedup_ring(polygon.vertices(), self.config.vertex_tolerance);
        if distinct.len() < 3 {
            return Err(Error::DegenerateGeometry(format!(
                "{} polygon has {} distinct vertices, at least 3 are required",
                which,
                distinct.len()
            )));
        }
        if is_collinear_ring(&distinct) {
            return Err(Error::DegenerateGeometry(format!(
                "{} polygon has all {} vertices on one line",
                which,
                distinct.len()
            )));
        }
        // Rotation noise keeps flat outlines off the exact line.
        let area = signed_area_robust(&distinct).abs();
        if area <= self.config.area_epsilon {
            return Err(Error::DegenerateGeometry(format!(
                "{} polygon encloses no area ({:e} m²)",
                which, area
            )));
        }

        Ok(())
    }

    /// Keeps the parts with positive area and checks the output is plausible.
    fn classify(
        &self,
        shapes: Vec<ClippedShape>,
        a: &DomainPolygon,
        b: &DomainPolygon,
    ) -> std::result::Result<(Vec<Vec<(f64, f64)>>, f64), TopologyWarning> {
        let mut rings = Vec::with_capacity(shapes.len());
        let mut total_area = 0.0;

        for (i, shape) in shapes.into_iter().enumerate() {
            let finite = shape
                .exterior
                .iter()
                .chain(shape.holes.iter().flatten())
                .all(|(x, y)| x.is_finite() && y.is_finite());
            if !finite {
                return Err(TopologyWarning {
                    reason: format!("intersection part {} has non-finite coordinates", i),
                });
            }

            let area = ring_to_geo_polygon(&shape.exterior).unsigned_area();
            if area <= self.config.area_epsilon {
                continue;
            }

            // Each part of the intersection of two simple polygons is simply connected.
            if !shape.holes.is_empty() {
                return Err(TopologyWarning {
                    reason: format!(
                        "intersection part {} has {} interior contours",
                        i,
                        shape.holes.len()
                    ),
                });
            }

            total_area += area;
            rings.push(shape.exterior);
        }

        let bound = a.area().min(b.area());
        if total_area > bound * (1.0 + self.config.area_tolerance) + self.config.area_epsilon {
            return Err(TopologyWarning {
                reason: format!(
                    "intersection area {:.3} exceeds the smaller polygon area {:.3}",
                    total_area, bound
                ),
            });
        }

        Ok((rings, total_area))
    }
}

/// Detects the overlap of two domains with the default configuration.
///
/// # Example
/// ```rust
/// use ship_domain::{build_domain_polygon, compute_radii, detect_overlap};
///
/// let radii = compute_radii(100.0, 10.0).unwrap();
/// let a = build_domain_polygon(0.0, 0.0, &radii, 0.0, 50).unwrap();
/// let b = build_domain_polygon(0.0, 600.0, &radii, std::f64::consts::PI, 50).unwrap();
///
/// let overlap = detect_overlap(&a, &b).unwrap();
/// assert!(overlap.is_overlapping);
/// assert!((overlap.distance - 600.0).abs() < 1e-9);
/// ```
pub fn detect_overlap(a: &DomainPolygon, b: &DomainPolygon) -> Result<OverlapResult> {
    OverlapDetector::new(OverlapConfig::default()).detect(a, b)
}
