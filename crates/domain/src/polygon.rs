//! Four-quadrant domain polygon construction.
//!
//! The domain is assembled from four quarter-ellipse arcs, one per quadrant of
//! the vessel-local frame. Each arc has its own pair of semi-axes, so the arcs
//! meet on the local axes but the overall outline is asymmetric.
//!
//! Local frame: +x points to the bow, +y to port, −y to starboard. Arcs are
//! traversed counter-clockwise starting from the starboard beam:
//!
//! ```text
//!                  +x (bow)
//!                    |
//!      ForePort      |     ForeStarboard
//!   (fore, port)     |   (fore, starboard)
//!  +y ---------------+--------------- −y
//!      AftPort       |     AftStarboard
//!   (aft, port)      |   (aft, starboard)
//!                    |
//! ```
//!
//! The local outline is then rotated so the bow follows the compass course and
//! translated to the vessel position.

use crate::radii::DomainRadii;
use geo::{Area, Coord, LineString, Polygon as GeoPolygon};
use ship_domain_core::transform::AABB2D;
use ship_domain_core::{Error, Result, Transform2D};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of vertices sampled per quadrant.
pub const DEFAULT_SAMPLES_PER_QUADRANT: usize = 100;

/// One quarter of the domain outline in the vessel-local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Ahead and to the right.
    ForeStarboard,
    /// Ahead and to the left.
    ForePort,
    /// Astern and to the left.
    AftPort,
    /// Astern and to the right.
    AftStarboard,
}

/// Parametrisation of one quadrant arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrantArc {
    /// First parameter angle (inclusive).
    pub start_angle: f64,
    /// Last parameter angle (inclusive).
    pub end_angle: f64,
    /// Semi-axis along local x.
    pub semi_axis_x: f64,
    /// Semi-axis along local y.
    pub semi_axis_y: f64,
}

impl Quadrant {
    /// Quadrants in counter-clockwise traversal order.
    pub const TRAVERSAL: [Quadrant; 4] = [
        Quadrant::ForeStarboard,
        Quadrant::ForePort,
        Quadrant::AftPort,
        Quadrant::AftStarboard,
    ];

    /// Returns the arc of this quadrant for the given radii.
    pub fn arc(self, radii: &DomainRadii) -> QuadrantArc {
        let (start_angle, end_angle, semi_axis_x, semi_axis_y) = match self {
            Quadrant::ForeStarboard => (3.0 * FRAC_PI_2, TAU, radii.fore, radii.starboard),
            Quadrant::ForePort => (0.0, FRAC_PI_2, radii.fore, radii.port),
            Quadrant::AftPort => (FRAC_PI_2, PI, radii.aft, radii.port),
            Quadrant::AftStarboard => (PI, 3.0 * FRAC_PI_2, radii.aft, radii.starboard),
        };

        QuadrantArc {
            start_angle,
            end_angle,
            semi_axis_x,
            semi_axis_y,
        }
    }
}

impl QuadrantArc {
    /// Samples `n` points at evenly spaced parameter values, both ends included.
    ///
    /// With `n == 1` only the start of the arc is produced.
    pub fn sample(&self, n: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        let step = if n > 1 {
            (self.end_angle - self.start_angle) / (n - 1) as f64
        } else {
            0.0
        };

        (0..n).map(move |i| {
            let theta = self.start_angle + step * i as f64;
            (
                self.semi_axis_x * theta.cos(),
                self.semi_axis_y * theta.sin(),
            )
        })
    }
}

/// A ship domain outline in world planar coordinates.
///
/// Vertices are counter-clockwise and implicitly closed (the last vertex
/// connects back to the first).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DomainPolygon {
    center: (f64, f64),
    heading: f64,
    radii: DomainRadii,
    vertices: Vec<(f64, f64)>,
}

impl DomainPolygon {
    /// Wraps an arbitrary ring as a domain polygon.
    ///
    /// Intended for testing the detector against hand-made shapes; the radii
    /// are recorded as given.
    pub fn from_vertices(
        center: (f64, f64),
        heading: f64,
        radii: DomainRadii,
        vertices: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            center,
            heading,
            radii,
            vertices,
        }
    }

    /// Vessel position the domain is centered on.
    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    /// Compass course used to orient the domain, in radians.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Radii the outline was built from.
    pub fn radii(&self) -> &DomainRadii {
        &self.radii
    }

    /// Outline vertices.
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the outline has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over consecutive vertex pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Tip of the domain straight ahead of the vessel.
    pub fn bow_point(&self) -> (f64, f64) {
        Transform2D::from_course(self.center.0, self.center.1, self.heading)
            .apply(self.radii.fore, 0.0)
    }

    /// Bounding box of the outline, `None` if there are no vertices.
    pub fn aabb(&self) -> Option<AABB2D> {
        AABB2D::from_points(&self.vertices)
    }

    /// Enclosed area in square meters.
    pub fn area(&self) -> f64 {
        self.to_geo_polygon().unsigned_area()
    }

    /// Converts to a geo crate Polygon.
    pub fn to_geo_polygon(&self) -> GeoPolygon<f64> {
        ring_to_geo_polygon(&self.vertices)
    }
}

/// Converts a ring of `(x, y)` tuples into a hole-free geo polygon.
pub(crate) fn ring_to_geo_polygon(ring: &[(f64, f64)]) -> GeoPolygon<f64> {
    let exterior = LineString::from(
        ring.iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>(),
    );
    GeoPolygon::new(exterior, Vec::new())
}

/// Builds the outline in the vessel-local frame (bow along +x, origin at the vessel).
pub fn local_domain_outline(radii: &DomainRadii, samples_per_quadrant: usize) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(4 * samples_per_quadrant);
    for quadrant in Quadrant::TRAVERSAL {
        let arc = quadrant.arc(radii);
        points.extend(arc.sample(samples_per_quadrant));
    }
    points
}

/// Builds the domain polygon of a vessel at `(center_x, center_y)` on compass course `heading`.
///
/// The result has exactly `4 × samples_per_quadrant` vertices in counter-clockwise
/// order. Vertices on the local axes appear twice (once as the end of one arc,
/// once as the start of the next).
///
/// # Errors
/// `Error::InvalidParameter` if `samples_per_quadrant` is zero or the center or
/// heading is not finite.
///
/// # Example
/// ```rust
/// use ship_domain::{build_domain_polygon, compute_radii};
///
/// let radii = compute_radii(100.0, 10.0).unwrap();
/// let polygon = build_domain_polygon(0.0, 0.0, &radii, 0.0, 100).unwrap();
/// assert_eq!(polygon.len(), 400);
/// ```
pub fn build_domain_polygon(
    center_x: f64,
    center_y: f64,
    radii: &DomainRadii,
    heading: f64,
    samples_per_quadrant: usize,
) -> Result<DomainPolygon> {
    if samples_per_quadrant == 0 {
        return Err(Error::InvalidParameter(
            "samples per quadrant must be at least 1".into(),
        ));
    }
    if !center_x.is_finite() || !center_y.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "domain center must be finite, got ({}, {})",
            center_x, center_y
        )));
    }
    if !heading.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "heading must be finite, got {}",
            heading
        )));
    }

    let local = local_domain_outline(radii, samples_per_quadrant);
    let vertices = Transform2D::from_course(center_x, center_y, heading).apply_all(&local);

    Ok(DomainPolygon {
        center: (center_x, center_y),
        heading,
        radii: *radii,
        vertices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radii::compute_radii;
    use approx::assert_relative_eq;
    use ship_domain_core::robust::{dedup_ring, is_ccw_robust, is_convex_robust};

    fn reference_radii() -> DomainRadii {
        compute_radii(100.0, 10.0).unwrap()
    }

    #[test]
    fn test_vertex_count() {
        let radii = reference_radii();
        for n in [1, 2, 7, 100] {
            let p = build_domain_polygon(0.0, 0.0, &radii, 0.3, n).unwrap();
            assert_eq!(p.len(), 4 * n);
        }
    }

    #[test]
    fn test_zero_samples_rejected() {
        let radii = reference_radii();
        assert!(matches!(
            build_domain_polygon(0.0, 0.0, &radii, 0.0, 0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let radii = reference_radii();
        assert!(build_domain_polygon(f64::NAN, 0.0, &radii, 0.0, 10).is_err());
        assert!(build_domain_polygon(0.0, 0.0, &radii, f64::INFINITY, 10).is_err());
    }

    #[test]
    fn test_local_axes_extents() {
        let r = DomainRadii::new(500.0, 300.0, 200.0, 150.0).unwrap();
        let local = local_domain_outline(&r, 5);

        // Starboard beam, bow, port beam, stern, each at a quadrant boundary.
        assert_relative_eq!(local[0].0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(local[0].1, -200.0, epsilon = 1e-9);
        assert_relative_eq!(local[5].0, 500.0, epsilon = 1e-9);
        assert_relative_eq!(local[5].1, 0.0, epsilon = 1e-9);
        assert_relative_eq!(local[10].0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(local[10].1, 150.0, epsilon = 1e-9);
        assert_relative_eq!(local[15].0, -300.0, epsilon = 1e-9);
        assert_relative_eq!(local[15].1, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_arcs_meet_at_axes() {
        let r = DomainRadii::new(500.0, 300.0, 200.0, 150.0).unwrap();
        let n = 9;
        let local = local_domain_outline(&r, n);
        for q in 0..4 {
            let end = local[q * n + n - 1];
            let start = local[((q + 1) % 4) * n];
            assert_relative_eq!(end.0, start.0, epsilon = 1e-9);
            assert_relative_eq!(end.1, start.1, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_heading_north_puts_bow_north_and_starboard_east() {
        let r = DomainRadii::new(500.0, 300.0, 200.0, 150.0).unwrap();
        let p = build_domain_polygon(1000.0, 2000.0, &r, 0.0, 50).unwrap();
        let aabb = p.aabb().unwrap();

        assert_relative_eq!(aabb.max_y, 2500.0, epsilon = 1e-6);
        assert_relative_eq!(aabb.min_y, 1700.0, epsilon = 1e-6);
        assert_relative_eq!(aabb.max_x, 1200.0, epsilon = 1e-6);
        assert_relative_eq!(aabb.min_x, 850.0, epsilon = 1e-6);

        let bow = p.bow_point();
        assert_relative_eq!(bow.0, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(bow.1, 2500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_heading_east_puts_bow_east() {
        let r = DomainRadii::new(500.0, 300.0, 200.0, 150.0).unwrap();
        let p = build_domain_polygon(0.0, 0.0, &r, FRAC_PI_2, 50).unwrap();
        let aabb = p.aabb().unwrap();

        assert_relative_eq!(aabb.max_x, 500.0, epsilon = 1e-6);
        assert_relative_eq!(aabb.min_x, -300.0, epsilon = 1e-6);
        // Starboard is south when steering east.
        assert_relative_eq!(aabb.min_y, -200.0, epsilon = 1e-6);
        assert_relative_eq!(aabb.max_y, 150.0, epsilon = 1e-6);
    }

    #[test]
    fn test_counter_clockwise_and_convex_for_any_heading() {
        let radii = reference_radii();
        for i in 0..24 {
            let heading = i as f64 * TAU / 24.0;
            let p = build_domain_polygon(-40.0, 75.0, &radii, heading, 100).unwrap();
            assert!(is_ccw_robust(p.vertices()), "not CCW at heading {}", heading);

            // Join vertices are repeated up to rounding; drop them before testing turns.
            let ring = dedup_ring(p.vertices(), 1e-6);
            assert_eq!(ring.len(), 4 * 99);
            assert!(is_convex_robust(&ring), "not convex at heading {}", heading);
        }
    }

    #[test]
    fn test_area_approaches_quarter_ellipse_sum() {
        let r = DomainRadii::new(500.0, 300.0, 200.0, 150.0).unwrap();
        let p = build_domain_polygon(0.0, 0.0, &r, 1.0, 400).unwrap();
        let expected = PI / 4.0 * (500.0 * 200.0 + 500.0 * 150.0 + 300.0 * 150.0 + 300.0 * 200.0);
        assert_relative_eq!(p.area(), expected, max_relative = 1e-3);
    }

    #[test]
    fn test_edges_include_closing_edge() {
        let radii = reference_radii();
        let p = build_domain_polygon(0.0, 0.0, &radii, 0.0, 3).unwrap();
        let edges: Vec<_> = p.edges().collect();
        assert_eq!(edges.len(), p.len());
        let (last_from, last_to) = edges[edges.len() - 1];
        assert_eq!(last_from, p.vertices()[p.len() - 1]);
        assert_eq!(last_to, p.vertices()[0]);
    }

    #[test]
    fn test_zero_radius_collapses_onto_axis() {
        let r = DomainRadii::new_unchecked(400.0, 200.0, 0.0, 0.0);
        let p = build_domain_polygon(0.0, 0.0, &r, 0.0, 20).unwrap();
        for &(x, _) in p.vertices() {
            assert_relative_eq!(x, 0.0, epsilon = 1e-9);
        }
        assert_relative_eq!(p.area(), 0.0, epsilon = 1e-9);
    }
}
