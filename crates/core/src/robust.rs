//! Robust geometric predicates for ring validation.
//!
//! Domain polygons are sampled from ellipse arcs, so consecutive vertices can be
//! extremely close or exactly repeated where two quadrants meet. The predicates
//! here use Shewchuk's adaptive precision orientation test (through the `robust`
//! crate) so that near-collinear input is classified correctly.
//!
//! ## References
//!
//! - Shewchuk, J.R. (1997). "Adaptive Precision Floating-Point Arithmetic and
//!   Fast Robust Predicates for Computational Geometry"
//! - <https://www.cs.cmu.edu/~quake/robust.html>
//!
//! ## Example
//!
//! ```rust
//! use ship_domain_core::robust::{orient2d, Orientation};
//!
//! let a = (0.0, 0.0);
//! let b = (1.0, 0.0);
//! let c = (0.5, 1.0);
//!
//! assert_eq!(orient2d(a, b, c), Orientation::CounterClockwise);
//! ```

use robust::{orient2d as robust_orient2d, Coord};

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are arranged counter-clockwise (left turn).
    CounterClockwise,
    /// Points are arranged clockwise (right turn).
    Clockwise,
    /// Points are collinear (on the same line).
    Collinear,
}

impl Orientation {
    /// Returns true if the orientation is counter-clockwise.
    #[inline]
    pub fn is_ccw(self) -> bool {
        matches!(self, Orientation::CounterClockwise)
    }

    /// Returns true if the points are collinear.
    #[inline]
    pub fn is_collinear(self) -> bool {
        matches!(self, Orientation::Collinear)
    }
}

// ============================================================================
// Core Predicates (using robust crate)
// ============================================================================

/// Determines the orientation of three 2D points.
///
/// - `CounterClockwise` if `pc` lies to the left of the directed line `pa -> pb`
/// - `Clockwise` if `pc` lies to the right
/// - `Collinear` if the three points are collinear
#[inline]
pub fn orient2d(pa: (f64, f64), pb: (f64, f64), pc: (f64, f64)) -> Orientation {
    let result = robust_orient2d(
        Coord { x: pa.0, y: pa.1 },
        Coord { x: pb.0, y: pb.1 },
        Coord { x: pc.0, y: pc.1 },
    );

    if result > 0.0 {
        Orientation::CounterClockwise
    } else if result < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

// ============================================================================
// Ring Predicates
// ============================================================================

/// Returns the vertices of `ring` with consecutive near-duplicates removed.
///
/// Two vertices closer than `tolerance` (in each coordinate) are treated as one.
/// The closing pair (last, first) is also collapsed.
pub fn dedup_ring(ring: &[(f64, f64)], tolerance: f64) -> Vec<(f64, f64)> {
    let same = |a: (f64, f64), b: (f64, f64)| {
        (a.0 - b.0).abs() <= tolerance && (a.1 - b.1).abs() <= tolerance
    };

    let mut out: Vec<(f64, f64)> = Vec::with_capacity(ring.len());
    for &p in ring {
        match out.last() {
            Some(&last) if same(last, p) => {}
            _ => out.push(p),
        }
    }

    while out.len() > 1 && same(out[0], out[out.len() - 1]) {
        out.pop();
    }

    out
}

/// Checks whether every vertex of the ring lies on one line.
///
/// Rings with fewer than three vertices are trivially collinear.
pub fn is_collinear_ring(ring: &[(f64, f64)]) -> bool {
    if ring.len() < 3 {
        return true;
    }

    let anchor = ring[0];
    // First vertex distinct from the anchor defines the line.
    let Some(&direction) = ring.iter().find(|&&p| p != anchor) else {
        return true;
    };

    ring.iter()
        .all(|&p| orient2d(anchor, direction, p).is_collinear())
}

/// Checks if a ring is convex using robust orientation tests.
///
/// Collinear and repeated vertices are skipped, so sampled arcs with
/// duplicated join points are still recognised as convex.
pub fn is_convex_robust(ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut expected_orientation: Option<Orientation> = None;

    for i in 0..n {
        let p0 = ring[i];
        let p1 = ring[(i + 1) % n];
        let p2 = ring[(i + 2) % n];

        let o = orient2d(p0, p1, p2);

        if o.is_collinear() {
            continue;
        }

        match expected_orientation {
            None => expected_orientation = Some(o),
            Some(expected) if expected != o => return false,
            _ => {}
        }
    }

    expected_orientation.is_some()
}

/// Computes the signed area of a ring with Kahan-compensated shoelace summation.
///
/// Positive if counter-clockwise, negative if clockwise.
pub fn signed_area_robust(ring: &[(f64, f64)]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut c = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        let term = ring[i].0 * ring[j].1 - ring[j].0 * ring[i].1;

        let y = term - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }

    sum / 2.0
}

/// Checks if a ring has counter-clockwise winding order.
pub fn is_ccw_robust(ring: &[(f64, f64)]) -> bool {
    signed_area_robust(ring) > 0.0
}

// ============================================================================
// Tests
// ============================================================================
