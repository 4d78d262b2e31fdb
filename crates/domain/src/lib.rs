//! # Ship Domain
//!
//! Four-quadrant ship domains and pairwise collision-risk detection.
//!
//! A ship domain is the area around a vessel that other traffic should keep
//! clear of. Its size grows with the vessel length and speed, and it reaches
//! further ahead than astern and further to starboard than to port.
//!
//! ## Features
//!
//! - Speed and length dependent domain radii ([`compute_radii`])
//! - Polygonal domains from four quarter-ellipse arcs ([`build_domain_polygon`])
//! - Overlap detection with intersection rings and area ([`detect_overlap`])
//! - Frame-by-frame evaluation of two vessel tracks ([`ScenarioDriver`]),
//!   sequential or parallel
//!
//! ## Quick Start
//!
//! ```rust
//! use ship_domain::{build_domain_polygon, compute_radii, detect_overlap};
//!
//! // 100 m vessel at 10 knots heading north from the origin
//! let r = compute_radii(100.0, 10.0).unwrap();
//! let own = build_domain_polygon(0.0, 0.0, &r, 0.0, 100).unwrap();
//!
//! // Same vessel 800 m to the north heading south
//! let other = build_domain_polygon(0.0, 800.0, &r, std::f64::consts::PI, 100).unwrap();
//!
//! let result = detect_overlap(&own, &other).unwrap();
//! assert!(result.is_overlapping);
//! println!("overlap area: {:.0} m²", result.area);
//! ```
//!
//! ## Coordinates
//!
//! World coordinates are planar meters, x east and y north. Headings are
//! compass courses in radians, clockwise from north. Geodetic positions are
//! converted with a [`Projector`] before any geometry is built.

pub mod kinematics;
pub mod overlap;
pub mod polygon;
pub mod projection;
pub mod radii;
pub mod registry;
pub mod scenario;

pub use kinematics::{KinematicSample, Position, VesselProfile};
pub use overlap::{
    detect_overlap, ClippedShape, Clipper, IOverlayClipper, OverlapConfig, OverlapDetector,
    OverlapResult, TopologyWarning,
};
pub use polygon::{build_domain_polygon, DomainPolygon, Quadrant, DEFAULT_SAMPLES_PER_QUADRANT};
pub use projection::{EquirectangularProjector, Projector};
pub use radii::{compute_radii, domain_coefficients, DomainCoefficients, DomainRadii};
pub use registry::VesselRegistry;
pub use scenario::{
    FailurePolicy, FrameError, FrameResult, Frames, ScenarioConfig, ScenarioDriver, ScenarioRun,
    Track,
};
pub use ship_domain_core::{Error, Result};
