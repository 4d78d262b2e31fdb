//! # Ship Domain Core
//!
//! Shared foundations for the ship domain engine.
//!
//! This crate holds the pieces that are independent of the domain model itself:
//!
//! - **Errors**: [`Error`] and the [`Result`] alias used by every crate in the workspace
//! - **Transforms**: [`Transform2D`] (rotation + translation) and [`AABB2D`]
//! - **Robust predicates**: orientation, winding and degeneracy tests in [`robust`]
//!
//! ## Example
//!
//! ```rust
//! use ship_domain_core::Transform2D;
//!
//! // Vessel at (100, 50) steering due north: the bow (+x local) points up.
//! let t = Transform2D::from_course(100.0, 50.0, 0.0);
//! let (x, y) = t.apply(10.0, 0.0);
//! assert!((x - 100.0).abs() < 1e-9);
//! assert!((y - 60.0).abs() < 1e-9);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod robust;
pub mod transform;

// Re-exports
pub use error::{Error, Result};
pub use robust::Orientation;
pub use transform::{compass_to_math, Transform2D, AABB2D};
