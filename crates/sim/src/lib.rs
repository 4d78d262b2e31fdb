//! # Ship Domain Sim
//!
//! Drives the ship domain engine from recorded AIS data.
//!
//! ## Features
//!
//! - AIS CSV track and vessel length loading ([`load_track`], [`load_registry`])
//! - TOML scenario files ([`ScenarioFile`])
//! - JSON/CSV reports with run summaries ([`ScenarioReport`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use ship_domain_sim::{ScenarioFile, VesselEntry};
//!
//! let scenario = ScenarioFile::new(
//!     VesselEntry::new("209203000.csv").with_length(180.0),
//!     VesselEntry::new("477369900.csv").with_length(225.0),
//! );
//! let report = scenario.run().unwrap();
//! report.print_summary();
//! ```

pub mod ais;
pub mod error;
pub mod report;
pub mod scenario_file;

pub use ais::{load_registry, load_track, parse_timestamp, trim_to_common_length, GeoBox, TrackFilter};
pub use error::LoadError;
pub use report::{FailureRow, FrameRow, ReportSummary, ScenarioReport, VesselInfo};
pub use scenario_file::{OutputEntry, ScenarioFile, VesselEntry};
