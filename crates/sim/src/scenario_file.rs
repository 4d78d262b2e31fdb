//! TOML scenario files.
//!
//! A scenario file names the two AIS tracks, where the vessel lengths come
//! from, and the engine settings:
//!
//! ```toml
//! name = "Approach off Qingdao"
//! registry = "lengths.csv"
//! parallel = true
//!
//! [vessel_a]
//! track = "209203000.csv"
//!
//! [vessel_b]
//! track = "477369900.csv"
//! length = 225.0
//!
//! [filter]
//! moving_only = true
//! bbox = { min_lat = 35.9, max_lat = 36.3, min_lng = 120.036, max_lng = 120.503 }
//!
//! [engine]
//! samples_per_quadrant = 100
//! failure_policy = "skip"
//! alignment_tolerance_secs = 60
//!
//! [output]
//! json = "report.json"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use crate::ais::{load_registry, load_track, trim_to_common_length, TrackFilter};
use crate::error::LoadError;
use crate::report::ScenarioReport;
use instant::Instant;
use serde::{Deserialize, Serialize};
use ship_domain::{ScenarioConfig, ScenarioDriver, VesselRegistry};
use std::path::{Path, PathBuf};

/// One vessel of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselEntry {
    /// AIS CSV file.
    pub track: PathBuf,
    /// Vessel to select when the file holds several.
    #[serde(default)]
    pub mmsi: Option<String>,
    /// Length override in meters; takes precedence over the registry.
    #[serde(default)]
    pub length: Option<f64>,
}

impl VesselEntry {
    /// Creates an entry for a track file.
    pub fn new(track: impl Into<PathBuf>) -> Self {
        Self {
            track: track.into(),
            mmsi: None,
            length: None,
        }
    }

    /// Sets the vessel to select.
    pub fn with_mmsi(mut self, mmsi: impl Into<String>) -> Self {
        self.mmsi = Some(mmsi.into());
        self
    }

    /// Sets the length override.
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    fn filter(&self, base: &TrackFilter) -> TrackFilter {
        match &self.mmsi {
            Some(mmsi) => base.clone().with_mmsi(mmsi.clone()),
            None => base.clone(),
        }
    }
}

/// Report destinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputEntry {
    #[serde(default)]
    pub json: Option<PathBuf>,
    #[serde(default)]
    pub csv: Option<PathBuf>,
}

/// A complete two-vessel scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: Option<String>,
    /// Vessel length table.
    #[serde(default)]
    pub registry: Option<PathBuf>,
    pub vessel_a: VesselEntry,
    pub vessel_b: VesselEntry,
    /// Row filter applied to both tracks.
    #[serde(default)]
    pub filter: TrackFilter,
    #[serde(default)]
    pub engine: ScenarioConfig,
    /// Compute frames in parallel.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub output: OutputEntry,
}

impl ScenarioFile {
    /// Creates a scenario for two track files with default settings.
    pub fn new(vessel_a: VesselEntry, vessel_b: VesselEntry) -> Self {
        Self {
            name: None,
            registry: None,
            vessel_a,
            vessel_b,
            filter: TrackFilter::default(),
            engine: ScenarioConfig::default(),
            parallel: false,
            output: OutputEntry::default(),
        }
    }

    /// Load a scenario from a TOML file, resolving relative paths against its directory.
    pub fn from_toml_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let mut file: Self = toml::from_str(&content)?;
        if let Some(dir) = path.parent() {
            file.resolve_paths(dir);
        }
        if file.name.is_none() {
            file.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        }
        Ok(file)
    }

    fn resolve_paths(&mut self, dir: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        resolve(&mut self.vessel_a.track);
        resolve(&mut self.vessel_b.track);
        for p in [
            self.registry.as_mut(),
            self.output.json.as_mut(),
            self.output.csv.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            resolve(p);
        }
    }

    /// Scenario name for reports.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            format!(
                "{} vs {}",
                self.vessel_a.track.display(),
                self.vessel_b.track.display()
            )
        })
    }

    /// Loads both tracks and the registry and builds the driver.
    ///
    /// Tracks are trimmed to a common length before the driver is created.
    pub fn load_driver(&self) -> Result<ScenarioDriver, LoadError> {
        let mut registry = match &self.registry {
            Some(path) => load_registry(path)?,
            None => VesselRegistry::new(),
        };

        let mut track_a = load_track(&self.vessel_a.track, &self.vessel_a.filter(&self.filter))?;
        let mut track_b = load_track(&self.vessel_b.track, &self.vessel_b.filter(&self.filter))?;

        for (entry, mmsi) in [(&self.vessel_a, &track_a.mmsi), (&self.vessel_b, &track_b.mmsi)] {
            if let Some(length) = entry.length {
                registry = registry.with_vessel(mmsi.clone(), length);
            }
        }

        let frames = trim_to_common_length(&mut track_a, &mut track_b);
        log::info!(
            "scenario {}: {} frames ({} vs {})",
            self.display_name(),
            frames,
            track_a.mmsi,
            track_b.mmsi
        );

        Ok(ScenarioDriver::new(
            registry,
            track_a,
            track_b,
            self.engine.clone(),
        )?)
    }

    /// Runs the scenario and builds its report. Outputs are not written.
    pub fn run(&self) -> Result<ScenarioReport, LoadError> {
        let driver = self.load_driver()?;

        let start = Instant::now();
        let run = if self.parallel {
            driver.run_parallel()
        } else {
            driver.run()
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let report = ScenarioReport::from_run(self.display_name(), &driver, &run, elapsed_ms);
        log::info!(
            "scenario {}: {} of {} frames overlapping, {} failed, {} ms",
            report.name,
            report.summary.overlapping_frames,
            report.summary.frames,
            report.summary.failures,
            elapsed_ms
        );
        Ok(report)
    }

    /// Writes the report to the configured outputs.
    pub fn write_outputs(&self, report: &ScenarioReport) -> Result<(), LoadError> {
        if let Some(path) = &self.output.json {
            report.save_json(path)?;
            log::info!("wrote {}", path.display());
        }
        if let Some(path) = &self.output.csv {
            report.save_csv(path)?;
            log::info!("wrote {}", path.display());
        }
        Ok(())
    }
}
