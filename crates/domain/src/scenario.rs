//! Frame-by-frame evaluation of a two-vessel encounter.
//!
//! The driver pairs the samples of two tracks by index, builds both domains for
//! every frame and runs the overlap detector on the pair. Tracks are expected to
//! be aligned already (same index means same moment); the driver does not
//! resample by timestamp, it only reports frames whose timestamps disagree.

use crate::kinematics::{KinematicSample, Position, VesselProfile};
use crate::overlap::{OverlapConfig, OverlapDetector, OverlapResult};
use crate::polygon::{build_domain_polygon, DomainPolygon, DEFAULT_SAMPLES_PER_QUADRANT};
use crate::projection::{EquirectangularProjector, Projector};
use crate::radii::compute_radii;
use crate::registry::VesselRegistry;
use rayon::prelude::*;
use ship_domain_core::{Error, Result};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered samples of one vessel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    /// Vessel identifier used for the registry lookup.
    pub mmsi: String,
    /// Samples in time order.
    pub samples: Vec<KinematicSample>,
}

impl Track {
    /// Creates a track.
    pub fn new(mmsi: impl Into<String>, samples: Vec<KinematicSample>) -> Self {
        Self {
            mmsi: mmsi.into(),
            samples,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the track has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Position of the first geodetic sample, if any.
    fn first_geodetic(&self) -> Option<(f64, f64)> {
        self.samples.iter().find_map(|s| match s.position {
            Position::Geodetic { lat, lng } => Some((lat, lng)),
            Position::Planar { .. } => None,
        })
    }
}

/// What the driver does when a frame cannot be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FailurePolicy {
    /// Report the failing frame and stop.
    #[default]
    Abort,
    /// Report the failing frame and continue with the next one.
    Skip,
}

/// Scenario driver configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScenarioConfig {
    /// Vertices per quadrant of every domain polygon.
    pub samples_per_quadrant: usize,

    /// Handling of per-frame failures.
    pub failure_policy: FailurePolicy,

    /// Length used for vessels missing from the registry.
    pub default_length: Option<f64>,

    /// Maximum timestamp difference (seconds) between paired samples before
    /// the frame is reported as misaligned. `None` disables the check.
    pub alignment_tolerance_secs: Option<i64>,

    /// Overlap detector settings.
    pub overlap: OverlapConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            samples_per_quadrant: DEFAULT_SAMPLES_PER_QUADRANT,
            failure_policy: FailurePolicy::default(),
            default_length: None,
            alignment_tolerance_secs: None,
            overlap: OverlapConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of vertices per quadrant.
    pub fn with_samples_per_quadrant(mut self, n: usize) -> Self {
        self.samples_per_quadrant = n;
        self
    }

    /// Sets the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Sets the fallback vessel length.
    pub fn with_default_length(mut self, length: f64) -> Self {
        self.default_length = Some(length);
        self
    }

    /// Enables the timestamp alignment check.
    pub fn with_alignment_tolerance(mut self, secs: i64) -> Self {
        self.alignment_tolerance_secs = Some(secs.max(0));
        self
    }

    /// Sets the overlap detector configuration.
    pub fn with_overlap(mut self, overlap: OverlapConfig) -> Self {
        self.overlap = overlap;
        self
    }
}

/// Everything computed for one frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameResult {
    /// Frame index.
    pub index: usize,
    /// Sample of vessel A.
    pub sample_a: KinematicSample,
    /// Sample of vessel B.
    pub sample_b: KinematicSample,
    /// Domain of vessel A.
    pub polygon_a: DomainPolygon,
    /// Domain of vessel B.
    pub polygon_b: DomainPolygon,
    /// Overlap of the two domains.
    pub overlap: OverlapResult,
    /// True if the paired timestamps differ by more than the configured tolerance.
    pub misaligned: bool,
}

impl FrameResult {
    /// Planar position of vessel A.
    pub fn center_a(&self) -> (f64, f64) {
        self.polygon_a.center()
    }

    /// Planar position of vessel B.
    pub fn center_b(&self) -> (f64, f64) {
        self.polygon_b.center()
    }
}

/// A frame that could not be computed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("frame {index}: {source}")]
pub struct FrameError {
    /// Frame index.
    pub index: usize,
    /// Underlying failure.
    pub source: Error,
}

/// Collected results of a full pass over a scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRun {
    /// Successfully computed frames, in frame order.
    pub frames: Vec<FrameResult>,
    /// Frames that failed, in frame order.
    pub failures: Vec<FrameError>,
    /// True if the run stopped early under [`FailurePolicy::Abort`].
    pub aborted: bool,
}

impl ScenarioRun {
    fn collect(results: impl IntoIterator<Item = std::result::Result<FrameResult, FrameError>>, policy: FailurePolicy) -> Self {
        let mut run = ScenarioRun::default();
        for result in results {
            match result {
                Ok(frame) => run.frames.push(frame),
                Err(err) => {
                    run.failures.push(err);
                    if policy == FailurePolicy::Abort {
                        run.aborted = true;
                        break;
                    }
                }
            }
        }
        run
    }

    /// Number of frames whose domains overlap.
    pub fn overlapping_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.overlap.is_overlapping).count()
    }

    /// Index of the first overlapping frame.
    pub fn first_overlap(&self) -> Option<usize> {
        self.frames
            .iter()
            .find(|f| f.overlap.is_overlapping)
            .map(|f| f.index)
    }

    /// Smallest distance between the vessels over all computed frames.
    pub fn min_distance(&self) -> Option<f64> {
        self.frames
            .iter()
            .map(|f| f.overlap.distance)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Largest overlap area over all computed frames.
    pub fn max_overlap_area(&self) -> f64 {
        self.frames
            .iter()
            .map(|f| f.overlap.area)
            .fold(0.0, f64::max)
    }

    /// Number of frames flagged as misaligned.
    pub fn misaligned_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.misaligned).count()
    }
}

struct Vessel {
    track: Track,
    profile: VesselProfile,
}

impl Vessel {
    fn resolve(track: Track, registry: &VesselRegistry, default_length: Option<f64>) -> Result<Self> {
        let profile = match registry.profile(&track.mmsi) {
            Some(profile) => profile?,
            None => match default_length {
                Some(length) => {
                    log::info!(
                        "vessel {} not in registry, using default length {} m",
                        track.mmsi,
                        length
                    );
                    VesselProfile::new(length)?
                }
                None => return Err(Error::UnknownVessel(track.mmsi.clone())),
            },
        };
        Ok(Self { track, profile })
    }
}

/// Evaluates the domains of two vessels frame by frame.
///
/// # Example
/// ```rust
/// use ship_domain::{KinematicSample, ScenarioConfig, ScenarioDriver, Track, VesselRegistry};
///
/// let registry: VesselRegistry = [("A", 100.0), ("B", 100.0)].into_iter().collect();
/// let a = Track::new("A", vec![KinematicSample::planar(0.0, 0.0, 10.0, 0.0, 0)]);
/// let b = Track::new("B", vec![KinematicSample::planar(0.0, 800.0, 10.0, 180.0, 0)]);
///
/// let driver = ScenarioDriver::new(registry, a, b, ScenarioConfig::default()).unwrap();
/// let frame = driver.frames().next().unwrap().unwrap();
/// assert!(frame.overlap.is_overlapping);
/// ```
pub struct ScenarioDriver {
    registry: VesselRegistry,
    vessel_a: Vessel,
    vessel_b: Vessel,
    config: ScenarioConfig,
    projector: Box<dyn Projector>,
    detector: OverlapDetector,
}

impl ScenarioDriver {
    /// Creates a driver for two tracks.
    ///
    /// Vessel lengths are looked up in `registry`, falling back to
    /// `config.default_length`. Geodetic samples are projected around the first
    /// geodetic sample of vessel A (or B) unless another projector is set.
    ///
    /// # Errors
    /// - `Error::UnknownVessel` if a vessel has no length and no default is configured.
    /// - `Error::InvalidParameter` if a length is not positive or
    ///   `samples_per_quadrant` is zero.
    pub fn new(
        registry: VesselRegistry,
        track_a: Track,
        track_b: Track,
        config: ScenarioConfig,
    ) -> Result<Self> {
        if config.samples_per_quadrant == 0 {
            return Err(Error::InvalidParameter(
                "samples per quadrant must be at least 1".into(),
            ));
        }

        let (origin_lat, origin_lng) = track_a
            .first_geodetic()
            .or_else(|| track_b.first_geodetic())
            .unwrap_or((0.0, 0.0));

        let vessel_a = Vessel::resolve(track_a, &registry, config.default_length)?;
        let vessel_b = Vessel::resolve(track_b, &registry, config.default_length)?;

        if vessel_a.track.len() != vessel_b.track.len() {
            log::warn!(
                "track lengths differ ({} vs {}), using the first {} frames",
                vessel_a.track.len(),
                vessel_b.track.len(),
                vessel_a.track.len().min(vessel_b.track.len())
            );
        }

        let detector = OverlapDetector::new(config.overlap.clone());

        Ok(Self {
            registry,
            vessel_a,
            vessel_b,
            config,
            projector: Box::new(EquirectangularProjector::new(origin_lat, origin_lng)),
            detector,
        })
    }

    /// Replaces the coordinate projector.
    pub fn with_projector(mut self, projector: impl Projector + 'static) -> Self {
        self.projector = Box::new(projector);
        self
    }

    /// Number of frames: the length of the shorter track.
    pub fn frame_count(&self) -> usize {
        self.vessel_a.track.len().min(self.vessel_b.track.len())
    }

    /// The driver configuration.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// The registry the vessel lengths were resolved from.
    pub fn registry(&self) -> &VesselRegistry {
        &self.registry
    }

    /// Profiles of vessel A and B.
    pub fn profiles(&self) -> (VesselProfile, VesselProfile) {
        (self.vessel_a.profile, self.vessel_b.profile)
    }

    /// Identifiers of vessel A and B.
    pub fn mmsis(&self) -> (&str, &str) {
        (&self.vessel_a.track.mmsi, &self.vessel_b.track.mmsi)
    }

    /// Returns a fresh iterator over all frames.
    ///
    /// Each call starts again from frame 0. Dropping the iterator early is fine.
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            driver: self,
            next: 0,
            done: false,
        }
    }

    /// Computes a single frame.
    ///
    /// # Errors
    /// `Error::InvalidParameter` for an out-of-range index or invalid sample
    /// (for example zero speed), `Error::DegenerateGeometry` or
    /// `Error::UnsupportedIntersectionTopology` from the detector.
    pub fn frame(&self, index: usize) -> Result<FrameResult> {
        if index >= self.frame_count() {
            return Err(Error::InvalidParameter(format!(
                "frame index {} out of range (frame count {})",
                index,
                self.frame_count()
            )));
        }

        let sample_a = self.vessel_a.track.samples[index];
        let sample_b = self.vessel_b.track.samples[index];

        let polygon_a = self.domain(&sample_a, &self.vessel_a.profile)?;
        let polygon_b = self.domain(&sample_b, &self.vessel_b.profile)?;
        let overlap = self.detector.detect(&polygon_a, &polygon_b)?;

        let skew = sample_a.timestamp.abs_diff(sample_b.timestamp);
        let misaligned = self
            .config
            .alignment_tolerance_secs
            .is_some_and(|tolerance| skew > tolerance.max(0).unsigned_abs());
        if misaligned {
            log::warn!("frame {}: timestamps differ by {} s", index, skew);
        }

        log::debug!(
            "frame {}: distance {:.1} m, overlap {} ({:.1} m², {} rings)",
            index,
            overlap.distance,
            overlap.is_overlapping,
            overlap.area,
            overlap.ring_count()
        );

        Ok(FrameResult {
            index,
            sample_a,
            sample_b,
            polygon_a,
            polygon_b,
            overlap,
            misaligned,
        })
    }

    fn domain(&self, sample: &KinematicSample, profile: &VesselProfile) -> Result<DomainPolygon> {
        let (x, y) = match sample.position {
            Position::Geodetic { lat, lng } => self.projector.project(lat, lng),
            Position::Planar { x, y } => (x, y),
        };
        let radii = compute_radii(profile.length(), sample.sog)?;
        build_domain_polygon(x, y, &radii, sample.cog, self.config.samples_per_quadrant)
    }

    /// Runs every frame sequentially and collects the results.
    pub fn run(&self) -> ScenarioRun {
        ScenarioRun::collect(self.frames(), self.config.failure_policy)
    }

    /// Computes all frames in parallel.
    ///
    /// Produces the same [`ScenarioRun`] as [`ScenarioDriver::run`]; under
    /// [`FailurePolicy::Abort`] frames after the first failure are computed but
    /// discarded.
    pub fn run_parallel(&self) -> ScenarioRun {
        let results: Vec<_> = (0..self.frame_count())
            .into_par_iter()
            .map(|index| self.frame(index).map_err(|source| FrameError { index, source }))
            .collect();

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            if self.config.failure_policy == FailurePolicy::Skip {
                log::warn!("skipping {}", err);
            }
        }

        ScenarioRun::collect(results, self.config.failure_policy)
    }
}

/// Lazy iterator over the frames of a [`ScenarioDriver`].
pub struct Frames<'a> {
    driver: &'a ScenarioDriver,
    next: usize,
    done: bool,
}

impl Iterator for Frames<'_> {
    type Item = std::result::Result<FrameResult, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next >= self.driver.frame_count() {
            return None;
        }

        let index = self.next;
        self.next += 1;

        match self.driver.frame(index) {
            Ok(frame) => Some(Ok(frame)),
            Err(source) => {
                let err = FrameError { index, source };
                match self.driver.config.failure_policy {
                    FailurePolicy::Abort => self.done = true,
                    FailurePolicy::Skip => log::warn!("skipping {}", err),
                }
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = self.driver.frame_count().saturating_sub(self.next);
        (0, Some(remaining))
    }
}
