//! AIS CSV loading.
//!
//! Position reports are read from CSV files with at least the columns
//! `lat, lng, sog, cog, ts` (COG in degrees). An optional `mmsi` column lets a
//! single file hold several vessels; [`TrackFilter::mmsi`] picks one of them.
//!
//! Vessel lengths come from a separate headerless-or-not table whose first
//! column is the MMSI and fifth column the length in meters.

use crate::error::LoadError;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use ship_domain::{KinematicSample, Track, VesselRegistry};
use std::path::Path;

/// Timestamp layouts accepted in the `ts` column.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Parses an AIS timestamp into unix seconds (UTC).
///
/// Accepts the layouts in order and falls back to plain unix seconds.
/// Returns `None` if nothing matches.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc().timestamp())
        .or_else(|| raw.parse::<i64>().ok())
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.floor() as i64)
        })
}

/// Latitude/longitude bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBox {
    /// Creates a box; bounds are reordered if given the wrong way round.
    pub fn new(lat_a: f64, lat_b: f64, lng_a: f64, lng_b: f64) -> Self {
        Self {
            min_lat: lat_a.min(lat_b),
            max_lat: lat_a.max(lat_b),
            min_lng: lng_a.min(lng_b),
            max_lng: lng_a.max(lng_b),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

/// Row filter applied while loading a track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackFilter {
    /// Keep only rows of this vessel (requires an `mmsi` column).
    pub mmsi: Option<String>,
    /// Keep only rows inside this box.
    pub bbox: Option<GeoBox>,
    /// Drop rows with zero speed over ground.
    pub moving_only: bool,
}

impl TrackFilter {
    /// Creates a filter that keeps every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the track to one vessel.
    pub fn with_mmsi(mut self, mmsi: impl Into<String>) -> Self {
        self.mmsi = Some(mmsi.into());
        self
    }

    /// Restricts the track to a region.
    pub fn with_bbox(mut self, bbox: GeoBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Drops stationary reports.
    pub fn with_moving_only(mut self, moving_only: bool) -> Self {
        self.moving_only = moving_only;
        self
    }

    fn accepts(&self, record: &AisRecord) -> bool {
        if let Some(wanted) = &self.mmsi {
            if record.mmsi.as_deref().map(str::trim) != Some(wanted.trim()) {
                return false;
            }
        }
        if let Some(bbox) = &self.bbox {
            if !bbox.contains(record.lat, record.lng) {
                return false;
            }
        }
        !(self.moving_only && record.sog <= 0.0)
    }
}

#[derive(Debug, Deserialize)]
struct AisRecord {
    lat: f64,
    lng: f64,
    sog: f64,
    cog: f64,
    ts: String,
    #[serde(default)]
    mmsi: Option<String>,
}

/// Loads one vessel track from an AIS CSV file.
///
/// Rows that fail to parse or carry an unreadable timestamp are skipped with a
/// warning. The remaining samples are sorted by timestamp; rows with equal
/// timestamps keep their file order. The track is named after the filter MMSI,
/// the first `mmsi` value seen, or the file stem, in that order.
///
/// # Errors
/// `LoadError::Io`/`Csv` if the file cannot be read, `LoadError::EmptyTrack` if
/// no row survives parsing and filtering.
pub fn load_track(path: impl AsRef<Path>, filter: &TrackFilter) -> Result<Track, LoadError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut samples = Vec::new();
    let mut mmsi = filter.mmsi.clone();
    let mut skipped = 0usize;

    for (row, result) in reader.deserialize::<AisRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("{}: skipping row {}: {}", path.display(), row + 2, e);
                skipped += 1;
                continue;
            }
        };

        if !filter.accepts(&record) {
            continue;
        }

        let Some(timestamp) = parse_timestamp(&record.ts) else {
            log::warn!(
                "{}: skipping row {}: unreadable timestamp '{}'",
                path.display(),
                row + 2,
                record.ts
            );
            skipped += 1;
            continue;
        };

        if mmsi.is_none() {
            mmsi = record.mmsi.as_deref().map(|m| m.trim().to_string());
        }
        samples.push(KinematicSample::geodetic(
            record.lat,
            record.lng,
            record.sog,
            record.cog,
            timestamp,
        ));
    }

    if samples.is_empty() {
        return Err(LoadError::EmptyTrack(path.display().to_string()));
    }

    samples.sort_by_key(|s| s.timestamp);

    let mmsi = mmsi
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();

    log::info!(
        "loaded {} samples for vessel {} from {} ({} rows skipped)",
        samples.len(),
        mmsi,
        path.display(),
        skipped
    );

    Ok(Track::new(mmsi, samples))
}

/// Loads a vessel length table.
///
/// The first column holds the MMSI and the fifth the length in meters. A first
/// row whose MMSI cell reads `mmsi` is treated as a header. Rows that are too
/// short or whose length does not parse are skipped.
pub fn load_registry(path: impl AsRef<Path>) -> Result<VesselRegistry, LoadError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut registry = VesselRegistry::new();
    let mut skipped = 0usize;

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let Some(mmsi) = record.get(0) else {
            continue;
        };
        if row == 0 && mmsi.eq_ignore_ascii_case("mmsi") {
            continue;
        }

        match record.get(4).and_then(|v| v.parse::<f64>().ok()) {
            Some(length) => registry = registry.with_vessel(mmsi, length),
            None => {
                log::debug!("{}: no length for vessel {} on row {}", path.display(), mmsi, row + 1);
                skipped += 1;
            }
        }
    }

    log::info!(
        "loaded {} vessel lengths from {} ({} rows skipped)",
        registry.len(),
        path.display(),
        skipped
    );

    Ok(registry)
}

/// Truncates the longer of two tracks so both have the same number of samples.
///
/// Returns the common length.
pub fn trim_to_common_length(a: &mut Track, b: &mut Track) -> usize {
    let len = a.len().min(b.len());
    a.samples.truncate(len);
    b.samples.truncate(len);
    len
}
