//! Scenario report types and recording.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ship_domain::{FrameResult, ScenarioDriver, ScenarioRun};
use std::fs;
use std::path::Path;

/// One computed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRow {
    pub index: usize,
    /// Unix timestamp of vessel A's sample.
    pub timestamp: i64,
    /// `timestamp` as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub time: String,
    /// Distance between the vessels in meters
    pub distance: f64,
    pub is_overlapping: bool,
    /// Overlap area in m²
    pub overlap_area: f64,
    pub ring_count: usize,
    pub sog_a: f64,
    pub sog_b: f64,
    pub cog_a_deg: f64,
    pub cog_b_deg: f64,
    pub misaligned: bool,
    /// Set when the intersection could not be classified.
    pub warning: Option<String>,
}

impl From<&FrameResult> for FrameRow {
    fn from(frame: &FrameResult) -> Self {
        Self {
            index: frame.index,
            timestamp: frame.sample_a.timestamp,
            time: format_timestamp(frame.sample_a.timestamp),
            distance: frame.overlap.distance,
            is_overlapping: frame.overlap.is_overlapping,
            overlap_area: frame.overlap.area,
            ring_count: frame.overlap.ring_count(),
            sog_a: frame.sample_a.sog,
            sog_b: frame.sample_b.sog,
            cog_a_deg: frame.sample_a.cog_degrees(),
            cog_b_deg: frame.sample_b.cog_degrees(),
            misaligned: frame.misaligned,
            warning: frame.overlap.warning.as_ref().map(|w| w.to_string()),
        }
    }
}

/// A frame that could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRow {
    pub index: usize,
    pub error: String,
}

/// Aggregates over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub frames: usize,
    pub overlapping_frames: usize,
    pub first_overlap_index: Option<usize>,
    pub min_distance: Option<f64>,
    pub max_overlap_area: f64,
    pub failures: usize,
    pub misaligned_frames: usize,
    /// True if the run stopped at a failing frame.
    pub aborted: bool,
    pub elapsed_ms: u64,
}

/// Full report of one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    /// Generation time (RFC 3339, UTC)
    pub generated_at: String,
    pub vessel_a: VesselInfo,
    pub vessel_b: VesselInfo,
    pub rows: Vec<FrameRow>,
    pub failures: Vec<FailureRow>,
    pub summary: ReportSummary,
}

/// Vessel identity as used in the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselInfo {
    pub mmsi: String,
    pub length: f64,
}

fn format_timestamp(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

impl ScenarioReport {
    /// Builds a report from a finished run.
    pub fn from_run(
        name: impl Into<String>,
        driver: &ScenarioDriver,
        run: &ScenarioRun,
        elapsed_ms: u64,
    ) -> Self {
        let (profile_a, profile_b) = driver.profiles();
        let (mmsi_a, mmsi_b) = driver.mmsis();

        Self {
            name: name.into(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            vessel_a: VesselInfo {
                mmsi: mmsi_a.to_string(),
                length: profile_a.length(),
            },
            vessel_b: VesselInfo {
                mmsi: mmsi_b.to_string(),
                length: profile_b.length(),
            },
            rows: run.frames.iter().map(FrameRow::from).collect(),
            failures: run
                .failures
                .iter()
                .map(|f| FailureRow {
                    index: f.index,
                    error: f.source.to_string(),
                })
                .collect(),
            summary: ReportSummary {
                frames: run.frames.len(),
                overlapping_frames: run.overlapping_frames(),
                first_overlap_index: run.first_overlap(),
                min_distance: run.min_distance(),
                max_overlap_area: run.max_overlap_area(),
                failures: run.failures.len(),
                misaligned_frames: run.misaligned_frames(),
                aborted: run.aborted,
                elapsed_ms,
            },
        }
    }

    /// Saves the report to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Saves the per-frame rows to a CSV file, one column per `FrameRow` field.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()
    }

    /// Prints a summary table to stdout.
    pub fn print_summary(&self) {
        let s = &self.summary;

        println!("\n{:=<80}", "");
        println!("SCENARIO: {}", self.name);
        println!("{:=<80}", "");
        println!(
            "Vessel A: {} ({:.1} m)    Vessel B: {} ({:.1} m)",
            self.vessel_a.mmsi, self.vessel_a.length, self.vessel_b.mmsi, self.vessel_b.length
        );
        println!("{:-<80}", "");
        println!("{:<28} {:>12}", "Frames computed", s.frames);
        println!("{:<28} {:>12}", "Overlapping frames", s.overlapping_frames);
        println!(
            "{:<28} {:>12}",
            "First overlap at frame",
            s.first_overlap_index
                .map_or("-".to_string(), |i| i.to_string())
        );
        println!(
            "{:<28} {:>12}",
            "Minimum distance (m)",
            s.min_distance.map_or("-".to_string(), |d| format!("{:.1}", d))
        );
        println!("{:<28} {:>12.1}", "Max overlap area (m²)", s.max_overlap_area);
        println!("{:<28} {:>12}", "Failed frames", s.failures);
        println!("{:<28} {:>12}", "Misaligned frames", s.misaligned_frames);
        println!("{:<28} {:>12}", "Time (ms)", s.elapsed_ms);
        if s.aborted {
            if let Some(failure) = self.failures.last() {
                println!("Aborted at frame {}: {}", failure.index, failure.error);
            }
        }
        println!("{:=<80}\n", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ship_domain::{KinematicSample, ScenarioConfig, Track, VesselRegistry};

    fn sample_report() -> ScenarioReport {
        let registry: VesselRegistry = [("A", 100.0), ("B", 100.0)].into_iter().collect();
        let a = Track::new(
            "A",
            (0..4)
                .map(|i| KinematicSample::planar(0.0, 0.0, 10.0, 0.0, 1_649_376_000 + i * 10))
                .collect(),
        );
        let b = Track::new(
            "B",
            (0..4)
                .map(|i| {
                    KinematicSample::planar(0.0, 1500.0 - i as f64 * 300.0, 10.0, 180.0, 1_649_376_000 + i * 10)
                })
                .collect(),
        );
        let driver = ScenarioDriver::new(registry, a, b, ScenarioConfig::default()).unwrap();
        let run = driver.run();
        ScenarioReport::from_run("head-on", &driver, &run, 5)
    }

    #[test]
    fn test_summary() {
        let report = sample_report();
        assert_eq!(report.vessel_a.mmsi, "A");
        assert_eq!(report.summary.frames, 4);
        // Separations 1500, 1200, 900, 600 against a combined reach of ~1057 m
        assert_eq!(report.summary.overlapping_frames, 2);
        assert_eq!(report.summary.first_overlap_index, Some(2));
        assert_eq!(report.summary.min_distance, Some(600.0));
        assert_eq!(report.rows[0].time, "2022-04-08 00:00:00");
        assert!(!report.summary.aborted);
    }

    #[test]
    fn test_save_csv() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        report.save_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("index,timestamp,time,distance"));
        assert_eq!(
            lines[0],
            "index,timestamp,time,distance,is_overlapping,overlap_area,ring_count,sog_a,sog_b,cog_a_deg,cog_b_deg,misaligned,warning"
        );
        assert!(lines[1].starts_with("0,1649376000,2022-04-08 00:00:00,1500.0,false,0.0,0,"));
        // No warning: trailing empty column
        assert!(lines[1].ends_with(",false,"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<FrameRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), report.rows.len());
        assert_eq!(rows[3].ring_count, report.rows[3].ring_count);
        assert_eq!(rows[3].warning, None);
    }

    #[test]
    fn test_save_json() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save_json(&path).unwrap();

        let parsed: ScenarioReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.rows.len(), report.rows.len());
        assert_eq!(parsed.rows[2].time, report.rows[2].time);
        assert_eq!(parsed.summary.overlapping_frames, report.summary.overlapping_frames);
        assert_relative_eq!(
            parsed.summary.max_overlap_area,
            report.summary.max_overlap_area,
            max_relative = 1e-12
        );
    }
}
