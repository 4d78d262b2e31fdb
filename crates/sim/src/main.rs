//! Ship domain simulation CLI

use anyhow::Context;
use clap::{Parser, Subcommand};
use ship_domain::{build_domain_polygon, compute_radii, domain_coefficients, FailurePolicy};
use ship_domain_sim::{OutputEntry, ScenarioFile, VesselEntry};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "domain-sim")]
#[command(about = "Four-quadrant ship domain collision-risk simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the domain radii of a vessel
    Radii {
        /// Vessel length in meters
        #[arg(short, long)]
        length: f64,

        /// Speed over ground in knots
        #[arg(short, long)]
        speed: f64,
    },

    /// Print the domain polygon of a vessel as JSON
    Polygon {
        /// Vessel length in meters
        #[arg(short, long)]
        length: f64,

        /// Speed over ground in knots
        #[arg(short, long)]
        speed: f64,

        /// Compass heading in degrees
        #[arg(long, default_value = "0")]
        heading: f64,

        /// Easting of the vessel in meters
        #[arg(short, default_value = "0", allow_hyphen_values = true)]
        x: f64,

        /// Northing of the vessel in meters
        #[arg(short, default_value = "0", allow_hyphen_values = true)]
        y: f64,

        /// Vertices per quadrant
        #[arg(short = 'n', long, default_value = "100")]
        samples: usize,
    },

    /// Run a two-vessel scenario from AIS CSV files
    Run {
        /// AIS track of vessel A
        #[arg(long)]
        track_a: PathBuf,

        /// AIS track of vessel B
        #[arg(long)]
        track_b: PathBuf,

        /// Vessel length table (MMSI in column 1, length in column 5)
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Length of vessel A in meters, overrides the registry
        #[arg(long)]
        length_a: Option<f64>,

        /// Length of vessel B in meters, overrides the registry
        #[arg(long)]
        length_b: Option<f64>,

        /// Length for vessels missing from the registry
        #[arg(long)]
        default_length: Option<f64>,

        /// Vertices per quadrant
        #[arg(short = 'n', long, default_value = "100")]
        samples: usize,

        /// Continue past frames that cannot be computed
        #[arg(long)]
        skip_failures: bool,

        /// Drop stationary reports
        #[arg(long)]
        moving_only: bool,

        /// Compute frames in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Output file for the report (JSON)
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Output file for per-frame rows (CSV)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run a scenario described in a TOML file
    RunFile {
        /// Path to the scenario file
        file: PathBuf,

        /// Output file for the report (JSON), overrides the scenario file
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Output file for per-frame rows (CSV), overrides the scenario file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Radii { length, speed } => {
            let c = domain_coefficients(speed)?;
            let r = compute_radii(length, speed)?;

            println!("Vessel: {:.1} m at {:.1} kn", length, speed);
            println!("  k_AD       {:>10.4}", c.k_ad);
            println!("  k_DT       {:>10.4}", c.k_dt);
            println!("  fore       {:>10.2} m", r.fore);
            println!("  aft        {:>10.2} m", r.aft);
            println!("  starboard  {:>10.2} m", r.starboard);
            println!("  port       {:>10.2} m", r.port);
        }

        Commands::Polygon {
            length,
            speed,
            heading,
            x,
            y,
            samples,
        } => {
            let r = compute_radii(length, speed)?;
            let polygon = build_domain_polygon(x, y, &r, heading.to_radians(), samples)?;
            println!("{}", serde_json::to_string_pretty(&polygon)?);
        }

        Commands::Run {
            track_a,
            track_b,
            registry,
            length_a,
            length_b,
            default_length,
            samples,
            skip_failures,
            moving_only,
            parallel,
            json,
            csv,
        } => {
            let mut vessel_a = VesselEntry::new(track_a);
            vessel_a.length = length_a;
            let mut vessel_b = VesselEntry::new(track_b);
            vessel_b.length = length_b;

            let mut scenario = ScenarioFile::new(vessel_a, vessel_b);
            scenario.registry = registry;
            scenario.parallel = parallel;
            scenario.filter.moving_only = moving_only;
            scenario.engine.samples_per_quadrant = samples;
            scenario.engine.default_length = default_length;
            if skip_failures {
                scenario.engine.failure_policy = FailurePolicy::Skip;
            }
            scenario.output = OutputEntry { json, csv };

            let report = scenario.run()?;
            report.print_summary();
            scenario.write_outputs(&report)?;
        }

        Commands::RunFile { file, json, csv } => {
            let mut scenario = ScenarioFile::from_toml_file(&file)
                .with_context(|| format!("failed to load scenario {}", file.display()))?;
            if json.is_some() {
                scenario.output.json = json;
            }
            if csv.is_some() {
                scenario.output.csv = csv;
            }

            let report = scenario.run()?;
            report.print_summary();
            scenario.write_outputs(&report)?;
        }
    }

    Ok(())
}
