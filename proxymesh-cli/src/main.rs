//! proxymesh CLI - silhouette-preserving mesh decimation
//!
//! Reduces OBJ meshes and reports their edge classification.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use proxymesh_core::{MeshHost, Vector3d};
use proxymesh_decimate::{
    accumulate, classify, normalized_view, CostMetric, DecimateParams, MeshSnapshot,
    QuadricDecimator,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "proxymesh")]
#[command(about = "Silhouette-preserving mesh decimation", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decimate a mesh and write the result
    Reduce {
        /// Input mesh (.obj)
        input: PathBuf,
        /// Output mesh (.obj)
        #[arg(short, long)]
        output: PathBuf,
        /// Percentage of vertices to remove
        #[arg(short = 'r', long, default_value_t = 50.0)]
        percentage: f64,
        /// View direction for silhouette detection, as X,Y,Z (default: 0,0,1)
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        view: Option<Vector3d>,
        /// Collapse cost metric
        #[arg(long, value_enum, default_value_t = Metric::Quadric)]
        metric: Metric,
        /// Stop once the cheapest collapse costs more than this
        #[arg(long)]
        max_cost: Option<f64>,
        /// Print the resolved parameters as JSON before running
        #[arg(long)]
        print_params: bool,
    },
    /// Show vertex, face and edge statistics of a mesh
    Inspect {
        /// Input mesh (.obj)
        input: PathBuf,
        /// View direction for silhouette detection, as X,Y,Z (default: 0,0,1)
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        view: Option<Vector3d>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Metric {
    Quadric,
    EdgeLength,
}

impl From<Metric> for CostMetric {
    fn from(metric: Metric) -> Self {
        match metric {
            Metric::Quadric => CostMetric::Quadric,
            Metric::EdgeLength => CostMetric::EdgeLength,
        }
    }
}

fn parse_vector(s: &str) -> std::result::Result<Vector3d, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", s, e))?;
    match parts[..] {
        [x, y, z] => Ok(Vector3d::new(x, y, z)),
        _ => Err(format!("expected three comma-separated numbers, got '{}'", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Reduce {
            input,
            output,
            percentage,
            view,
            metric,
            max_cost,
            print_params,
        } => {
            let mut params =
                DecimateParams::with_percentage(percentage).with_cost_metric(metric.into());
            if let Some(view) = view {
                params = params.with_view_direction(view);
            }
            if let Some(max_cost) = max_cost {
                params = params.with_max_cost(max_cost);
            }
            if print_params {
                println!("{}", serde_json::to_string_pretty(&params)?);
            }
            reduce(&input, &output, params)?;
        }
        Commands::Inspect { input, view } => {
            inspect(&input, view.unwrap_or_else(Vector3d::z))?;
        }
    }

    Ok(())
}

fn reduce(input: &Path, output: &Path, params: DecimateParams) -> Result<()> {
    params.validate().context("Invalid decimation parameters")?;

    let mesh = proxymesh_io::read_mesh(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    info!(path = %input.display(), vertices = mesh.vertex_count(), "Loaded mesh");

    let mut host = MeshHost::new(mesh);
    let result = QuadricDecimator::new(params)
        .decimate(&mut host)
        .with_context(|| format!("Failed to decimate {}", input.display()))?;

    proxymesh_io::write_mesh(&result.mesh, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{}", result.report);
    if !result.report.is_complete() {
        println!(
            "Target of {} vertices not reached ({:?})",
            result.report.target_vertices, result.report.stop_reason
        );
    }
    println!("Wrote {}", output.display());
    Ok(())
}

fn inspect(input: &Path, view: Vector3d) -> Result<()> {
    let params = DecimateParams::default();
    let view = normalized_view(&view).context("Invalid view direction")?;

    let mesh = proxymesh_io::read_mesh(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let host = MeshHost::new(mesh);
    let mut snapshot = MeshSnapshot::from_adapter(&host)
        .with_context(|| format!("Invalid mesh in {}", input.display()))?;

    let degenerate = accumulate(&mut snapshot, params.degenerate_epsilon);
    let summary = classify(&mut snapshot, &view);

    println!("Mesh: {}", input.display());
    println!("  Vertices: {}", snapshot.live_vertex_count());
    println!("  Faces: {}", snapshot.live_face_count());
    println!("  Edges: {}", snapshot.live_edge_count());
    println!("    Interior: {}", summary.interior);
    println!("    Silhouette: {}", summary.silhouette);
    println!("    Boundary: {}", summary.boundary);
    println!("    Non-manifold: {}", summary.non_manifold);
    println!("  Degenerate faces: {}", degenerate);
    Ok(())
}
