//! Computes the arrangement of overlapping spheres sampled on a tet grid.
//!
//! Usage:
//!   implicit-arrangement                       2 spheres on a 4³ grid, summary only
//!   implicit-arrangement -r 16 -s 3 -o out.json
//!   implicit-arrangement --marching-tet        First sphere only
//!
//! Set `RUST_LOG=debug` for per-phase logging.

use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use implicit_arrangement::{
    MiniResultRecord, PipelineConfig, ResultRecord, TetMesh, TriMeshListRecord, TriMeshRecord,
    extract_tet_boundary_mesh, run, run_marching_tet, sphere_function,
};
use nalgebra::{DMatrix, Point3};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "implicit-arrangement")]
#[command(about = "Arrangement of implicit spheres on a tetrahedral grid")]
struct Args {
    /// Grid cubes per axis
    #[arg(short, long, default_value_t = 4)]
    resolution: usize,

    /// Number of spheres
    #[arg(short, long, default_value_t = 2)]
    spheres: usize,

    /// Write the result as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write only points, faces, patches and cells
    #[arg(long)]
    mini: bool,

    /// Build tet arrangements on one thread
    #[arg(long)]
    sequential: bool,

    /// Use only the first sphere
    #[arg(long)]
    marching_tet: bool,

    /// Write the boundary of the tet grid as a triangle mesh
    #[arg(long)]
    boundary_mesh: Option<PathBuf>,

    /// Write one triangle mesh per patch
    #[arg(long)]
    patch_meshes: Option<PathBuf>,
}

/// Spheres of equal radius on a small circle around the box center.
fn sphere_layout(count: usize) -> Vec<(Point3<f64>, f64)> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            let center = Point3::new(0.5 + 0.12 * angle.cos(), 0.5 + 0.12 * angle.sin(), 0.5);
            (center, 0.3)
        })
        .collect()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let args = Args::parse();
    anyhow::ensure!(args.spheres > 0, "need at least one sphere");

    let mesh = TetMesh::grid(args.resolution, Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    let spheres = sphere_layout(args.spheres);
    let config = PipelineConfig {
        parallel: !args.sequential,
        ..PipelineConfig::default()
    };

    let result = if args.marching_tet {
        let (center, radius) = spheres[0];
        let values: Vec<f64> =
            mesh.vertices.iter().map(|p| sphere_function(&center, radius, p)).collect();
        run_marching_tet(&mesh, &values, &config)?
    } else {
        let values = DMatrix::from_fn(mesh.num_vertices(), spheres.len(), |v, j| {
            let (center, radius) = spheres[j];
            sphere_function(&center, radius, &mesh.vertices[v])
        });
        run(&mesh, &values, &config)?
    };

    println!(
        "{} tets, {} iso-faces, {} patches, {} chains, {} arrangement cells",
        mesh.num_tets(),
        result.iso_faces.len(),
        result.patches.len(),
        result.chains.len(),
        result.arrangement_cells.len()
    );

    if let Some(path) = &args.output {
        if args.mini {
            write_json(path, &MiniResultRecord::from(&result))?;
        } else {
            write_json(path, &ResultRecord::from(&result))?;
        }
    }
    if let Some(path) = &args.boundary_mesh {
        let (vertices, faces) = extract_tet_boundary_mesh(&mesh);
        write_json(path, &TriMeshRecord::new(&vertices, faces))?;
    }
    if let Some(path) = &args.patch_meshes {
        write_json(path, &TriMeshListRecord::from_patches(&result))?;
    }
    Ok(())
}
