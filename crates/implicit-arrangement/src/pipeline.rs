//! End-to-end assembly: per-tet arrangements to arrangement cells.

use std::time::Instant;

use nalgebra::{DMatrix, Point3};
use tracing::info;

use crate::cells::{
    ArrangementCell, Orientation, SimplicialCell, compute_arrangement_cells,
    compute_half_patch_list, compute_simplicial_cells,
};
use crate::edges::{IsoEdge, compute_iso_edges};
use crate::error::ExtractionError;
use crate::extract::{
    IsoFace, IsoMesh, IsoVert, compute_iso_vert_xyz, compute_iso_vert_xyz_marching_tet,
    extract_iso_mesh,
};
use crate::grouping::{
    compute_chains, compute_non_manifold_edges_of_vert, compute_patches, patch_of_face,
};
use crate::mesh::TetMesh;
use crate::tet_cut::{TetCut, compute_tet_cuts, compute_tet_cuts_marching_tet};

/// Settings for [`run`] and [`run_marching_tet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Build the per-tet arrangements on the rayon pool.
    pub parallel: bool,
    /// Smallest barycentric denominator accepted when placing iso-vertices.
    pub degenerate_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            degenerate_tolerance: 1e-12,
        }
    }
}

/// The full topology of the arrangement of all functions.
#[derive(Debug, Clone)]
pub struct ArrangementResult {
    pub iso_pts: Vec<Point3<f64>>,
    pub iso_verts: Vec<IsoVert>,
    pub iso_faces: Vec<IsoFace>,
    pub iso_edges: Vec<IsoEdge>,
    pub patches: Vec<Vec<usize>>,
    pub chains: Vec<Vec<usize>>,
    pub non_manifold_edges_of_vert: Vec<Vec<usize>>,
    pub half_patch_list: Vec<Vec<(usize, Orientation)>>,
    pub simplicial_cells: Vec<SimplicialCell>,
    pub arrangement_cells: Vec<ArrangementCell>,
}

/// Runs the pipeline on a table of function values, one row per mesh vertex
/// and one column per function.
pub fn run(
    mesh: &TetMesh,
    values: &DMatrix<f64>,
    config: &PipelineConfig,
) -> Result<ArrangementResult, ExtractionError> {
    let start = Instant::now();
    let cuts = compute_tet_cuts(mesh, values, config.parallel)?;
    let iso = extract_iso_mesh(&cuts, &mesh.tets)?;
    let iso_pts =
        compute_iso_vert_xyz(&iso.iso_verts, values, &mesh.vertices, config.degenerate_tolerance)?;
    let result = assemble(mesh, &cuts, iso, iso_pts);
    log_summary(&result, values.ncols(), start);
    Ok(result)
}

/// Runs the pipeline on a single function.
pub fn run_marching_tet(
    mesh: &TetMesh,
    values: &[f64],
    config: &PipelineConfig,
) -> Result<ArrangementResult, ExtractionError> {
    let start = Instant::now();
    let cuts = compute_tet_cuts_marching_tet(mesh, values, config.parallel)?;
    let iso = extract_iso_mesh(&cuts, &mesh.tets)?;
    let iso_pts = compute_iso_vert_xyz_marching_tet(
        &iso.iso_verts,
        values,
        &mesh.vertices,
        config.degenerate_tolerance,
    )?;
    let result = assemble(mesh, &cuts, iso, iso_pts);
    log_summary(&result, 1, start);
    Ok(result)
}

fn assemble(
    mesh: &TetMesh,
    cuts: &[TetCut],
    iso: IsoMesh,
    iso_pts: Vec<Point3<f64>>,
) -> ArrangementResult {
    let IsoMesh {
        iso_verts,
        mut iso_faces,
        global_vid_of_tet_vert,
        iso_fid_of_tet_face,
    } = iso;

    let iso_edges = compute_iso_edges(&mut iso_faces);
    let patches = compute_patches(&iso_faces, &iso_edges);
    let non_manifold_edges_of_vert =
        compute_non_manifold_edges_of_vert(iso_verts.len(), &iso_edges);
    let chains = compute_chains(&iso_edges, &non_manifold_edges_of_vert);

    let of_face = patch_of_face(iso_faces.len(), &patches);
    let half_patch_list = compute_half_patch_list(
        cuts,
        &global_vid_of_tet_vert,
        &iso_fid_of_tet_face,
        &iso_faces,
        &iso_edges,
        &of_face,
    );
    let simplicial_cells =
        compute_simplicial_cells(cuts, &mesh.tets, &iso_fid_of_tet_face, &of_face);
    let arrangement_cells =
        compute_arrangement_cells(patches.len(), &half_patch_list, &simplicial_cells);

    ArrangementResult {
        iso_pts,
        iso_verts,
        iso_faces,
        iso_edges,
        patches,
        chains,
        non_manifold_edges_of_vert,
        half_patch_list,
        simplicial_cells,
        arrangement_cells,
    }
}

fn log_summary(result: &ArrangementResult, functions: usize, start: Instant) {
    info!(
        functions,
        verts = result.iso_verts.len(),
        faces = result.iso_faces.len(),
        edges = result.iso_edges.len(),
        patches = result.patches.len(),
        chains = result.chains.len(),
        simplicial_cells = result.simplicial_cells.len(),
        arrangement_cells = result.arrangement_cells.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "arrangement complete"
    );
}
