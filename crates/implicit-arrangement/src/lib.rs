//! Iso-surface topology of several implicit functions on a tetrahedral mesh.
//!
//! Every tet is cut by the linear interpolants of the functions that cross
//! it, using [`simplicial_arrangement`]. The per-tet pieces are merged into a
//! global iso-mesh, which is grouped into patches (sheets separated by
//! non-manifold edges) and chains (curves of non-manifold edges). Finally the
//! BSP leaves of all tets are joined into arrangement cells, the volumetric
//! regions cut out by all functions together.
//!
//! [`run`] does all of this at once.

mod barycentric;
mod cells;
mod edges;
mod error;
mod extract;
mod grouping;
mod mesh;
mod pipeline;
mod record;
mod tet_cut;

pub use barycentric::{
    barycentric_in_tet, barycentric_on_edge, barycentric_on_face, sign, sphere_function,
};
pub use cells::{
    ArrangementCell, Orientation, SimplicialCell, compute_arrangement_cells,
    compute_face_order_in_one_tet, compute_half_patch_list, compute_simplicial_cells,
};
pub use edges::{IsoEdge, compute_iso_edges};
pub use error::{ExtractionError, SingularDenominator};
pub use extract::{
    IsoFace, IsoMesh, IsoVert, compute_iso_face_key, compute_iso_vert_xyz,
    compute_iso_vert_xyz_marching_tet, extract_iso_mesh, extract_iso_mesh_marching_tet,
    extract_iso_mesh_pure,
};
pub use grouping::{
    compute_chains, compute_non_manifold_edges_of_vert, compute_patches, patch_of_face,
};
pub use mesh::{FaceNeighbor, TetMesh, extract_tet_boundary_mesh, tet_face_key};
pub use pipeline::{ArrangementResult, PipelineConfig, run, run_marching_tet};
pub use record::{MiniResultRecord, ResultRecord, TriMeshListRecord, TriMeshRecord};
pub use tet_cut::{TetCut, compute_tet_cuts, compute_tet_cuts_marching_tet};
