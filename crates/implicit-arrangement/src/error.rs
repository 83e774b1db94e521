//! Errors raised while extracting and assembling iso-surface topology.

use simplicial_arrangement::PlaneError;
use thiserror::Error;

/// A barycentric solve whose denominator is too close to zero.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("barycentric denominator {0:e} is below tolerance")]
pub struct SingularDenominator(pub f64);

/// Errors from building per-tet arrangements or assembling global topology.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ExtractionError {
    /// A tet refers to a mesh vertex that does not exist.
    #[error("tet {tet} refers to vertex {vertex}, but the mesh has {num_vertices} vertices")]
    InvalidTet {
        tet: usize,
        vertex: usize,
        num_vertices: usize,
    },
    /// The function value table does not match the mesh.
    #[error("value table has {rows} rows, but the mesh has {num_vertices} vertices")]
    ValueTableMismatch { rows: usize, num_vertices: usize },
    /// A function value is NaN or infinite.
    #[error("function {function} has a non-finite value on tet {tet}")]
    NonFiniteValue { tet: usize, function: usize },
    /// The arrangement of a tet rejected one of its cutting planes.
    #[error("tet {tet} cannot be cut")]
    UnsupportedPlane {
        tet: usize,
        #[source]
        source: PlaneError,
    },
    /// A function vanishes on all four corners of a tet.
    #[error("function {function} is identically zero on tet {tet}")]
    DegenerateFunction { tet: usize, function: usize },
    /// More than three functions vanish at one arrangement vertex.
    #[error("{count} functions vanish at one vertex of tet {tet}; at most 3 are supported")]
    TooManyConcurrentFunctions { tet: usize, count: usize },
    /// Fewer functions pass through an iso-vertex than are needed to locate it.
    #[error("iso-vertex {vertex} on a {simplex_size}-corner simplex has {functions} functions")]
    UnderdeterminedVertex {
        vertex: usize,
        simplex_size: usize,
        functions: usize,
    },
    /// Reconstructing an iso-vertex position divides by (nearly) zero.
    #[error("degenerate geometry at iso-vertex {vertex}")]
    DegenerateGeometry {
        vertex: usize,
        #[source]
        source: SingularDenominator,
    },
}
