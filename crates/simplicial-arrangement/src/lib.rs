//! Arrangements of planes inside a reference simplex.
//!
//! A set of cutting planes partitions a triangle (2D) or a tetrahedron (3D)
//! into convex cells. This crate builds that partition as a BSP tree whose
//! leaves are the cells, with every geometric decision reduced to the sign of
//! a small determinant.
//!
//! # Example
//!
//! ```ignore
//! use simplicial_arrangement::{Arrangement3D, Plane3D};
//!
//! let arrangement = Arrangement3D::build(&[
//!     Plane3D::new([1i64, 1, -1, -1]),
//!     Plane3D::new([1, -1, 1, -1]),
//! ])?;
//! assert_eq!(arrangement.leaf_count(), 4);
//! ```
//!
//! Planes are given by their values at the simplex corners. Use `i64`
//! coefficients for exact predicates, `f64` for floating ones.

mod arrangement;
pub mod bsp;
pub mod complex;
mod cuttable;
mod plane;
mod polygon;
mod polyhedron;
mod predicate;

pub use arrangement::{
    Arrangement2D, Arrangement3D, BspInvariantError, PlaneError, SimplicialArrangement,
};
pub use bsp::{BspNode, BspTree, LeafVisitor, NodeId};
pub use complex::{CellComplex, ComplexCell, ComplexFace, ComplexVertex};
pub use cuttable::{CutResult, Cuttable};
pub use plane::{Plane, Plane2D, Plane3D, PlaneSet};
pub use polygon::Polygon;
pub use polyhedron::{Face, Polyhedron};
pub use predicate::{EXACT_COEFF_LIMIT, Scalar, Sign};
