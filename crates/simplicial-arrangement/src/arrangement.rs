//! The arrangement of planes inside one simplex.

use thiserror::Error;
use tracing::{debug, warn};

use crate::bsp::{BspNode, BspTree, LeafVisitor, NodeId};
use crate::cuttable::{CutResult, Cuttable};
use crate::plane::{Plane, PlaneSet};
use crate::polygon::Polygon;
use crate::polyhedron::Polyhedron;
use crate::predicate::{Scalar, Sign};

/// Structural defects found by [`SimplicialArrangement::check_invariants`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BspInvariantError {
    /// An interior node with only one child.
    #[error("node {node} has exactly one child")]
    SingleChild { node: usize },
    /// A child index outside the arena.
    #[error("node {node} refers to missing child {child}")]
    DanglingChild { node: usize, child: usize },
    /// A node not reached exactly once from the root.
    #[error("node {node} is reached {count} times from the root")]
    Unreachable { node: usize, count: usize },
    /// A leaf without a cell.
    #[error("leaf {node} holds no cell")]
    MissingCell { node: usize },
    /// An interior node without a separating plane.
    #[error("interior node {node} has no separating plane")]
    MissingPlane { node: usize },
    /// A leaf whose interior is still crossed by a cutting plane.
    #[error("plane {plane} cuts the interior of leaf {node}")]
    PlaneCutsLeaf { node: usize, plane: usize },
}

/// A cutting plane the predicates of its numeric domain cannot evaluate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlaneError {
    /// A coefficient beyond [`EXACT_COEFF_LIMIT`](crate::EXACT_COEFF_LIMIT)
    /// for `i64`, or a non-finite `f64`.
    #[error("cutting plane {index} has a coefficient outside the predicate's range")]
    OutOfRange { index: usize },
}

/// The partition of a reference simplex by a list of cutting planes.
///
/// Owns the [`PlaneSet`] and the [`BspTree`] built from it. Generic over the
/// numeric domain `T` (exact `i64` or floating `f64`) and the cell type `C`.
///
/// # Example
///
/// ```ignore
/// let mut arrangement = Arrangement3D::<i64>::new();
/// arrangement.set_planes(&[Plane3D::new([1, 1, -1, -1])])?;
/// arrangement.initialize();
/// assert_eq!(arrangement.leaf_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SimplicialArrangement<T, C, const N: usize> {
    planes: PlaneSet<T, N>,
    tree: BspTree<C>,
}

/// Arrangement of lines in the reference triangle.
pub type Arrangement2D<T> = SimplicialArrangement<T, Polygon, 3>;

/// Arrangement of planes in the reference tetrahedron.
pub type Arrangement3D<T> = SimplicialArrangement<T, Polyhedron, 4>;

impl<T, C, const N: usize> Default for SimplicialArrangement<T, C, N>
where
    T: Scalar,
    C: Cuttable<T, N>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, const N: usize> SimplicialArrangement<T, C, N>
where
    T: Scalar,
    C: Cuttable<T, N>,
{
    /// Creates an arrangement with no cutting planes: a single cell.
    pub fn new() -> Self {
        Self {
            planes: PlaneSet::new(&[]),
            tree: BspTree::new(C::simplex()),
        }
    }

    /// Builds the arrangement of `cutting` in one pass.
    pub fn build(cutting: &[Plane<T, N>]) -> Result<Self, PlaneError> {
        let mut arrangement = Self::new();
        arrangement.set_planes(cutting)?;
        arrangement.initialize();
        Ok(arrangement)
    }

    /// Replaces the cutting planes and resets the tree to a single cell.
    ///
    /// Call [`initialize`](Self::initialize) afterwards to build. On error the
    /// arrangement is left unchanged.
    pub fn set_planes(&mut self, cutting: &[Plane<T, N>]) -> Result<(), PlaneError> {
        for (k, plane) in cutting.iter().enumerate() {
            check_plane(k, plane)?;
        }
        self.planes = PlaneSet::new(cutting);
        self.tree = BspTree::new(C::simplex());
        Ok(())
    }

    /// Builds the tree from the current plane list.
    pub fn initialize(&mut self) {
        self.tree = BspTree::build(&self.planes);
    }

    /// Rebuilds the arrangement from a short list, one plane at a time.
    pub fn initialize_with(&mut self, cutting: &[Plane<T, N>]) -> Result<(), PlaneError> {
        for (k, plane) in cutting.iter().enumerate() {
            check_plane(k, plane)?;
        }
        self.set_planes(&[])?;
        for plane in cutting {
            self.insert_plane(*plane)?;
        }
        debug!(planes = cutting.len(), leaves = self.leaf_count(), "initialized arrangement");
        Ok(())
    }

    /// Adds a cutting plane and pushes it into every leaf.
    ///
    /// Returns the id of the new plane.
    pub fn insert_plane(&mut self, plane: Plane<T, N>) -> Result<usize, PlaneError> {
        check_plane(self.planes.num_cutting(), &plane)?;
        let id = self.planes.push(plane);
        let split = self.tree.insert_plane(id, &self.planes);
        debug!(plane = id, split, "inserted plane");
        Ok(id)
    }

    /// Returns the planes, boundary planes first.
    #[inline]
    pub fn planes(&self) -> &PlaneSet<T, N> {
        &self.planes
    }

    /// Returns the underlying tree.
    #[inline]
    pub fn tree(&self) -> &BspTree<C> {
        &self.tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &BspNode<C> {
        self.tree.node(id)
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Returns the leaves, negative subtrees first.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.tree.leaves()
    }

    /// Returns the cell of a leaf.
    pub fn cell(&self, leaf: NodeId) -> Option<&C> {
        self.tree.get(leaf).and_then(|n| n.cell())
    }

    /// Visits every leaf cell.
    pub fn visit_leaves<V: LeafVisitor<C>>(&self, visitor: &mut V) {
        self.tree.traverse(visitor);
    }

    /// Sign of every cutting plane over every leaf, in [`leaves`](Self::leaves) order.
    ///
    /// The multiset of these vectors does not depend on the order in which
    /// the planes were inserted.
    pub fn leaf_sign_vectors(&self) -> Vec<Vec<Sign>> {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| self.cell(leaf))
            .map(|cell| {
                (N..self.planes.len())
                    .map(|p| cell.side_of(p, &self.planes))
                    .collect()
            })
            .collect()
    }

    /// Checks the shape of the tree and that no cutting plane crosses a leaf.
    pub fn check_invariants(&self) -> Result<(), BspInvariantError> {
        let count = self.tree.node_count();
        let mut reached = vec![0usize; count];
        let mut stack = vec![self.tree.root()];
        while let Some(id) = stack.pop() {
            reached[id.index()] += 1;
            if reached[id.index()] > 1 {
                continue;
            }
            let node = self.tree.node(id);
            match (node.negative(), node.positive()) {
                (None, None) => {
                    let Some(cell) = node.cell() else {
                        return Err(BspInvariantError::MissingCell { node: id.index() });
                    };
                    for plane in N..self.planes.len() {
                        if let CutResult::Split { .. } = cell.cut(plane, &self.planes) {
                            return Err(BspInvariantError::PlaneCutsLeaf {
                                node: id.index(),
                                plane,
                            });
                        }
                    }
                }
                (Some(negative), Some(positive)) => {
                    if node.separating_plane().is_none() {
                        return Err(BspInvariantError::MissingPlane { node: id.index() });
                    }
                    for child in [negative, positive] {
                        if child.index() >= count {
                            return Err(BspInvariantError::DanglingChild {
                                node: id.index(),
                                child: child.index(),
                            });
                        }
                        stack.push(child);
                    }
                }
                _ => return Err(BspInvariantError::SingleChild { node: id.index() }),
            }
        }
        if let Some((node, &count)) = reached.iter().enumerate().find(|(_, c)| **c != 1) {
            return Err(BspInvariantError::Unreachable { node, count });
        }
        Ok(())
    }
}

fn check_plane<T: Scalar, const N: usize>(
    index: usize,
    plane: &Plane<T, N>,
) -> Result<(), PlaneError> {
    if plane.coeffs().iter().any(|c| !c.is_representable()) {
        return Err(PlaneError::OutOfRange { index });
    }
    if plane.is_degenerate() {
        warn!(index, "cutting plane has all-zero coefficients and will never cut");
    }
    Ok(())
}
