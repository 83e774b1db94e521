//! BSP tree container and construction.

use std::ops::Range;

use tracing::{debug, trace};

use crate::cuttable::{CutResult, Cuttable};
use crate::plane::PlaneSet;
use crate::predicate::Scalar;

use super::node::{BspNode, NodeId};
use super::visitor::LeafVisitor;

/// A Binary Space Partitioning tree over the cells of one simplex.
///
/// Nodes are kept in an arena owned by the tree; the root is always the
/// first node. Every node has either no children or exactly two.
///
/// # Construction
///
/// A tree starts as a single leaf holding the whole simplex. Planes are then
/// pushed through it either all at once ([`BspTree::build`]) or one at a
/// time ([`BspTree::insert_plane`]). A plane is only recorded in the
/// branches whose cells it actually cuts.
///
/// ```ignore
/// let planes = PlaneSet::new(&[Plane2D::new([1i64, -1, 1])]);
/// let tree: BspTree<Polygon> = BspTree::build(&planes);
/// assert_eq!(tree.leaf_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BspTree<C> {
    nodes: Vec<BspNode<C>>,
}

impl<C> BspTree<C> {
    /// Creates a tree with a single leaf.
    pub fn new(root: C) -> Self {
        Self {
            nodes: vec![BspNode::leaf(root)],
        }
    }

    /// Returns the id of the root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &BspNode<C> {
        &self.nodes[id.0]
    }

    /// Returns the node with the given id, if it exists.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&BspNode<C>> {
        self.nodes.get(id.0)
    }

    /// Returns the total number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns all nodes with their ids, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &BspNode<C>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Returns the leaves, negative subtrees first.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.is_leaf() {
                leaves.push(id);
            }
            // Positive is pushed first so that the negative side pops first.
            stack.extend(node.positive());
            stack.extend(node.negative());
        }
        leaves
    }

    /// Returns the number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the maximum depth of the tree (1 for a single leaf).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(self.root(), 1)];
        while let Some((id, d)) = stack.pop() {
            depth = depth.max(d);
            let node = self.node(id);
            stack.extend(node.negative().map(|c| (c, d + 1)));
            stack.extend(node.positive().map(|c| (c, d + 1)));
        }
        depth
    }

    /// Visits every leaf cell, negative subtrees first.
    pub fn traverse<V: LeafVisitor<C>>(&self, visitor: &mut V) {
        for id in self.leaves() {
            if let Some(cell) = self.node(id).cell() {
                visitor.visit(id, cell);
            }
        }
    }

    fn split_leaf(
        &mut self,
        id: NodeId,
        plane: usize,
        negative: C,
        positive: C,
    ) -> (NodeId, NodeId) {
        let negative_id = NodeId(self.nodes.len());
        let positive_id = NodeId(self.nodes.len() + 1);
        self.nodes.push(BspNode::leaf(negative));
        self.nodes.push(BspNode::leaf(positive));
        self.nodes[id.0].split(plane, negative_id, positive_id);
        trace!(node = %id, plane, "split leaf");
        (negative_id, positive_id)
    }
}

impl<C> BspTree<C> {
    /// Builds the tree for every cutting plane of `planes`, in id order.
    pub fn build<T, const N: usize>(planes: &PlaneSet<T, N>) -> Self
    where
        T: Scalar,
        C: Cuttable<T, N>,
    {
        let mut tree = Self::new(C::simplex());
        let root = tree.root();
        tree.refine(root, N..planes.len(), planes);
        debug!(
            planes = planes.num_cutting(),
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "built BSP tree"
        );
        tree
    }

    /// Pushes plane `plane` into every current leaf.
    ///
    /// Returns the number of leaves it split.
    pub fn insert_plane<T, const N: usize>(
        &mut self,
        plane: usize,
        planes: &PlaneSet<T, N>,
    ) -> usize
    where
        T: Scalar,
        C: Cuttable<T, N>,
    {
        let before = self.leaf_count();
        for leaf in self.leaves() {
            self.refine(leaf, plane..plane + 1, planes);
        }
        self.leaf_count() - before
    }

    /// Cuts the subtree under `start` by the planes in `range`, in order.
    ///
    /// Uses an explicit work stack: each entry is a leaf and the next plane
    /// still to be tried against it.
    fn refine<T, const N: usize>(
        &mut self,
        start: NodeId,
        range: Range<usize>,
        planes: &PlaneSet<T, N>,
    ) where
        T: Scalar,
        C: Cuttable<T, N>,
    {
        let mut stack = vec![(start, range.start)];
        while let Some((id, mut next)) = stack.pop() {
            while next < range.end {
                let outcome = match self.nodes[id.0].cell() {
                    Some(cell) => cell.cut(next, planes),
                    None => break,
                };
                match outcome {
                    CutResult::Split { negative, positive } => {
                        let (n, p) = self.split_leaf(id, next, negative, positive);
                        stack.push((p, next + 1));
                        stack.push((n, next + 1));
                        break;
                    }
                    CutResult::Negative | CutResult::Positive => next += 1,
                }
            }
        }
    }

    /// Replaces the cell of a leaf. Used by tests that corrupt a tree.
    #[cfg(test)]
    pub(crate) fn replace_cell(&mut self, id: NodeId, cell: C) -> Option<C> {
        self.nodes[id.0].replace_cell(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::visitor::{CollectingVisitor, FnVisitor};
    use crate::plane::{Plane2D, Plane3D};
    use crate::polygon::Polygon;
    use crate::polyhedron::Polyhedron;

    #[test]
    fn empty_plane_set_gives_single_leaf() {
        let planes = PlaneSet::<i64, 3>::new(&[]);
        let tree: BspTree<Polygon> = BspTree::build(&planes);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 1);
        assert!(tree.node(tree.root()).is_leaf());
    }

    #[test]
    fn build_single_line() {
        let planes = PlaneSet::new(&[Plane2D::new([1i64, -1, 1])]);
        let tree: BspTree<Polygon> = BspTree::build(&planes);

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.node(tree.root()).separating_plane(), Some(3));
    }

    #[test]
    fn build_two_crossing_lines() {
        // Two lines crossing inside the triangle.
        let planes = PlaneSet::new(&[Plane2D::new([1i64, -1, 0]), Plane2D::new([1i64, 1, -1])]);
        let tree: BspTree<Polygon> = BspTree::build(&planes);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.node_count(), 7);
    }

    #[test]
    fn plane_missing_the_simplex_is_skipped() {
        let planes = PlaneSet::new(&[
            Plane3D::new([1.0, 2.0, 3.0, 4.0]),
            Plane3D::new([1.0, 1.0, -1.0, -1.0]),
        ]);
        let tree: BspTree<Polyhedron> = BspTree::build(&planes);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.node(tree.root()).separating_plane(), Some(5));
    }

    #[test]
    fn insert_matches_batch_build() {
        let cutting = [
            Plane2D::new([1i64, -1, 0]),
            Plane2D::new([1i64, 1, -1]),
            Plane2D::new([-2i64, 1, 1]),
        ];
        let planes = PlaneSet::new(&cutting);
        let batch: BspTree<Polygon> = BspTree::build(&planes);

        let mut incremental = BspTree::new(<Polygon as Cuttable<i64, 3>>::simplex());
        for k in 0..cutting.len() {
            incremental.insert_plane(PlaneSet::<i64, 3>::cutting_id(k), &planes);
        }
        assert_eq!(incremental.leaf_count(), batch.leaf_count());
    }

    #[test]
    fn leaves_are_visited_negative_first() {
        let planes = PlaneSet::new(&[Plane2D::new([1i64, -1, 1])]);
        let tree: BspTree<Polygon> = BspTree::build(&planes);

        let mut visitor = CollectingVisitor::new();
        tree.traverse(&mut visitor);
        let cells = visitor.into_cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(Some(cells[0].0), tree.node(tree.root()).negative());

        let mut edges = 0;
        tree.traverse(&mut FnVisitor::new(|_: NodeId, cell: &Polygon| edges += cell.len()));
        assert_eq!(edges, 7);
    }
}
