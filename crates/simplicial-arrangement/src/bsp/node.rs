//! BSP tree node implementation.

use std::fmt;

/// Index of a node in a [`BspTree`](super::BspTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the BSP tree.
///
/// An interior node records the plane that separates its two children; a
/// leaf owns the convex cell it stands for. Children live in the same arena
/// and are referenced by [`NodeId`].
#[derive(Debug, Clone)]
pub struct BspNode<C> {
    /// The separating plane, for interior nodes.
    separating_plane: Option<usize>,

    /// Subtree on the NEGATIVE side of the separating plane.
    negative: Option<NodeId>,

    /// Subtree on the POSITIVE side of the separating plane.
    positive: Option<NodeId>,

    /// The cell of a leaf node.
    cell: Option<C>,
}

impl<C> BspNode<C> {
    /// Creates a leaf holding `cell`.
    pub fn leaf(cell: C) -> Self {
        Self {
            separating_plane: None,
            negative: None,
            positive: None,
            cell: Some(cell),
        }
    }

    /// Returns the separating plane id of an interior node.
    #[inline]
    pub fn separating_plane(&self) -> Option<usize> {
        self.separating_plane
    }

    #[inline]
    pub fn negative(&self) -> Option<NodeId> {
        self.negative
    }

    #[inline]
    pub fn positive(&self) -> Option<NodeId> {
        self.positive
    }

    /// Returns the cell of a leaf node.
    #[inline]
    pub fn cell(&self) -> Option<&C> {
        self.cell.as_ref()
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.negative.is_none() && self.positive.is_none()
    }

    /// Turns a leaf into an interior node, handing back its cell.
    pub(crate) fn split(&mut self, plane: usize, negative: NodeId, positive: NodeId) -> Option<C> {
        self.separating_plane = Some(plane);
        self.negative = Some(negative);
        self.positive = Some(positive);
        self.cell.take()
    }

    #[cfg(test)]
    pub(crate) fn replace_cell(&mut self, cell: C) -> Option<C> {
        self.cell.replace(cell)
    }
}
