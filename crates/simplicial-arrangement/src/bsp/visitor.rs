//! Visitor pattern for BSP leaf traversal.
//!
//! Visitors allow custom processing of leaf cells without coupling the
//! traversal to a specific use.

use super::node::NodeId;

/// Visitor for processing leaf cells during BSP tree traversal.
pub trait LeafVisitor<C> {
    /// Called once for every leaf, negative subtrees before positive ones.
    fn visit(&mut self, id: NodeId, cell: &C);
}

/// A simple visitor that collects clones of all visited cells.
#[derive(Debug)]
pub struct CollectingVisitor<C> {
    collected: Vec<(NodeId, C)>,
}

impl<C> Default for CollectingVisitor<C> {
    fn default() -> Self {
        Self {
            collected: Vec::new(),
        }
    }
}

impl<C> CollectingVisitor<C> {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected cells.
    pub fn into_cells(self) -> Vec<(NodeId, C)> {
        self.collected
    }

    /// Returns a reference to the collected cells.
    pub fn cells(&self) -> &[(NodeId, C)] {
        &self.collected
    }
}

impl<C: Clone> LeafVisitor<C> for CollectingVisitor<C> {
    fn visit(&mut self, id: NodeId, cell: &C) {
        self.collected.push((id, cell.clone()));
    }
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<C, F> LeafVisitor<C> for FnVisitor<F>
where
    F: FnMut(NodeId, &C),
{
    fn visit(&mut self, id: NodeId, cell: &C) {
        (self.func)(id, cell);
    }
}
