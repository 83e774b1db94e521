//! Binary Space Partitioning tree over the cells of a simplex.
//!
//! The tree recursively partitions a reference simplex by cutting planes.
//! Leaves are convex cells; interior nodes record the plane separating their
//! two children. Nodes live in an arena and refer to each other by
//! [`NodeId`], and every traversal is iterative.
//!
//! # Architecture
//!
//! - [`BspTree`]: The arena holding all nodes, with construction and insertion
//! - [`BspNode`]: A leaf cell or an interior split
//! - [`LeafVisitor`]: Visitor trait for custom processing of leaf cells

mod node;
mod tree;
mod visitor;

pub use node::{BspNode, NodeId};
pub use tree::BspTree;
pub use visitor::{CollectingVisitor, FnVisitor, LeafVisitor};
