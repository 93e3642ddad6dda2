#![forbid(unsafe_code)]

//! Read-only view of the tree being selected.
//!
//! The selection model never owns tree data. It asks a [`TreeStructure`] for
//! child enumeration and derives parents from the [`TreePath`] itself, so any
//! tree representation can be plugged in: an in-memory arena
//! ([`ArenaTree`](crate::ArenaTree)), a filesystem listing, a lazily loaded
//! archive index.
//!
//! The structure must not change while a single `select`/`deselect` call is
//! running. Between calls it may change freely; paths that no longer resolve
//! are the caller's responsibility.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

use crate::path::TreePath;

/// Child enumeration for a tree whose nodes are identified by `Self::Node`.
pub trait TreeStructure {
    /// Node identifier. Must be unique among siblings; equality decides
    /// path equality.
    type Node: Clone + Eq + Hash + fmt::Debug;

    /// The root node.
    fn root(&self) -> Self::Node;

    /// Number of children of `node`.
    fn child_count(&self, node: &Self::Node) -> usize;

    /// The child of `node` at `index`, or `None` when out of range.
    fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node>;

    /// Children of `node` in index order.
    fn children<'a>(&'a self, node: &'a Self::Node) -> impl Iterator<Item = Self::Node> + 'a {
        (0..self.child_count(node)).filter_map(move |index| self.child(node, index))
    }

    /// Path consisting of the root only.
    fn root_path(&self) -> TreePath<Self::Node> {
        TreePath::root(self.root())
    }
}

impl<T: TreeStructure + ?Sized> TreeStructure for &T {
    type Node = T::Node;

    fn root(&self) -> Self::Node {
        (**self).root()
    }

    fn child_count(&self, node: &Self::Node) -> usize {
        (**self).child_count(node)
    }

    fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node> {
        (**self).child(node, index)
    }
}

impl<T: TreeStructure + ?Sized> TreeStructure for Rc<T> {
    type Node = T::Node;

    fn root(&self) -> Self::Node {
        (**self).root()
    }

    fn child_count(&self, node: &Self::Node) -> usize {
        (**self).child_count(node)
    }

    fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node> {
        (**self).child(node, index)
    }
}

impl<T: TreeStructure + ?Sized> TreeStructure for Arc<T> {
    type Node = T::Node;

    fn root(&self) -> Self::Node {
        (**self).root()
    }

    fn child_count(&self, node: &Self::Node) -> usize {
        (**self).child_count(node)
    }

    fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node> {
        (**self).child(node, index)
    }
}
