#![forbid(unsafe_code)]

//! Root-to-node paths.
//!
//! A [`TreePath`] is a non-empty sequence of node identifiers starting at the
//! tree root. Ancestry is prefix order: `p` is an ancestor of `q` iff `p` is a
//! proper prefix of `q`. Parent derivation drops the last element and never
//! consults the tree.
//!
//! Node storage is an `Arc<[N]>` so cloning a path (which the selection
//! engine does a lot) is a refcount bump.

use std::fmt;
use std::sync::Arc;

use crate::error::PathError;

/// Ordered, non-empty sequence of node identifiers from the root to a node.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath<N> {
    nodes: Arc<[N]>,
}

impl<N> TreePath<N> {
    /// Path consisting of the root node only.
    #[must_use]
    pub fn root(node: N) -> Self {
        Self {
            nodes: Arc::from(vec![node]),
        }
    }

    /// Build a path from a root-first node sequence.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] when `nodes` is empty.
    pub fn new(nodes: Vec<N>) -> Result<Self, PathError> {
        if nodes.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self {
            nodes: Arc::from(nodes),
        })
    }

    /// Node identifiers, root first.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Number of nodes on the path (the root path has length 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; paths are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.nodes.len() == 1
    }

    /// The node this path addresses.
    #[must_use]
    pub fn last(&self) -> &N {
        &self.nodes[self.nodes.len() - 1]
    }

    /// The root node.
    #[must_use]
    pub fn first(&self) -> &N {
        &self.nodes[0]
    }

    /// `self` is a proper prefix of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool
    where
        N: PartialEq,
    {
        self.nodes.len() < other.nodes.len() && other.nodes.starts_with(&self.nodes)
    }

    /// `other` is a proper prefix of `self`.
    #[must_use]
    pub fn is_descendant_of(&self, other: &Self) -> bool
    where
        N: PartialEq,
    {
        other.is_ancestor_of(self)
    }
}

impl<N: Clone> TreePath<N> {
    /// The path with its last element removed, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            nodes: Arc::from(&self.nodes[..self.nodes.len() - 1]),
        })
    }

    /// The path extended by one child node.
    #[must_use]
    pub fn child(&self, node: N) -> Self {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend_from_slice(&self.nodes);
        nodes.push(node);
        Self {
            nodes: Arc::from(nodes),
        }
    }

    /// Iterate `self`, its parent, its grandparent, ... up to the root.
    pub fn ancestors_inclusive(&self) -> impl Iterator<Item = TreePath<N>> + '_ {
        (1..=self.nodes.len()).rev().map(move |len| Self {
            nodes: Arc::from(&self.nodes[..len]),
        })
    }
}

impl<N: fmt::Debug> fmt::Debug for TreePath<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

impl<N: fmt::Display> fmt::Display for TreePath<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

impl<N> TryFrom<Vec<N>> for TreePath<N> {
    type Error = PathError;

    fn try_from(nodes: Vec<N>) -> Result<Self, Self::Error> {
        Self::new(nodes)
    }
}
