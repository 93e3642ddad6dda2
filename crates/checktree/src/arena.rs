#![forbid(unsafe_code)]

//! Arena-backed labelled tree.
//!
//! [`ArenaTree`] is the in-memory [`TreeStructure`] shipped with the crate.
//! Trees are described with the [`TreeNode`] builder and flattened into an
//! arena on construction; node identity is the arena index ([`NodeId`]).
//!
//! # Example
//!
//! ```
//! use checktree::{ArenaTree, TreeNode};
//!
//! let tree = ArenaTree::new(TreeNode::new("root")
//!     .child(TreeNode::new("src")
//!         .child(TreeNode::new("main.rs"))
//!         .child(TreeNode::new("lib.rs")))
//!     .child(TreeNode::new("Cargo.toml")));
//!
//! let lib = tree.path_of(&["root", "src", "lib.rs"]).unwrap();
//! assert_eq!(tree.display_path(&lib), "root/src/lib.rs");
//! assert_eq!(tree.len(), 5);
//! ```

use std::fmt;

use crate::path::TreePath;
use crate::structure::TreeStructure;

/// Arena index of a node in an [`ArenaTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Builder for a labelled tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Add a child node.
    #[must_use]
    pub fn child(mut self, node: TreeNode) -> Self {
        self.children.push(node);
        self
    }

    /// Set children from a vec.
    #[must_use]
    pub fn with_children(mut self, nodes: Vec<TreeNode>) -> Self {
        self.children = nodes;
        self
    }

    /// Get the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the children.
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }
}

#[derive(Debug, Clone)]
struct Slot {
    label: String,
    children: Vec<NodeId>,
}

/// Immutable tree stored as a flat arena.
#[derive(Debug, Clone)]
pub struct ArenaTree {
    slots: Vec<Slot>,
}

impl ArenaTree {
    /// Flatten a [`TreeNode`] hierarchy into an arena. The root gets id 0 and
    /// ids are assigned in depth-first pre-order.
    #[must_use]
    pub fn new(root: TreeNode) -> Self {
        let mut slots = Vec::new();
        // (node, parent slot) pairs; children are pushed in reverse so they pop
        // in declaration order.
        let mut stack: Vec<(TreeNode, Option<NodeId>)> = vec![(root, None)];
        while let Some((node, parent)) = stack.pop() {
            let id = NodeId(slots.len() as u32);
            slots.push(Slot {
                label: node.label,
                children: Vec::with_capacity(node.children.len()),
            });
            if let Some(parent) = parent {
                slots[parent.index()].children.push(id);
            }
            for child in node.children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }
        Self { slots }
    }

    /// Uniform tree with `fanout` children per inner node and `depth` levels
    /// (the root alone is depth 1). Labels are the child index at each level.
    #[must_use]
    pub fn uniform(depth: usize, fanout: usize) -> Self {
        fn build(level: usize, depth: usize, fanout: usize, label: String) -> TreeNode {
            let node = TreeNode::new(label);
            if level + 1 >= depth {
                return node;
            }
            node.with_children(
                (0..fanout)
                    .map(|i| build(level + 1, depth, fanout, i.to_string()))
                    .collect(),
            )
        }
        Self::new(build(0, depth.max(1), fanout, "root".to_owned()))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`; a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Label of a node.
    #[must_use]
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.slots.get(id.index()).map(|slot| slot.label.as_str())
    }

    /// Child ids of a node.
    #[must_use]
    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.index())
            .map_or(&[][..], |slot| slot.children.as_slice())
    }

    /// Resolve a root-first label sequence into a path. The first label must
    /// name the root. Returns `None` if any label does not match.
    #[must_use]
    pub fn path_of(&self, labels: &[&str]) -> Option<TreePath<NodeId>> {
        let (first, rest) = labels.split_first()?;
        let root = NodeId(0);
        if self.label(root)? != *first {
            return None;
        }
        let mut nodes = Vec::with_capacity(labels.len());
        nodes.push(root);
        let mut current = root;
        for label in rest {
            current = *self
                .child_ids(current)
                .iter()
                .find(|id| self.label(**id) == Some(*label))?;
            nodes.push(current);
        }
        TreePath::new(nodes).ok()
    }

    /// Paths of the children of the node addressed by `path`.
    #[must_use]
    pub fn children_paths(&self, path: &TreePath<NodeId>) -> Vec<TreePath<NodeId>> {
        self.child_ids(*path.last())
            .iter()
            .map(|id| path.child(*id))
            .collect()
    }

    /// Every path in the tree, depth-first pre-order.
    #[must_use]
    pub fn all_paths(&self) -> Vec<TreePath<NodeId>> {
        let mut out = Vec::with_capacity(self.slots.len());
        let mut stack = vec![TreePath::root(NodeId(0))];
        while let Some(path) = stack.pop() {
            stack.extend(self.children_paths(&path).into_iter().rev());
            out.push(path);
        }
        out
    }

    /// Label path joined with `/`, for logs and assertions.
    #[must_use]
    pub fn display_path(&self, path: &TreePath<NodeId>) -> String {
        path.nodes()
            .iter()
            .map(|id| self.label(*id).unwrap_or("?"))
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl TreeStructure for ArenaTree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn child_count(&self, node: &NodeId) -> usize {
        self.child_ids(*node).len()
    }

    fn child(&self, node: &NodeId, index: usize) -> Option<NodeId> {
        self.child_ids(*node).get(index).copied()
    }
}
