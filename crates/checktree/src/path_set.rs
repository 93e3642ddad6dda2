#![forbid(unsafe_code)]

//! Canonical set of explicitly selected paths.
//!
//! # Invariants
//!
//! 1. No member is an ancestor of another member.
//! 2. Snapshot order is insertion order of the surviving members.
//!
//! Only the selection engine mutates a [`PathSet`]; the mutators here are
//! crate-private raw operations that do not normalize. Everything public is
//! a query.
//!
//! # Derived status
//!
//! | Status     | Condition                                          |
//! |------------|----------------------------------------------------|
//! | explicit   | path is a member                                   |
//! | implicit   | a proper ancestor is a member                      |
//! | partial    | neither, but a descendant is a member              |
//! | unselected | neither, and no descendant is a member             |

use std::hash::Hash;

use ahash::AHashMap;

use crate::path::TreePath;
use crate::structure::TreeStructure;

/// Tri-state view of a single node, as a checkbox would show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckState {
    /// The node is explicitly or implicitly selected.
    Checked,
    /// Some descendant is selected, the node itself is not.
    Partial,
    /// Neither the node nor any descendant is selected.
    Unchecked,
}

/// Set of explicitly selected paths in canonical (minimal) form.
#[derive(Debug, Clone)]
pub struct PathSet<N> {
    /// Member -> insertion sequence number.
    members: AHashMap<TreePath<N>, u64>,
    next_seq: u64,
}

impl<N> Default for PathSet<N> {
    fn default() -> Self {
        Self {
            members: AHashMap::new(),
            next_seq: 0,
        }
    }
}

impl<N: Clone + Eq + Hash> PathSet<N> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of explicit members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Membership test.
    #[must_use]
    pub fn is_explicit(&self, path: &TreePath<N>) -> bool {
        self.members.contains_key(path)
    }

    /// `path` or any of its ancestors is a member.
    #[must_use]
    pub fn is_selected_or_implicit(&self, path: &TreePath<N>) -> bool {
        self.nearest_explicit(path).is_some()
    }

    /// The closest member among `path` and its ancestors.
    #[must_use]
    pub fn nearest_explicit(&self, path: &TreePath<N>) -> Option<TreePath<N>> {
        if self.members.is_empty() {
            return None;
        }
        path.ancestors_inclusive()
            .find(|candidate| self.members.contains_key(candidate))
    }

    /// Some member lies strictly below `path`.
    #[must_use]
    pub fn has_explicit_descendant(&self, path: &TreePath<N>) -> bool {
        self.members.keys().any(|member| path.is_ancestor_of(member))
    }

    /// Neither `path`, an ancestor, nor a descendant of it is a member.
    #[must_use]
    pub fn is_unselected(&self, path: &TreePath<N>) -> bool {
        if self.members.is_empty() {
            return true;
        }
        !self.is_selected_or_implicit(path) && !self.has_explicit_descendant(path)
    }

    /// Tri-state status of `path`.
    #[must_use]
    pub fn check_state(&self, path: &TreePath<N>) -> CheckState {
        if self.is_selected_or_implicit(path) {
            CheckState::Checked
        } else if self.has_explicit_descendant(path) {
            CheckState::Partial
        } else {
            CheckState::Unchecked
        }
    }

    /// Every sibling of `path` is selected-or-implicit. The root has no
    /// siblings and trivially passes.
    ///
    /// If the parent is itself covered every child is implicitly selected.
    /// Otherwise no ancestor above the parent is a member either, so a
    /// sibling is selected exactly when it is explicit.
    pub fn all_siblings_selected<T>(&self, tree: &T, path: &TreePath<N>) -> bool
    where
        T: TreeStructure<Node = N> + ?Sized,
    {
        let Some(parent) = path.parent() else {
            return true;
        };
        if self.is_selected_or_implicit(&parent) {
            return true;
        }
        let own = path.last();
        tree.children(parent.last())
            .filter(|child| child != own)
            .all(|child| self.members.contains_key(&parent.child(child)))
    }

    /// Members in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TreePath<N>> {
        let mut ordered: Vec<(&TreePath<N>, u64)> =
            self.members.iter().map(|(path, seq)| (path, *seq)).collect();
        ordered.sort_unstable_by_key(|(_, seq)| *seq);
        ordered.into_iter().map(|(path, _)| path.clone()).collect()
    }

    /// Iterate members in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &TreePath<N>> {
        self.members.keys()
    }

    /// Invariant 1 holds. Quadratic; meant for tests and debug assertions.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.members
            .keys()
            .all(|a| self.members.keys().all(|b| !a.is_ancestor_of(b)))
    }

    // ------------------------------------------------------------------
    // Raw mutation (engine only)
    // ------------------------------------------------------------------

    /// Insert without normalizing. Re-inserting keeps the original position.
    pub(crate) fn insert(&mut self, path: TreePath<N>) -> bool {
        if self.members.contains_key(&path) {
            return false;
        }
        self.members.insert(path, self.next_seq);
        self.next_seq += 1;
        true
    }

    pub(crate) fn remove(&mut self, path: &TreePath<N>) -> bool {
        self.members.remove(path).is_some()
    }

    /// Drop every member strictly below `path`; returns how many went.
    pub(crate) fn remove_descendants_of(&mut self, path: &TreePath<N>) -> usize {
        let before = self.members.len();
        self.members.retain(|member, _| !path.is_ancestor_of(member));
        before - self.members.len()
    }

    pub(crate) fn clear(&mut self) {
        self.members.clear();
    }
}

impl<N: Clone + Eq + Hash> PartialEq for PathSet<N> {
    /// Set equality; insertion order is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self.members.keys().all(|path| other.members.contains_key(path))
    }
}

impl<N: Clone + Eq + Hash> Eq for PathSet<N> {}

impl<N: Clone + Eq + Hash> FromIterator<TreePath<N>> for PathSet<N> {
    /// Collect raw members. Input is trusted to be canonical.
    fn from_iter<I: IntoIterator<Item = TreePath<N>>>(iter: I) -> Self {
        let mut set = Self::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}
