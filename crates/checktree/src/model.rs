#![forbid(unsafe_code)]

//! The selection engine.
//!
//! [`SelectionModel`] owns the canonical [`PathSet`] for one tree and keeps it
//! minimal under `select` and `deselect`:
//!
//! - **Collapse**: selecting the last unselected child of a node selects the
//!   node instead, recursively toward the root.
//! - **Expand**: deselecting a node that is only implicitly selected pushes
//!   the covering ancestor's selection down one level at a time, leaving
//!   every branch except the one leading to the node explicitly selected.
//!
//! ```text
//! R ─┬─ A ─┬─ A1        select A1, select A2      {A}
//!    │     └─ A2        select B,  select C       {R}
//!    ├─ B               deselect A1               {A2, B, C}
//!    └─ C               deselect R (from {R})     {}
//! ```
//!
//! # Invariants
//!
//! 1. After every public call no explicit path is an ancestor of another.
//! 2. Each public call that changes the explicit set emits exactly one
//!    [`SelectionChange`] with the snapshots before and after the call.
//! 3. Paths within one call are applied in input order; later paths see the
//!    effect of earlier ones.
//!
//! # Complexity
//!
//! | Operation                  | Cost                                      |
//! |----------------------------|-------------------------------------------|
//! | `is_explicit`              | O(depth) hashing                          |
//! | `is_selected_or_implicit`  | O(depth²) hashing                         |
//! | `is_unselected`            | O(members × depth)                        |
//! | `select` (per path)        | O(members + depth × (fanout + depth))     |
//! | `deselect` (per path)      | O(depth × fanout)                         |
//!
//! Unrelated subtrees are never visited.
//!
//! # Example
//!
//! ```
//! use checktree::{ArenaTree, SelectionModel, TreeNode};
//!
//! let tree = ArenaTree::new(TreeNode::new("R")
//!     .child(TreeNode::new("A")
//!         .child(TreeNode::new("A1"))
//!         .child(TreeNode::new("A2")))
//!     .child(TreeNode::new("B")));
//! let a = tree.path_of(&["R", "A"]).unwrap();
//! let a1 = tree.path_of(&["R", "A", "A1"]).unwrap();
//! let a2 = tree.path_of(&["R", "A", "A2"]).unwrap();
//!
//! let mut model = SelectionModel::new(tree);
//! model.select(&[a1.clone()]);
//! model.select(&[a2]);
//! assert_eq!(model.selection_paths(), vec![a]);
//! assert!(model.is_selected_or_implicit(&a1));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::{Span, debug_span, trace, warn};
use web_time::Instant;

use crate::config::SelectionConfig;
use crate::error::SelectionError;
use crate::history::{SelectionHistory, Snapshot};
use crate::notify::{ChangeKind, ChangeNotifier, SelectionChange, Subscription};
use crate::path::TreePath;
use crate::path_set::{CheckState, PathSet};
use crate::structure::TreeStructure;

/// Tri-state selection over a tree exposed through [`TreeStructure`].
///
/// The model is single-threaded: observers are `Rc` callbacks, so it is
/// neither `Send` nor `Sync`.
pub struct SelectionModel<T: TreeStructure> {
    tree: T,
    selection: PathSet<T::Node>,
    notifier: ChangeNotifier<T::Node>,
    history: Option<SelectionHistory<T::Node>>,
    config: SelectionConfig,
    version: u64,
}

impl<T: TreeStructure> fmt::Debug for SelectionModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionModel")
            .field("selection", &self.selection)
            .field("notifier", &self.notifier)
            .field("history", &self.history)
            .field("config", &self.config)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl<T> SelectionModel<T>
where
    T: TreeStructure,
    T::Node: 'static,
{
    /// Create a model with an empty selection and default configuration.
    #[must_use]
    pub fn new(tree: T) -> Self {
        Self::with_config(tree, SelectionConfig::default())
    }

    /// Create a model with an empty selection.
    #[must_use]
    pub fn with_config(tree: T, config: SelectionConfig) -> Self {
        let history = config
            .history_enabled()
            .then(|| SelectionHistory::new(config.history_depth, Arc::from(Vec::new())));
        Self {
            tree,
            selection: PathSet::new(),
            notifier: ChangeNotifier::new(),
            history,
            config,
            version: 0,
        }
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    #[must_use]
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Mutable access to the tree. Explicit paths naming nodes that vanish
    /// stay in the set until the caller deselects them.
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    /// Read-only view of the explicit set.
    #[must_use]
    pub fn selection(&self) -> &PathSet<T::Node> {
        &self.selection
    }

    #[must_use]
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Incremented once per call that changed the explicit set.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ====================================================================
    // Queries
    // ====================================================================

    #[must_use]
    pub fn is_explicit(&self, path: &TreePath<T::Node>) -> bool {
        self.selection.is_explicit(path)
    }

    #[must_use]
    pub fn is_selected_or_implicit(&self, path: &TreePath<T::Node>) -> bool {
        self.selection.is_selected_or_implicit(path)
    }

    #[must_use]
    pub fn is_unselected(&self, path: &TreePath<T::Node>) -> bool {
        self.selection.is_unselected(path)
    }

    #[must_use]
    pub fn check_state(&self, path: &TreePath<T::Node>) -> CheckState {
        self.selection.check_state(path)
    }

    #[must_use]
    pub fn is_selection_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Explicit paths in insertion order.
    #[must_use]
    pub fn selection_paths(&self) -> Vec<TreePath<T::Node>> {
        self.selection.snapshot()
    }

    /// Check that `path` starts at the root and every step names an actual
    /// child of the previous node.
    pub fn resolve(&self, path: &TreePath<T::Node>) -> Result<(), SelectionError> {
        let root = self.tree.root();
        if *path.first() != root {
            return Err(SelectionError::RootMismatch {
                expected: format!("{root:?}"),
                found: format!("{:?}", path.first()),
            });
        }
        for (depth, pair) in path.nodes().windows(2).enumerate() {
            let (parent, node) = (&pair[0], &pair[1]);
            if !self.tree.children(parent).any(|child| child == *node) {
                return Err(SelectionError::UnknownNode {
                    depth: depth + 1,
                    parent: format!("{parent:?}"),
                    node: format!("{node:?}"),
                });
            }
        }
        Ok(())
    }

    // ====================================================================
    // Observers
    // ====================================================================

    /// Register an observer for selection changes.
    pub fn subscribe(
        &mut self,
        callback: impl Fn(&SelectionChange<T::Node>) + 'static,
    ) -> Subscription {
        self.notifier.subscribe(callback)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    // ====================================================================
    // Mutation
    // ====================================================================

    /// Add `paths` to the selection, collapsing fully selected sibling groups
    /// into their parent. Returns whether the explicit set changed.
    pub fn select(&mut self, paths: &[TreePath<T::Node>]) -> bool {
        let paths = self.admit(paths);
        if paths.is_empty() {
            trace!("select with no paths");
            return false;
        }
        let span = debug_span!(
            "checktree.select",
            requested = paths.len() as u64,
            before = self.selection.len() as u64,
            after = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        self.transact(ChangeKind::Select, span, |model| {
            for path in paths.iter() {
                model.add_path(path);
            }
        })
    }

    /// Remove `paths` from the selection, expanding covering ancestors as
    /// needed. Returns whether the explicit set changed.
    pub fn deselect(&mut self, paths: &[TreePath<T::Node>]) -> bool {
        if self.selection.is_empty() {
            trace!("deselect on empty selection");
            return false;
        }
        let paths = self.admit(paths);
        if paths.is_empty() {
            trace!("deselect with no paths");
            return false;
        }
        let span = debug_span!(
            "checktree.deselect",
            requested = paths.len() as u64,
            before = self.selection.len() as u64,
            after = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        self.transact(ChangeKind::Deselect, span, |model| {
            for path in paths.iter() {
                model.remove_path(path);
            }
        })
    }

    /// Replace the selection with `paths`, normalized as by
    /// [`select`](Self::select). An empty slice clears the selection.
    pub fn set_selection(&mut self, paths: &[TreePath<T::Node>]) -> bool {
        let paths = self.admit(paths);
        let span = debug_span!(
            "checktree.replace",
            requested = paths.len() as u64,
            before = self.selection.len() as u64,
            after = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        self.transact(ChangeKind::Replace, span, |model| {
            model.selection.clear();
            for path in paths.iter() {
                model.add_path(path);
            }
        })
    }

    /// Deselect everything.
    pub fn clear(&mut self) -> bool {
        let span = debug_span!(
            "checktree.clear",
            requested = 0_u64,
            before = self.selection.len() as u64,
            after = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        self.transact(ChangeKind::Clear, span, |model| model.selection.clear())
    }

    /// Checkbox click: deselect `path` if it is selected (explicitly or
    /// implicitly), select it otherwise. A partially selected node becomes
    /// selected. Returns whether `path` is selected afterwards.
    pub fn toggle(&mut self, path: &TreePath<T::Node>) -> bool {
        let paths = std::slice::from_ref(path);
        if self.selection.is_selected_or_implicit(path) {
            self.deselect(paths);
        } else {
            self.select(paths);
        }
        self.selection.is_selected_or_implicit(path)
    }

    /// [`select`](Self::select) after checking every path with
    /// [`resolve`](Self::resolve). Nothing is applied if any path fails.
    pub fn try_select(
        &mut self,
        paths: &[TreePath<T::Node>],
    ) -> Result<bool, SelectionError> {
        self.resolve_all(paths)?;
        Ok(self.select(paths))
    }

    /// [`deselect`](Self::deselect) after checking every path.
    pub fn try_deselect(
        &mut self,
        paths: &[TreePath<T::Node>],
    ) -> Result<bool, SelectionError> {
        self.resolve_all(paths)?;
        Ok(self.deselect(paths))
    }

    /// [`set_selection`](Self::set_selection) after checking every path.
    pub fn try_set_selection(
        &mut self,
        paths: &[TreePath<T::Node>],
    ) -> Result<bool, SelectionError> {
        self.resolve_all(paths)?;
        Ok(self.set_selection(paths))
    }

    // ====================================================================
    // History
    // ====================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.as_ref().is_some_and(SelectionHistory::can_undo)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.as_ref().is_some_and(SelectionHistory::can_redo)
    }

    /// Restore the snapshot before the last recorded change. Returns `false`
    /// when history is disabled or exhausted.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.as_mut().and_then(SelectionHistory::undo) else {
            return false;
        };
        let span = debug_span!(
            "checktree.undo",
            requested = snapshot.len() as u64,
            before = self.selection.len() as u64,
            after = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        self.transact(ChangeKind::Undo, span, |model| model.restore(&snapshot));
        true
    }

    /// Re-apply the most recently undone change.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.as_mut().and_then(SelectionHistory::redo) else {
            return false;
        };
        let span = debug_span!(
            "checktree.redo",
            requested = snapshot.len() as u64,
            before = self.selection.len() as u64,
            after = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        self.transact(ChangeKind::Redo, span, |model| model.restore(&snapshot));
        true
    }

    /// Drop undo/redo entries, keeping the current selection as the base.
    pub fn clear_history(&mut self) {
        if let Some(history) = self.history.as_mut() {
            history.truncate_to_current();
        }
    }

    // ====================================================================
    // Engine
    // ====================================================================

    /// Run one top-level mutation: snapshot, apply, compare, notify, record.
    fn transact(
        &mut self,
        kind: ChangeKind,
        span: Span,
        apply: impl FnOnce(&mut Self),
    ) -> bool {
        let started = Instant::now();
        let _entered = span.enter();

        let prior: Snapshot<T::Node> = self.selection.snapshot().into();
        apply(self);
        debug_assert!(self.selection.is_canonical(), "non-canonical selection");

        let changed = prior.len() != self.selection.len()
            || !prior.iter().all(|path| self.selection.is_explicit(path));
        span.record("after", self.selection.len() as u64);

        if changed || self.config.notify_unchanged {
            if changed {
                self.version += 1;
            }
            let current: Snapshot<T::Node> = self.selection.snapshot().into();
            if changed && !matches!(kind, ChangeKind::Undo | ChangeKind::Redo) {
                if let Some(history) = self.history.as_mut() {
                    history.push(Arc::clone(&current));
                }
            }
            let change = SelectionChange {
                kind,
                prior,
                current,
                version: self.version,
            };
            self.notifier.notify(&change);
        }

        span.record("duration_us", started.elapsed().as_micros() as u64);
        changed
    }

    /// Paths to process: all of them, or only the resolvable ones when
    /// `validate_paths` is on.
    fn admit<'p>(&self, paths: &'p [TreePath<T::Node>]) -> Cow<'p, [TreePath<T::Node>]> {
        if !self.config.validate_paths {
            return Cow::Borrowed(paths);
        }
        let admitted: Vec<_> = paths
            .iter()
            .filter(|path| match self.resolve(path) {
                Ok(()) => true,
                Err(err) => {
                    warn!(path = ?path, error = %err, "skipping unresolved path");
                    false
                }
            })
            .cloned()
            .collect();
        Cow::Owned(admitted)
    }

    fn resolve_all(&self, paths: &[TreePath<T::Node>]) -> Result<(), SelectionError> {
        paths.iter().try_for_each(|path| self.resolve(path))
    }

    /// Replace the explicit set with a recorded canonical snapshot.
    fn restore(&mut self, snapshot: &[TreePath<T::Node>]) {
        self.selection = snapshot.iter().cloned().collect();
    }

    /// Select one path: drop its explicit descendants, then walk up while the
    /// siblings are all selected and select the highest such ancestor's
    /// parent instead, repeating until a level with unselected siblings.
    fn add_path(&mut self, path: &TreePath<T::Node>) {
        let mut target = path.clone();
        loop {
            let dropped = self.selection.remove_descendants_of(&target);
            if dropped > 0 {
                trace!(path = ?target, dropped, "subsumed explicit descendants");
            }

            let mut cursor = target.clone();
            let mut collapse_top = None;
            while self.selection.all_siblings_selected(&self.tree, &cursor) {
                let parent = cursor.parent();
                collapse_top = Some(cursor);
                match parent {
                    Some(parent) => cursor = parent,
                    None => break,
                }
            }

            let Some(top) = collapse_top else {
                self.selection.insert(target);
                return;
            };
            match top.parent() {
                Some(parent) => {
                    trace!(from = ?target, to = ?parent, "collapse into parent");
                    target = parent;
                }
                None => {
                    trace!(root = ?top, "collapse to root");
                    self.selection.clear();
                    self.selection.insert(top);
                    return;
                }
            }
        }
    }

    /// Deselect one path.
    fn remove_path(&mut self, path: &TreePath<T::Node>) {
        if path.is_root() || self.selection.is_explicit(path) {
            self.selection.remove(path);
            return;
        }
        self.expand_around(path);
    }

    /// Push the nearest explicit ancestor's selection down toward `path`,
    /// one level at a time, re-selecting every child off the chain.
    fn expand_around(&mut self, path: &TreePath<T::Node>) {
        // path, parent, ..., nearest explicit ancestor (top of stack).
        let mut chain = vec![path.clone()];
        let mut ancestor = path.parent();
        loop {
            match ancestor {
                None => {
                    trace!(path = ?path, "no explicit ancestor, already unselected");
                    return;
                }
                Some(candidate) if self.selection.is_explicit(&candidate) => {
                    chain.push(candidate);
                    break;
                }
                Some(candidate) => {
                    ancestor = candidate.parent();
                    chain.push(candidate);
                }
            }
        }
        trace!(path = ?path, levels = chain.len() - 1, "expand covering ancestor");

        while let Some(node) = chain.pop() {
            self.selection.remove(&node);
            let Some(next) = chain.last() else {
                break;
            };
            let skip = next.last();
            for child in self.tree.children(node.last()) {
                if child != *skip {
                    self.selection.insert(node.child(child));
                }
            }
        }
    }
}
