#![forbid(unsafe_code)]

//! Selection change notification.
//!
//! # Design
//!
//! [`ChangeNotifier`] keeps observers as `Weak` callbacks and hands the strong
//! `Rc` back to the caller inside a [`Subscription`] guard. Dropping the guard
//! detaches the observer; dead entries are pruned lazily on the next
//! notification.
//!
//! Each top-level mutating call on the model produces exactly one
//! [`SelectionChange`], carrying the canonical snapshot before and after the
//! call. Observers never see the intermediate states the engine passes
//! through while collapsing or expanding.
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: observers receive `&SelectionChange`, not the
//!   model, so they cannot mutate the selection from inside the callback.
//!   Queue the follow-up and apply it after the call returns.

use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use ahash::AHashSet;
use tracing::debug;

use crate::path::TreePath;

/// Which operation produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Select,
    Deselect,
    Replace,
    Clear,
    Undo,
    Redo,
}

impl ChangeKind {
    /// Stable lowercase name, used as a tracing field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Deselect => "deselect",
            Self::Replace => "replace",
            Self::Clear => "clear",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Before/after snapshots of one top-level mutating call.
#[derive(Debug, Clone)]
pub struct SelectionChange<N> {
    pub kind: ChangeKind,
    /// Explicit paths before the call, insertion order.
    pub prior: Arc<[TreePath<N>]>,
    /// Explicit paths after the call, insertion order.
    pub current: Arc<[TreePath<N>]>,
    /// Model version after the call.
    pub version: u64,
}

impl<N: Clone + Eq + Hash> SelectionChange<N> {
    /// Paths explicit after the call but not before.
    #[must_use]
    pub fn added(&self) -> Vec<TreePath<N>> {
        difference(&self.current, &self.prior)
    }

    /// Paths explicit before the call but not after.
    #[must_use]
    pub fn removed(&self) -> Vec<TreePath<N>> {
        difference(&self.prior, &self.current)
    }

    /// Prior and current hold the same set of paths.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.prior.len() == self.current.len() && self.added().is_empty()
    }
}

fn difference<N: Clone + Eq + Hash>(
    from: &[TreePath<N>],
    minus: &[TreePath<N>],
) -> Vec<TreePath<N>> {
    let minus: AHashSet<&TreePath<N>> = minus.iter().collect();
    from.iter()
        .filter(|path| !minus.contains(path))
        .cloned()
        .collect()
}

type CallbackRc<N> = Rc<dyn Fn(&SelectionChange<N>)>;
type CallbackWeak<N> = Weak<dyn Fn(&SelectionChange<N>)>;

/// Observer registry owned by a [`SelectionModel`](crate::SelectionModel).
///
/// # Invariants
///
/// 1. Observers are notified in registration order.
/// 2. An observer whose [`Subscription`] was dropped is never called again.
pub struct ChangeNotifier<N> {
    subscribers: Vec<CallbackWeak<N>>,
}

impl<N> Default for ChangeNotifier<N> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<N> fmt::Debug for ChangeNotifier<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

impl<N: 'static> ChangeNotifier<N> {
    /// Create a notifier with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Keep the returned guard alive for as long as the
    /// observer should receive changes.
    pub fn subscribe(
        &mut self,
        callback: impl Fn(&SelectionChange<N>) + 'static,
    ) -> Subscription {
        let strong: CallbackRc<N> = Rc::new(callback);
        self.subscribers.push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Registered observers, including detached ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver `change` to every live observer and prune dead ones.
    pub fn notify(&mut self, change: &SelectionChange<N>) {
        self.subscribers.retain(|weak| weak.strong_count() > 0);
        let callbacks: Vec<CallbackRc<N>> =
            self.subscribers.iter().filter_map(Weak::upgrade).collect();

        debug!(
            kind = change.kind.as_str(),
            version = change.version,
            observers = callbacks.len() as u64,
            "selection change"
        );
        for callback in &callbacks {
            callback(change);
        }
    }
}

/// RAII guard for an observer registered with [`ChangeNotifier::subscribe`].
///
/// Dropping the guard drops the only strong reference to the callback, so
/// the notifier's `Weak` stops upgrading.
#[must_use = "dropping the subscription detaches the observer immediately"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Detach the observer now. Same as dropping the guard.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
