#![forbid(unsafe_code)]

//! checktree
//!
//! Tri-state (checked / partial / unchecked) selection over hierarchical
//! trees, stored as a canonical set of explicitly selected paths.
//!
//! # Key Components
//!
//! - [`TreePath`] - Root-to-node identifier sequence
//! - [`TreeStructure`] - Read-only child enumeration the model consults
//! - [`PathSet`] - Canonical explicit set plus status queries
//! - [`SelectionModel`] - Select/deselect engine with collapse and expansion
//! - [`ChangeNotifier`] / [`Subscription`] - Before/after change observers
//! - [`SelectionHistory`] - Optional snapshot undo/redo
//! - [`ArenaTree`] - In-memory labelled tree implementing [`TreeStructure`]
//!
//! # How it fits together
//!
//! A caller (typically a tree view's input handler) calls
//! [`SelectionModel::select`] or [`SelectionModel::deselect`]. The model walks
//! the tree through [`TreeStructure`], rewrites its [`PathSet`] back into
//! canonical form, and emits one [`SelectionChange`] carrying the snapshots
//! before and after the call. Rendering and persistence live outside this
//! crate.

pub mod arena;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod notify;
pub mod path;
pub mod path_set;
pub mod structure;

pub use arena::{ArenaTree, NodeId, TreeNode};
pub use config::SelectionConfig;
pub use error::{ConfigError, PathError, SelectionError};
pub use history::{SelectionHistory, Snapshot};
pub use model::SelectionModel;
pub use notify::{ChangeKind, ChangeNotifier, SelectionChange, Subscription};
pub use path::TreePath;
pub use path_set::{CheckState, PathSet};
pub use structure::TreeStructure;
