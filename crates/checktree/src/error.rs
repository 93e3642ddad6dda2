#![forbid(unsafe_code)]

//! Error types.

use thiserror::Error;

/// Errors building a [`TreePath`](crate::TreePath).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("tree path must contain at least the root node")]
    Empty,
}

/// Errors reported by the validating selection entry points
/// ([`SelectionModel::try_select`](crate::SelectionModel::try_select) and
/// friends).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("path root {found} does not match the tree root {expected}")]
    RootMismatch { expected: String, found: String },

    #[error("node {node} at depth {depth} is not a child of {parent}")]
    UnknownNode {
        depth: usize,
        parent: String,
        node: String,
    },
}

/// Errors loading or validating a [`SelectionConfig`](crate::SelectionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
