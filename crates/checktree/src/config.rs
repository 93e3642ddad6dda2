#![forbid(unsafe_code)]

//! Selection model configuration.
//!
//! # Loading
//!
//! With the `config-file` feature, [`SelectionConfig`] can be read from TOML.
//! Every field is optional; missing fields keep their defaults.
//!
//! ```toml
//! # checktree.toml
//! history_depth = 50
//! validate_paths = true
//! notify_unchanged = false
//! ```
//!
//! ```rust,ignore
//! let config = SelectionConfig::from_toml_file("checktree.toml")?;
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for a [`SelectionModel`](crate::SelectionModel).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct SelectionConfig {
    /// Snapshots kept for undo/redo, including the current one.
    /// 0 disables history.
    pub history_depth: usize,

    /// Make `select`/`deselect` skip paths that do not resolve against the
    /// tree instead of trusting the caller.
    pub validate_paths: bool,

    /// Notify observers even when a call leaves the explicit set unchanged.
    /// Empty input, and `deselect` on an empty selection, never notify.
    pub notify_unchanged: bool,
}

impl SelectionConfig {
    /// Enable undo/redo with the given depth.
    #[must_use]
    pub fn with_history(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    #[must_use]
    pub fn with_validate_paths(mut self, validate: bool) -> Self {
        self.validate_paths = validate;
        self
    }

    #[must_use]
    pub fn with_notify_unchanged(mut self, notify: bool) -> Self {
        self.notify_unchanged = notify;
        self
    }

    /// Whether undo/redo is enabled.
    #[must_use]
    pub fn history_enabled(&self) -> bool {
        self.history_depth > 0
    }

    /// Validate all parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.history_depth == 1 {
            errors.push(
                "history_depth must be 0 (disabled) or at least 2 to allow an undo step"
                    .to_owned(),
            );
        }
        errors
    }

    /// [`validate`](Self::validate) as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}
