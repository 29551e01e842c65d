//! Configuration types for conversion and archive output.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ConvertConfig`] - extraction and merge settings
//! - [`ArchiveConfig`] - password and compression for ZIP output
//!
//! # Example
//!
//! ```rust
//! use chatmerge::config::{ArchiveConfig, ConvertConfig};
//!
//! let convert = ConvertConfig::new()
//!     .with_max_consecutive(3)
//!     .with_skip_invalid(false);
//!
//! let archive = ArchiveConfig::new().with_password("s3cret");
//! assert!(archive.is_protected());
//! ```

use serde::{Deserialize, Serialize};

/// Settings for the extraction and merge pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Longest run of consecutive messages kept per sender (default: 2)
    pub max_consecutive: usize,

    /// Skip unparsable documents instead of returning errors (default: true)
    pub skip_invalid: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_consecutive: 2,
            skip_invalid: true,
        }
    }
}

impl ConvertConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that fails on the first unreadable document.
    pub fn strict() -> Self {
        Self {
            skip_invalid: false,
            ..Self::default()
        }
    }

    /// Sets the per-sender consecutive run cap.
    #[must_use]
    pub fn with_max_consecutive(mut self, max: usize) -> Self {
        self.max_consecutive = max;
        self
    }

    /// Sets whether to skip unparsable documents.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

/// Settings for the password-protected archive output.
///
/// An empty password produces an unprotected archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive password (default: empty, no encryption)
    pub password: String,

    /// Deflate level 0-9 (default: 5)
    pub compression_level: i64,

    /// Optional archive comment (default: none)
    pub comment: Option<String>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            password: String::new(),
            compression_level: 5,
            comment: None,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the compression level, clamped to 0-9.
    #[must_use]
    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = level.clamp(0, 9);
        self
    }

    /// Sets the archive comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns `true` if the archive will be encrypted.
    pub fn is_protected(&self) -> bool {
        !self.password.is_empty()
    }
}
