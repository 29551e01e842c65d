//! Unified error types for chatmerge.
//!
//! This module provides a single [`ChatmergeError`] enum that covers all error
//! cases in the library, plus [`ErrorPayload`], a serializable diagnostic
//! (message + source chain) for callers that report failures to a client.
//!
//! # Error Handling Philosophy
//!
//! - **Per-document problems** (bad bytes, bad timestamps, foreign nodes) are
//!   absorbed by the merge engine and never reach the caller in default mode
//! - **Request problems** (no documents, archive failure) are returned as typed errors
//! - **Developers** get source error chains for debugging

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A specialized [`Result`] type for chatmerge operations.
///
/// # Example
///
/// ```rust
/// use chatmerge::error::Result;
///
/// fn my_function() -> Result<Vec<String>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatmergeError>;

/// The error type for all chatmerge operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatmergeError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - An input file doesn't exist or can't be read
    /// - The scoped temporary directory can't be created
    /// - The output file can't be written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A document is not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The document doesn't have the expected structure.
    #[error("Invalid {format} format: {message}{}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The conversion request carried no documents.
    #[error("No input documents supplied")]
    NoDocuments,

    /// The archive encoder failed.
    #[cfg(feature = "archive")]
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl From<std::string::FromUtf8Error> for ChatmergeError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatmergeError::Utf8 {
            context: "document decoding".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatmergeError {
    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatmergeError::InvalidFormat {
            format,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a UTF-8 error with a custom context.
    pub fn utf8(context: impl Into<String>, source: std::string::FromUtf8Error) -> Self {
        ChatmergeError::Utf8 {
            context: context.into(),
            source,
        }
    }

    /// Attaches a file path to errors that carry one.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            ChatmergeError::InvalidFormat {
                format, message, ..
            } => ChatmergeError::InvalidFormat {
                format,
                message,
                path: Some(file.into()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatmergeError::Io(_))
    }

    /// Returns `true` if this error means a single document was unusable.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            ChatmergeError::Utf8 { .. } | ChatmergeError::InvalidFormat { .. }
        )
    }

    /// Returns `true` if the request had no documents.
    pub fn is_no_documents(&self) -> bool {
        matches!(self, ChatmergeError::NoDocuments)
    }

    /// Builds the diagnostic payload for this error.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload::from_error(self)
    }
}

/// Diagnostic payload reported to a caller on failure.
///
/// `trace` lists the error's `source()` chain, outermost first.
///
/// ```rust
/// use chatmerge::ChatmergeError;
///
/// let payload = ChatmergeError::NoDocuments.payload();
/// assert_eq!(payload.error, "No input documents supplied");
/// assert!(payload.trace.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// Top-level error message
    pub error: String,
    /// Messages of the underlying causes
    pub trace: Vec<String>,
}

impl ErrorPayload {
    /// Walks the source chain of any error.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut trace = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push(cause.to_string());
            source = cause.source();
        }
        Self {
            error: err.to_string(),
            trace,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
