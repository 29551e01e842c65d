//! Core processing logic for chatmerge.
//!
//! This module contains:
//! - [`normalize`] - Sender name and filename normalization
//! - [`timestamp`] - Timestamp parsing and canonical rendering
//! - [`filter`] - Content filter for spam and bot lines
//! - [`extractor`] - Per-document message extraction
//! - [`processor`] - Multi-document merge engine
//! - [`models`] - Entries, transcripts and merge statistics
//! - [`output`] - Transcript and archive writers
//!
//! # Quick Start
//!
//! ```rust
//! use chatmerge::core::{ConvertConfig, Merger, RawMessage};
//!
//! let doc = vec![RawMessage::new("15.01.2024 10:30:00 UTC", "Alice").with_text("hello there")];
//!
//! let mut merger = Merger::new(ConvertConfig::default());
//! merger.add_source(&doc);
//! assert_eq!(merger.finish().len(), 1);
//! ```

pub mod extractor;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod output;
pub mod processor;
pub mod timestamp;

// Re-export main types for convenience
pub use extractor::{DocumentState, extract_entries};
pub use filter::{Rejection, Verdict, classify};
pub use models::{Entry, MergeStats, MergedTranscript};
pub use normalize::{canonical_key, display_form, sanitize_filename};
pub use output::{archive_filename, transcript_filename, write_transcript};
pub use processor::{Merger, merge_entries};
pub use timestamp::{format_timestamp, parse_timestamp};

#[cfg(feature = "archive")]
pub use output::{ArchiveEncoder, ZipEncoder, write_archive};
#[cfg(feature = "html")]
pub use processor::process_and_merge;

pub use crate::config::ConvertConfig;
pub use crate::parser::RawMessage;
