//! # Chatmerge
//!
//! A Rust library for merging Telegram Desktop HTML chat exports into one
//! clean, chronological, WhatsApp-style plain-text transcript.
//!
//! ## Overview
//!
//! Group chats exported from Telegram are split across several
//! `messages*.html` files and full of noise: bot posts, sales catalogs,
//! link spam, flooding. Chatmerge:
//! - reads every export document independently
//! - normalizes sender names (emoji, tags, `" | company"` suffixes)
//! - drops bot accounts, bot-rendered messages and spam lines
//! - caps consecutive runs per sender and removes duplicates
//! - merges all documents into a single time-ordered transcript
//!
//! Output lines look like WhatsApp exports:
//!
//! ```text
//! 01/15/24, 10:30 AM - Alice: hello there
//! 01/15/24, 10:31 AM - Bob: <Media omitted>
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatmerge::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let docs = vec![std::fs::read("messages.html")?, std::fs::read("messages2.html")?];
//!
//!     // Plain transcript
//!     let text = convert_text(&docs, Some("team chat"), &ConvertConfig::default())?;
//!     std::fs::write(&text.filename, &text.bytes)?;
//!
//!     // Password-protected ZIP
//!     let archive = ArchiveConfig::new().with_password("s3cret");
//!     let zip = convert_archive(&docs, None, &archive, &ZipEncoder, &ConvertConfig::default())?;
//!     std::fs::write(&zip.filename, &zip.bytes)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Sources
//!
//! The extraction rules work on any [`MessageSource`](parser::MessageSource),
//! so other markup readers (or synthetic test data) plug into the same
//! pipeline through [`Merger`](core::processor::Merger).
//!
//! ## Module Structure
//!
//! - [`convert`] - Request-level operations ([`convert_text`](convert::convert_text), [`convert_archive`](convert::convert_archive))
//! - [`parser`] - [`MessageSource`](parser::MessageSource) trait and [`RawMessage`](parser::RawMessage) node view
//! - [`parsers`] - [`TelegramHtml`](parsers::TelegramHtml) source
//! - [`core`] - Normalizer, timestamp parser, content filter, extractor, merge engine, writers
//! - [`config`] - [`ConvertConfig`](config::ConvertConfig), [`ArchiveConfig`](config::ArchiveConfig)
//! - [`cli`] - CLI types ([`Args`](cli::Args), [`OutputFormat`](cli::OutputFormat))
//! - [`error`] - Unified error types ([`ChatmergeError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
#[cfg(feature = "html")]
pub mod convert;
pub mod core;
pub mod error;
pub mod parser;
#[cfg(feature = "html")]
pub mod parsers;

// Re-export the main types at the crate root for convenience
pub use error::{ChatmergeError, ErrorPayload, Result};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatmerge::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{ChatmergeError, ErrorPayload, Result};

    // Configuration
    pub use crate::config::{ArchiveConfig, ConvertConfig};

    // Source abstraction
    pub use crate::parser::{BotMarkers, MessageSource, RawDocument, RawMessage, RawTimestamp};

    // Models
    pub use crate::core::models::{Entry, MergeStats, MergedTranscript};

    // Filtering
    pub use crate::core::filter::{Rejection, Verdict, classify};

    // Processing
    pub use crate::core::processor::{Merger, merge_entries};

    // Output
    pub use crate::core::output::{archive_filename, transcript_filename, write_transcript};

    #[cfg(feature = "archive")]
    pub use crate::core::output::{ArchiveEncoder, ZipEncoder};

    #[cfg(feature = "html")]
    pub use crate::convert::{Conversion, convert_text};

    #[cfg(all(feature = "html", feature = "archive"))]
    pub use crate::convert::convert_archive;

    #[cfg(feature = "html")]
    pub use crate::parsers::TelegramHtml;
}
