//! Transcript and archive writers, plus the output filename contract.
//!
//! - [`write_transcript`] - plain UTF-8 text, one line per entry
//! - [`write_archive`] - ZIP archive holding the transcript, optionally
//!   password-protected - requires `archive` feature
//!
//! # Filenames
//!
//! A requested name is [sanitized](crate::core::normalize::sanitize_filename)
//! and forced to end in `.txt`; the archive name swaps that extension for
//! `.zip`.
//!
//! ```rust
//! use chatmerge::core::output::{archive_filename, transcript_filename};
//!
//! let txt = transcript_filename("../exports/group chat");
//! assert_eq!(txt, "group chat.txt");
//! assert_eq!(archive_filename(&txt), "group chat.zip");
//! ```

mod txt_writer;
#[cfg(feature = "archive")]
mod zip_writer;

pub use txt_writer::write_transcript;
#[cfg(feature = "archive")]
pub use zip_writer::{ArchiveEncoder, ZipEncoder, write_archive};

use super::normalize::sanitize_filename;

/// Requested name used when the caller supplies none.
pub const DEFAULT_TRANSCRIPT_NAME: &str = "converted_whatsapp.txt";

const TRANSCRIPT_EXTENSION: &str = ".txt";
const ARCHIVE_EXTENSION: &str = ".zip";

/// MIME type of the plain-text transcript.
pub const TRANSCRIPT_MIME: &str = "text/plain; charset=utf-8";

/// MIME type of the archive.
pub const ARCHIVE_MIME: &str = "application/zip";

/// Sanitizes a requested name and makes sure it ends in `.txt`.
///
/// The extension check is ASCII case-insensitive, so `"Chat.TXT"` is kept
/// as-is.
pub fn transcript_filename(requested: &str) -> String {
    let mut name = sanitize_filename(requested);
    if !has_extension(&name, TRANSCRIPT_EXTENSION) {
        name.push_str(TRANSCRIPT_EXTENSION);
    }
    name
}

/// Derives the archive name from a transcript name.
pub fn archive_filename(transcript: &str) -> String {
    let stem = if has_extension(transcript, TRANSCRIPT_EXTENSION) {
        &transcript[..transcript.len() - TRANSCRIPT_EXTENSION.len()]
    } else {
        transcript
    };
    format!("{stem}{ARCHIVE_EXTENSION}")
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.len() >= ext.len()
        && name.is_char_boundary(name.len() - ext.len())
        && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
}
