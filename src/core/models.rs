//! Core data models for transcript entries and merge results.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::timestamp::format_timestamp;

/// Content rendered in place of a media attachment.
pub const MEDIA_OMITTED: &str = "<Media omitted>";

/// One accepted, fully rendered transcript line with its resolved timestamp.
///
/// Entries are immutable once produced: the merge engine reorders them but
/// never changes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    timestamp: NaiveDateTime,
    line: String,
}

impl Entry {
    /// Creates an entry for a text line.
    ///
    /// ```
    /// use chatmerge::core::models::Entry;
    /// use chrono::NaiveDate;
    ///
    /// let ts = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(19, 5, 0).unwrap();
    /// let entry = Entry::text(ts, "Bob", "hello");
    /// assert_eq!(entry.line(), "01/15/24, 07:05 PM - Bob: hello");
    /// ```
    pub fn text(timestamp: NaiveDateTime, display_name: &str, content: &str) -> Self {
        Self {
            timestamp,
            line: format!(
                "{} - {}: {}",
                format_timestamp(&timestamp),
                display_name,
                content
            ),
        }
    }

    /// Creates an entry standing in for a media attachment.
    pub fn media(timestamp: NaiveDateTime, display_name: &str) -> Self {
        Self::text(timestamp, display_name, MEDIA_OMITTED)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Consumes the entry, returning the rendered line.
    pub fn into_line(self) -> String {
        self.line
    }
}

/// Counters collected while merging one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Documents that were parsed and scanned
    pub documents_read: usize,
    /// Documents skipped as unparsable
    pub documents_skipped: usize,
    /// Entries in the final transcript
    pub entries: usize,
}

impl MergeStats {
    /// Total documents supplied.
    pub fn documents_total(&self) -> usize {
        self.documents_read + self.documents_skipped
    }
}

/// The merged, time-ordered transcript of one conversion request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergedTranscript {
    /// Rendered lines in ascending timestamp order
    pub lines: Vec<String>,
    /// Minimum timestamp across all entries, if any
    pub earliest: Option<NaiveDateTime>,
    pub stats: MergeStats,
    /// Names of the documents skipped as unparsable, in input order
    pub skipped: Vec<String>,
}

impl MergedTranscript {
    /// Joins the lines with `\n`. There is no trailing newline.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
