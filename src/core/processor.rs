//! Multi-document merge engine.
//!
//! Every document is extracted independently with a fresh
//! [`DocumentState`], so duplicates and consecutive runs are only tracked
//! within a document. All entries are then stable-sorted by timestamp:
//! ties keep document order, then in-document order.
//!
//! # Example
//!
//! ```rust
//! use chatmerge::config::ConvertConfig;
//! use chatmerge::core::processor::Merger;
//! use chatmerge::parser::RawMessage;
//!
//! let first = vec![RawMessage::new("15.01.2024 10:31:00 UTC", "Bob").with_text("world peace")];
//! let second = vec![RawMessage::new("15.01.2024 10:30:00 UTC", "Bob").with_text("hello there")];
//!
//! let mut merger = Merger::new(ConvertConfig::default());
//! merger.add_source(&first);
//! merger.add_source(&second);
//! let transcript = merger.finish();
//!
//! assert_eq!(
//!     transcript.to_text(),
//!     "01/15/24, 10:30 AM - Bob: hello there\n01/15/24, 10:31 AM - Bob: world peace"
//! );
//! ```

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use super::extractor::{DocumentState, extract_entries};
use super::models::{Entry, MergeStats, MergedTranscript};
use crate::config::ConvertConfig;
use crate::error::{ChatmergeError, Result};
use crate::parser::MessageSource;
#[cfg(feature = "html")]
use crate::parser::RawDocument;

#[cfg(feature = "html")]
use crate::parsers::TelegramHtml;

/// Source of the fallback timestamp for unparsable dates.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Accumulates entries from several documents into one transcript.
#[derive(Debug)]
pub struct Merger {
    config: ConvertConfig,
    clock: Clock,
    entries: Vec<Entry>,
    stats: MergeStats,
    skipped: Vec<String>,
}

impl Merger {
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            config,
            clock: local_now,
            entries: Vec::new(),
            stats: MergeStats::default(),
            skipped: Vec::new(),
        }
    }

    /// Replaces the clock used for fallback timestamps (default: local time).
    ///
    /// The clock is read once per document.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Extracts one document and returns the number of entries it added.
    pub fn add_source<S>(&mut self, source: &S) -> usize
    where
        S: MessageSource + ?Sized,
    {
        let mut state = DocumentState::new();
        let fallback = (self.clock)();
        let entries = extract_entries(source, &mut state, &self.config, fallback);
        let added = entries.len();

        self.entries.extend(entries);
        self.stats.documents_read += 1;
        added
    }

    /// Parses a Telegram HTML document and extracts it.
    ///
    /// An unparsable document is skipped with a warning and contributes no
    /// entries, unless [`ConvertConfig::skip_invalid`] is `false`.
    #[cfg(feature = "html")]
    pub fn add_document(&mut self, name: &str, bytes: &[u8]) -> Result<usize> {
        match TelegramHtml::parse(bytes) {
            Ok(doc) => Ok(self.add_source(&doc.with_name(name))),
            Err(err) => self.skip_document(name, err).map(|()| 0),
        }
    }

    /// Records a document that could not be loaded.
    ///
    /// Returns the error back in strict mode.
    pub fn skip_document(&mut self, name: &str, err: ChatmergeError) -> Result<()> {
        if !self.config.skip_invalid {
            return Err(err);
        }
        warn!(document = name, error = %err, "skipping unparsable document");
        self.stats.documents_skipped += 1;
        self.skipped.push(name.to_string());
        Ok(())
    }

    /// Sorts the collected entries and builds the transcript.
    pub fn finish(self) -> MergedTranscript {
        let mut transcript = merge_entries(self.entries);
        transcript.stats.documents_read = self.stats.documents_read;
        transcript.stats.documents_skipped = self.stats.documents_skipped;
        transcript.skipped = self.skipped;

        info!(
            documents = transcript.stats.documents_read,
            skipped = transcript.stats.documents_skipped,
            entries = transcript.stats.entries,
            earliest = ?transcript.earliest,
            "merge finished"
        );
        transcript
    }
}

/// Stable-sorts entries by timestamp and renders the transcript.
///
/// Only `stats.entries` is filled in; document counters stay zero.
pub fn merge_entries(mut entries: Vec<Entry>) -> MergedTranscript {
    entries.sort_by_key(Entry::timestamp);

    let earliest = entries.first().map(Entry::timestamp);
    let lines: Vec<String> = entries.into_iter().map(Entry::into_line).collect();

    MergedTranscript {
        earliest,
        stats: MergeStats {
            entries: lines.len(),
            ..MergeStats::default()
        },
        lines,
        skipped: Vec::new(),
    }
}

/// Merges raw Telegram HTML documents in the given order.
///
/// Unnamed documents are labelled `document N` (1-based) in warnings.
///
/// # Errors
///
/// Returns [`ChatmergeError::NoDocuments`] if `documents` is empty. In strict
/// mode the first unparsable document's error is returned.
#[cfg(feature = "html")]
pub fn process_and_merge<D>(documents: &[D], config: &ConvertConfig) -> Result<MergedTranscript>
where
    D: RawDocument,
{
    if documents.is_empty() {
        return Err(ChatmergeError::NoDocuments);
    }

    let mut merger = Merger::new(config.clone());
    for (index, doc) in documents.iter().enumerate() {
        let name = doc
            .name()
            .map_or_else(|| format!("document {}", index + 1), str::to_string);
        merger.add_document(&name, doc.bytes())?;
    }
    Ok(merger.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RawMessage;
    use chrono::NaiveDate;

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn msg(minute: u32, sender: &str, text: &str) -> RawMessage {
        RawMessage::new(format!("15.01.2024 10:{minute:02}:00 UTC"), sender).with_text(text)
    }

    #[test]
    fn test_merge_orders_across_documents() {
        let doc_a = vec![msg(5, "Bob", "world peace")];
        let doc_b = vec![msg(1, "Bob", "hello there")];

        let mut merger = Merger::new(ConvertConfig::default());
        assert_eq!(merger.add_source(&doc_a), 1);
        assert_eq!(merger.add_source(&doc_b), 1);
        let transcript = merger.finish();

        assert_eq!(transcript.lines.len(), 2);
        assert!(transcript.lines[0].ends_with("Bob: hello there"));
        assert!(transcript.lines[1].ends_with("Bob: world peace"));
        assert_eq!(transcript.earliest.unwrap().to_string(), "2024-01-15 10:01:00");
        assert_eq!(transcript.stats.documents_read, 2);
        assert_eq!(transcript.stats.entries, 2);
    }

    #[test]
    fn test_ties_keep_document_order() {
        let doc_a = vec![msg(1, "Alice", "from the first file")];
        let doc_b = vec![msg(1, "Carol", "from the second file")];

        let mut merger = Merger::new(ConvertConfig::default());
        merger.add_source(&doc_a);
        merger.add_source(&doc_b);
        let lines = merger.finish().lines;

        assert!(lines[0].contains("Alice"));
        assert!(lines[1].contains("Carol"));
    }

    #[test]
    fn test_cross_document_duplicates_survive() {
        let doc = vec![msg(1, "Alice", "good morning everyone")];

        let mut merger = Merger::new(ConvertConfig::default());
        merger.add_source(&doc);
        merger.add_source(&doc);
        assert_eq!(merger.finish().len(), 2);
    }

    #[test]
    fn test_state_does_not_leak_between_documents() {
        // two messages from Alice at the end of one document and two at the
        // start of the next are separate runs
        let doc_a = vec![msg(1, "Alice", "first message"), msg(2, "Alice", "second message")];
        let doc_b = vec![msg(3, "Alice", "third message"), msg(4, "Alice", "fourth message")];

        let mut merger = Merger::new(ConvertConfig::default());
        merger.add_source(&doc_a);
        merger.add_source(&doc_b);
        assert_eq!(merger.finish().len(), 4);
    }

    #[test]
    fn test_fallback_clock() {
        let doc = vec![RawMessage::new("garbage", "Alice").with_text("good morning everyone")];

        let mut merger = Merger::new(ConvertConfig::default()).with_clock(fixed_clock);
        merger.add_source(&doc);
        let transcript = merger.finish();

        assert_eq!(transcript.earliest, Some(fixed_clock()));
        assert_eq!(
            transcript.lines,
            ["06/01/30, 12:00 PM - Alice: good morning everyone"]
        );
    }

    #[test]
    fn test_merge_entries_empty() {
        let transcript = merge_entries(Vec::new());
        assert!(transcript.is_empty());
        assert!(transcript.earliest.is_none());
    }

    #[test]
    fn test_skip_document_lenient_and_strict() {
        let mut lenient = Merger::new(ConvertConfig::default());
        assert!(lenient.skip_document("a.html", ChatmergeError::invalid_format("x", "y")).is_ok());
        let transcript = lenient.finish();
        assert_eq!(transcript.stats.documents_skipped, 1);
        assert_eq!(transcript.skipped, ["a.html"]);

        let mut strict = Merger::new(ConvertConfig::strict());
        let err = strict
            .skip_document("a.html", ChatmergeError::invalid_format("x", "y"))
            .unwrap_err();
        assert!(err.is_document_error());
    }

    #[cfg(feature = "html")]
    mod html {
        use super::*;

        const DOC_HELLO: &str = r#"<div class="message default">
            <div class="date" title="15.01.2024 10:30:00 UTC+07:00">10:30</div>
            <div class="from_name">Bob</div>
            <div class="text">hello there</div>
        </div>"#;

        const DOC_WORLD: &str = r#"<div class="message default">
            <div class="date" title="15.01.2024 11:45:00 UTC+07:00">11:45</div>
            <div class="from_name">Bob</div>
            <div class="text">world peace</div>
        </div>"#;

        #[test]
        fn test_process_and_merge() {
            let transcript =
                process_and_merge(&[DOC_WORLD, DOC_HELLO], &ConvertConfig::default()).unwrap();
            assert_eq!(
                transcript.to_text(),
                "01/15/24, 10:30 AM - Bob: hello there\n01/15/24, 11:45 AM - Bob: world peace"
            );
        }

        #[test]
        fn test_skipped_documents_are_named() {
            let broken: &[u8] = &[0xff, 0xfe, 0x00];
            let named = [("morning.html", broken), ("evening.html", DOC_HELLO.as_bytes())];
            let transcript = process_and_merge(&named, &ConvertConfig::default()).unwrap();
            assert_eq!(transcript.skipped, ["morning.html"]);
            assert_eq!(transcript.len(), 1);

            let anonymous: [&[u8]; 2] = [DOC_HELLO.as_bytes(), broken];
            let transcript = process_and_merge(&anonymous, &ConvertConfig::default()).unwrap();
            assert_eq!(transcript.skipped, ["document 2"]);
        }

        #[test]
        fn test_no_documents() {
            let docs: [&[u8]; 0] = [];
            let err = process_and_merge(&docs, &ConvertConfig::default()).unwrap_err();
            assert!(err.is_no_documents());
        }

        #[test]
        fn test_invalid_document_skipped() {
            let docs: [&[u8]; 2] = [&[0xff, 0xfe, 0x00], DOC_HELLO.as_bytes()];
            let transcript = process_and_merge(&docs, &ConvertConfig::default()).unwrap();
            assert_eq!(transcript.len(), 1);
            assert_eq!(transcript.stats.documents_skipped, 1);
            assert_eq!(transcript.stats.documents_read, 1);
        }

        #[test]
        fn test_invalid_document_strict() {
            let docs: [&[u8]; 2] = [&[0xff, 0xfe, 0x00], DOC_HELLO.as_bytes()];
            let err = process_and_merge(&docs, &ConvertConfig::strict()).unwrap_err();
            assert!(err.is_document_error());
        }
    }
}
