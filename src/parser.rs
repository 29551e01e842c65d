//! Message source abstraction.
//!
//! The extractor never touches markup directly. Instead, every input format
//! implements [`MessageSource`], which yields one [`RawMessage`] view per
//! message node in document order. This keeps the extraction rules
//! independent of the markup library and lets them be tested against
//! synthetic in-memory node sequences.
//!
//! # Example
//!
//! ```rust
//! use chatmerge::parser::{MessageSource, RawMessage};
//!
//! let nodes = vec![
//!     RawMessage::new("15.01.2024 10:30:00 UTC+07:00", "Alice").with_text("hello there"),
//!     RawMessage::new("15.01.2024 10:31:00 UTC+07:00", "Bob").with_media(),
//! ];
//!
//! assert_eq!(nodes.messages().count(), 2);
//! ```
//!
//! # Implementing a Source
//!
//! ```rust,ignore
//! impl MessageSource for MyExport {
//!     fn name(&self) -> &str { "my export" }
//!
//!     fn messages(&self) -> Box<dyn Iterator<Item = RawMessage> + '_> {
//!         Box::new(self.nodes.iter().map(|node| node.to_raw()))
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Timestamp field of a message node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTimestamp {
    /// Attribute value carrying the full date, if present
    pub title: Option<String>,
    /// Visible text of the date element
    pub text: String,
}

impl RawTimestamp {
    /// Returns the attribute value, or `None` if it is missing or empty.
    pub fn attribute(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

/// Structural signals of automated authorship found in a message node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMarkers {
    /// Interactive button table
    pub button_table: bool,
    /// Quoted block
    pub blockquote: bool,
    /// Clickable element whose action triggers a bot command
    pub bot_command_action: bool,
    /// Inline keyboard container
    pub inline_keyboard: bool,
    /// Text of the reply-to reference, if the message is a reply
    pub reply_to_text: Option<String>,
}

impl BotMarkers {
    /// Returns `true` if any purely structural marker is present.
    ///
    /// The reply-to text needs a name check and is not considered here.
    pub fn has_structural_marker(&self) -> bool {
        self.button_table || self.blockquote || self.bot_command_action || self.inline_keyboard
    }
}

/// Read-only view of one message node, detached from the markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub date: Option<RawTimestamp>,
    /// Raw sender name as it appears in the export
    pub sender: Option<String>,
    pub has_media: bool,
    /// Text content, one logical line per `\n`; `None` if the node has no text element
    pub text: Option<String>,
    pub markers: BotMarkers,
}

impl RawMessage {
    /// Creates a node with a date attribute and a sender.
    ///
    /// The visible date text is left empty; use [`with_date_text`](Self::with_date_text)
    /// to set it.
    pub fn new(date_title: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            date: Some(RawTimestamp {
                title: Some(date_title.into()),
                text: String::new(),
            }),
            sender: Some(sender.into()),
            ..Self::default()
        }
    }

    /// Sets the visible text of the date element.
    #[must_use]
    pub fn with_date_text(mut self, text: impl Into<String>) -> Self {
        self.date.get_or_insert_with(RawTimestamp::default).text = text.into();
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_media(mut self) -> Self {
        self.has_media = true;
        self
    }

    #[must_use]
    pub fn with_markers(mut self, markers: BotMarkers) -> Self {
        self.markers = markers;
        self
    }
}

/// A document that can be scanned for message nodes.
///
/// Implementations yield nodes in document order. The sequence is finite;
/// callers must not assume it can be iterated more than once.
pub trait MessageSource {
    /// Returns a short human-readable name for logs.
    fn name(&self) -> &str;

    /// Returns the message nodes in document order.
    fn messages(&self) -> Box<dyn Iterator<Item = RawMessage> + '_>;
}

impl MessageSource for [RawMessage] {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn messages(&self) -> Box<dyn Iterator<Item = RawMessage> + '_> {
        Box::new(self.iter().cloned())
    }
}

impl MessageSource for Vec<RawMessage> {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn messages(&self) -> Box<dyn Iterator<Item = RawMessage> + '_> {
        self.as_slice().messages()
    }
}

/// Raw bytes of one input document, with an optional name for diagnostics.
///
/// Plain byte and string buffers are anonymous; a `(name, bytes)` pair
/// carries its name into skip warnings and [`MergedTranscript::skipped`].
///
/// [`MergedTranscript::skipped`]: crate::core::models::MergedTranscript::skipped
pub trait RawDocument {
    fn bytes(&self) -> &[u8];

    fn name(&self) -> Option<&str> {
        None
    }
}

impl RawDocument for [u8] {
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl RawDocument for Vec<u8> {
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl RawDocument for str {
    fn bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl RawDocument for String {
    fn bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<T: RawDocument + ?Sized> RawDocument for &T {
    fn bytes(&self) -> &[u8] {
        (**self).bytes()
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

impl<N: AsRef<str>, D: AsRef<[u8]>> RawDocument for (N, D) {
    fn bytes(&self) -> &[u8] {
        self.1.as_ref()
    }

    fn name(&self) -> Option<&str> {
        Some(self.0.as_ref())
    }
}
