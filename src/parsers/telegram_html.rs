//! Telegram Desktop HTML export source.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::{ChatmergeError, Result};
use crate::parser::{BotMarkers, MessageSource, RawMessage, RawTimestamp};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static MESSAGE: LazyLock<Selector> = LazyLock::new(|| selector(".message.default"));
static DATE: LazyLock<Selector> = LazyLock::new(|| selector(".date"));
static FROM_NAME: LazyLock<Selector> = LazyLock::new(|| selector(".from_name"));
static MEDIA: LazyLock<Selector> = LazyLock::new(|| selector(".media_wrap"));
static TEXT: LazyLock<Selector> = LazyLock::new(|| selector(".text"));
static BUTTON_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table.bot_buttons_table"));
static BLOCKQUOTE: LazyLock<Selector> = LazyLock::new(|| selector("blockquote"));
static ONCLICK_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[onclick]"));
static INLINE_KEYBOARD: LazyLock<Selector> =
    LazyLock::new(|| selector(".bot_inline_keyboard, .bot-buttons"));
static REPLY_TO: LazyLock<Selector> = LazyLock::new(|| selector(".reply_to"));

/// Action name Telegram uses for clickable bot commands.
const BOT_COMMAND_ACTION: &str = "ShowBotCommand";

/// A parsed Telegram HTML export document.
///
/// Telegram Desktop writes one message per `div.message.default`:
///
/// ```html
/// <div class="message default clearfix" id="message42">
///   <div class="body">
///     <div class="pull_right date details" title="15.01.2024 10:30:00 UTC+07:00">10:30</div>
///     <div class="from_name">Alice</div>
///     <div class="text">hello there<br>see you at lunch</div>
///   </div>
/// </div>
/// ```
///
/// Continuation messages ("joined" bubbles) have no `.from_name` and are
/// therefore ignored by the extractor.
///
/// # Example
///
/// ```rust
/// use chatmerge::parser::MessageSource;
/// use chatmerge::parsers::TelegramHtml;
///
/// let doc = TelegramHtml::parse_str(r#"
///     <div class="message default">
///       <div class="date" title="15.01.2024 10:30:00 UTC+07:00">10:30</div>
///       <div class="from_name">Alice</div>
///       <div class="text">hello there</div>
///     </div>"#);
///
/// let node = doc.messages().next().unwrap();
/// assert_eq!(node.sender.as_deref(), Some("Alice"));
/// assert_eq!(node.text.as_deref(), Some("hello there"));
/// ```
pub struct TelegramHtml {
    name: String,
    html: Html,
}

impl TelegramHtml {
    /// Parses a document from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmergeError::Utf8`] if the bytes are not valid UTF-8.
    /// Markup errors are never fatal; the HTML parser recovers from them.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let content = String::from_utf8(bytes.to_vec())
            .map_err(|e| ChatmergeError::utf8("Telegram HTML document", e))?;
        Ok(Self::parse_str(&content))
    }

    /// Parses a document from a string.
    pub fn parse_str(content: &str) -> Self {
        Self {
            name: "Telegram HTML".to_string(),
            html: Html::parse_document(content),
        }
    }

    /// Sets the name reported in logs, typically the file name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the number of message nodes in the document.
    pub fn message_count(&self) -> usize {
        self.html.select(&MESSAGE).count()
    }
}

impl MessageSource for TelegramHtml {
    fn name(&self) -> &str {
        &self.name
    }

    fn messages(&self) -> Box<dyn Iterator<Item = RawMessage> + '_> {
        Box::new(self.html.select(&MESSAGE).map(read_message))
    }
}

/// Text nodes of an element, trimmed, empty ones dropped, joined by `sep`.
fn joined_text(el: ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

fn has_match(el: ElementRef<'_>, selector: &Selector) -> bool {
    el.select(selector).next().is_some()
}

fn read_message(el: ElementRef<'_>) -> RawMessage {
    let date = el.select(&DATE).next().map(|date| RawTimestamp {
        title: date.value().attr("title").map(str::to_string),
        text: joined_text(date, " "),
    });

    RawMessage {
        date,
        sender: el.select(&FROM_NAME).next().map(|n| joined_text(n, "")),
        has_media: has_match(el, &MEDIA),
        text: el.select(&TEXT).next().map(|t| joined_text(t, "\n")),
        markers: read_markers(el),
    }
}

fn read_markers(el: ElementRef<'_>) -> BotMarkers {
    BotMarkers {
        button_table: has_match(el, &BUTTON_TABLE),
        blockquote: has_match(el, &BLOCKQUOTE),
        bot_command_action: el.select(&ONCLICK_LINK).any(|a| {
            a.value()
                .attr("onclick")
                .is_some_and(|action| action.contains(BOT_COMMAND_ACTION))
        }),
        inline_keyboard: has_match(el, &INLINE_KEYBOARD),
        reply_to_text: el.select(&REPLY_TO).next().map(|r| joined_text(r, " ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><body><div class="history">{body}</div></body></html>"#
        )
    }

    fn nodes(body: &str) -> Vec<RawMessage> {
        TelegramHtml::parse_str(&wrap(body)).messages().collect()
    }

    #[test]
    fn test_reads_basic_message() {
        let got = nodes(
            r#"<div class="message default clearfix" id="message1">
                 <div class="body">
                   <div class="pull_right date details" title="15.01.2024 10:30:00 UTC+07:00">10:30</div>
                   <div class="from_name">
                     Alice
                   </div>
                   <div class="text">hello there<br>see you at lunch</div>
                 </div>
               </div>"#,
        );

        assert_eq!(got.len(), 1);
        let msg = &got[0];
        let date = msg.date.as_ref().unwrap();
        assert_eq!(date.title.as_deref(), Some("15.01.2024 10:30:00 UTC+07:00"));
        assert_eq!(date.text, "10:30");
        assert_eq!(msg.sender.as_deref(), Some("Alice"));
        assert_eq!(msg.text.as_deref(), Some("hello there\nsee you at lunch"));
        assert!(!msg.has_media);
        assert_eq!(msg.markers, BotMarkers::default());
    }

    #[test]
    fn test_service_and_joined_nodes() {
        let got = nodes(
            r#"<div class="message service"><div class="body details">15 January 2024</div></div>
               <div class="message default joined">
                 <div class="date" title="15.01.2024 10:31:00 UTC">10:31</div>
                 <div class="text">follow up</div>
               </div>"#,
        );

        // service nodes are not selected; joined nodes have no sender
        assert_eq!(got.len(), 1);
        assert!(got[0].sender.is_none());
    }

    #[test]
    fn test_sender_text_nodes_concatenated() {
        let got = nodes(
            r#"<div class="message default">
                 <div class="date" title="15.01.2024 10:30:00 UTC">10:30</div>
                 <div class="from_name">Alice <span class="details">via @helper</span></div>
               </div>"#,
        );
        assert_eq!(got[0].sender.as_deref(), Some("Alicevia @helper"));
        assert!(got[0].text.is_none());
    }

    #[test]
    fn test_media_indicator() {
        let got = nodes(
            r#"<div class="message default">
                 <div class="date" title="15.01.2024 10:30:00 UTC">10:30</div>
                 <div class="from_name">Bob</div>
                 <div class="media_wrap clearfix"><a class="photo_wrap" href="photos/p1.jpg"></a></div>
               </div>"#,
        );
        assert!(got[0].has_media);
    }

    #[test]
    fn test_bot_markers() {
        let got = nodes(
            r##"<div class="message default">
                 <div class="date" title="15.01.2024 10:30:00 UTC">10:30</div>
                 <div class="from_name">Carol</div>
                 <div class="reply_to details">In reply to <a href="#go_to_message7">this message</a></div>
                 <div class="text">text <a href="" onclick="return ShowBotCommand(&quot;start&quot;)">/start</a></div>
                 <blockquote>quoted</blockquote>
                 <table class="bot_buttons_table"><tr><td>Go</td></tr></table>
                 <div class="bot-buttons"></div>
               </div>"##,
        );

        let markers = &got[0].markers;
        assert!(markers.button_table);
        assert!(markers.blockquote);
        assert!(markers.bot_command_action);
        assert!(markers.inline_keyboard);
        assert_eq!(markers.reply_to_text.as_deref(), Some("In reply to this message"));
    }

    #[test]
    fn test_onclick_without_bot_command() {
        let got = nodes(
            r#"<div class="message default">
                 <div class="date" title="15.01.2024 10:30:00 UTC">10:30</div>
                 <div class="from_name">Dave</div>
                 <div class="text"><a onclick="return ShowSpoiler(this)">spoiler</a></div>
               </div>"#,
        );
        assert!(!got[0].markers.bot_command_action);
    }

    #[test]
    fn test_message_count_and_name() {
        let doc = TelegramHtml::parse_str(&wrap(
            r#"<div class="message default"></div><div class="message default"></div>"#,
        ))
        .with_name("messages2.html");
        assert_eq!(doc.message_count(), 2);
        assert_eq!(doc.name(), "messages2.html");
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = TelegramHtml::parse(&[0x3c, 0xff, 0xfe, 0x3e]).err().unwrap();
        assert!(err.is_document_error());
    }

    #[test]
    fn test_parse_garbage_yields_no_messages() {
        let doc = TelegramHtml::parse(b"not html at all <<<").unwrap();
        assert_eq!(doc.messages().count(), 0);
    }
}
