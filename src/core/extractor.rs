//! Per-document message extraction.
//!
//! [`extract_entries`] walks the message nodes of one document in order and
//! turns every acceptable node into transcript [`Entry`] values. Nodes are
//! dropped, never rejected with an error:
//!
//! 1. missing date or sender field
//! 2. sender key contains a hard-blocked substring
//! 3. sender key looks like a bot name
//! 4. node carries structural bot markers
//! 5. sender exceeded the consecutive run cap
//!
//! Media nodes become a single `<Media omitted>` entry. Text nodes are split
//! into lines, each line goes through the [content filter](super::filter),
//! and surviving lines are deduplicated per `(sender, content)` within the
//! document.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use tracing::debug;

use super::filter::{Verdict, classify};
use super::models::Entry;
use super::normalize::{
    DELETED_ACCOUNT_DISPLAY, DELETED_ACCOUNT_KEY, canonical_key, display_form,
};
use super::timestamp::resolve_timestamp;
use crate::config::ConvertConfig;
use crate::parser::{BotMarkers, MessageSource, RawMessage};

/// Sender key substrings that are always dropped.
const SENDER_HARD_BLOCK: &[&str] = &["deleted", "burnfp"];

/// Sender key substrings that indicate a bot account.
const BOT_NAME_SUBSTRINGS: &[&str] = &["uxuy", "rose", "agent", "bot"];

/// Mutable state scoped to a single document.
///
/// Create one per document and drop it afterwards. Sharing a state across
/// documents would deduplicate and throttle across them.
#[derive(Debug, Default)]
pub struct DocumentState {
    seen: HashSet<(String, String)>,
    consecutive: HashMap<String, usize>,
    last_sender: Option<String>,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one node from `key` and returns the length of its current run.
    ///
    /// The count keeps growing while the same sender repeats, whether or not
    /// the node is emitted.
    pub fn record_sender(&mut self, key: &str) -> usize {
        if self.last_sender.as_deref() == Some(key) {
            let count = self.consecutive.entry(key.to_string()).or_insert(1);
            *count += 1;
            *count
        } else {
            self.consecutive.insert(key.to_string(), 1);
            self.last_sender = Some(key.to_string());
            1
        }
    }

    /// Returns `true` the first time a `(key, content)` pair is seen.
    pub fn first_sighting(&mut self, key: &str, content: &str) -> bool {
        self.seen.insert((key.to_string(), content.to_string()))
    }
}

/// Sender identity resolved from a raw name.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sender {
    key: String,
    display: String,
}

impl Sender {
    fn resolve(raw: &str) -> Self {
        let key = canonical_key(raw);
        if key == DELETED_ACCOUNT_KEY {
            return Self {
                key: DELETED_ACCOUNT_KEY.to_string(),
                display: DELETED_ACCOUNT_DISPLAY.to_string(),
            };
        }
        Self {
            key,
            display: display_form(raw),
        }
    }

    fn is_hard_blocked(&self) -> bool {
        contains_any(&self.key, SENDER_HARD_BLOCK)
    }

    fn is_bot_name(&self) -> bool {
        contains_any(&self.key, BOT_NAME_SUBSTRINGS)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Returns `true` if the markers suggest automated authorship.
fn has_bot_markers(markers: &BotMarkers) -> bool {
    if markers.has_structural_marker() {
        return true;
    }
    markers
        .reply_to_text
        .as_deref()
        .is_some_and(|reply| contains_any(&reply.to_lowercase(), BOT_NAME_SUBSTRINGS))
}

/// Extracts transcript entries from one document.
///
/// `fallback` is used for nodes whose timestamp cannot be parsed.
pub fn extract_entries<S>(
    source: &S,
    state: &mut DocumentState,
    config: &ConvertConfig,
    fallback: NaiveDateTime,
) -> Vec<Entry>
where
    S: MessageSource + ?Sized,
{
    let mut entries = Vec::new();

    for (index, node) in source.messages().enumerate() {
        extract_node(node, index, state, config, fallback, &mut entries);
    }

    debug!(
        source = source.name(),
        entries = entries.len(),
        "document extracted"
    );
    entries
}

fn extract_node(
    node: RawMessage,
    index: usize,
    state: &mut DocumentState,
    config: &ConvertConfig,
    fallback: NaiveDateTime,
    out: &mut Vec<Entry>,
) {
    let (Some(date), Some(raw_sender)) = (node.date, node.sender) else {
        debug!(index, "skipping node without date or sender");
        return;
    };

    let timestamp = resolve_timestamp(date.attribute(), &date.text, fallback);
    let sender = Sender::resolve(&raw_sender);

    if sender.is_hard_blocked() {
        debug!(index, sender = %sender.key, "skipping blocked sender");
        return;
    }
    if sender.is_bot_name() {
        debug!(index, sender = %sender.key, "skipping bot-like sender");
        return;
    }
    if has_bot_markers(&node.markers) {
        debug!(index, sender = %sender.key, "skipping node with bot markers");
        return;
    }

    let run = state.record_sender(&sender.key);
    if run > config.max_consecutive {
        debug!(index, sender = %sender.key, run, "skipping consecutive message");
        return;
    }

    if node.has_media {
        out.push(Entry::media(timestamp, &sender.display));
        return;
    }

    let Some(text) = node.text else {
        return;
    };

    for content in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if let Verdict::Rejected(reason) = classify(content) {
            debug!(index, %reason, "filtered line");
            continue;
        }
        if !state.first_sighting(&sender.key, content) {
            continue;
        }
        out.push(Entry::text(timestamp, &sender.display, content));
    }
}
