//! Name and filename normalization.
//!
//! Sender names in chat exports carry a lot of decoration: emoji, zero-width
//! joiners, `[Admin]` style tags, `" | Company"` suffixes, `(Bot)` markers.
//! Two sibling transforms strip the same noise:
//!
//! - [`canonical_key`] - lowercase grouping identity, never shown to users
//! - [`display_form`] - case-preserving name used in the transcript
//!
//! They share one pipeline and differ only in the final lowercase fold, so
//! grouping and the visible name cannot drift apart.
//!
//! ```
//! use chatmerge::core::normalize::{canonical_key, display_form};
//!
//! assert_eq!(canonical_key("Alice 🔥 [Admin]"), "alice");
//! assert_eq!(display_form("Alice 🔥 [Admin]"), "Alice");
//! assert_eq!(canonical_key("Alice | Acme Corp"), canonical_key("alice"));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Key used for senders whose name normalizes to nothing.
pub const DELETED_ACCOUNT_KEY: &str = "deleted account";

/// Display name used for senders whose name normalizes to nothing.
pub const DELETED_ACCOUNT_DISPLAY: &str = "Deleted Account";

/// Filename used when the requested one sanitizes to nothing.
pub const DEFAULT_FILENAME: &str = "converted_chat";

const PIPE_SEPARATOR: &str = " | ";

static SQUARE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("square span regex is valid"));
static CURLY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*?\}").expect("curly span regex is valid"));
static PAREN_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("paren span regex is valid"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Returns the canonical grouping key for a raw sender name.
///
/// Never empty: falls back to [`DELETED_ACCOUNT_KEY`].
pub fn canonical_key(raw: &str) -> String {
    let cleaned = strip_name_noise(raw);
    if cleaned.is_empty() {
        DELETED_ACCOUNT_KEY.to_string()
    } else {
        cleaned.to_lowercase()
    }
}

/// Returns the user-facing form of a raw sender name.
///
/// Never empty: falls back to [`DELETED_ACCOUNT_DISPLAY`].
pub fn display_form(raw: &str) -> String {
    let cleaned = strip_name_noise(raw);
    if cleaned.is_empty() {
        DELETED_ACCOUNT_DISPLAY.to_string()
    } else {
        cleaned
    }
}

/// Shared noise-removal core of [`canonical_key`] and [`display_form`].
fn strip_name_noise(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let s: String = raw
        .nfkc()
        .filter(|&c| !is_emoji(c) && !is_zero_width(c) && is_printable(c))
        .collect();

    let s = SQUARE_SPAN.replace_all(&s, "");
    let s = CURLY_SPAN.replace_all(&s, "");
    let s = s.replace([']', '}'], "");

    let s = match s.split_once(PIPE_SEPARATOR) {
        Some((left, _)) => left,
        None => s.as_str(),
    };

    let s = PAREN_SPAN.replace_all(s, "");
    WHITESPACE_RUN.replace_all(&s, " ").trim().to_string()
}

/// Sanitizes a user-supplied filename.
///
/// Drops NUL bytes and any directory prefix, replaces characters that are
/// invalid on common filesystems with `_`, and falls back to
/// [`DEFAULT_FILENAME`] when nothing is left.
///
/// ```
/// use chatmerge::core::normalize::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_filename("chat: part 1?"), "chat_ part 1_");
/// assert_eq!(sanitize_filename(""), "converted_chat");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let without_nul = name.replace('\0', "");
    let base = without_nul
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let replaced: String = base
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();

    let trimmed = replaced.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_emoji(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F600..=0x1F64F
            | 0x1F300..=0x1F5FF
            | 0x1F680..=0x1F6FF
            | 0x1F1E0..=0x1F1FF
            | 0x2702..=0x27B0
            | 0x24C2..=0x1F251
    )
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}')
}

/// Printable means: not a control, format, separator (other than the plain
/// space), private-use or noncharacter code point.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        u32::from(c),
        0x00AD
            | 0x0600..=0x0605
            | 0x061C
            | 0x06DD
            | 0x070F
            | 0x180E
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x2064
            | 0x2066..=0x206F
            | 0xE000..=0xF8FF
            | 0xFDD0..=0xFDEF
            | 0xFFF9..=0xFFFB
            | 0xFFFE..=0xFFFF
            | 0xE0001
            | 0xE0020..=0xE007F
            | 0xF0000..=0x10FFFF
    )
}
