//! Heuristic spam and bot-content filter for single message lines.
//!
//! The filter is an ordered chain of independent predicates. The first rule
//! that matches rejects the line; a line that survives every rule is kept.
//!
//! | # | Rule | [`Rejection`] |
//! |---|------|---------------|
//! | 1 | Bot call-to-action phrase | [`BotPhrase`](Rejection::BotPhrase) |
//! | 2 | Single filler/ping word | [`FillerToken`](Rejection::FillerToken) |
//! | 3 | Three characters or fewer, not whitelisted | [`TooShort`](Rejection::TooShort) |
//! | 4 | Leading bullet marker | [`BulletList`](Rejection::BulletList) |
//! | 5 | Price shorthand (`50k`, `25 rb`) | [`PriceShorthand`](Rejection::PriceShorthand) |
//! | 6 | IP count (`10 ip`) | [`IpCount`](Rejection::IpCount) |
//! | 7 | Proxy/hosting catalog keyword | [`CatalogKeyword`](Rejection::CatalogKeyword) |
//! | 8 | Duration (`30 hari`, `1 month`) | [`Duration`](Rejection::Duration) |
//! | 9 | RDP/VPS/server listing keyword | [`ServerListing`](Rejection::ServerListing) |
//! | 10 | Link-like text | [`Link`](Rejection::Link) |
//! | 11 | Promotional keyword | [`Promotional`](Rejection::Promotional) |
//! | 12 | Promotional emoji | [`PromoEmoji`](Rejection::PromoEmoji) |
//! | 13 | Statistical spam signature | [`SpamSignature`](Rejection::SpamSignature) |
//!
//! # Examples
//!
//! ```
//! use chatmerge::core::filter::{Rejection, Verdict, classify};
//!
//! assert_eq!(classify("see you at lunch"), Verdict::Keep);
//! assert_eq!(classify("hai"), Verdict::Keep);
//! assert_eq!(
//!     classify("check in for your bonus claim"),
//!     Verdict::Rejected(Rejection::BotPhrase)
//! );
//! assert_eq!(
//!     classify("AAAAAAA!!!!!!"),
//!     Verdict::Rejected(Rejection::SpamSignature)
//! );
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const BOT_PHRASES: &[&str] = &[
    "click below",
    "see details",
    "join now",
    "congrat",
    "congrats",
    "already checked",
    "you have won",
    "check in",
    "daily reward",
    "bonus claim",
];

const SHORT_WHITELIST: &[&str] = &["hai", "iya"];

const CATALOG_KEYWORDS: &[&str] = &[
    "proxy",
    "ip:",
    "port",
    "user:pass",
    "residential",
    "static",
    "bandwidth",
    "masa aktif",
    "ready",
    "note:",
    "package",
    "bandwith",
];

const RDP_KEYWORDS: &[&str] = &[
    "detail information",
    "speed download",
    "speed upload",
    "linux",
    "ubuntu",
    "debian",
    "centos",
    "rockylinux",
    "almalinux",
    "windows server",
    "cpu",
    "ram",
    "bandwidth",
    "rdp",
    "server",
    "vps",
    "speed",
    "download",
    "upload",
    "durasi",
];

const PROMO_KEYWORDS: &[&str] = &[
    "jual",
    "jualan",
    "promosi",
    "promo",
    "lowongan",
    "loker",
    "jasa",
    "sewa",
    "autoscript install rdp",
    "vps",
    "garansi",
    "1 bulan",
];

const PROMO_EMOJI: &[char] = &['💥', '🔥', '⚡', '💸', '⭐', '🎁', '🎉'];

/// Longest line, in characters, that is not treated as a wall of text.
const MAX_LINE_CHARS: usize = 350;

static FILLER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[/\\]?(up|yo|ok|utc|cek|check|ping|pm|bump|push|help|upvote|vote|voteup)[!?.]*$",
    )
    .expect("filler regex is valid")
});
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-•*]\s+").expect("bullet regex is valid"));
static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(\.\d+)?\s*(k|rb)\b").expect("price regex is valid")
});
static IP_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d+\s*ip\b").expect("ip count regex is valid"));
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s*(hari|day|bulan|month)\b").expect("duration regex is valid")
});
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(http|https|www\.|\.com|\.net|\.id|\.co)").expect("link regex is valid")
});

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    BotPhrase,
    FillerToken,
    TooShort,
    BulletList,
    PriceShorthand,
    IpCount,
    CatalogKeyword,
    Duration,
    ServerListing,
    Link,
    Promotional,
    PromoEmoji,
    SpamSignature,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rejection::BotPhrase => "bot phrase",
            Rejection::FillerToken => "filler token",
            Rejection::TooShort => "too short",
            Rejection::BulletList => "bullet list",
            Rejection::PriceShorthand => "price shorthand",
            Rejection::IpCount => "ip count",
            Rejection::CatalogKeyword => "catalog keyword",
            Rejection::Duration => "duration",
            Rejection::ServerListing => "server listing",
            Rejection::Link => "link",
            Rejection::Promotional => "promotional",
            Rejection::PromoEmoji => "promo emoji",
            Rejection::SpamSignature => "spam signature",
        };
        f.write_str(name)
    }
}

/// Classification result for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Keep,
    Rejected(Rejection),
}

impl Verdict {
    /// Returns `true` if the line survives the filter.
    pub fn is_keep(&self) -> bool {
        matches!(self, Verdict::Keep)
    }
}

/// A single rule: receives the trimmed line and its lowercase form.
type Rule = fn(content: &str, lower: &str) -> bool;

/// The rule chain in evaluation order.
const RULES: &[(Rejection, Rule)] = &[
    (Rejection::BotPhrase, has_bot_phrase),
    (Rejection::FillerToken, is_filler_token),
    (Rejection::TooShort, is_too_short),
    (Rejection::BulletList, is_bullet_line),
    (Rejection::PriceShorthand, has_price_shorthand),
    (Rejection::IpCount, has_ip_count),
    (Rejection::CatalogKeyword, has_catalog_keyword),
    (Rejection::Duration, has_duration),
    (Rejection::ServerListing, has_server_keyword),
    (Rejection::Link, has_link),
    (Rejection::Promotional, has_promo_keyword),
    (Rejection::PromoEmoji, has_promo_emoji),
    (Rejection::SpamSignature, is_spam_like),
];

/// Classifies a single line of message text.
///
/// The line is trimmed first. Rules run in fixed order and the first match
/// decides the verdict.
pub fn classify(line: &str) -> Verdict {
    let content = line.trim();
    let lower = content.to_lowercase();

    RULES
        .iter()
        .find(|(_, rule)| rule(content, &lower))
        .map_or(Verdict::Keep, |(reason, _)| Verdict::Rejected(*reason))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn has_bot_phrase(_content: &str, lower: &str) -> bool {
    contains_any(lower, BOT_PHRASES)
}

fn is_filler_token(_content: &str, lower: &str) -> bool {
    FILLER_TOKEN.is_match(lower)
}

fn is_too_short(_content: &str, lower: &str) -> bool {
    lower.chars().count() <= 3 && !SHORT_WHITELIST.contains(&lower)
}

fn is_bullet_line(content: &str, _lower: &str) -> bool {
    BULLET.is_match(content)
}

fn has_price_shorthand(_content: &str, lower: &str) -> bool {
    PRICE.is_match(lower)
}

fn has_ip_count(_content: &str, lower: &str) -> bool {
    IP_COUNT.is_match(lower)
}

fn has_catalog_keyword(_content: &str, lower: &str) -> bool {
    contains_any(lower, CATALOG_KEYWORDS)
}

fn has_duration(_content: &str, lower: &str) -> bool {
    DURATION.is_match(lower)
}

fn has_server_keyword(_content: &str, lower: &str) -> bool {
    contains_any(lower, RDP_KEYWORDS)
}

fn has_link(content: &str, _lower: &str) -> bool {
    LINK.is_match(content)
}

fn has_promo_keyword(_content: &str, lower: &str) -> bool {
    contains_any(lower, PROMO_KEYWORDS)
}

fn has_promo_emoji(content: &str, _lower: &str) -> bool {
    content.contains(PROMO_EMOJI)
}

/// Shape-based spam signature, independent of vocabulary:
/// - any character repeated 5+ times in a row (case-insensitive)
/// - any of `!?.,` repeated 4+ times in a row
/// - more than 60% of letters uppercase
/// - longer than [`MAX_LINE_CHARS`] characters
fn is_spam_like(content: &str, lower: &str) -> bool {
    if content.is_empty() {
        return false;
    }
    if longest_run(lower.chars(), |_| true) >= 5 {
        return true;
    }
    if longest_run(content.chars(), |c| matches!(c, '!' | '?' | '.' | ',')) >= 4 {
        return true;
    }

    let (letters, caps) = content
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(letters, caps), c| {
            (letters + 1, caps + usize::from(c.is_uppercase()))
        });
    if letters > 0 && caps as f64 > letters as f64 * 0.6 {
        return true;
    }

    content.chars().count() > MAX_LINE_CHARS
}

/// Length of the longest run of identical characters accepted by `eligible`.
fn longest_run(chars: impl Iterator<Item = char>, eligible: impl Fn(char) -> bool) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut prev = None;

    for c in chars {
        if eligible(c) && prev == Some(c) {
            run += 1;
        } else if eligible(c) {
            run = 1;
        } else {
            run = 0;
        }
        best = best.max(run);
        prev = Some(c);
    }

    best
}
