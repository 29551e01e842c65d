//! Message timestamp parsing and rendering.
//!
//! Telegram HTML exports carry the full date in the `title` attribute of the
//! date element (`"15.01.2024 10:30:00 UTC+07:00"`), while some re-exported
//! or hand-edited files only have WhatsApp-style visible text
//! (`"01/15/24, 10:30 AM"`). Both are accepted; output always uses the
//! WhatsApp form.

use chrono::NaiveDateTime;

/// Telegram title format, parsed after the `" UTC..."` suffix is cut.
const TITLE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// WhatsApp-style format; also the canonical output format.
pub const OUTPUT_FORMAT: &str = "%m/%d/%y, %I:%M %p";

/// Parses one timestamp representation, trying each known format in order.
///
/// # Example
///
/// ```
/// use chatmerge::core::timestamp::parse_timestamp;
///
/// let dt = parse_timestamp("15.01.2024 10:30:00 UTC+07:00").unwrap();
/// assert_eq!(dt.to_string(), "2024-01-15 10:30:00");
///
/// let dt = parse_timestamp("01/15/24, 07:12 PM").unwrap();
/// assert_eq!(dt.to_string(), "2024-01-15 19:12:00");
///
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(repr: &str) -> Option<NaiveDateTime> {
    if repr.is_empty() {
        return None;
    }

    let head = repr.split(" UTC").next().unwrap_or(repr);
    NaiveDateTime::parse_from_str(head, TITLE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(repr.trim(), OUTPUT_FORMAT))
        .ok()
}

/// Resolves a message timestamp from its attribute and visible text.
///
/// The attribute is preferred when non-empty. If it does not parse and the
/// visible text differs, the text is tried too. When nothing parses the
/// caller-supplied `fallback` is returned; this never fails.
pub fn resolve_timestamp(
    attr: Option<&str>,
    text: &str,
    fallback: NaiveDateTime,
) -> NaiveDateTime {
    let primary = attr.filter(|a| !a.is_empty()).unwrap_or(text);

    parse_timestamp(primary)
        .or_else(|| {
            if primary == text {
                None
            } else {
                parse_timestamp(text)
            }
        })
        .unwrap_or(fallback)
}

/// Renders a timestamp in the canonical transcript format.
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(OUTPUT_FORMAT).to_string()
}
