//! Edge case tests: rule precedence, unusual sender names, timestamp fallbacks.

use chatmerge::core::processor::Merger;
use chatmerge::core::{canonical_key, display_form, parse_timestamp, sanitize_filename};
use chatmerge::prelude::*;
use chrono::{NaiveDate, NaiveDateTime};

fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 0)
        .unwrap()
}

fn msg(minute: u32, sender: &str, text: &str) -> RawMessage {
    RawMessage::new(format!("15.01.2024 10:{minute:02}:00 UTC+07:00"), sender).with_text(text)
}

fn merge(docs: &[Vec<RawMessage>]) -> Vec<String> {
    let mut merger = Merger::new(ConvertConfig::default()).with_clock(fixed_clock);
    for doc in docs {
        merger.add_source(doc);
    }
    merger.finish().lines
}

// ============================================================================
// Filter precedence
// ============================================================================

#[test]
fn test_catalog_keyword_beats_caps_ratio() {
    assert_eq!(
        classify("READY STOCK NOW"),
        Verdict::Rejected(Rejection::CatalogKeyword)
    );
}

#[test]
fn test_bot_phrase_beats_everything() {
    assert_eq!(
        classify("CLICK BELOW http://x.com 🔥"),
        Verdict::Rejected(Rejection::BotPhrase)
    );
}

#[test]
fn test_links_rejected_regardless_of_content() {
    for line in [
        "http://x.com",
        "good morning everyone http://x.com",
        "see you at lunch, notes at www.example.org",
    ] {
        assert!(!classify(line).is_keep(), "{line}");
    }
}

#[test]
fn test_short_whitelist_is_case_insensitive() {
    assert!(classify("Iya").is_keep());
    assert!(classify("  hai  ").is_keep());
    assert_eq!(classify("yes"), Verdict::Rejected(Rejection::TooShort));
}

#[test]
fn test_length_boundary() {
    let exact: String = "abcdefghij".repeat(35);
    assert_eq!(exact.chars().count(), 350);
    assert!(classify(&exact).is_keep());

    let over = format!("{exact}a");
    assert_eq!(classify(&over), Verdict::Rejected(Rejection::SpamSignature));
}

#[test]
fn test_repeated_char_boundary() {
    assert!(classify("coool stuff").is_keep());
    assert!(classify("cooool stuff").is_keep());
    assert_eq!(
        classify("coooool stuff"),
        Verdict::Rejected(Rejection::SpamSignature)
    );
}

#[test]
fn test_repeated_char_is_case_insensitive() {
    assert_eq!(
        classify("nooOOo way"),
        Verdict::Rejected(Rejection::SpamSignature)
    );
}

#[test]
fn test_filter_words_inside_other_words() {
    // substring rules match inside words
    assert_eq!(
        classify("thanks for the support"),
        Verdict::Rejected(Rejection::CatalogKeyword)
    );
    assert_eq!(
        classify("what a program"),
        Verdict::Rejected(Rejection::ServerListing)
    );
    // the filler rule needs the whole line
    assert!(classify("uptown funk tonight").is_keep());
}

// ============================================================================
// Sender names
// ============================================================================

#[test]
fn test_decorated_names_group_together() {
    let lines = merge(&[vec![
        msg(1, "Alice", "first message"),
        msg(2, "Alice 🔥", "second message"),
        msg(3, "Alice [Admin]", "third message"),
    ]]);
    // one run of three from the same sender
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_bot_tag_in_parens_is_stripped_before_bot_check() {
    // "(Bot)" is noise removed by normalization, so the sender survives
    let lines = merge(&[vec![msg(1, "Alice (Bot)", "good morning everyone")]]);
    assert_eq!(lines, ["01/15/24, 10:01 AM - Alice: good morning everyone"]);
}

#[test]
fn test_bot_substring_inside_name() {
    assert!(merge(&[vec![msg(1, "Roseanne", "good morning everyone")]]).is_empty());
    assert!(merge(&[vec![msg(1, "Abbott", "good morning everyone")]]).is_empty());
}

#[test]
fn test_non_latin_names() {
    let lines = merge(&[vec![msg(1, "Иван", "good morning everyone")]]);
    assert_eq!(lines, ["01/15/24, 10:01 AM - Иван: good morning everyone"]);
}

#[test]
fn test_names_in_wide_symbol_range_collapse_to_sentinel() {
    // the symbol range used for emoji stripping also covers CJK ideographs
    assert_eq!(canonical_key("王小明"), "deleted account");
    assert!(merge(&[vec![msg(1, "王小明", "good morning everyone")]]).is_empty());
}

#[test]
fn test_empty_sender_is_blocked() {
    assert!(merge(&[vec![msg(1, "", "good morning everyone")]]).is_empty());
    assert!(merge(&[vec![msg(1, "[Admin]", "good morning everyone")]]).is_empty());
}

#[test]
fn test_display_keeps_case_and_inner_spacing() {
    assert_eq!(display_form("  Mary   Jane  | Studio "), "Mary Jane");
    assert_eq!(canonical_key("  Mary   Jane  | Studio "), "mary jane");
}

#[test]
fn test_pipe_without_spaces_is_part_of_name() {
    assert_eq!(display_form("Tom|Jerry"), "Tom|Jerry");
}

// ============================================================================
// Timestamps
// ============================================================================

#[test]
fn test_unparsable_timestamp_uses_clock() {
    let node = RawMessage::new("sometime", "Alice").with_text("good morning everyone");
    assert_eq!(
        merge(&[vec![node]]),
        ["12/31/25, 11:59 PM - Alice: good morning everyone"]
    );
}

#[test]
fn test_missing_title_uses_visible_text() {
    let mut node = RawMessage::default().with_date_text("02/29/24, 11:59 PM");
    node.sender = Some("Alice".into());
    node.text = Some("good morning everyone".into());

    assert_eq!(
        merge(&[vec![node]]),
        ["02/29/24, 11:59 PM - Alice: good morning everyone"]
    );
}

#[test]
fn test_fallback_entries_sort_last() {
    let lines = merge(&[vec![
        RawMessage::new("garbage", "Alice").with_text("good morning everyone"),
        msg(1, "Bob", "hello there"),
    ]]);
    assert!(lines[0].contains("Bob"));
    assert!(lines[1].contains("Alice"));
}

#[test]
fn test_midnight_and_noon_rendering() {
    let lines = merge(&[vec![
        RawMessage::new("15.01.2024 00:05:00 UTC", "Alice").with_text("good morning everyone"),
        RawMessage::new("15.01.2024 12:05:00 UTC", "Bob").with_text("see you at lunch"),
    ]]);
    assert_eq!(
        lines,
        [
            "01/15/24, 12:05 AM - Alice: good morning everyone",
            "01/15/24, 12:05 PM - Bob: see you at lunch",
        ]
    );
}

#[test]
fn test_invalid_calendar_dates() {
    assert!(parse_timestamp("30.02.2024 10:00:00 UTC").is_none());
    assert!(parse_timestamp("02/30/24, 10:00 AM").is_none());
    assert!(parse_timestamp("29.02.2024 10:00:00 UTC").is_some());
}

// ============================================================================
// Nodes and text
// ============================================================================

#[test]
fn test_media_wins_over_text() {
    let node = msg(1, "Alice", "caption text here").with_media();
    assert_eq!(
        merge(&[vec![node]]),
        ["01/15/24, 10:01 AM - Alice: <Media omitted>"]
    );
}

#[test]
fn test_media_is_not_deduplicated() {
    let lines = merge(&[vec![
        msg(1, "Alice", "").with_media(),
        msg(2, "Bob", "hello there"),
        msg(3, "Alice", "").with_media(),
    ]]);
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_blank_lines_ignored() {
    let lines = merge(&[vec![msg(1, "Alice", "\n   \n\tgood morning everyone\t\n\n")]]);
    assert_eq!(lines, ["01/15/24, 10:01 AM - Alice: good morning everyone"]);
}

#[test]
fn test_multi_line_message_shares_timestamp() {
    let lines = merge(&[vec![msg(1, "Alice", "good morning everyone\nsee you at lunch")]]);
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("01/15/24, 10:01 AM - Alice: ")));
}

#[test]
fn test_reply_to_bot_is_dropped() {
    let node = msg(1, "Alice", "good morning everyone").with_markers(BotMarkers {
        reply_to_text: Some("In reply to this message from Agent Smith".into()),
        ..BotMarkers::default()
    });
    assert!(merge(&[vec![node]]).is_empty());
}

#[test]
fn test_zero_cap_drops_everything() {
    let mut merger = Merger::new(ConvertConfig::new().with_max_consecutive(0));
    merger.add_source(&vec![msg(1, "Alice", "good morning everyone")]);
    assert!(merger.finish().is_empty());
}

// ============================================================================
// Filenames
// ============================================================================

#[test]
fn test_filename_edge_cases() {
    assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_filename(""), "converted_chat");
    assert_eq!(transcript_filename("report.txt.txt"), "report.txt.txt");
    assert_eq!(transcript_filename("C:\\Users\\me\\chat"), "chat.txt");
    assert_eq!(archive_filename(&transcript_filename("x")), "x.zip");
}
