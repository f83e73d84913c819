// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Chapter heading classifier: a fixed heuristic over a single line.

use std::sync::LazyLock;

use regex::Regex;

/// `Chapter 7`, `BOOK II`, `part one` ... matched on any line length.
static PREFIX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(chapter|book|part)\s+\w+").expect("static heading regex is valid")
});

/// `1. Arrival`, `12: The Storm`, `7- Home`.
static NUMBERED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}[.: -]\s+\w").expect("static numbered regex is valid")
});

/// Lines with more words than this are body text unless the prefix rule hit.
const MAX_HEADING_WORDS: usize = 9;

/// Upper-case lines longer than this are not headings.
const MAX_UPPERCASE_HEADING_CHARS: usize = 80;

/// Decide whether a normalized line is a structural heading.
///
/// Rules, first match wins:
/// 1. `chapter|book|part` followed by a token (case-insensitive);
/// 2. more than nine words is never a heading;
/// 3. all upper-case and at most 80 characters;
/// 4. a one-to-three digit label, a separator, whitespace, then a word.
pub fn is_chapter_heading(line: &str) -> bool {
    if PREFIX_HEADING.is_match(line) {
        return true;
    }
    if line.split_whitespace().count() > MAX_HEADING_WORDS {
        return false;
    }
    if is_upper(line) && line.chars().count() <= MAX_UPPERCASE_HEADING_CHARS {
        return true;
    }
    NUMBERED_HEADING.is_match(line)
}

/// True when the line has at least one cased character and none of them
/// are lower-case. Digits and punctuation are ignored.
fn is_upper(line: &str) -> bool {
    let mut saw_cased = false;
    for ch in line.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            saw_cased = true;
        }
    }
    saw_cased
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_rule_matches_any_case() {
        assert!(is_chapter_heading("Chapter One"));
        assert!(is_chapter_heading("CHAPTER 12"));
        assert!(is_chapter_heading("chapter iv"));
        assert!(is_chapter_heading("Book II"));
        assert!(is_chapter_heading("Part 3"));
    }

    #[test]
    fn prefix_rule_ignores_length() {
        let long = "Chapter 1 in which a great many things happen to a great many people at once";
        assert!(long.split_whitespace().count() > 9);
        assert!(is_chapter_heading(long));
    }

    #[test]
    fn prefix_needs_a_following_token() {
        assert!(!is_chapter_heading("Chapter"));
        assert!(!is_chapter_heading("Chapters are long in this book"));
        assert!(!is_chapter_heading("Partly cloudy skies"));
    }

    #[test]
    fn long_uppercase_line_is_body_text() {
        let shout = "THE WIND HOWLED AND THE RAIN FELL ON THE OLD GREY HOUSE";
        assert!(shout.split_whitespace().count() > 9);
        assert!(!is_chapter_heading(shout));
    }

    #[test]
    fn short_uppercase_line_is_heading() {
        assert!(is_chapter_heading("THE STORM"));
        assert!(is_chapter_heading("PROLOGUE"));
        assert!(is_chapter_heading("1984: AFTER"));
    }

    #[test]
    fn uppercase_over_eighty_chars_is_body_text() {
        let wide = "A".repeat(81);
        assert!(!is_chapter_heading(&wide));
        assert!(is_chapter_heading(&"A".repeat(80)));
    }

    #[test]
    fn numbered_labels() {
        assert!(is_chapter_heading("1. Arrival"));
        assert!(is_chapter_heading("12: The Storm"));
        assert!(is_chapter_heading("3- Home"));
        // The separator must be followed by whitespace of its own.
        assert!(!is_chapter_heading("3 - Home"));
        assert!(!is_chapter_heading("100 Days"));
        assert!(!is_chapter_heading("1000. Too many digits"));
        assert!(!is_chapter_heading("1.5 million people agreed"));
    }

    #[test]
    fn ordinary_prose_is_not_a_heading() {
        assert!(!is_chapter_heading("It was a dark night."));
        assert!(!is_chapter_heading("The wind howled."));
        assert!(!is_chapter_heading("42"));
    }
}
