// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block splitter: turns a raw text stream into typed blocks.

use std::sync::LazyLock;

use folio_core::{Block, normalize_space};
use regex::Regex;

use super::classify::is_chapter_heading;

/// One or more newlines separated only by whitespace.
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("static blank-line regex is valid"));

/// Split `raw` on blank-line runs and classify each chunk.
///
/// Only the first surviving line of a chunk is tested as a heading. A chunk
/// yields at most two blocks: an optional chapter heading followed by one
/// paragraph holding the remaining lines joined with single spaces.
pub fn split_into_blocks(raw: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    for chunk in BLANK_LINES.split(raw) {
        let lines: Vec<String> = chunk
            .split(is_line_break)
            .map(normalize_space)
            .filter(|line| !line.is_empty())
            .collect();

        let Some((first, rest)) = lines.split_first() else {
            continue;
        };

        if is_chapter_heading(first) {
            blocks.push(Block::chapter(first));
            if !rest.is_empty() {
                blocks.push(Block::paragraph(&rest.join(" ")));
            }
        } else {
            blocks.push(Block::paragraph(&lines.join(" ")));
        }
    }

    blocks
}

/// Line boundaries inside a chunk. Includes the lone carriage return of
/// classic Mac files and the Unicode line/paragraph separators.
fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
