// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rich Text Format control-word stripping.
//
// This is a scanner, not an RTF reader: it tracks group nesting only to skip
// destinations that never hold body text (font tables, document info,
// pictures), turns paragraph marks into line breaks and drops every other
// control word. Source line breaks are kept, so `\par` at the end of a source
// line leaves a blank line behind it.

use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use encoding_rs::WINDOWS_1252;
use folio_core::error::Result;
use tracing::{debug, instrument};

use super::Extractor;
use super::text::read_lossy;

/// Destinations whose whole group is metadata.
const IGNORED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "headerl",
    "headerr",
    "footer",
    "footerl",
    "footerr",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "xmlnstbl",
    "filetbl",
    "revtbl",
    "latentstyles",
    "themedata",
    "colorschememapping",
    "datastore",
];

/// Extractor for `.rtf` files.
pub struct RtfExtractor;

impl Extractor for RtfExtractor {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let raw = read_lossy(path)?;
        let text = rtf_to_text(&raw);
        debug!(raw_chars = raw.len(), text_chars = text.len(), "RTF stripped");
        Ok(vec![text])
    }
}

#[derive(Debug, Clone, Copy)]
struct GroupState {
    /// Inside an ignored destination.
    skip: bool,
    /// Fallback characters that follow each `\uN`.
    unicode_fallback: usize,
}

enum Control {
    Word { name: String, param: Option<i32> },
    Hex(u8),
    Symbol(char),
    /// A backslash before a raw line break, equivalent to `\par`.
    LineBreak,
    End,
}

/// Reduce RTF markup to plain text with paragraph marks as line breaks.
pub fn rtf_to_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() / 2);
    let mut stack: Vec<GroupState> = Vec::new();
    let mut state = GroupState {
        skip: false,
        unicode_fallback: 1,
    };
    let mut group_start = false;
    let mut pending_fallback = 0usize;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                stack.push(state);
                group_start = true;
                pending_fallback = 0;
            }
            '}' => {
                if let Some(parent) = stack.pop() {
                    state = parent;
                }
                group_start = false;
                pending_fallback = 0;
            }
            '\n' => {
                if !state.skip {
                    out.push('\n');
                }
            }
            '\r' => {
                if !state.skip && chars.peek() != Some(&'\n') {
                    out.push('\n');
                }
            }
            '\\' => {
                let opens_group = std::mem::take(&mut group_start);
                match read_control(&mut chars) {
                    Control::Word { name, param } => {
                        if opens_group && IGNORED_DESTINATIONS.contains(&name.as_str()) {
                            state.skip = true;
                            continue;
                        }
                        if name == "bin" {
                            // Raw binary payload of the given length.
                            for _ in 0..param.unwrap_or(0).max(0) {
                                chars.next();
                            }
                            continue;
                        }
                        if state.skip {
                            continue;
                        }
                        if name == "uc" {
                            state.unicode_fallback = param.unwrap_or(1).max(0) as usize;
                            continue;
                        }
                        if name == "u" {
                            if let Some(ch) = param.and_then(unicode_param) {
                                out.push(ch);
                            }
                            pending_fallback = state.unicode_fallback;
                            continue;
                        }
                        pending_fallback = 0;
                        if let Some(text) = word_text(&name) {
                            out.push_str(text);
                        }
                    }
                    Control::Hex(byte) => {
                        if state.skip {
                            continue;
                        }
                        if pending_fallback > 0 {
                            pending_fallback -= 1;
                            continue;
                        }
                        let single = [byte];
                        let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&single);
                        out.push_str(&decoded);
                    }
                    Control::Symbol(symbol) => {
                        if symbol == '*' && opens_group {
                            state.skip = true;
                            continue;
                        }
                        if state.skip {
                            continue;
                        }
                        match symbol {
                            '\\' | '{' | '}' => out.push(symbol),
                            '~' => out.push('\u{a0}'),
                            '_' => out.push('-'),
                            _ => {}
                        }
                    }
                    Control::LineBreak => {
                        if !state.skip {
                            out.push('\n');
                        }
                    }
                    Control::End => break,
                }
            }
            _ => {
                group_start = false;
                if state.skip {
                    continue;
                }
                if pending_fallback > 0 {
                    pending_fallback -= 1;
                    continue;
                }
                out.push(ch);
            }
        }
    }

    out
}

/// Read the control word or symbol following a backslash.
fn read_control(chars: &mut Peekable<Chars<'_>>) -> Control {
    let Some(&next) = chars.peek() else {
        return Control::End;
    };

    if next.is_ascii_alphabetic() {
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            name.push(c);
            chars.next();
        }

        let negative = chars.next_if_eq(&'-').is_some();
        let mut digits = String::new();
        while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
            digits.push(c);
        }
        let param = digits
            .parse::<i32>()
            .ok()
            .map(|value| if negative { -value } else { value });

        // A single space delimits the word and is part of it.
        chars.next_if_eq(&' ');
        return Control::Word { name, param };
    }

    chars.next();
    match next {
        '\'' => {
            let hex: String = chars.by_ref().take(2).collect();
            match u8::from_str_radix(&hex, 16) {
                Ok(byte) => Control::Hex(byte),
                Err(_) => Control::Symbol('\''),
            }
        }
        '\n' => Control::LineBreak,
        '\r' => {
            chars.next_if_eq(&'\n');
            Control::LineBreak
        }
        other => Control::Symbol(other),
    }
}

/// Text produced by a control word, if any.
fn word_text(name: &str) -> Option<&'static str> {
    match name {
        "par" | "sect" | "page" | "line" => Some("\n"),
        "tab" => Some("\t"),
        "emdash" => Some("\u{2014}"),
        "endash" => Some("\u{2013}"),
        "lquote" => Some("\u{2018}"),
        "rquote" => Some("\u{2019}"),
        "ldblquote" => Some("\u{201C}"),
        "rdblquote" => Some("\u{201D}"),
        "bullet" => Some("\u{2022}"),
        _ => None,
    }
}

/// `\uN` carries a signed 16-bit value; negatives wrap into the upper range.
fn unicode_param(value: i32) -> Option<char> {
    let code = if value < 0 { value + 65_536 } else { value };
    u32::try_from(code).ok().and_then(char::from_u32)
}
