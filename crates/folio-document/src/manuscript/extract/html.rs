// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTML tag stripping. Only enough structure survives to find paragraph
// boundaries: block-level tags become line breaks, everything else a space.

use std::path::Path;
use std::sync::LazyLock;

use folio_core::error::Result;
use quick_xml::escape::resolve_html5_entity;
use regex::Regex;
use tracing::{debug, instrument};

use super::Extractor;
use super::text::read_lossy;

static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?>.*?</script\s*>").expect("static script regex is valid")
});

static STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b.*?>.*?</style\s*>").expect("static style regex is valid")
});

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)</?(p|div|h1|h2|h3|h4|h5|h6|li|section|article|br|hr|tr)\b[^>]*>")
        .expect("static block tag regex is valid")
});

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("static tag regex is valid"));

static BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").expect("static body regex is valid")
});

/// Extractor for `.html` / `.htm` files.
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let raw = read_lossy(path)?;
        let text = html_to_text(&raw);
        debug!(chars = text.len(), "HTML stripped");
        Ok(vec![text])
    }
}

/// Strip markup from `raw`, keeping block boundaries as newlines and
/// resolving character references.
pub fn html_to_text(raw: &str) -> String {
    let scrubbed = SCRIPT.replace_all(raw, " ");
    let scrubbed = STYLE.replace_all(&scrubbed, " ");
    let scrubbed = BLOCK_TAG.replace_all(&scrubbed, "\n");
    let scrubbed = ANY_TAG.replace_all(&scrubbed, " ");
    unescape_entities(&scrubbed)
}

/// Inner markup of `<body>`, or the whole document when there is no body.
pub fn body_content(document: &str) -> &str {
    BODY.captures(document)
        .and_then(|caps| caps.get(1))
        .map_or(document, |body| body.as_str())
}

/// Resolve `&name;`, `&#123;` and `&#x1F;` references. Numeric references
/// and the legacy Latin-1 names (`&copy`, `&amp`) also resolve without the
/// closing `;`, as browsers do. Unknown or malformed references are left
/// untouched.
pub fn unescape_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        match reference_at(after) {
            Some((replacement, used)) => {
                out.push_str(&replacement);
                rest = &after[used..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Names that resolve even when the `;` is missing.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Longest entity name considered after an `&`.
const MAX_ENTITY_CHARS: usize = 32;

/// Resolve the reference that starts right after an `&`. Returns the
/// replacement and how many bytes of `after` it consumed.
fn reference_at(after: &str) -> Option<(String, usize)> {
    if let Some(number) = after.strip_prefix('#') {
        let (skip, radix) = match number.strip_prefix(['x', 'X']) {
            Some(_) => (2, 16),
            None => (1, 10),
        };
        let digits = &after[skip..];
        let len = digits
            .find(|ch: char| !ch.is_digit(radix))
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let ch = u32::from_str_radix(&digits[..len], radix)
            .ok()
            .and_then(char::from_u32)?;
        let used = skip + len + usize::from(digits[len..].starts_with(';'));
        return Some((ch.to_string(), used));
    }

    let len = after
        .find(['\t', '\n', '\x0c', ' ', '<', '&', '#', ';'])
        .unwrap_or(after.len());
    let end = after[..len]
        .char_indices()
        .nth(MAX_ENTITY_CHARS)
        .map_or(len, |(at, _)| at);
    let name = &after[..end];

    if after[end..].starts_with(';') {
        if let Some(value) = resolve_html5_entity(name) {
            return Some((value.to_string(), end + 1));
        }
    }

    (2..=name.len())
        .rev()
        .filter(|&n| name.is_char_boundary(n))
        .map(|n| &name[..n])
        .find(|prefix| LEGACY_ENTITIES.contains(prefix))
        .and_then(|prefix| resolve_html5_entity(prefix).map(|value| (value.to_string(), prefix.len())))
}

/// Resolve the body of a character reference (`amp`, `#8212`, `#x2014`).
pub(crate) fn resolve_reference(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_html5_entity(name).map(str::to_string)
}
