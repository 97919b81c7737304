//! Text normalization for OCR and text-layer statement dumps.

use std::fmt;
use std::ops::Deref;

use serde::Serialize;

/// Statement text with canonical whitespace, dashes and quotes.
///
/// Line breaks are preserved; carriage returns are gone and every run of
/// horizontal whitespace is a single ASCII space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Normalize raw text.
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize raw statement text.
///
/// - en/em dashes become `-`
/// - curly quotes become ASCII quotes
/// - carriage returns are dropped
/// - runs of horizontal whitespace (including NBSP and tabs) collapse to one space
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;

    for c in raw.chars() {
        let c = match c {
            '\r' => continue,
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        };

        if c != '\n' && c.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
            continue;
        }

        in_space = false;
        out.push(c);
    }

    out
}

/// Slice the first `chars` characters of `s` without splitting a code point.
pub fn prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Collapse inner runs of whitespace and trim.
pub fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
