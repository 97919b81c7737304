//! Masked card number recognition.
//!
//! Statements print the card number with all but the last four characters
//! masked, and OCR frequently misreads those four (`2IIS` for `2115`). Every
//! candidate group goes through [`correct_ocr_digits`] and must come out as
//! exactly four digits.

use std::cmp::Reverse;

use regex::Regex;
use tracing::trace;

use super::patterns::{
    CARD_ENDING_PHRASE, CARD_NO_LITERAL, CARD_NO_MASKED, CONTEXT_CARD, CONTEXT_ENDING,
    ENDING_LITERAL, FULL_CARD_DIGITS, MASK_GLYPH, MASK_RUN_STRICT, MASKED_GROUP,
};
use super::{ExtractionMatch, FieldExtractor};
use crate::text::prefix;

/// OCR confusions that stand in for digits inside a card group.
const CONFUSION: &[(char, char)] = &[
    ('O', '0'),
    ('o', '0'),
    ('D', '0'),
    ('°', '0'),
    ('I', '1'),
    ('l', '1'),
    ('|', '1'),
    ('Z', '2'),
    ('z', '2'),
    ('S', '5'),
    ('s', '5'),
    ('B', '8'),
    ('§', '8'),
    ('q', '9'),
    ('g', '9'),
];

/// Replace OCR look-alikes with the digits they stand for.
pub fn correct_ocr_digits(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            CONFUSION
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect()
}

/// Corrected group reduced to digits, kept only when exactly four remain.
pub fn card_digits(raw: &str) -> Option<String> {
    let digits: String = correct_ocr_digits(raw)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    (digits.len() == 4).then_some(digits)
}

/// `0000`, `1111`, ... `9999`: placeholders rather than real card endings.
pub fn is_trivial(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    value: String,
    score: u32,
}

/// Scored masked-card extractor over the head of a document.
pub struct CardEndingExtractor {
    scan_chars: usize,
}

impl CardEndingExtractor {
    pub fn new(scan_chars: usize) -> Self {
        Self { scan_chars }
    }

    fn candidates(&self, text: &str) -> Vec<Candidate> {
        // (pattern, specificity bonus)
        let rules: [(&Regex, u32); 4] = [
            (&*CARD_ENDING_PHRASE, 4),
            (&*CARD_NO_MASKED, 4),
            (&*MASKED_GROUP, 3),
            (&*FULL_CARD_DIGITS, 2),
        ];

        let mut found = Vec::new();
        for line in prefix(text, self.scan_chars).lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }

            let context = context_score(line);
            for (pattern, bonus) in rules {
                let Some(value) = pattern.captures(line).and_then(|caps| card_digits(&caps[1]))
                else {
                    continue;
                };
                trace!(%value, score = context + bonus, "card ending candidate");
                found.push(Candidate {
                    value,
                    score: context + bonus,
                });
            }
        }
        found
    }
}

fn context_score(line: &str) -> u32 {
    let mut score = 0;
    if CONTEXT_CARD.is_match(line) {
        score += 2;
    }
    if CONTEXT_ENDING.is_match(line) {
        score += 4;
    }
    if MASK_GLYPH.is_match(line) {
        score += 1;
    }
    score
}

impl FieldExtractor for CardEndingExtractor {
    type Output = ExtractionMatch<String>;

    /// Candidates best first: non-trivial groups ahead of placeholders, then
    /// by score. The sort is stable, so ties keep document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut candidates = self.candidates(text);
        candidates.sort_by_key(|c| (is_trivial(&c.value), Reverse(c.score)));
        candidates
            .into_iter()
            .map(|c| ExtractionMatch::new(c.value))
            .collect()
    }
}

/// Plain `ending 1234` / `card no ... 1234` phrases, digits only.
pub fn literal_card_ending(text: &str) -> Option<String> {
    [&*ENDING_LITERAL, &*CARD_NO_LITERAL]
        .iter()
        .find_map(|pattern| pattern.captures(text).map(|caps| caps[1].to_string()))
}

/// The non-trivial ending seen most often across every masked shape.
///
/// Ties keep the value seen first.
pub fn most_frequent_masked_last4(text: &str, scan_chars: usize) -> Option<String> {
    let head = prefix(text, scan_chars);
    let mut counts: Vec<(String, usize)> = Vec::new();

    for pattern in [&*MASKED_GROUP, &*FULL_CARD_DIGITS, &*CARD_ENDING_PHRASE, &*CARD_NO_MASKED] {
        for caps in pattern.captures_iter(head) {
            let Some(value) = card_digits(&caps[1]) else {
                continue;
            };
            if is_trivial(&value) {
                continue;
            }
            match counts.iter_mut().find(|(v, _)| *v == value) {
                Some((_, count)) => *count += 1,
                None => counts.push((value, 1)),
            }
        }
    }

    let mut best: Option<(String, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Endings that follow a mask run; falls back to the last four digits of any
/// line carrying a mask glyph.
pub fn strict_masked_last4(text: &str, scan_chars: usize) -> Option<String> {
    let head = prefix(text, scan_chars);
    let mut seen: Vec<String> = Vec::new();

    for pattern in [&*MASK_RUN_STRICT, &*MASKED_GROUP, &*CARD_NO_MASKED] {
        for caps in pattern.captures_iter(head) {
            if let Some(value) = card_digits(&caps[1]) {
                push_unique(&mut seen, value);
            }
        }
    }

    if seen.is_empty() {
        for line in head.lines().filter(|l| MASK_GLYPH.is_match(l)) {
            let digits: String = correct_ocr_digits(line)
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            if digits.len() >= 4 {
                push_unique(&mut seen, digits[digits.len() - 4..].to_string());
            }
        }
    }

    seen.iter()
        .find(|v| !is_trivial(v))
        .or_else(|| seen.first())
        .cloned()
}

fn push_unique(seen: &mut Vec<String>, value: String) {
    if !seen.contains(&value) {
        seen.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> Option<String> {
        CardEndingExtractor::new(8_000).extract(text).map(|m| m.value)
    }

    #[test]
    fn test_correct_ocr_digits() {
        assert_eq!(correct_ocr_digits("2IIS"), "2115");
        assert_eq!(correct_ocr_digits("O§lg"), "0819");
        assert_eq!(card_digits("2IIS").as_deref(), Some("2115"));
        assert_eq!(card_digits("ABCD"), None);
    }

    #[test]
    fn test_trivial_values() {
        assert!(is_trivial("0000"));
        assert!(is_trivial("9999"));
        assert!(!is_trivial("0011"));
    }

    #[test]
    fn test_masked_number() {
        assert_eq!(extract("Card No: XXXX XXXX XXXX 4321").as_deref(), Some("4321"));
        assert_eq!(extract("5241 81** **** 7788").as_deref(), Some("7788"));
        assert_eq!(extract("•••• •••• •••• 2IIS").as_deref(), Some("2115"));
    }

    #[test]
    fn test_ending_phrase_beats_bare_mask() {
        let text = "XXXX XXXX XXXX 1111\nXX XX 9876\nYour credit card ending with 4455";
        assert_eq!(extract(text).as_deref(), Some("4455"));
    }

    #[test]
    fn test_trivial_only_when_alone() {
        assert_eq!(extract("Card No: XXXX XXXX XXXX 0000").as_deref(), Some("0000"));
        let text = "Card No: XXXX XXXX XXXX 0000\nXXXX 5678";
        assert_eq!(extract(text).as_deref(), Some("5678"));
    }

    #[test]
    fn test_ties_keep_first() {
        let text = "XXXX 1234\nXXXX 5678";
        assert_eq!(extract(text).as_deref(), Some("1234"));
    }

    #[test]
    fn test_candidates_ranked_best_first() {
        let text = "XXXX 0000\nXXXX 1234\nCard ending 5678\nXXXX 9012";
        let ranked: Vec<String> = CardEndingExtractor::new(8_000)
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(ranked.first().map(String::as_str), Some("5678"));
        assert_eq!(ranked.last().map(String::as_str), Some("0000"));
        let middle: Vec<&str> = ranked[1..ranked.len() - 1].iter().map(String::as_str).collect();
        assert_eq!(middle, vec!["1234", "9012"]);
    }

    #[test]
    fn test_no_candidate() {
        assert_eq!(extract("Nothing to see here"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_literal_card_ending() {
        assert_eq!(literal_card_ending("Card ending 9012").as_deref(), Some("9012"));
        assert_eq!(literal_card_ending("Card No. 4111 2222").as_deref(), Some("4111"));
        assert_eq!(literal_card_ending("nothing"), None);
    }

    #[test]
    fn test_most_frequent_masked_last4() {
        let text = "XXXX XXXX XXXX 1234\nXXXX XXXX XXXX 5678\nref XX XX 5678";
        assert_eq!(most_frequent_masked_last4(text, 20_000).as_deref(), Some("5678"));
        assert_eq!(most_frequent_masked_last4("XXXX 0000", 20_000), None);
    }

    #[test]
    fn test_strict_masked_last4() {
        assert_eq!(strict_masked_last4("4375 51** **** 3009", 20_000).as_deref(), Some("3009"));
        assert_eq!(strict_masked_last4("no mask", 20_000), None);
    }

    #[test]
    fn test_strict_mask_line_fallback() {
        // A single mask glyph is too short for a run but still marks the line.
        assert_eq!(strict_masked_last4("Card 4375-5*3009", 20_000).as_deref(), Some("3009"));
    }
}
