//! Cardholder name heuristics.
//!
//! Statements print the cardholder's name as a bare uppercase line near the
//! top, usually right above the postal address. A line qualifies as a name
//! when it is made only of uppercase letters, spaces, apostrophes and
//! hyphens, has two to four tokens, is not one of the issuer's header phrases
//! and carries none of its denylisted keywords.

use regex::Regex;
use tracing::trace;

use super::patterns::HONORIFIC;
use crate::text::{prefix, squash};

/// Keywords that never appear in a cardholder name.
const BASE_DENYLIST: &[&str] = &[
    "ACCOUNT",
    "STATEMENT",
    "CARD",
    "BALANCE",
    "PAYMENT",
    "PAYMENTS",
    "LIMIT",
    "DATE",
    "DUE",
    "AMOUNT",
    "TOTAL",
    "MINIMUM",
    "CREDIT",
    "CREDITS",
    "DEBIT",
    "SUMMARY",
    "AVAILABLE",
    "CASH",
    "ADDRESS",
    "EMAIL",
    "PHONE",
    "BANK",
    "PERIOD",
    "GSTIN",
    "HSN",
    "TRANSACTION",
    "TRANSACTIONS",
    "REWARD",
    "REWARDS",
    "POINTS",
    "NAME",
    "CHARGES",
    "PURCHASES",
];

/// Street and locality words that mark an address line.
pub const ADDRESS_WORDS: &[&str] = &[
    "ROAD", "RD", "STREET", "FLOOR", "FLR", "BLDG", "BUILDING", "BLOCK", "AREA", "NAGAR",
    "APARTMENT", "APT", "CITY", "STATE", "PIN", "WEST", "EAST", "NORTH", "SOUTH", "SECTOR",
    "COLONY",
];

/// Where to look before falling back to the plain top-of-document scan.
#[derive(Debug)]
pub enum NameAnchor {
    /// Text after the label on the label's own line.
    LabelSameLine(Regex),
    /// The lines following the first label line.
    LabelNextLines(Regex, usize),
    /// The nearest qualifying line above the first (non-initial) line
    /// matching the pattern, scanned upward.
    Above(Regex, usize),
}

/// Per-issuer name heuristics.
#[derive(Debug)]
pub struct NameRules {
    /// Exact header phrases that look like names.
    pub stoplist: &'static [&'static str],
    /// Keyword pattern; any match disqualifies a line.
    pub denylist: Regex,
    /// Characters of the document considered at all.
    pub scan_chars: usize,
    /// Lines scanned by the top-of-document fallback.
    pub scan_lines: usize,
    /// Positional anchors, tried in order.
    pub anchors: Vec<NameAnchor>,
    /// Strip a leading honorific (Mr, Mrs, Shri, ...) before qualifying.
    pub strip_titles: bool,
}

/// Build a whole-word, case-insensitive denylist from the base keywords plus
/// issuer-specific ones.
pub fn denylist(extra: &[&str]) -> Regex {
    let words: Vec<String> = BASE_DENYLIST
        .iter()
        .chain(extra)
        .map(|w| regex::escape(w).replace(' ', r"\s*"))
        .collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|")))
        .expect("denylist words are escaped literals")
}

impl NameRules {
    /// Find the cardholder name in `text`.
    pub fn extract(&self, text: &str) -> Option<String> {
        let lines: Vec<String> = prefix(text, self.scan_chars)
            .lines()
            .map(squash)
            .filter(|l| !l.is_empty())
            .collect();

        for anchor in &self.anchors {
            if let Some(name) = self.from_anchor(anchor, &lines) {
                trace!(%name, ?anchor, "owner name from anchor");
                return Some(name);
            }
        }

        lines
            .iter()
            .take(self.scan_lines)
            .find_map(|line| self.qualify(line))
    }

    fn from_anchor(&self, anchor: &NameAnchor, lines: &[String]) -> Option<String> {
        match anchor {
            NameAnchor::LabelSameLine(label) => {
                lines.iter().take(self.scan_lines).find_map(|line| {
                    let m = label.find(line)?;
                    let value = line[m.end()..].trim_start_matches([':', '-', ' ']);
                    self.qualify(value)
                })
            }
            NameAnchor::LabelNextLines(label, window) => {
                let idx = lines
                    .iter()
                    .take(self.scan_lines)
                    .position(|line| label.is_match(line))?;
                lines
                    .iter()
                    .skip(idx + 1)
                    .take(*window)
                    .find_map(|line| self.qualify(line))
            }
            NameAnchor::Above(pattern, window) => {
                let idx = lines.iter().position(|line| pattern.is_match(line))?;
                if idx == 0 {
                    return None;
                }
                lines[idx.saturating_sub(*window)..idx]
                    .iter()
                    .rev()
                    .find_map(|line| self.qualify(line))
            }
        }
    }

    /// The cleaned name if `line` qualifies.
    pub fn qualify(&self, line: &str) -> Option<String> {
        let line = squash(line);
        let candidate = if self.strip_titles {
            squash(&HONORIFIC.replace(&line, ""))
        } else {
            line
        };

        if candidate.is_empty() {
            return None;
        }
        if !candidate
            .chars()
            .all(|c| c.is_ascii_uppercase() || matches!(c, ' ' | '\'' | '-'))
        {
            return None;
        }

        let tokens = candidate.split(' ').count();
        if !(2..=4).contains(&tokens) {
            return None;
        }
        if self.stoplist.iter().any(|phrase| *phrase == candidate)
            || self.denylist.is_match(&candidate)
        {
            return None;
        }
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::rules::patterns::{EMAIL_LABEL, POSTAL_CODE};
    use pretty_assertions::assert_eq;

    fn rules(anchors: Vec<NameAnchor>, strip_titles: bool) -> NameRules {
        NameRules {
            stoplist: &["BUSINESS MONEYBACK"],
            denylist: denylist(&["HDFC"]),
            scan_chars: 5_000,
            scan_lines: 30,
            anchors,
            strip_titles,
        }
    }

    #[test]
    fn test_qualify() {
        let rules = rules(Vec::new(), false);
        assert_eq!(rules.qualify("RAHUL  SHARMA").as_deref(), Some("RAHUL SHARMA"));
        assert_eq!(rules.qualify("ANNE-MARIE D'SOUZA").as_deref(), Some("ANNE-MARIE D'SOUZA"));
        assert_eq!(rules.qualify("RAHUL"), None);
        assert_eq!(rules.qualify("A B C D E"), None);
        assert_eq!(rules.qualify("Rahul Sharma"), None);
        assert_eq!(rules.qualify("FLAT 12 TOWER"), None);
        assert_eq!(rules.qualify("BUSINESS MONEYBACK"), None);
        assert_eq!(rules.qualify("HDFC BANK"), None);
        assert_eq!(rules.qualify("TOTAL AMOUNT DUE"), None);
    }

    #[test]
    fn test_top_scan_takes_first_qualifying_line() {
        let text = "HDFC BANK\nCredit Card Statement\nBUSINESS MONEYBACK\nPRIYA NAIR\nJOHN DOE";
        assert_eq!(rules(Vec::new(), false).extract(text).as_deref(), Some("PRIYA NAIR"));
    }

    #[test]
    fn test_strip_titles() {
        let rules = rules(Vec::new(), true);
        assert_eq!(rules.qualify("MR. RAHUL SHARMA").as_deref(), Some("RAHUL SHARMA"));
        assert_eq!(rules.qualify("SMT ANITA DEVI").as_deref(), Some("ANITA DEVI"));
    }

    #[test]
    fn test_label_same_line_anchor() {
        let label = Regex::new(r"(?i)\bname\b").unwrap();
        let rules = rules(vec![NameAnchor::LabelSameLine(label)], false);
        let text = "SOME HEADER LINE\nName: VIKRAM SINGH";
        assert_eq!(rules.extract(text).as_deref(), Some("VIKRAM SINGH"));
    }

    #[test]
    fn test_label_next_lines_anchor() {
        let label = Regex::new(r"(?i)customer\s*name").unwrap();
        let rules = rules(vec![NameAnchor::LabelNextLines(label, 2)], false);
        let text = "FIRST LINE\nCustomer Name\nMEERA IYER";
        assert_eq!(rules.extract(text).as_deref(), Some("MEERA IYER"));
    }

    #[test]
    fn test_above_anchor() {
        let rules = rules(
            vec![
                NameAnchor::Above(POSTAL_CODE.clone(), 4),
                NameAnchor::Above(EMAIL_LABEL.clone(), 8),
            ],
            false,
        );
        let text = "Statement\nREWARD POINTS\nARJUN MEHTA\n12 Park Lane\nPune 411001";
        assert_eq!(rules.extract(text).as_deref(), Some("ARJUN MEHTA"));
    }

    #[test]
    fn test_above_anchor_takes_nearest_line() {
        let rules = rules(vec![NameAnchor::Above(POSTAL_CODE.clone(), 4)], false);
        let text = "Statement\nMEERA IYER\nARJUN MEHTA\nPune 411001";
        assert_eq!(rules.extract(text).as_deref(), Some("ARJUN MEHTA"));
    }

    #[test]
    fn test_amount_line_is_not_a_postal_anchor() {
        let rules = NameRules {
            scan_lines: 0,
            ..rules(vec![NameAnchor::Above(POSTAL_CODE.clone(), 4)], false)
        };
        let text = "Statement\nMEERA IYER\nOutstanding 123456.00";
        assert_eq!(rules.extract(text), None);
        let text = format!("{text}\nPune 411001");
        assert_eq!(rules.extract(&text).as_deref(), Some("MEERA IYER"));
    }

    #[test]
    fn test_no_name() {
        let rules = rules(Vec::new(), false);
        assert_eq!(rules.extract("Statement Date 01/02/2024\n"), None);
        assert_eq!(rules.extract(""), None);
    }
}
