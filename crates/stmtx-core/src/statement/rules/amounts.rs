//! Money token recognition.

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{
    CREDIT_MARKER, CURRENCY_AMOUNT, DATE_TOKEN, DEBIT_MARKER, MONEY_DECIMAL, MONEY_INTEGER,
};
use super::{ExtractionMatch, FieldExtractor};

/// Rupee sign as it appears after a UTF-8 / Windows-1252 round trip.
const GARBLED_RUPEE: &str = "\u{e2}\u{201a}\u{b9}";

/// Which token to keep when a span holds several amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPolicy {
    /// Last token in the span; right-aligned amount columns.
    #[default]
    Rightmost,
    /// First token in the span.
    Leftmost,
}

/// Direction marker found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignMarker {
    Credit,
    Debit,
}

impl SignMarker {
    /// Force the amount's sign: credits positive, debits negative.
    pub fn apply(self, amount: Decimal) -> Decimal {
        match self {
            SignMarker::Credit => amount.abs(),
            SignMarker::Debit => -amount.abs(),
        }
    }
}

/// Amount extractor over two-decimal money tokens.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MONEY_DECIMAL
            .find_iter(text)
            .filter(|m| !followed_by_digit(text, m.end()))
            .filter_map(|m| {
                parse_amount(m.as_str()).map(|amount| {
                    ExtractionMatch::new(amount).with_position(m.start(), m.end())
                })
            })
            .collect()
    }
}

/// Parse a money token such as `1,234.56` into its magnitude.
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let cleaned: String = token.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

/// All two-decimal money tokens in `s`, in order.
pub fn money_tokens(s: &str) -> Vec<ExtractionMatch<Decimal>> {
    AmountExtractor::new().extract_all(s)
}

/// Pick one money token from `s`, keeping a printed minus sign.
///
/// Integers are only considered when the span has no two-decimal token at
/// all; digits inside date tokens never count as integers.
pub fn pick_money(s: &str, policy: TokenPolicy) -> Option<Decimal> {
    let tokens = money_tokens(s);
    let chosen = match policy {
        TokenPolicy::Rightmost => tokens.last(),
        TokenPolicy::Leftmost => tokens.first(),
    };

    let (amount, start) = match chosen {
        Some(m) => (m.value, m.position.map_or(0, |(start, _)| start)),
        None => integer_token(s, policy)?,
    };

    if printed_negative(s, start) {
        Some(-amount)
    } else {
        Some(amount)
    }
}

/// Magnitude of one two-decimal token; integers are ignored.
pub fn decimal_token(s: &str, policy: TokenPolicy) -> Option<Decimal> {
    let tokens = money_tokens(s);
    let chosen = match policy {
        TokenPolicy::Rightmost => tokens.last(),
        TokenPolicy::Leftmost => tokens.first(),
    };
    chosen.map(|m| m.value)
}

fn integer_token(s: &str, policy: TokenPolicy) -> Option<(Decimal, usize)> {
    let undated = DATE_TOKEN.replace_all(s, |caps: &regex::Captures| " ".repeat(caps[0].len()));
    let mut found = MONEY_INTEGER
        .find_iter(&undated)
        .filter_map(|m| parse_amount(m.as_str()).map(|amount| (amount, m.start())));

    match policy {
        TokenPolicy::Rightmost => found.last(),
        TokenPolicy::Leftmost => found.next(),
    }
}

/// Credit/debit marker on a line; credit wins when both appear.
pub fn sign_marker(line: &str) -> Option<SignMarker> {
    if CREDIT_MARKER.is_match(line) {
        Some(SignMarker::Credit)
    } else if DEBIT_MARKER.is_match(line) {
        Some(SignMarker::Debit)
    } else {
        None
    }
}

/// A `-` glued to the token, itself at line start or after whitespace.
pub fn printed_negative(s: &str, start: usize) -> bool {
    let Some(before) = s.get(..start) else {
        return false;
    };
    let Some(rest) = before.strip_suffix('-') else {
        return false;
    };
    rest.chars().last().is_none_or(char::is_whitespace)
}

fn followed_by_digit(s: &str, end: usize) -> bool {
    s[end..].chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Currency-marked amounts (`₹`, `Rs`, `Rs.`, `INR`).
///
/// The position of each match starts at the currency marker.
pub fn currency_tokens(s: &str) -> Vec<ExtractionMatch<Decimal>> {
    CURRENCY_AMOUNT
        .captures_iter(s)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if followed_by_digit(s, whole.end()) {
                return None;
            }
            let amount = parse_amount(&caps[1])?;
            Some(ExtractionMatch::new(amount).with_position(whole.start(), whole.end()))
        })
        .collect()
}

/// Repair the mojibake rupee sign so currency scans can see it.
pub fn repair_currency(s: &str) -> Cow<'_, str> {
    if s.contains(GARBLED_RUPEE) {
        Cow::Owned(s.replace(GARBLED_RUPEE, "\u{20b9}"))
    } else {
        Cow::Borrowed(s)
    }
}
