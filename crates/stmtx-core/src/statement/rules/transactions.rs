//! Ledger line classification.
//!
//! A transaction row starts with a date token, followed by whitespace, and
//! carries at least one two-decimal money token after the date. The last
//! money token is the amount; the text in between is the description. Rows
//! that do not fit are skipped.

use regex::Regex;

use super::amounts::{money_tokens, printed_negative, sign_marker, SignMarker};
use super::dates::parse_date;
use super::patterns::{OCR_DEBIT_SUFFIX, TX_ANY_DATE_ROW, TX_DAY_FIRST_ROW};
use crate::models::Transaction;
use crate::text::squash;

/// Date shapes accepted at the start of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDates {
    /// `15 Jan 2024`, `15/01/2024`
    DayFirst,
    /// Day-first shapes plus `Jan 15, 2024`
    Any,
}

/// How an issuer's ledger rows are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRules {
    pub dates: RowDates,
    /// Treat `0r`, `Or`, `d.` line endings as debit markers.
    pub ocr_debit_suffix: bool,
    /// Drop rows whose date token is not a real calendar date.
    pub require_valid_date: bool,
}

impl Default for TransactionRules {
    fn default() -> Self {
        Self {
            dates: RowDates::DayFirst,
            ocr_debit_suffix: false,
            require_valid_date: false,
        }
    }
}

impl TransactionRules {
    fn row_pattern(&self) -> &'static Regex {
        match self.dates {
            RowDates::DayFirst => &*TX_DAY_FIRST_ROW,
            RowDates::Any => &*TX_ANY_DATE_ROW,
        }
    }

    /// The line's marker, with OCR debit suffixes below the printed ones.
    fn sign_marker(&self, line: &str) -> Option<SignMarker> {
        sign_marker(line).or_else(|| {
            (self.ocr_debit_suffix && OCR_DEBIT_SUFFIX.is_match(line)).then_some(SignMarker::Debit)
        })
    }

    /// Classify one trimmed line.
    pub fn classify(&self, line: &str) -> Option<Transaction> {
        let caps = self.row_pattern().captures(line)?;
        let date_token = caps.get(1)?.as_str();
        let rest = caps.get(2)?.as_str();

        let token = money_tokens(rest).pop()?;
        let (start, _) = token.position?;

        let date = parse_date(date_token);
        if self.require_valid_date && date.is_none() {
            return None;
        }

        let negative = printed_negative(rest, start);
        let amount = if negative { -token.value } else { token.value };
        let amount = self
            .sign_marker(line)
            .map_or(amount, |marker| marker.apply(amount));

        let cut = if negative { start - 1 } else { start };
        let description = squash(&rest[..cut]);

        Some(Transaction {
            date,
            description: (!description.is_empty()).then_some(description),
            amount,
        })
    }

    /// Every transaction row in `text`, in document order.
    pub fn parse(&self, text: &str) -> Vec<Transaction> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| self.classify(line))
            .collect()
    }
}
