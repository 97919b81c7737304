//! Statement data models.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Card issuer whose layout heuristics can be applied to a statement.
///
/// Variant order is the canonical declaration order used for tie-breaking
/// in detection and arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Axis,
    Hdfc,
    Sbi,
    Icici,
    Amex,
    /// Issuer-agnostic baseline.
    Generic,
}

impl Bank {
    /// Issuers that are detected and arbitrated, in canonical order.
    pub const ISSUERS: [Bank; 5] = [Bank::Axis, Bank::Hdfc, Bank::Sbi, Bank::Icici, Bank::Amex];

    /// Resolve a caller-supplied issuer name (case-insensitive).
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_lowercase().as_str() {
            "axis" => Some(Bank::Axis),
            "hdfc" => Some(Bank::Hdfc),
            "sbi" => Some(Bank::Sbi),
            "icici" => Some(Bank::Icici),
            "amex" | "american express" => Some(Bank::Amex),
            "generic" => Some(Bank::Generic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bank::Axis => "axis",
            Bank::Hdfc => "hdfc",
            Bank::Sbi => "sbi",
            Bank::Icici => "icici",
            Bank::Amex => "amex",
            Bank::Generic => "generic",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing cycle covered by a statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl StatementPeriod {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// A single ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Posting or transaction date, when it validated.
    pub date: Option<NaiveDate>,

    /// Merchant / narration text between the date and the amount.
    pub description: Option<String>,

    /// Debits are negative, credits and unmarked amounts positive.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Transaction {
    pub fn is_debit(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

/// Structured fields extracted from one statement.
///
/// Every field is always present; misses are `None` / empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStatement {
    /// Visible last four digits of the card number.
    pub card_ending: Option<String>,

    /// Cardholder name as printed.
    pub card_owner_name: Option<String>,

    pub statement_period: StatementPeriod,

    pub payment_due_date: Option<NaiveDate>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_amount_due: Option<Decimal>,

    /// Transactions in document order.
    pub transactions: Vec<Transaction>,
}

/// Arbitrated parse of a statement with the scores that led to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    /// Issuer with the highest identity score.
    pub bank_detected: Bank,

    pub detection_score: u32,

    pub detection_scores: BTreeMap<Bank, u32>,

    /// Issuer whose profile produced `parsed`.
    pub bank_used: Bank,

    pub parse_scores: BTreeMap<Bank, u32>,

    pub parsed: ParsedStatement,
}
