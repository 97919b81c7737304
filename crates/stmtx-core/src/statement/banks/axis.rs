//! Axis Bank.
//!
//! Axis statements repeat the masked card number on every page, carry the
//! total in a "Total Payment Due" box and are frequently OCR'd, so trailing
//! `Dr` markers come through as `0r` / `d.`.

use chrono::Days;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use super::{amount_near_any, date_near_any, FieldOverride};
use crate::models::ParsedStatement;
use crate::statement::rules::names::{denylist, NameAnchor, NameRules};
use crate::statement::rules::patterns::{
    compile, AMOUNT_PAYABLE_LABEL, CARD_MEMBER_NAME_LABEL, DUE_DATE_LABEL, EMAIL_LABEL,
    NAME_LABEL, PAYMENT_DUE_DATE_LABEL, PAY_BY_LABEL, POSTAL_CODE, TOTAL_DUE_LABEL,
    TOTAL_PAYMENT_DUE_INLINE, TOTAL_PAYMENT_DUE_LABEL,
};
use crate::statement::rules::{
    most_frequent_masked_last4, parse_amount, strict_masked_last4, TokenPolicy,
    TransactionRules,
};
use crate::statement::Document;

lazy_static! {
    pub static ref IDENTITY: Vec<Regex> = [
        r"(?i)\baxis\s+bank\b",
        r"(?i)\baxis\s+bank\s+limited\b",
        r"(?i)\baxis\s+bank\s+credit\b",
        r"(?i)\bedge\s+rewards\b",
        r"(?i)\bmagnus\b|\batlas\b|\bneo\b",
    ]
    .into_iter()
    .map(compile)
    .collect();

    static ref NAMES: NameRules = NameRules {
        stoplist: &[],
        denylist: denylist(&["AXIS", "GSTIN"]),
        scan_chars: 25_000,
        scan_lines: 80,
        anchors: vec![
            NameAnchor::LabelSameLine(NAME_LABEL.clone()),
            NameAnchor::LabelNextLines(CARD_MEMBER_NAME_LABEL.clone(), 2),
            NameAnchor::Above(POSTAL_CODE.clone(), 4),
            NameAnchor::Above(EMAIL_LABEL.clone(), 8),
        ],
        strip_titles: false,
    };
}

pub const OVERRIDES: &[FieldOverride] = &[
    owner_name,
    card_ending,
    total_amount_due,
    payment_due_date,
    transactions,
    ledger_total,
];

fn owner_name(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    parsed.card_owner_name = NAMES.extract(doc.text()).or(parsed.card_owner_name);
    parsed
}

/// The ending printed most often wins over a single well-scored line.
fn card_ending(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let scan_chars = doc.config().profile_scan_chars;
    let found = most_frequent_masked_last4(doc.text(), scan_chars)
        .or_else(|| strict_masked_last4(doc.text(), scan_chars));
    parsed.card_ending = found.or(parsed.card_ending);
    parsed
}

fn total_amount_due(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let head = doc.profile_head();
    let found = TOTAL_PAYMENT_DUE_INLINE
        .captures(head)
        .and_then(|caps| parse_amount(&caps[1]))
        .or_else(|| {
            amount_near_any(
                head,
                &[&*TOTAL_PAYMENT_DUE_LABEL, &*TOTAL_DUE_LABEL, &*AMOUNT_PAYABLE_LABEL],
                2,
                TokenPolicy::Rightmost,
            )
        });
    parsed.total_amount_due = found.or(parsed.total_amount_due);
    parsed
}

/// Printed due date, else a fixed offset after the period end.
fn payment_due_date(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let printed = date_near_any(
        doc.profile_head(),
        &[&*PAYMENT_DUE_DATE_LABEL, &*DUE_DATE_LABEL, &*PAY_BY_LABEL],
        2,
    );

    let offset = u64::try_from(doc.config().due_date_offset_days).ok();
    let derived = || {
        parsed
            .statement_period
            .to
            .zip(offset)
            .and_then(|(to, days)| to.checked_add_days(Days::new(days)))
    };

    parsed.payment_due_date = printed.or(parsed.payment_due_date).or_else(derived);
    parsed
}

fn transactions(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let rules = TransactionRules {
        ocr_debit_suffix: true,
        ..TransactionRules::default()
    };
    let found = rules.parse(doc.text());
    if !found.is_empty() {
        parsed.transactions = found;
    }
    parsed
}

/// Last resort: the sum of debit magnitudes.
fn ledger_total(_doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    if parsed.total_amount_due.is_none() {
        parsed.total_amount_due = debit_sum(&parsed);
    }
    parsed
}

fn debit_sum(parsed: &ParsedStatement) -> Option<Decimal> {
    let debits: Vec<Decimal> = parsed
        .transactions
        .iter()
        .filter(|tx| tx.is_debit())
        .map(|tx| tx.amount.abs())
        .collect();
    (!debits.is_empty()).then(|| debits.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bank, ExtractionConfig};
    use crate::statement::BankProfile;
    use crate::text::NormalizedText;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn parse(raw: &str) -> ParsedStatement {
        let text = NormalizedText::new(raw);
        let config = ExtractionConfig::default();
        BankProfile::for_bank(Bank::Axis).parse(&Document::new(&text, &config))
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const STATEMENT: &str = "\
AXIS BANK
Credit Card Statement
RAHUL KUMAR SHARMA
12 MG ROAD
BENGALURU 560001
Card No: 5123 45XX XXXX 7788
Statement Period: 01/03/2024 - 31/03/2024
Total Payment Due
12,450.00
05/03/2024 SWIGGY BANGALORE 450.00 Dr
09/03/2024 PAYMENT RECEIVED 5,000.00 Cr
12/03/2024 AMAZON 1,200.00 0r
Card ending 7788
";

    #[test]
    fn test_axis_statement() {
        let parsed = parse(STATEMENT);
        assert_eq!(parsed.card_owner_name.as_deref(), Some("RAHUL KUMAR SHARMA"));
        assert_eq!(parsed.card_ending.as_deref(), Some("7788"));
        assert_eq!(parsed.total_amount_due, Some(dec("12450.00")));
        assert_eq!(
            parsed.transactions.iter().map(|t| t.amount).collect::<Vec<_>>(),
            vec![dec("-450.00"), dec("5000.00"), dec("-1200.00")]
        );
    }

    #[test]
    fn test_due_date_derived_from_period_end() {
        let parsed = parse(STATEMENT);
        assert_eq!(parsed.payment_due_date, NaiveDate::from_ymd_opt(2024, 4, 20));
    }

    #[test]
    fn test_printed_due_date_wins() {
        let parsed = parse(&format!("{STATEMENT}Pay by\n18 Apr 2024\n"));
        assert_eq!(parsed.payment_due_date, NaiveDate::from_ymd_opt(2024, 4, 18));
    }

    #[test]
    fn test_ledger_total_fallback() {
        let parsed = parse("05/03/2024 SWIGGY 450.00 Dr\n06/03/2024 REFUND 50.00 Cr\n07/03/2024 CAFE 25.50 d.\n");
        assert_eq!(parsed.total_amount_due, Some(dec("475.50")));
    }

    #[test]
    fn test_no_debits_no_total() {
        let parsed = parse("06/03/2024 REFUND 50.00 Cr\n");
        assert_eq!(parsed.total_amount_due, None);
    }
}
