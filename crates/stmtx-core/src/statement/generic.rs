//! Issuer-agnostic baseline parser.
//!
//! Every bank profile starts from this result and overrides individual
//! fields. The generic parser never attempts the owner name.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use super::rules::patterns::{
    AMOUNT_PAYABLE_BY_LINE, DATE_RANGE, DATE_TOKEN, DUE_DATE, FROM_TO, MINIMUM_DUE,
    PAYMENT_DUE_BY, PAYMENT_DUE_DATE, PERIOD_BARE_LABEL, PERIOD_LABEL, TOTAL_AMOUNT_DUE_LINE,
    TOTAL_DUE_LINE,
};
use super::rules::{
    literal_card_ending, parse_date, pick_money, CardEndingExtractor, FieldExtractor,
    LabelLocator, TokenPolicy, TransactionRules,
};
use super::Document;
use crate::models::{ParsedStatement, StatementPeriod};
use crate::text::prefix;

/// Parse a statement with no issuer knowledge.
pub fn parse_generic(doc: &Document<'_>) -> ParsedStatement {
    let header = doc.header();

    let parsed = ParsedStatement {
        card_ending: card_ending(doc),
        card_owner_name: None,
        statement_period: statement_period(header),
        payment_due_date: payment_due_date(header),
        total_amount_due: total_amount_due(header),
        transactions: TransactionRules::default().parse(doc.text()),
    };

    debug!(
        card = parsed.card_ending.is_some(),
        from = ?parsed.statement_period.from,
        to = ?parsed.statement_period.to,
        due = ?parsed.payment_due_date,
        total = ?parsed.total_amount_due,
        transactions = parsed.transactions.len(),
        "generic parse"
    );
    parsed
}

fn card_ending(doc: &Document<'_>) -> Option<String> {
    let scan_chars = doc.config().card_scan_chars;
    CardEndingExtractor::new(scan_chars)
        .extract(doc.text())
        .map(|m| m.value)
        .or_else(|| literal_card_ending(prefix(doc.text(), scan_chars)))
}

/// Labelled period first, then any bare `date - date` span.
pub fn statement_period(header: &str) -> StatementPeriod {
    if let Some(value) = first_capture(&[&*PERIOD_LABEL, &*PERIOD_BARE_LABEL], header) {
        let tokens: Vec<&str> = DATE_TOKEN.find_iter(value).map(|m| m.as_str()).collect();
        if let [from, to, ..] = tokens.as_slice() {
            return StatementPeriod::new(parse_date(from), parse_date(to));
        }
        if let Some(caps) = FROM_TO.captures(value) {
            return StatementPeriod::new(parse_date(&caps[1]), parse_date(&caps[2]));
        }
    }

    DATE_RANGE
        .captures(header)
        .map(|caps| StatementPeriod::new(parse_date(&caps[1]), parse_date(&caps[2])))
        .unwrap_or_default()
}

/// First labelled due date in the header.
pub fn payment_due_date(header: &str) -> Option<NaiveDate> {
    first_capture(&[&*PAYMENT_DUE_DATE, &*DUE_DATE, &*PAYMENT_DUE_BY], header)
        .and_then(parse_date)
}

/// Rightmost amount on the first total line, else the first amount below it.
pub fn total_amount_due(header: &str) -> Option<Decimal> {
    let label = [&*TOTAL_AMOUNT_DUE_LINE, &*AMOUNT_PAYABLE_BY_LINE, &*TOTAL_DUE_LINE]
        .into_iter()
        .find(|re| re.is_match(header))?;

    let line = label.find(header)?.as_str();
    pick_money(line, TokenPolicy::Rightmost).or_else(|| {
        LabelLocator::new(label, 2)
            .exclude(&MINIMUM_DUE)
            .locate(header, |line| pick_money(line, TokenPolicy::Leftmost))
    })
}

/// Capture group 1 of the first pattern that matches.
fn first_capture<'t>(patterns: &[&Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractionConfig, Transaction};
    use crate::text::NormalizedText;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn parse(raw: &str) -> ParsedStatement {
        let text = NormalizedText::new(raw);
        let config = ExtractionConfig::default();
        parse_generic(&Document::new(&text, &config))
    }

    #[test]
    fn test_labelled_period() {
        let period = statement_period("Statement Period: 01 Jan 2024 - 31 Jan 2024");
        assert_eq!(period, StatementPeriod::new(date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn test_from_to_period() {
        let period = statement_period("Billing Cycle from Jan 1, 2024 to Jan 31, 2024");
        assert_eq!(period, StatementPeriod::new(date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn test_bare_range_period() {
        let period = statement_period("Your statement\n16/12/2023 to 15/01/2024\n");
        assert_eq!(period, StatementPeriod::new(date(2023, 12, 16), date(2024, 1, 15)));
    }

    #[test]
    fn test_no_period() {
        assert!(statement_period("nothing").is_empty());
    }

    #[test]
    fn test_due_date_label_order() {
        let header = "Due Date: 10/02/2024\nPayment Due Date: 05 Feb 2024";
        assert_eq!(payment_due_date(header), date(2024, 2, 5));
        assert_eq!(payment_due_date("Payment due by 1st March 2024"), date(2024, 3, 1));
        assert_eq!(payment_due_date("Due Date: 30 Feb 2024"), None);
    }

    #[test]
    fn test_total_on_label_line() {
        let header = "Summary\nTotal Amount Due: Rs. 12,000.00\nMinimum Due 600.00";
        assert_eq!(total_amount_due(header), Some(dec("12000.00")));
        assert_eq!(total_amount_due("Total Due: 3,210.50"), Some(dec("3210.50")));
    }

    #[test]
    fn test_total_below_label() {
        assert_eq!(total_amount_due("Total Amount Due\nRs. 5,000.00"), Some(dec("5000.00")));
        let header = "Total Amount Due\nMinimum Amount Due 250.00\n4,800.00";
        assert_eq!(total_amount_due(header), Some(dec("4800.00")));
    }

    #[test]
    fn test_full_generic_parse() {
        let raw = "Credit Card Statement\r\n\
                   Card No: XXXX XXXX XXXX 4321\n\
                   Statement Period: 01/02/2024 to 29/02/2024\n\
                   Payment Due Date: 20/03/2024\n\
                   Total Amount Due\n\
                   Rs. 5,000.00\n\
                   12/03/2024 AMAZON RETAIL 1,234.56\n\
                   15-Jan-2024 FUEL DR 999.00\n";
        let parsed = parse(raw);

        assert_eq!(parsed.card_ending.as_deref(), Some("4321"));
        assert_eq!(parsed.card_owner_name, None);
        assert_eq!(
            parsed.statement_period,
            StatementPeriod::new(date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(parsed.payment_due_date, date(2024, 3, 20));
        assert_eq!(parsed.total_amount_due, Some(dec("5000.00")));
        assert_eq!(
            parsed.transactions,
            vec![
                Transaction {
                    date: date(2024, 3, 12),
                    description: Some("AMAZON RETAIL".to_string()),
                    amount: dec("1234.56"),
                },
                Transaction {
                    date: date(2024, 1, 15),
                    description: Some("FUEL DR".to_string()),
                    amount: dec("-999.00"),
                },
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse(""), ParsedStatement::default());
    }

    #[test]
    fn test_literal_card_fallback() {
        assert_eq!(parse("Card ending 9012\n").card_ending.as_deref(), Some("9012"));
    }
}
