//! SBI Card.

use lazy_static::lazy_static;
use regex::Regex;

use super::{amount_near_any, date_near_any, FieldOverride};
use crate::models::{ParsedStatement, StatementPeriod};
use crate::statement::rules::names::{denylist, NameAnchor, NameRules, ADDRESS_WORDS};
use crate::statement::rules::patterns::{
    compile, ACCOUNT_HOLDER_NAME_LABEL, AMOUNT_PAYABLE_LABEL, CLOSING_BALANCE_ON,
    DUE_DATE_LABEL, EMAIL_LABEL, MY_ADDRESS_LABEL, OPENING_BALANCE_ON, PAYMENT_DUE_DATE_LABEL,
    POSTAL_CODE, TOTAL_DUE_LABEL,
};
use crate::statement::rules::{parse_date, strict_masked_last4, TokenPolicy};
use crate::statement::Document;

const LABEL_WINDOW: usize = 4;

const SBI_DENYLIST: &[&str] = &[
    "SBI", "STATE BANK", "SAVING", "SAVINGS", "BRANCH", "PAN", "KYC", "CURRENT", "CURRENCY",
    "INTEREST", "HOLDING", "STATUS",
];

lazy_static! {
    pub static ref IDENTITY: Vec<Regex> = [
        r"(?i)\bstate\s+bank\s+of\s+india\b",
        r"(?i)\bsbi\s+card\b",
        r"(?i)\byono\b",
    ]
    .into_iter()
    .map(compile)
    .collect();

    static ref NAMES: NameRules = NameRules {
        stoplist: &[],
        denylist: denylist(&[SBI_DENYLIST, ADDRESS_WORDS].concat()),
        scan_chars: 40_000,
        scan_lines: 150,
        anchors: vec![
            NameAnchor::LabelSameLine(ACCOUNT_HOLDER_NAME_LABEL.clone()),
            NameAnchor::LabelNextLines(ACCOUNT_HOLDER_NAME_LABEL.clone(), 2),
            NameAnchor::Above(MY_ADDRESS_LABEL.clone(), 8),
            NameAnchor::Above(POSTAL_CODE.clone(), 4),
            NameAnchor::Above(EMAIL_LABEL.clone(), 8),
        ],
        strip_titles: true,
    };
}

pub const OVERRIDES: &[FieldOverride] = &[
    owner_name,
    card_ending,
    total_amount_due,
    payment_due_date,
    balance_period,
];

fn owner_name(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    parsed.card_owner_name = NAMES.extract(doc.text()).or(parsed.card_owner_name);
    parsed
}

fn card_ending(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let found = strict_masked_last4(doc.text(), doc.config().profile_scan_chars);
    parsed.card_ending = found.or(parsed.card_ending);
    parsed
}

fn total_amount_due(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let found = amount_near_any(
        doc.profile_head(),
        &[&*TOTAL_DUE_LABEL, &*AMOUNT_PAYABLE_LABEL],
        LABEL_WINDOW,
        TokenPolicy::Rightmost,
    );
    parsed.total_amount_due = found.or(parsed.total_amount_due);
    parsed
}

fn payment_due_date(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let found = date_near_any(
        doc.profile_head(),
        &[&*PAYMENT_DUE_DATE_LABEL, &*DUE_DATE_LABEL],
        LABEL_WINDOW,
    );
    parsed.payment_due_date = found.or(parsed.payment_due_date);
    parsed
}

/// Account-style layouts date the period through their balance lines.
fn balance_period(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    if !parsed.statement_period.is_empty() {
        return parsed;
    }

    let head = doc.profile_head();
    let dated = |pattern: &Regex| pattern.captures(head).and_then(|caps| parse_date(&caps[1]));
    let period = StatementPeriod::new(dated(&*OPENING_BALANCE_ON), dated(&*CLOSING_BALANCE_ON));
    if !period.is_empty() {
        parsed.statement_period = period;
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bank, ExtractionConfig};
    use crate::statement::BankProfile;
    use crate::text::NormalizedText;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn parse(raw: &str) -> ParsedStatement {
        let text = NormalizedText::new(raw);
        let config = ExtractionConfig::default();
        BankProfile::for_bank(Bank::Sbi).parse(&Document::new(&text, &config))
    }

    #[test]
    fn test_sbi_statement() {
        let raw = "\
SBI Card
Mr. ANIL VERMA
Flat 4, Green Park
Email: anil@example.com
Credit Card Number XXXX XXXX XXXX 9034
Payment Due Date
Minimum Amount Due 400.00
22 Jun 2024
Total Amount Due
Rs. 7,980.25
";
        let parsed = parse(raw);
        assert_eq!(parsed.card_owner_name.as_deref(), Some("ANIL VERMA"));
        assert_eq!(parsed.card_ending.as_deref(), Some("9034"));
        assert_eq!(parsed.payment_due_date, NaiveDate::from_ymd_opt(2024, 6, 22));
        assert_eq!(parsed.total_amount_due, Some(Decimal::from_str("7980.25").unwrap()));
    }

    #[test]
    fn test_account_holder_label() {
        let parsed = parse("Name of the Account Holder: SMT MEERA IYER\nMy Address\n");
        assert_eq!(parsed.card_owner_name.as_deref(), Some("MEERA IYER"));
    }

    #[test]
    fn test_balance_period_fallback() {
        let raw = "Opening Balance on 01/05/2024 1,000.00\nClosing Balance on 31/05/2024 250.00\n";
        assert_eq!(
            parse(raw).statement_period,
            StatementPeriod::new(
                NaiveDate::from_ymd_opt(2024, 5, 1),
                NaiveDate::from_ymd_opt(2024, 5, 31)
            )
        );
    }

    #[test]
    fn test_labelled_period_is_kept() {
        let raw = "Statement Period: 01 Apr 2024 to 30 Apr 2024\nClosing Balance on 31/05/2024\n";
        assert_eq!(
            parse(raw).statement_period.to,
            NaiveDate::from_ymd_opt(2024, 4, 30)
        );
    }
}
