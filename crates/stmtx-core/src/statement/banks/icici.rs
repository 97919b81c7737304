//! ICICI Bank.
//!
//! ICICI statements often print no period label at all. The period is then
//! rebuilt from the earliest transaction up to the statement date.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use super::{amount_near, date_near_any, FieldOverride};
use crate::models::{ParsedStatement, StatementPeriod, Transaction};
use crate::statement::rules::names::{denylist, NameAnchor, NameRules, ADDRESS_WORDS};
use crate::statement::rules::patterns::{
    compile, AMOUNT_PAYABLE_LABEL, BILLING_DATE_LABEL, DUE_DATE_LABEL, EMAIL_LABEL, NAME_LABEL,
    PAYMENT_DUE_DATE_LABEL, POSTAL_CODE, STATEMENT_DATE_LABEL, TOTAL_DUE_LABEL,
};
use crate::statement::rules::{
    money_tokens, strict_masked_last4, LabelLocator, RowDates, TokenPolicy, TransactionRules,
};
use crate::statement::Document;

/// Lines scanned around the total label by the plausibility heuristic.
const PLAUSIBLE_WINDOW: usize = 6;

/// Lines below the due date / statement date labels.
const DATE_WINDOW: usize = 6;

const ICICI_DENYLIST: &[&str] = &[
    "ICICI", "RETAIL", "AUTODEBIT", "UPI", "AMAZON", "FLIPKART", "APPLE", "RECHARGE", "CROMA",
    "WALLET", "FUEL", "EMI", "LOAN", "MERCHANT", "ONLINE", "POS", "CR", "DR", "MUMBAI",
    "MAHARASHTRA",
];

lazy_static! {
    pub static ref IDENTITY: Vec<Regex> = [
        r"(?i)\bicici\s+bank\b",
        r"(?i)\bcoral\b|\bsapphiro\b|\brubyx\b",
    ]
    .into_iter()
    .map(compile)
    .collect();

    static ref NAMES: NameRules = NameRules {
        stoplist: &[],
        denylist: denylist(&[ICICI_DENYLIST, ADDRESS_WORDS].concat()),
        scan_chars: 30_000,
        scan_lines: 120,
        anchors: vec![
            NameAnchor::LabelSameLine(NAME_LABEL.clone()),
            NameAnchor::LabelNextLines(NAME_LABEL.clone(), 2),
            NameAnchor::Above(POSTAL_CODE.clone(), 8),
            NameAnchor::Above(EMAIL_LABEL.clone(), 10),
            NameAnchor::Above(STATEMENT_DATE_LABEL.clone(), 10),
        ],
        strip_titles: true,
    };
}

pub const OVERRIDES: &[FieldOverride] = &[
    owner_name,
    card_ending,
    total_amount_due,
    payment_due_date,
    transactions,
    derived_period,
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
    let head = doc.profile_head();
    let found = amount_near(head, &TOTAL_DUE_LABEL, 2, TokenPolicy::Leftmost)
        .or_else(|| plausible_total(head))
        .or_else(|| amount_near(head, &AMOUNT_PAYABLE_LABEL, 3, TokenPolicy::Leftmost));
    parsed.total_amount_due = found.or(parsed.total_amount_due);
    parsed
}

/// Largest amount around the total label inside the plausible band, else the
/// largest positive one below the ceiling.
pub fn plausible_total(head: &str) -> Option<Decimal> {
    let values = LabelLocator::new(&TOTAL_DUE_LABEL, PLAUSIBLE_WINDOW).locate_all(head, |line| {
        money_tokens(line).into_iter().map(|m| m.value).collect()
    });

    let band = Decimal::new(500, 0)..=Decimal::new(500_000, 0);
    let ceiling = Decimal::new(1_000_000, 0);

    let in_band = values.iter().copied().filter(|v| band.contains(v)).max();
    in_band.or_else(|| {
        values
            .iter()
            .copied()
            .filter(|v| *v > Decimal::ZERO && *v <= ceiling)
            .max()
    })
}

fn payment_due_date(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let found = date_near_any(
        doc.profile_head(),
        &[&*PAYMENT_DUE_DATE_LABEL, &*DUE_DATE_LABEL],
        DATE_WINDOW,
    );
    parsed.payment_due_date = found.or(parsed.payment_due_date);
    parsed
}

/// Rows may also open with `Jan 15, 2024`; rows with impossible dates are dropped.
fn transactions(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let rules = TransactionRules {
        dates: RowDates::Any,
        require_valid_date: true,
        ..TransactionRules::default()
    };
    let found = rules.parse(doc.text());
    if !found.is_empty() {
        parsed.transactions = found;
    }
    parsed
}

fn derived_period(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    if parsed.statement_period.is_complete() {
        return parsed;
    }

    let statement_date = date_near_any(
        doc.profile_head(),
        &[&*STATEMENT_DATE_LABEL, &*BILLING_DATE_LABEL],
        DATE_WINDOW,
    );
    if let Some(period) = period_from_transactions(
        &parsed.transactions,
        statement_date,
        doc.config().min_derived_period_days,
    ) {
        parsed.statement_period = period;
    }
    parsed
}

/// Earliest transaction date up to the statement date, when the span is long
/// enough to be a billing cycle.
pub fn period_from_transactions(
    transactions: &[Transaction],
    statement_date: Option<NaiveDate>,
    min_days: i64,
) -> Option<StatementPeriod> {
    let to = statement_date?;
    let from = transactions.iter().filter_map(|tx| tx.date).min()?;
    ((to - from).num_days() > min_days).then(|| StatementPeriod::new(Some(from), Some(to)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bank, ExtractionConfig};
    use crate::statement::BankProfile;
    use crate::text::NormalizedText;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn parse(raw: &str) -> ParsedStatement {
        let text = NormalizedText::new(raw);
        let config = ExtractionConfig::default();
        BankProfile::for_bank(Bank::Icici).parse(&Document::new(&text, &config))
    }

    const STATEMENT: &str = "\
ICICI Bank Credit Card
MR VIKRAM SINGH RATHORE
Flat 12 Sea View Road
MUMBAI 400050
4375 XXXX XXXX 6021
Statement Date
20/03/2024
Payment Due Date: 07/04/2024
Total Amount Due
Jan 22, 2024 AUTODEBIT PAYMENT 3,000.00 CR
25/02/2024 CROMA RETAIL 2,199.00
31/02/2024 GHOST ROW 1.00
Mar 02, 2024 UBER RIDE 312.40
";

    #[test]
    fn test_icici_statement() {
        let parsed = parse(STATEMENT);
        assert_eq!(parsed.card_owner_name.as_deref(), Some("VIKRAM SINGH RATHORE"));
        assert_eq!(parsed.card_ending.as_deref(), Some("6021"));
        assert_eq!(parsed.payment_due_date, date(2024, 4, 7));
        assert_eq!(
            parsed
                .transactions
                .iter()
                .map(|t| (t.date, t.amount))
                .collect::<Vec<_>>(),
            vec![
                (date(2024, 1, 22), dec("3000.00")),
                (date(2024, 2, 25), dec("2199.00")),
                (date(2024, 3, 2), dec("312.40")),
            ]
        );
    }

    #[test]
    fn test_period_derived_from_transactions() {
        let parsed = parse(STATEMENT);
        assert_eq!(
            parsed.statement_period,
            StatementPeriod::new(date(2024, 1, 22), date(2024, 3, 20))
        );
    }

    #[test]
    fn test_short_span_is_not_a_period() {
        let tx = vec![Transaction {
            date: date(2024, 3, 12),
            description: None,
            amount: dec("10.00"),
        }];
        assert_eq!(period_from_transactions(&tx, date(2024, 3, 20), 10), None);
        assert_eq!(period_from_transactions(&tx, date(2024, 3, 22), 10), None);
        assert_eq!(
            period_from_transactions(&tx, date(2024, 3, 23), 10),
            Some(StatementPeriod::new(date(2024, 3, 12), date(2024, 3, 23)))
        );
        assert_eq!(period_from_transactions(&tx, None, 10), None);
    }

    #[test]
    fn test_plausible_total() {
        let head = "Total Amount Due\nPoints 12.00\nCredit Limit 9,00,000.00\n18,240.75\n";
        assert_eq!(plausible_total(head), Some(dec("18240.75")));
        let head = "Total Amount Due\nfee 120.00\nlimit 2,000,000.00\n";
        assert_eq!(plausible_total(head), Some(dec("120.00")));
        assert_eq!(plausible_total("Total Amount Due\n"), None);
    }

    #[test]
    fn test_total_on_label_window() {
        let parsed = parse("Total Amount Due\nRs. 4,567.00\n");
        assert_eq!(parsed.total_amount_due, Some(dec("4567.00")));
    }
}
