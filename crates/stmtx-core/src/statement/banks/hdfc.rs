//! HDFC Bank.
//!
//! HDFC prints the total in a boxed summary next to the credit limits, so a
//! plain label scan tends to pick up the wrong figure. Totals are read from
//! currency-marked amounts only and cross-checked against the account
//! summary row.

use std::borrow::Cow;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use super::FieldOverride;
use crate::models::{ExtractionConfig, ParsedStatement};
use crate::statement::rules::names::{denylist, NameRules};
use crate::statement::rules::patterns::{
    compile, AMOUNT_PAYABLE_LABEL, DUE_DATE_LABEL, DUE_NEIGHBOUR, EQUALS_AMOUNT,
    FINANCE_CHARGES_LABEL, PAYMENTS_CREDITS_LABEL, PREVIOUS_DUES_LABEL, PURCHASES_DEBIT_LABEL,
    TOTAL_BOX_NEIGHBOUR, TOTAL_DUE_LABEL, TOTAL_DUE_LINE,
};
use crate::statement::rules::{
    currency_tokens, first_date, parse_amount, repair_currency, LabelLocator,
};
use crate::statement::Document;

/// Lines below the total label searched for an `= amount` line.
const EQUALS_WINDOW: usize = 6;

/// Lines below a total label whose currency amounts are candidates.
const TOTAL_WINDOW: usize = 4;

/// Lines below a summary-row label holding its figure.
const SUMMARY_WINDOW: usize = 2;

/// Lines scanned by the last-resort currency fallback.
const FALLBACK_LINES: usize = 100;

/// Lines below the due date label holding the date.
const DUE_WINDOW: usize = 8;

lazy_static! {
    pub static ref IDENTITY: Vec<Regex> = [
        r"(?i)\bhdfc\s+bank\b",
        r"(?i)\bmycards\b",
        r"(?i)\bsmartpay\b",
        r"(?i)\bhdfc\s+bank\s+cards\b",
    ]
    .into_iter()
    .map(compile)
    .collect();

    static ref NAMES: NameRules = NameRules {
        stoplist: &[
            "BUSINESS MONEYBACK",
            "HDFC BANK",
            "TOTAL CREDIT LIMIT",
            "AVAILABLE CREDIT LIMIT",
            "AVAILABLE CASH LIMIT",
            "PREVIOUS STATEMENT DUES",
            "PAYMENTS CREDITS RECEIVED",
            "PURCHASES DEBIT",
            "FINANCE CHARGES",
            "TOTAL AMOUNT DUE",
            "MINIMUM DUE",
            "DUE DATE",
        ],
        denylist: denylist(&["HDFC"]),
        scan_chars: 5_000,
        scan_lines: 30,
        anchors: Vec::new(),
        strip_titles: false,
    };
}

pub const OVERRIDES: &[FieldOverride] = &[owner_name, total_amount_due, payment_due_date];

fn owner_name(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    parsed.card_owner_name = NAMES.extract(doc.text()).or(parsed.card_owner_name);
    parsed
}

fn total_amount_due(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    let head: Cow<'_, str> = repair_currency(doc.profile_head());
    parsed.total_amount_due = hdfc_total(&head, doc.config()).or(parsed.total_amount_due);
    parsed
}

fn payment_due_date(doc: &Document<'_>, mut parsed: ParsedStatement) -> ParsedStatement {
    parsed.payment_due_date = hdfc_due_date(doc.profile_head()).or(parsed.payment_due_date);
    parsed
}

/// Total amount due, in order of trust:
///
/// 1. an `= amount` line just below the total label
/// 2. the label-box amount checked against the summary-row computation
/// 3. the same box scan on "amount payable" / "total due"
/// 4. the first currency-marked amount near the top
pub fn hdfc_total(head: &str, config: &ExtractionConfig) -> Option<Decimal> {
    if let Some(total) = equals_total(head) {
        debug!(%total, "hdfc total from equals line");
        return Some(total);
    }

    let near_label = smallest_in_box(head, &TOTAL_DUE_LABEL);
    let computed = summary_total(head);
    if let Some(total) = decide(near_label, computed, config) {
        debug!(?near_label, ?computed, %total, "hdfc total from summary box");
        return Some(total);
    }

    [&*AMOUNT_PAYABLE_LABEL, &*TOTAL_DUE_LINE]
        .into_iter()
        .find_map(|label| smallest_in_box(head, label))
        .or_else(|| {
            head.lines()
                .take(FALLBACK_LINES)
                .find_map(|line| currency_tokens(line).first().map(|m| m.value))
        })
}

/// Pick between the label-box amount and the summary-row total.
///
/// The computed total wins when the box amount looks inflated or sits well
/// above it.
pub fn decide(
    near_label: Option<Decimal>,
    computed: Option<Decimal>,
    config: &ExtractionConfig,
) -> Option<Decimal> {
    match (near_label, computed) {
        (Some(near), Some(computed)) => {
            let inflated = near >= config.inflated_total_threshold;
            let diverges = computed < near - config.computed_total_divergence;
            Some(if inflated || diverges { computed } else { near })
        }
        (near, computed) => near.or(computed),
    }
}

fn equals_total(head: &str) -> Option<Decimal> {
    let idx = LabelLocator::new(&TOTAL_DUE_LABEL, 0).label_line(head)?;
    head.lines()
        .skip(idx + 1)
        .take(EQUALS_WINDOW)
        .find_map(|line| EQUALS_AMOUNT.captures(line).and_then(|caps| parse_amount(&caps[1])))
}

/// Smallest currency amount after the label and in the box lines below it.
fn smallest_in_box(head: &str, label: &Regex) -> Option<Decimal> {
    LabelLocator::new(label, TOTAL_WINDOW)
        .after_label()
        .exclude(&TOTAL_BOX_NEIGHBOUR)
        .locate_all(head, |line| {
            currency_tokens(line).into_iter().map(|m| m.value).collect()
        })
        .into_iter()
        .filter(|amount| !amount.is_sign_negative())
        .min()
}

/// `previous dues - payments/credits + purchases/debit + finance charges`.
///
/// Missing figures count as zero; a negative result is discarded.
pub fn summary_total(head: &str) -> Option<Decimal> {
    let figure = |label: &Regex| {
        LabelLocator::new(label, SUMMARY_WINDOW)
            .after_label()
            .exclude(&DUE_NEIGHBOUR)
            .locate(head, |line| currency_tokens(line).first().map(|m| m.value))
    };

    let previous = figure(&*PREVIOUS_DUES_LABEL);
    let payments = figure(&*PAYMENTS_CREDITS_LABEL);
    let purchases = figure(&*PURCHASES_DEBIT_LABEL);
    let finance = figure(&*FINANCE_CHARGES_LABEL);

    if previous.is_none() && payments.is_none() && purchases.is_none() && finance.is_none() {
        return None;
    }

    let total = previous.unwrap_or_default() - payments.unwrap_or_default()
        + purchases.unwrap_or_default()
        + finance.unwrap_or_default();
    (total >= Decimal::ZERO).then_some(total)
}

/// Due date below the label, else the first due date label line that carries one.
fn hdfc_due_date(head: &str) -> Option<NaiveDate> {
    LabelLocator::new(&DUE_DATE_LABEL, DUE_WINDOW)
        .locate(head, first_date)
        .or_else(|| {
            head.lines().find_map(|line| {
                let label = DUE_DATE_LABEL.find(line)?;
                first_date(&line[label.end()..])
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bank;
    use crate::statement::BankProfile;
    use crate::text::NormalizedText;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn parse(raw: &str) -> ParsedStatement {
        let text = NormalizedText::new(raw);
        let config = ExtractionConfig::default();
        BankProfile::for_bank(Bank::Hdfc).parse(&Document::new(&text, &config))
    }

    #[test]
    fn test_equals_line_wins() {
        let head = "TOTAL AMOUNT DUE\nCredit Limit ₹ 2,00,000.00\n= ₹ 3,120.50\n";
        assert_eq!(hdfc_total(head, &ExtractionConfig::default()), Some(dec("3120.50")));
    }

    #[test]
    fn test_box_takes_smallest_and_skips_neighbours() {
        let head = "Total Amount Due\nAvailable Credit Limit ₹ 50,000.00\n₹ 1,499.00 Rs. 1,800.00\n";
        assert_eq!(hdfc_total(head, &ExtractionConfig::default()), Some(dec("1499.00")));
    }

    #[test]
    fn test_summary_total() {
        let head = "Previous Statement Dues\n₹ 1,000.00\n\
                    Payments/Credits Received\n₹ 1,000.00\n\
                    Purchases/Debit\n₹ 2,345.67\n\
                    Finance Charges\n₹ 0.00\n";
        assert_eq!(summary_total(head), Some(dec("2345.67")));
        assert_eq!(summary_total("Payments/Credits Received ₹ 10.00"), None);
        assert_eq!(summary_total("nothing here"), None);
    }

    #[test]
    fn test_decision_rule() {
        let config = ExtractionConfig::default();
        // Inflated box amount loses.
        assert_eq!(
            decide(Some(dec("52000.00")), Some(dec("2345.67")), &config),
            Some(dec("2345.67"))
        );
        // Box well above the computed total loses.
        assert_eq!(
            decide(Some(dec("1900.00")), Some(dec("1200.00")), &config),
            Some(dec("1200.00"))
        );
        // Close figures keep the box amount.
        assert_eq!(
            decide(Some(dec("1500.00")), Some(dec("1200.00")), &config),
            Some(dec("1500.00"))
        );
        assert_eq!(decide(None, Some(dec("10.00")), &config), Some(dec("10.00")));
        assert_eq!(decide(Some(dec("20.00")), None, &config), Some(dec("20.00")));
        assert_eq!(decide(None, None, &config), None);
    }

    #[test]
    fn test_garbled_rupee_is_repaired() {
        let raw = "HDFC Bank\nTotal Amount Due \u{e2}\u{201a}\u{b9} 4,210.00\n";
        assert_eq!(parse(raw).total_amount_due, Some(dec("4210.00")));
    }

    #[test]
    fn test_last_resort_currency_amount() {
        let head = "Statement\nYour dues Rs. 640.00\n";
        assert_eq!(hdfc_total(head, &ExtractionConfig::default()), Some(dec("640.00")));
    }

    #[test]
    fn test_hdfc_statement() {
        let raw = "\
HDFC Bank Credit Cards
BUSINESS MONEYBACK
PRIYA NAIR
Card No: 4386 XXXX XXXX 2115
Statement Date: 15/04/2024
Payment Due Date
Credit Limit
05/05/2024
TOTAL AMOUNT DUE
₹ 8,765.40
";
        let parsed = parse(raw);
        assert_eq!(parsed.card_owner_name.as_deref(), Some("PRIYA NAIR"));
        assert_eq!(parsed.card_ending.as_deref(), Some("2115"));
        assert_eq!(parsed.payment_due_date, NaiveDate::from_ymd_opt(2024, 5, 5));
        assert_eq!(parsed.total_amount_due, Some(dec("8765.40")));
    }
}
