//! American Express.

use lazy_static::lazy_static;
use regex::Regex;

use super::{amount_near_any, date_near_any, FieldOverride};
use crate::models::ParsedStatement;
use crate::statement::rules::names::{denylist, NameRules};
use crate::statement::rules::patterns::{
    compile, AMOUNT_PAYABLE_LABEL, DUE_DATE_LABEL, NEW_BALANCE_LABEL, PAYMENT_DUE_DATE_LABEL,
    TOTAL_DUE_LABEL,
};
use crate::statement::rules::{strict_masked_last4, TokenPolicy};
use crate::statement::Document;

const LABEL_WINDOW: usize = 4;

lazy_static! {
    pub static ref IDENTITY: Vec<Regex> = [r"(?i)\bamerican\s+express\b", r"(?i)\bamex\b"]
        .into_iter()
        .map(compile)
        .collect();

    static ref NAMES: NameRules = NameRules {
        stoplist: &[
            "AMERICAN EXPRESS",
            "STATEMENT OF ACCOUNT",
            "NEW BALANCE",
            "PAYMENT DUE DATE",
            "MINIMUM PAYMENT DUE",
            "TOTAL DUE",
            "CREDIT LIMIT",
        ],
        denylist: denylist(&["AMERICAN EXPRESS", "AMEX"]),
        scan_chars: 5_000,
        scan_lines: 40,
        anchors: Vec::new(),
        strip_titles: false,
    };
}

pub const OVERRIDES: &[FieldOverride] = &[owner_name, card_ending, total_amount_due, payment_due_date];

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
        &[&*TOTAL_DUE_LABEL, &*AMOUNT_PAYABLE_LABEL, &*NEW_BALANCE_LABEL],
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
