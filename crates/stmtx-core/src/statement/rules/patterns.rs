//! Common regex patterns for statement extraction.
//!
//! All tables are compiled once and shared read-only.

use lazy_static::lazy_static;
use regex::Regex;

/// Month-name stems; longer spellings ("sept", "january") are absorbed by `[a-z]*`.
const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

/// Mask glyphs printed in place of hidden card digits.
pub const MASK_CLASS: &str =
    r"[xX*#\u{2022}\u{2217}\u{2731}\u{25CF}\u{00B7}\u{25AA}\u{25AB}\u{25A0}\u{25A1}]";

/// A visible card group before OCR correction.
const CARD_GROUP: &str = r"([0-9A-Za-z|°§]{4})";

/// A card group must not run into further alphanumerics.
const CARD_GROUP_END: &str = r"(?:[^0-9A-Za-z]|$)";

fn day_first_token() -> String {
    format!(
        r"\d{{1,2}}(?:st|nd|rd|th)?[ \-/](?:{MONTHS})[a-z]*,?[ \-/]\d{{2,4}}|\d{{1,2}}[/\-]\d{{1,2}}[/\-]\d{{2,4}}"
    )
}

fn any_date_token() -> String {
    format!(
        r"{}|(?:{MONTHS})[a-z]*[ \-]\d{{1,2}}(?:st|nd|rd|th)?,?[ \-]\d{{2,4}}",
        day_first_token()
    )
}

pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern must compile")
}

lazy_static! {
    // Date shapes, tried in this order by the date parser
    pub static ref DATE_DAY_MONTH_NAME: Regex = compile(&format!(
        r"(?i)\b(\d{{1,2}})[ \-/]({MONTHS})[a-z]*,?[ \-/](\d{{2,4}})\b"
    ));

    pub static ref DATE_DAY_MONTH_NUM: Regex = compile(
        r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})\b"
    );

    pub static ref DATE_MONTH_NAME_DAY: Regex = compile(&format!(
        r"(?i)\b({MONTHS})[a-z]*[ \-](\d{{1,2}}),?[ \-](\d{{2,4}})\b"
    ));

    pub static ref ORDINAL_SUFFIX: Regex = compile(r"(?i)(\d)(?:st|nd|rd|th)");

    // Date-shaped tokens inside running text
    pub static ref DATE_TOKEN: Regex = compile(&format!(r"(?i)\b(?:{})\b", any_date_token()));

    pub static ref DATE_RANGE: Regex = compile(&format!(
        r"(?i)\b({tok})\s*(?:to|-)\s*({tok})\b",
        tok = any_date_token()
    ));

    // Transaction rows: a date token at line start, then the rest of the row
    pub static ref TX_DAY_FIRST_ROW: Regex = compile(&format!(
        r"(?i)^({})\s+(.+)$",
        day_first_token()
    ));

    pub static ref TX_ANY_DATE_ROW: Regex = compile(&format!(
        r"(?i)^({})\s+(.+)$",
        any_date_token()
    ));

    // Money
    pub static ref MONEY_DECIMAL: Regex = compile(r"\d[\d,]*\.\d{2}");

    pub static ref MONEY_INTEGER: Regex = compile(r"\d[\d,]*");

    pub static ref CURRENCY_AMOUNT: Regex = compile(
        r"(?i)(?:₹|\brs\.?|\binr)\s*(\d[\d,]*\.\d{2})"
    );

    pub static ref EQUALS_AMOUNT: Regex = compile(
        r"(?i)=\s*(?:₹|rs\.?\s*)?\s*(\d[\d,]*\.\d{2})"
    );

    pub static ref CREDIT_MARKER: Regex = compile(r"(?i)(?:^|[^a-z])(?:cr\b|credit)");

    pub static ref DEBIT_MARKER: Regex = compile(r"(?i)(?:^|[^a-z])(?:dr\b|debit)");

    // OCR renders a trailing "Dr" as "0r", "Or" or "d."
    pub static ref OCR_DEBIT_SUFFIX: Regex = compile(r"(?i)(?:^|[^a-z])(?:[0o]r|[od]\.)\s*$");

    // Masked card numbers
    pub static ref MASK_GLYPH: Regex = compile(MASK_CLASS);

    pub static ref CARD_ENDING_PHRASE: Regex = compile(&format!(
        r"(?i)\b(?:ending(?:\s*with)?|ends?\s*with|last\s*4(?:\s*digits)?)\s*[:\-]?\s*{CARD_GROUP}{CARD_GROUP_END}"
    ));

    pub static ref CARD_NO_MASKED: Regex = compile(&format!(
        r"(?i)card\s*(?:no\.?|number)?[^0-9a-z\n]*?(?:[{mask}\s\-]{{2,}})+{CARD_GROUP}{CARD_GROUP_END}",
        mask = &MASK_CLASS[1..MASK_CLASS.len() - 1]
    ));

    pub static ref MASKED_GROUP: Regex = compile(&format!(
        r"(?:{MASK_CLASS}{{2,}}[ \t\-]*)+{CARD_GROUP}{CARD_GROUP_END}"
    ));

    pub static ref MASK_RUN_STRICT: Regex = compile(&format!(
        r"(?:\d{{4,8}}[ \t]*)?(?:{MASK_CLASS}[ \t]*){{3,}}{CARD_GROUP}{CARD_GROUP_END}"
    ));

    pub static ref FULL_CARD_DIGITS: Regex = compile(&format!(
        r"(?:\d{{4}}[^\d\n]{{1,3}}){{3}}{CARD_GROUP}{CARD_GROUP_END}"
    ));

    pub static ref CONTEXT_CARD: Regex = compile(r"(?i)\b(?:card|credit)\b");

    pub static ref CONTEXT_ENDING: Regex = compile(r"(?i)\b(?:ending|ends?\s*with|last\s*4)\b");

    pub static ref ENDING_LITERAL: Regex = compile(r"(?i)\b(?:ending|ends?\s*with)\b[:\s\-]*?(\d{4})\b");

    pub static ref CARD_NO_LITERAL: Regex = compile(r"(?i)\bcard\s*(?:number|no\.?)\b.*?(\d{4})\b");

    // Statement period
    pub static ref PERIOD_LABEL: Regex = compile(
        r"(?i)(?:statement|billing)\s*(?:period|cycle)\s*[:\-]?\s*([^\n]+)"
    );

    pub static ref PERIOD_BARE_LABEL: Regex = compile(r"(?i)\bperiod\b\s*[:\-]?\s*([^\n]+)");

    pub static ref FROM_TO: Regex = compile(r"(?i)from\s+(.+?)\s+(?:to|-)\s+(.+)");

    pub static ref STATEMENT_DATE_LABEL: Regex = compile(r"(?i)statement\s*date\b");

    pub static ref BILLING_DATE_LABEL: Regex = compile(r"(?i)billing\s*date\b");

    // Due date
    pub static ref PAYMENT_DUE_DATE: Regex = compile(r"(?i)payment\s*due\s*date\s*[:\-]?\s*([^\n]+)");

    pub static ref DUE_DATE: Regex = compile(r"(?i)\bdue\s*date\s*[:\-]?\s*([^\n]+)");

    pub static ref PAYMENT_DUE_BY: Regex = compile(r"(?i)payment\s*due\s*by\s*[:\-]?\s*([^\n]+)");

    pub static ref PAYMENT_DUE_DATE_LABEL: Regex = compile(r"(?i)payment\s*due\s*date\b");

    pub static ref DUE_DATE_LABEL: Regex = compile(r"(?i)\bdue\s*date\b");

    // Totals
    pub static ref TOTAL_AMOUNT_DUE_LINE: Regex = compile(r"(?i)total\s*(?:amount\s*)?due[^\n]*");

    pub static ref AMOUNT_PAYABLE_BY_LINE: Regex = compile(r"(?i)amount\s*payable\s*by[^\n]*");

    pub static ref TOTAL_DUE_LINE: Regex = compile(r"(?i)total\s*due[^\n]*");

    pub static ref TOTAL_DUE_LABEL: Regex = compile(r"(?i)\btotal\s*(?:amount\s*)?due\b");

    pub static ref AMOUNT_PAYABLE_LABEL: Regex = compile(r"(?i)amount\s*payable\b");

    pub static ref MINIMUM_DUE: Regex = compile(r"(?i)minimum\s*(?:amount\s*)?due");

    pub static ref TOTAL_PAYMENT_DUE_INLINE: Regex = compile(
        r"(?i)total\s*payment\s*due[^\n]*?(\d[\d,]*\.\d{2})"
    );

    pub static ref TOTAL_PAYMENT_DUE_LABEL: Regex = compile(r"(?i)total\s*payment\s*due\b");

    pub static ref NEW_BALANCE_LABEL: Regex = compile(r"(?i)new\s*balance\b");

    pub static ref PAY_BY_LABEL: Regex = compile(r"(?i)pay\s*by\b");

    // Account summary row
    pub static ref PREVIOUS_DUES_LABEL: Regex = compile(r"(?i)previous\s*statement\s*dues\b");

    pub static ref PAYMENTS_CREDITS_LABEL: Regex = compile(
        r"(?i)payments\s*/?\s*credits(?:\s*received)?\b"
    );

    pub static ref PURCHASES_DEBIT_LABEL: Regex = compile(r"(?i)purchases\s*/\s*debit\b");

    pub static ref FINANCE_CHARGES_LABEL: Regex = compile(r"(?i)finance\s*charges\b");

    pub static ref DUE_NEIGHBOUR: Regex = compile(r"(?i)minimum\s*due|due\s*date");

    pub static ref TOTAL_BOX_NEIGHBOUR: Regex = compile(
        r"(?i)minimum\s*due|due\s*date|credit\s*limit|available\s*credit|available\s*cash"
    );

    // Balance-dated period (savings-style layouts)
    pub static ref OPENING_BALANCE_ON: Regex = compile(
        r"(?i)opening\s*balance\s*on\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})"
    );

    pub static ref CLOSING_BALANCE_ON: Regex = compile(
        r"(?i)closing\s*balance\s*on\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})"
    );

    // Owner name anchors. A PIN code is six digits that are not part of an
    // amount, so `123456.00` and `1,234567` do not count.
    pub static ref POSTAL_CODE: Regex =
        compile(r"(?:^|[^\d.,])\d{6}(?:$|[^\d.,]|[.,](?:$|\D))");

    pub static ref EMAIL_LABEL: Regex = compile(r"(?i)\bemail\b");

    pub static ref HONORIFIC: Regex = compile(r"(?i)\b(?:mr|mrs|ms|shri|smt|kumari)\.?\s+");

    pub static ref NAME_LABEL: Regex = compile(r"(?i)\bname\b");

    pub static ref CARD_MEMBER_NAME_LABEL: Regex = compile(
        r"(?i)card\s*(?:member|holder|owner)?\s*name|customer\s*name"
    );

    pub static ref ACCOUNT_HOLDER_NAME_LABEL: Regex = compile(
        r"(?i)\bmy\s*name\b|\bname\s+of\s+the\s+account\s+holder\b|\baccount\s*holder\s*name\b"
    );

    pub static ref MY_ADDRESS_LABEL: Regex = compile(r"(?i)\bmy\s*address\b");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        // Force every lazy pattern once.
        let all: [&Regex; 12] = [
            &*DATE_DAY_MONTH_NAME,
            &*DATE_TOKEN,
            &*DATE_RANGE,
            &*TX_DAY_FIRST_ROW,
            &*TX_ANY_DATE_ROW,
            &*CURRENCY_AMOUNT,
            &*CARD_ENDING_PHRASE,
            &*CARD_NO_MASKED,
            &*MASKED_GROUP,
            &*MASK_RUN_STRICT,
            &*FULL_CARD_DIGITS,
            &*HONORIFIC,
        ];
        assert!(all.iter().all(|re| !re.as_str().is_empty()));
    }

    #[test]
    fn test_date_token_shapes() {
        assert!(DATE_TOKEN.is_match("15-Jan-2024"));
        assert!(DATE_TOKEN.is_match("12/03/2024"));
        assert!(DATE_TOKEN.is_match("Jan 15, 2024"));
        assert!(DATE_TOKEN.is_match("1st March 2024"));
        assert!(!DATE_TOKEN.is_match("AMAZON RETAIL"));
    }

    #[test]
    fn test_transaction_row() {
        let caps = TX_DAY_FIRST_ROW.captures("12/03/2024 AMAZON RETAIL 1,234.56").unwrap();
        assert_eq!(&caps[1], "12/03/2024");
        assert_eq!(&caps[2], "AMAZON RETAIL 1,234.56");
    }

    #[test]
    fn test_sign_markers() {
        assert!(DEBIT_MARKER.is_match("999.00 DR"));
        assert!(DEBIT_MARKER.is_match("999.00Dr"));
        assert!(CREDIT_MARKER.is_match("PAYMENT RECEIVED 500.00 CR"));
        assert!(!CREDIT_MARKER.is_match("ACCRUED 10.00"));
        assert!(!DEBIT_MARKER.is_match("ADDRESS 10.00"));
    }

    #[test]
    fn test_postal_code_is_not_an_amount() {
        assert!(POSTAL_CODE.is_match("Pune 411001"));
        assert!(POSTAL_CODE.is_match("560001"));
        assert!(POSTAL_CODE.is_match("MUMBAI - 400050."));
        assert!(!POSTAL_CODE.is_match("Total 123456.00"));
        assert!(!POSTAL_CODE.is_match("Limit 1,234567"));
        assert!(!POSTAL_CODE.is_match("4147123456789012"));
    }

    #[test]
    fn test_masked_group() {
        let caps = MASKED_GROUP.captures("Card No: XXXX XXXX XXXX 4321").unwrap();
        assert_eq!(&caps[1], "4321");
        let caps = MASKED_GROUP.captures("•••• •••• •••• 2IIS").unwrap();
        assert_eq!(&caps[1], "2IIS");
    }
}
