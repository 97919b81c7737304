//! Issuer profiles layered on the generic baseline.
//!
//! A profile is an identity pattern set (used by the detector) plus an
//! ordered list of field overrides folded over [`parse_generic`]. Overrides
//! only replace a field when they produce a value; owner names always win
//! when found.

pub mod amex;
pub mod axis;
pub mod hdfc;
pub mod icici;
pub mod sbi;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::trace;

use super::generic::parse_generic;
use super::rules::{decimal_token, first_date_token, parse_date, LabelLocator, TokenPolicy};
use super::Document;
use crate::models::{Bank, ParsedStatement};

/// One issuer-specific transform of a parsed statement.
pub type FieldOverride = fn(&Document<'_>, ParsedStatement) -> ParsedStatement;

/// Identity patterns and override chain of one issuer.
#[derive(Clone, Copy)]
pub struct BankProfile {
    pub bank: Bank,
    /// Keywords scored by the detector.
    pub identity: &'static [Regex],
    /// Applied in order to the generic result.
    pub overrides: &'static [FieldOverride],
}

impl std::fmt::Debug for BankProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankProfile")
            .field("bank", &self.bank)
            .field("identity", &self.identity.len())
            .field("overrides", &self.overrides.len())
            .finish()
    }
}

impl BankProfile {
    /// The profile for `bank`; [`Bank::Generic`] has no identity and no overrides.
    pub fn for_bank(bank: Bank) -> Self {
        let (identity, overrides): (&'static [Regex], &'static [FieldOverride]) = match bank {
            Bank::Axis => (axis::IDENTITY.as_slice(), axis::OVERRIDES),
            Bank::Hdfc => (hdfc::IDENTITY.as_slice(), hdfc::OVERRIDES),
            Bank::Sbi => (sbi::IDENTITY.as_slice(), sbi::OVERRIDES),
            Bank::Icici => (icici::IDENTITY.as_slice(), icici::OVERRIDES),
            Bank::Amex => (amex::IDENTITY.as_slice(), amex::OVERRIDES),
            Bank::Generic => (&[], &[]),
        };
        Self {
            bank,
            identity,
            overrides,
        }
    }

    /// Profiles of every detectable issuer, in canonical order.
    pub fn issuers() -> impl Iterator<Item = BankProfile> {
        Bank::ISSUERS.into_iter().map(Self::for_bank)
    }

    /// Generic baseline with this issuer's overrides applied.
    pub fn parse(&self, doc: &Document<'_>) -> ParsedStatement {
        let parsed = self
            .overrides
            .iter()
            .fold(parse_generic(doc), |parsed, apply| apply(doc, parsed));
        trace!(bank = %self.bank, "profile parse done");
        parsed
    }
}

/// One two-decimal amount on the label line or within `window` lines below.
pub(crate) fn amount_near(
    text: &str,
    label: &Regex,
    window: usize,
    policy: TokenPolicy,
) -> Option<Decimal> {
    LabelLocator::new(label, window).locate(text, |line| decimal_token(line, policy))
}

/// The first date token on the label line or within `window` lines below.
///
/// An invalid calendar date ends the search.
pub(crate) fn date_near(text: &str, label: &Regex, window: usize) -> Option<NaiveDate> {
    LabelLocator::new(label, window)
        .locate(text, |line| first_date_token(line).map(parse_date))
        .flatten()
}

/// First label (in order) that yields an amount.
pub(crate) fn amount_near_any(
    text: &str,
    labels: &[&Regex],
    window: usize,
    policy: TokenPolicy,
) -> Option<Decimal> {
    labels
        .iter()
        .find_map(|label| amount_near(text, label, window, policy))
}

/// First label (in order) that yields a valid date.
pub(crate) fn date_near_any(text: &str, labels: &[&Regex], window: usize) -> Option<NaiveDate> {
    labels.iter().find_map(|label| date_near(text, label, window))
}
