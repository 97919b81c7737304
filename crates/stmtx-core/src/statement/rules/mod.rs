//! Rule-based token recognizers for statement text.

pub mod amounts;
pub mod card;
pub mod dates;
pub mod locator;
pub mod names;
pub mod patterns;
pub mod transactions;

pub use amounts::{
    currency_tokens, decimal_token, money_tokens, parse_amount, pick_money, repair_currency,
    sign_marker, AmountExtractor, SignMarker, TokenPolicy,
};
pub use card::{
    correct_ocr_digits, is_trivial, literal_card_ending, most_frequent_masked_last4,
    strict_masked_last4, CardEndingExtractor,
};
pub use dates::{first_date, first_date_token, parse_date};
pub use locator::LabelLocator;
pub use names::{NameAnchor, NameRules};
pub use transactions::{RowDates, TransactionRules};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract all occurrences of the field, best first.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }
}

/// A recognized value and where it sits in the scanned text.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span in the scanned text, when the extractor tracks one.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
