//! Statement field extraction and issuer arbitration.

pub mod banks;
pub mod detect;
pub mod engine;
pub mod generic;
pub mod rules;

pub use banks::{BankProfile, FieldOverride};
pub use detect::{BankDetector, Detection};
pub use engine::StatementEngine;
pub use generic::parse_generic;

use crate::models::ExtractionConfig;
use crate::text::{prefix, NormalizedText};

/// A normalized statement together with the scan limits applied to it.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    text: &'a NormalizedText,
    config: &'a ExtractionConfig,
}

impl<'a> Document<'a> {
    pub fn new(text: &'a NormalizedText, config: &'a ExtractionConfig) -> Self {
        Self { text, config }
    }

    /// The whole normalized text.
    pub fn text(&self) -> &'a str {
        self.text.as_str()
    }

    pub fn config(&self) -> &'a ExtractionConfig {
        self.config
    }

    /// Header region scanned for period, due date and total labels.
    pub fn header(&self) -> &'a str {
        prefix(self.text(), self.config.header_scan_chars)
    }

    /// Region scanned by issuer-specific overrides.
    pub fn profile_head(&self) -> &'a str {
        prefix(self.text(), self.config.profile_scan_chars)
    }
}
