//! Core library for credit card statement field extraction.
//!
//! This crate provides:
//! - Text normalization for PDF text layers and OCR output
//! - A generic extractor for card ending, owner name, period, due date,
//!   total amount due and transactions
//! - Issuer profiles (Axis, HDFC, SBI, ICICI, American Express) layered over
//!   the generic extractor
//! - Issuer detection and completeness-based arbitration between profiles

pub mod error;
pub mod models;
pub mod source;
pub mod statement;
pub mod text;

pub use error::{Result, SourceError, StmtxError};
pub use models::{
    ArbitrationConfig, Bank, ExtractionConfig, ParseOutcome, ParsedStatement, StatementPeriod,
    StmtxConfig, Transaction,
};
pub use source::{FileSource, InlineSource, StdinSource, TextSource};
pub use statement::{BankDetector, Detection, StatementEngine};
pub use text::NormalizedText;
