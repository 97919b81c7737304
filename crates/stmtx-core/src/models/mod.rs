//! Data models and configuration.

pub mod config;
pub mod statement;

pub use config::{ArbitrationConfig, ExtractionConfig, StmtxConfig};
pub use statement::{Bank, ParseOutcome, ParsedStatement, StatementPeriod, Transaction};
