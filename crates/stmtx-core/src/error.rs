//! Error types for the stmtx-core library.
//!
//! Field misses are never errors: extractors return `None`. The only terminal
//! failure of the pipeline is the upstream text source producing nothing.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the stmtx library.
#[derive(Error, Debug)]
pub enum StmtxError {
    /// Upstream text acquisition failed.
    #[error("text source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the upstream text collaborator.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source produced no text at all.
    #[error("no text could be extracted from {0}")]
    Empty(String),

    /// The source could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is a format this engine does not decode (PDF, images).
    #[error("unsupported input format '{0}': extract the statement text first")]
    UnsupportedFormat(String),
}

/// Result type for the stmtx library.
pub type Result<T> = std::result::Result<T, StmtxError>;
