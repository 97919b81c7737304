//! Subcommands.

pub mod batch;
pub mod config;
pub mod detect;
pub mod parse;

use std::path::Path;

use stmtx_core::{FileSource, StdinSource, TextSource};

/// `-` reads standard input, anything else is a text file.
pub fn open_source(input: &Path) -> Box<dyn TextSource> {
    if input == Path::new("-") {
        Box::new(StdinSource)
    } else {
        Box::new(FileSource::new(input))
    }
}
