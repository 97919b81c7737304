//! Upstream text sources.
//!
//! Statement text is produced outside this crate (a PDF text layer or an OCR
//! service). A [`TextSource`] hands that text over; a source that yields no
//! text is the only terminal failure of the pipeline.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SourceError;

/// Extensions the engine refuses: their text has to be extracted first.
const BINARY_EXTENSIONS: &[&str] = &[
    "pdf", "png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp",
];

/// Anything that can hand over the text of one statement.
pub trait TextSource {
    /// Display name used in errors and logs.
    fn name(&self) -> &str;

    /// Raw text, possibly empty.
    fn read_text(&self) -> Result<String, SourceError>;

    /// Raw text, failing when it is blank.
    fn text(&self) -> Result<String, SourceError> {
        let text = self.read_text()?;
        if text.trim().is_empty() {
            return Err(SourceError::Empty(self.name().to_string()));
        }
        debug!(source = self.name(), chars = text.chars().count(), "text acquired");
        Ok(text)
    }
}

/// An already-extracted text file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> Result<String, SourceError> {
        if let Some(ext) = self.path.extension().and_then(|e| e.to_str()) {
            let ext = ext.to_lowercase();
            if BINARY_EXTENSIONS.contains(&ext.as_str()) {
                return Err(SourceError::UnsupportedFormat(ext));
            }
        }

        let bytes = std::fs::read(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Text piped on standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

impl TextSource for StdinSource {
    fn name(&self) -> &str {
        "<stdin>"
    }

    fn read_text(&self) -> Result<String, SourceError> {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|source| SourceError::Read {
                path: PathBuf::from("-"),
                source,
            })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Text already held in memory.
#[derive(Debug, Clone)]
pub struct InlineSource {
    name: String,
    text: String,
}

impl InlineSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl TextSource for InlineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> Result<String, SourceError> {
        Ok(self.text.clone())
    }
}
