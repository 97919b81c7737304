//! Label-value locator.
//!
//! Statement layouts put a value either on the line of its label or a few
//! lines below it. Only the first line carrying the label is considered.

use regex::Regex;

/// Finds a value near the first occurrence of a label.
#[derive(Debug, Clone, Copy)]
pub struct LabelLocator<'p> {
    label: &'p Regex,
    window: usize,
    exclude: Option<&'p Regex>,
    after_label: bool,
}

impl<'p> LabelLocator<'p> {
    /// Look on the label line and up to `window` lines below it.
    pub fn new(label: &'p Regex, window: usize) -> Self {
        Self {
            label,
            window,
            exclude: None,
            after_label: false,
        }
    }

    /// Skip window lines matching `pattern`.
    pub fn exclude(mut self, pattern: &'p Regex) -> Self {
        self.exclude = Some(pattern);
        self
    }

    /// On the label line, only read from the label onward.
    pub fn after_label(mut self) -> Self {
        self.after_label = true;
        self
    }

    /// Index (in `text.lines()`) of the first label line.
    pub fn label_line(&self, text: &str) -> Option<usize> {
        text.lines().position(|line| self.label.is_match(line))
    }

    /// First value `read` yields on the label line or inside the window.
    pub fn locate<T>(&self, text: &str, mut read: impl FnMut(&str) -> Option<T>) -> Option<T> {
        let (same, below) = self.spans(text)?;
        if let Some(value) = read(same) {
            return Some(value);
        }
        below.into_iter().find_map(read)
    }

    /// Every value `read` yields on the label line and inside the window.
    pub fn locate_all<T>(&self, text: &str, mut read: impl FnMut(&str) -> Vec<T>) -> Vec<T> {
        let Some((same, below)) = self.spans(text) else {
            return Vec::new();
        };
        let mut values = read(same);
        for line in below {
            values.extend(read(line));
        }
        values
    }

    fn spans<'t>(&self, text: &'t str) -> Option<(&'t str, Vec<&'t str>)> {
        let mut lines = text.lines();
        let same = lines.by_ref().find(|line| self.label.is_match(line))?;

        let same = if self.after_label {
            self.label.find(same).map_or(same, |m| &same[m.start()..])
        } else {
            same
        };

        let below = lines
            .take(self.window)
            .filter(|line| !self.exclude.is_some_and(|ex| ex.is_match(line)))
            .collect();
        Some((same, below))
    }
}
