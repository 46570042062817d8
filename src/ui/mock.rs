//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! output for later assertion.
//!
//! # Example
//!
//! ```
//! use comfyup::ui::{MockUI, Severity, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.warning("CUDA is NOT available.");
//!
//! assert!(ui.has_warning("NOT available"));
//! assert_eq!(ui.count(Severity::Warning), 1);
//! ```

use super::{Severity, UserInterface, BANNER_WIDTH};

/// One captured UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Line(Severity, String),
    Banner(String),
    Separator,
}

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    entries: Vec<Entry>,
}

impl MockUI {
    /// Create an empty MockUI.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events, in order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Captured events rendered the way a plain terminal would print them.
    ///
    /// Banners render as a single `=== TITLE ===` entry.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| match e {
                Entry::Line(sev, msg) => format!("{} {}", sev.prefix(), msg),
                Entry::Banner(title) => format!("=== {} ===", title),
                Entry::Separator => "=".repeat(BANNER_WIDTH),
            })
            .collect()
    }

    /// Messages captured at the given severity.
    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Line(sev, msg) if *sev == severity => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of lines captured at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.messages_at(severity).len()
    }

    /// Check if a line at `severity` contains `needle`.
    pub fn has(&self, severity: Severity, needle: &str) -> bool {
        self.messages_at(severity).iter().any(|m| m.contains(needle))
    }

    /// Check if a warning contains `needle`.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.has(Severity::Warning, needle)
    }

    /// Check if an error contains `needle`.
    pub fn has_error(&self, needle: &str) -> bool {
        self.has(Severity::Error, needle)
    }

    /// Check if an info line contains `needle`.
    pub fn has_info(&self, needle: &str) -> bool {
        self.has(Severity::Info, needle)
    }

    /// Banner titles, in order.
    pub fn banners(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Banner(title) => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clear all captured events.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl UserInterface for MockUI {
    fn line(&mut self, severity: Severity, msg: &str) {
        self.entries.push(Entry::Line(severity, msg.to_string()));
    }

    fn separator(&mut self) {
        self.entries.push(Entry::Separator);
    }

    fn banner(&mut self, title: &str) {
        self.entries.push(Entry::Banner(title.to_string()));
    }
}
