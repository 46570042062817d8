//! Operator-facing console output.
//!
//! Every line comfyup prints for operators carries a severity prefix
//! (`[INFO]`, `[WARNING]`, `[ERROR]`, `[OK]`, `[FAILED]`) and phases are
//! framed by `=` banners. CI jobs scrape these lines, so the text is stable
//! regardless of styling; color is applied to the prefix only, and only on
//! a TTY.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for real terminal output
//! - [`MockUI`] for capturing output in tests
//!
//! # Example
//!
//! ```
//! use comfyup::ui::{MockUI, Severity, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.banner("SYSTEM COMPATIBILITY CHECK");
//! ui.info("CUDA available: true");
//! ui.ok("System compatibility validated.");
//!
//! assert!(ui.has(Severity::Ok, "validated"));
//! assert_eq!(ui.lines()[1], "[INFO] CUDA available: true");
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, ConsoleTheme};

/// Width of banner separators.
pub const BANNER_WIDTH: usize = 52;

/// Severity of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Ok,
    Failed,
}

impl Severity {
    /// The bracketed prefix, e.g. `[INFO]`.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Info => "[INFO]",
            Self::Warning => "[WARNING]",
            Self::Error => "[ERROR]",
            Self::Ok => "[OK]",
            Self::Failed => "[FAILED]",
        }
    }

    /// Whether the line belongs on stderr.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::Failed)
    }
}

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Emit one severity-prefixed line.
    fn line(&mut self, severity: Severity, msg: &str);

    /// Show a separator row.
    fn separator(&mut self);

    /// Show a banner: separator, centered title, separator.
    fn banner(&mut self, title: &str);

    /// Display an `[INFO]` line.
    fn info(&mut self, msg: &str) {
        self.line(Severity::Info, msg);
    }

    /// Display a `[WARNING]` line.
    fn warning(&mut self, msg: &str) {
        self.line(Severity::Warning, msg);
    }

    /// Display an `[ERROR]` line.
    fn error(&mut self, msg: &str) {
        self.line(Severity::Error, msg);
    }

    /// Display an `[OK]` line.
    fn ok(&mut self, msg: &str) {
        self.line(Severity::Ok, msg);
    }

    /// Display a `[FAILED]` line.
    fn failed(&mut self, msg: &str) {
        self.line(Severity::Failed, msg);
    }
}

/// Center `title` within a banner row.
pub fn center(title: &str) -> String {
    let len = title.chars().count();
    if len >= BANNER_WIDTH {
        return title.to_string();
    }
    let pad = (BANNER_WIDTH - len) / 2;
    format!("{}{}", " ".repeat(pad), title)
}

/// Create the UI for this process.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}
