//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{center, should_use_colors, ConsoleTheme, OutputMode, Severity, UserInterface, BANNER_WIDTH};

/// Terminal UI implementation.
///
/// `[ERROR]` and `[FAILED]` lines go to stderr; everything else to stdout.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: ConsoleTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            ConsoleTheme::new()
        } else {
            ConsoleTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn line(&mut self, severity: Severity, msg: &str) {
        if severity == Severity::Info && !self.mode.shows_info() {
            return;
        }
        let text = self.theme.format_line(severity, msg);
        let term = if severity.is_failure() {
            &mut self.err
        } else {
            &mut self.out
        };
        writeln!(term, "{}", text).ok();
    }

    fn separator(&mut self) {
        if self.mode.shows_info() {
            writeln!(self.out, "{}", self.theme.format_banner(&"=".repeat(BANNER_WIDTH))).ok();
        }
    }

    fn banner(&mut self, title: &str) {
        if self.mode.shows_info() {
            self.separator();
            writeln!(self.out, "{}", self.theme.format_banner(&center(title))).ok();
            self.separator();
        }
    }
}
