//! Prefix styling.

use console::Style;

use super::Severity;

/// Styles for severity prefixes and banners.
#[derive(Debug, Clone)]
pub struct ConsoleTheme {
    /// Style for `[INFO]` (cyan).
    pub info: Style,
    /// Style for `[WARNING]` (orange).
    pub warning: Style,
    /// Style for `[ERROR]` (red bold, checked against stderr).
    pub error: Style,
    /// Style for `[OK]` (green bold).
    pub ok: Style,
    /// Style for `[FAILED]` (red bold).
    pub failed: Style,
    /// Style for banner rows (magenta bold).
    pub banner: Style,
}

impl Default for ConsoleTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            info: Style::new().cyan(),
            warning: Style::new().color256(208),
            error: Style::new().for_stderr().red().bold(),
            ok: Style::new().green().bold(),
            failed: Style::new().for_stderr().red().bold(),
            banner: Style::new().magenta().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            info: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            ok: Style::new(),
            failed: Style::new(),
            banner: Style::new(),
        }
    }

    fn style(&self, severity: Severity) -> &Style {
        match severity {
            Severity::Info => &self.info,
            Severity::Warning => &self.warning,
            Severity::Error => &self.error,
            Severity::Ok => &self.ok,
            Severity::Failed => &self.failed,
        }
    }

    /// Format a line: styled prefix, a space, unstyled message.
    pub fn format_line(&self, severity: Severity, msg: &str) -> String {
        format!("{} {}", self.style(severity).apply_to(severity.prefix()), msg)
    }

    /// Format a banner row.
    pub fn format_banner(&self, text: &str) -> String {
        format!("{}", self.banner.apply_to(text))
    }
}

/// Check whether colors should be used.
///
/// Respects the `NO_COLOR` environment variable and checks whether stdout
/// is a TTY.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
