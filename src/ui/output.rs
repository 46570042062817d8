//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show every line.
    #[default]
    Normal,
    /// Hide `[INFO]` lines and banners.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows `[INFO]` lines and banners.
    pub fn shows_info(&self) -> bool {
        matches!(self, Self::Normal)
    }
}
