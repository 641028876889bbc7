//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escapes when stdout
//! is not a terminal.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark used for completed steps
pub const CHECK: &str = "✓";

/// Arrow used for pending mutations
pub const ARROW: &str = "→";

/// Semantic styles for CLI output
pub trait Stylize: Display {
    /// Bold, for headings and names
    fn emphasis(&self) -> String {
        format!("{}", self.to_string().bold())
    }

    /// Dimmed, for secondary details
    fn muted(&self) -> String {
        format!("{}", self.to_string().dimmed())
    }

    /// Cyan, for identifiers such as repositories and operation names
    fn accent(&self) -> String {
        format!("{}", self.to_string().cyan())
    }

    /// Green
    fn success(&self) -> String {
        format!("{}", self.to_string().green())
    }

    /// Yellow
    fn warn(&self) -> String {
        format!("{}", self.to_string().yellow())
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Styled check mark
pub fn check() -> String {
    CHECK.success()
}

/// Styled arrow
pub fn arrow() -> String {
    ARROW.accent()
}
