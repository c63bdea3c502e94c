//! Terminal styling helpers
//!
//! Colors go through `owo-colors`; output is written with `anstream`, which
//! strips them when stdout is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;
use supports_hyperlinks::Stream;
use terminal_link::Link;

/// Check mark
pub const CHECK: &str = "✓";
/// Arrow for progress lines
pub const ARROW: &str = "→";
/// Bullet for list entries
pub const BULLET: &str = "•";
/// Separator between chain entries
pub const PIPE: &str = "│";

/// Semantic colors for CLI output
pub trait Stylize: Display {
    /// De-emphasized text (hints, SHAs)
    fn muted(&self) -> String {
        self.to_string().dimmed().to_string()
    }

    /// Names the user should notice (branches, PR numbers)
    fn accent(&self) -> String {
        self.to_string().cyan().to_string()
    }

    /// Headings
    fn emphasis(&self) -> String {
        self.to_string().bold().to_string()
    }

    /// Warnings
    fn warn(&self) -> String {
        self.to_string().yellow().to_string()
    }

    /// Errors and blocked entries
    fn error(&self) -> String {
        self.to_string().red().to_string()
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.green().to_string()
}

/// Dimmed progress arrow
pub fn arrow() -> String {
    ARROW.dimmed().to_string()
}

/// Dimmed chain separator
pub fn pipe() -> String {
    PIPE.dimmed().to_string()
}

/// Spinner used while waiting on CI
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// `PR #n`, linked to `url` when the terminal supports hyperlinks
pub fn pr_link(number: u64, url: &str) -> String {
    let text = format!("PR #{number}");
    if url.is_empty() || !supports_hyperlinks::on(Stream::Stdout) {
        return text.accent();
    }
    Link::new(&text, url).to_string().accent()
}
