//! Terminal colorization for diagnostics
//!
//! Applies ANSI escape codes to stderr messages using crossterm.

use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;

/// When to colorize diagnostics
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stderr is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    pub fn enabled(&self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_tty()
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Success,
}

impl Severity {
    fn prefix(&self) -> &'static str {
        match self {
            Severity::Warning => "warning:",
            Severity::Error => "error:",
            Severity::Success => "✓",
        }
    }

    fn color(&self) -> Color {
        match self {
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
            Severity::Success => Color::Green,
        }
    }
}

/// Format a diagnostic line, with the prefix colored when enabled
pub fn diagnostic(severity: Severity, message: &str, color: bool) -> String {
    let prefix = severity.prefix();
    if color {
        format!("{} {}", prefix.with(severity.color()).bold(), message)
    } else {
        format!("{} {}", prefix, message)
    }
}

/// Print a warning to stderr
pub fn warn(message: &str, color: bool) {
    eprintln!("{}", diagnostic(Severity::Warning, message, color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_diagnostic() {
        assert_eq!(
            diagnostic(Severity::Warning, "association dropped", false),
            "warning: association dropped"
        );
        assert_eq!(diagnostic(Severity::Error, "boom", false), "error: boom");
    }

    #[test]
    fn test_colored_diagnostic() {
        let line = diagnostic(Severity::Warning, "association dropped", true);
        assert!(line.contains("\x1b["));
        assert!(line.contains("warning:"));
        assert!(line.ends_with("association dropped"));
    }

    #[test]
    fn test_explicit_choices() {
        assert!(ColorChoice::Always.enabled());
        assert!(!ColorChoice::Never.enabled());
    }
}
