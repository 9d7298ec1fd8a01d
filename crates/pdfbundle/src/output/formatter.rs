//! Message formatting and display.
//!
//! This module provides formatted output for different message types
//! with support for quiet, verbose and JSON modes. Results go to stdout;
//! warnings and errors go to stderr so they never mix with listings piped
//! into other tools.
//!
//! # Examples
//!
//! ```
//! use pdfbundle::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Extracting scans.zip...");
//! formatter.success("Published combined.pdf");
//! formatter.error("Unreadable PDF: uploaded_files/s/scans/broken.pdf");
//! ```

use serde::Serialize;
use std::io::{self, IsTerminal};

use crate::config::Config;
use crate::error::PdfBundleError;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    /// Prefix and ANSI color of the level.
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Self::Info => ("", ""),
            Self::Success => ("✓ ", "\x1b[32m"),
            Self::Warning => ("⚠ ", "\x1b[33m"),
            Self::Error => ("✗ ", "\x1b[31m"),
            Self::Debug => ("→ ", "\x1b[36m"),
        }
    }

    /// Whether the level is written to stderr.
    fn is_diagnostic(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Output formatter with configurable verbosity.
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether to emit results as JSON.
    json: bool,
    /// Whether to use colored output.
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress non-error output
    /// * `verbose` - Show verbose output
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            json: false,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            json: config.json,
            ..Self::new(config.quiet, config.verbose)
        }
    }

    /// Create a quiet formatter (only errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Detect if colored output should be used.
    ///
    /// Returns true if stdout is a TTY, TERM is set and NO_COLOR is not.
    fn should_use_color() -> bool {
        io::stdout().is_terminal()
            && std::env::var_os("TERM").is_some()
            && std::env::var_os("NO_COLOR").is_none()
    }

    /// Print an informational message.
    ///
    /// Suppressed in quiet and JSON modes.
    pub fn info(&self, message: &str) {
        if self.should_print() {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message.
    ///
    /// Suppressed in quiet and JSON modes.
    pub fn success(&self, message: &str) {
        if self.should_print() {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message.
    ///
    /// Always displayed (even in quiet mode).
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message.
    ///
    /// Always displayed.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a failed interaction, with a hint for storage failures in verbose mode.
    pub fn report_error(&self, err: &PdfBundleError) {
        self.error(&err.to_string());
        if self.verbose && !err.is_user_error() {
            self.print_message(
                MessageLevel::Debug,
                "This looks like a storage problem; check the --root directory",
            );
        }
    }

    /// Print a debug/verbose message.
    ///
    /// Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose && !self.json {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let (prefix, color_code) = level.style();
        let line = if self.colored && !color_code.is_empty() {
            format!("{color_code}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        };

        if level.is_diagnostic() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Print a section header.
    ///
    /// Suppressed in quiet and JSON modes.
    pub fn section(&self, title: &str) {
        if self.should_print() {
            println!("\n{title}");
        }
    }

    /// Print a labelled value.
    ///
    /// Only shown in verbose mode.
    ///
    /// # Arguments
    ///
    /// * `label` - Label for the information
    /// * `value` - Value to display
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose && !self.json {
            println!("  {label}: {value}");
        }
    }

    /// Print a list item.
    ///
    /// Suppressed in quiet and JSON modes.
    ///
    /// # Arguments
    ///
    /// * `index` - Item index (1-based)
    /// * `message` - Item message
    pub fn list_item(&self, index: usize, message: &str) {
        if self.should_print() {
            println!("  {index}. {message}");
        }
    }

    /// Print a bare line of output.
    ///
    /// Shown unless quiet, so listings stay pipeable.
    pub fn line(&self, text: &str) {
        if !self.quiet {
            println!("{text}");
        }
    }

    /// Print `value` as pretty JSON.
    ///
    /// Always printed, even when quiet.
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(e) => self.error(&format!("Failed to encode JSON output: {e}")),
        }
    }

    /// Check if human-readable output should be shown.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Check if results are emitted as JSON.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_formatter() {
        let formatter = OutputFormatter::new(false, false);
        assert!(!formatter.is_quiet());
        assert!(!formatter.is_verbose());
        assert!(!formatter.is_json());
        assert!(formatter.should_print());
    }

    #[test]
    fn test_quiet_formatter() {
        let formatter = OutputFormatter::quiet();
        assert!(formatter.is_quiet());
        assert!(!formatter.should_print());
        formatter.info("This should not appear");
        formatter.warning("Warnings are always shown");
    }

    #[test]
    fn test_verbose_formatter() {
        let formatter = OutputFormatter::verbose();
        assert!(formatter.is_verbose());
        assert!(formatter.should_print());
        formatter.debug("Debug information");
        formatter.detail("Folder", "uploaded_files/s/scans");
    }

    #[test]
    fn test_from_config_json() {
        let mut config = Config::with_root("/tmp/bundle");
        config.json = true;
        let formatter = OutputFormatter::from_config(&config);
        assert!(formatter.is_json());
        assert!(!formatter.should_print());
        formatter.json(&serde_json::json!({ "files": ["a.pdf"] }));
    }

    #[test]
    fn test_report_error() {
        let formatter = OutputFormatter::verbose();
        formatter.report_error(&PdfBundleError::NoFilesToMerge);
        formatter.report_error(&PdfBundleError::merge_failed("catalog missing"));
    }

    #[test]
    fn test_message_levels() {
        assert!(MessageLevel::Error.is_diagnostic());
        assert!(MessageLevel::Warning.is_diagnostic());
        assert!(!MessageLevel::Success.is_diagnostic());
        assert_eq!(MessageLevel::Info.style(), ("", ""));
    }
}
