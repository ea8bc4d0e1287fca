//! Human-readable status lines

use crate::config::CliConfig;
use console::{style, Term};

/// Writes prefixed status lines to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
    /// Print `-v` detail lines
    pub verbose: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
            verbose: false,
        }
    }

    /// Reporter matching the CLI color and verbosity settings
    #[must_use]
    pub fn for_config(config: &CliConfig) -> Self {
        Self {
            verbose: config.verbosity.is_verbose(),
            ..Self::new(config.use_color(), config.verbosity.is_quiet())
        }
    }

    /// Print a detail line only at `-v` and above
    pub fn verbose_detail(&self, label: &str, value: &str) {
        if self.verbose {
            self.detail(label, value);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message; shown even in quiet mode
    pub fn failure(&self, message: &str) {
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an indented detail line
    pub fn detail(&self, label: &str, value: &str) {
        if self.quiet {
            return;
        }
        let label = if self.use_color {
            style(label).dim().to_string()
        } else {
            label.to_string()
        };
        let _ = self.term.write_line(&format!("  {label}: {value}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }
}

/// Format a ratio as a percentage with two decimals
#[must_use]
pub fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
