//! CLI configuration

use crate::error::CliResult;
use serde::{Deserialize, Serialize};
use snapverify::ArtifactConfig;
use std::path::PathBuf;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Default output
    #[default]
    Normal,
    /// Extra output
    Verbose,
    /// Maximum output
    Trace,
}

impl Verbosity {
    /// Map `-q` and the `-v` count to a level
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Trace)
    }

    /// Default tracing filter when `RUST_LOG` is unset
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stdout().features().colors_supported(),
        }
    }
}

/// Directory overrides given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirOverrides {
    /// `--screenshot-dir`
    pub screenshot_dir: Option<PathBuf>,
    /// `--comparison-dir`
    pub comparison_dir: Option<PathBuf>,
}

/// CLI configuration
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Artifact settings after file and flag layering
    pub artifacts: ArtifactConfig,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set artifact configuration
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: ArtifactConfig) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Whether output should be colored
    #[must_use]
    pub fn use_color(&self) -> bool {
        self.color.should_color()
    }
}

/// Layer the optional YAML file, then the directory flags, over the defaults
pub fn load_artifacts(
    file: Option<&PathBuf>,
    overrides: &DirOverrides,
) -> CliResult<ArtifactConfig> {
    let mut artifacts = match file {
        Some(path) => ArtifactConfig::from_yaml_file(path)?,
        None => ArtifactConfig::default(),
    };
    if let Some(ref dir) = overrides.screenshot_dir {
        artifacts.screenshot_dir.clone_from(dir);
    }
    if let Some(ref dir) = overrides.comparison_dir {
        artifacts.comparison_dir.clone_from(dir);
    }
    artifacts.validate()?;
    Ok(artifacts)
}
