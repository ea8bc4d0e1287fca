//! Artifact configuration.
//!
//! Where captures and diff images are written, how they are named and which
//! threshold applies when a comparison does not pass one explicitly.

use crate::capture::format_timestamp;
use crate::result::{check_threshold, VerifyError, VerifyResult};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default directory for screenshot captures
pub const DEFAULT_SCREENSHOT_DIR: &str = "test-output/screenshots";

/// Default directory for diff images
pub const DEFAULT_COMPARISON_DIR: &str = "test-output/screenshot-comparisons";

/// Default fraction of pixels allowed to differ
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Days an artifact is kept by suite teardown and by `cleanup` without `--days`
pub const DEFAULT_RETENTION_DAYS: u64 = 30;

/// Default artifact timestamp format (second resolution)
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What to do when an artifact path already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Append `_1`, `_2`, ... before the extension until the path is free
    #[default]
    Suffix,
    /// Replace the existing file
    Overwrite,
}

/// Configuration for artifact storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory for viewport and region captures
    pub screenshot_dir: PathBuf,
    /// Directory for diff images
    pub comparison_dir: PathBuf,
    /// Threshold used when a comparison passes `None`
    pub default_threshold: f64,
    /// Behaviour when two artifacts land on the same name
    pub collision: CollisionPolicy,
    /// chrono format string for the timestamp segment
    pub timestamp_format: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            comparison_dir: PathBuf::from(DEFAULT_COMPARISON_DIR),
            default_threshold: DEFAULT_THRESHOLD,
            collision: CollisionPolicy::Suffix,
            timestamp_format: String::from(DEFAULT_TIMESTAMP_FORMAT),
        }
    }
}

impl ArtifactConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place both artifact directories under `root`
    /// (`root/screenshots`, `root/screenshot-comparisons`)
    #[must_use]
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            screenshot_dir: root.join("screenshots"),
            comparison_dir: root.join("screenshot-comparisons"),
            ..Self::default()
        }
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set the comparison directory
    #[must_use]
    pub fn with_comparison_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.comparison_dir = dir.into();
        self
    }

    /// Set the default threshold
    #[must_use]
    pub const fn with_default_threshold(mut self, threshold: f64) -> Self {
        self.default_threshold = threshold;
        self
    }

    /// Set the collision policy
    #[must_use]
    pub const fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    /// Set the timestamp format
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Parse configuration from YAML; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed or the result fails validation
    pub fn from_yaml_str(yaml: &str) -> VerifyResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| VerifyError::config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn from_yaml_file(path: impl AsRef<Path>) -> VerifyResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            VerifyError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> VerifyResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| VerifyError::config(e.to_string()))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error on an out-of-range threshold, an empty directory, or a
    /// timestamp format that is empty, invalid or renders a path separator
    pub fn validate(&self) -> VerifyResult<()> {
        check_threshold(self.default_threshold)?;
        if self.screenshot_dir.as_os_str().is_empty() {
            return Err(VerifyError::config("screenshot_dir must not be empty"));
        }
        if self.comparison_dir.as_os_str().is_empty() {
            return Err(VerifyError::config("comparison_dir must not be empty"));
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(VerifyError::config("timestamp_format must not be empty"));
        }
        let rendered = format_timestamp(&Local::now(), &self.timestamp_format)?;
        if rendered.contains(['/', '\\']) {
            return Err(VerifyError::config(format!(
                "timestamp_format {:?} renders a path separator",
                self.timestamp_format
            )));
        }
        Ok(())
    }
}
