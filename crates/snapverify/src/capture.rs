//! Screenshot capture to named PNG artifacts.
//!
//! Every capture lands in the configured screenshot directory as
//! `{test}_{reason}_{timestamp}.png` (viewport) or
//! `{test}_{region}_{timestamp}.png` (region). Failures never panic: they are
//! logged and returned, so a test can `.ok()` the result and carry on.

use crate::config::{ArtifactConfig, CollisionPolicy};
use crate::driver::{ElementHandle, ScreenshotSource};
use crate::result::{VerifyError, VerifyResult};
use crate::retention::{cleanup_older_than, CleanupReport};
use chrono::{DateTime, Local};
use image::codecs::png::PngDecoder;
use image::{ColorType, ImageDecoder};
use std::fmt::Write as _;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Source of "now" for artifact timestamps
pub type Clock = fn() -> DateTime<Local>;

/// Reason tag used for baselines
pub const BASELINE_TAG: &str = "baseline";

/// Reason tag used for verification captures
pub const VERIFICATION_TAG: &str = "verification";

/// A stored screenshot
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotArtifact {
    /// Where the PNG was written
    pub path: PathBuf,
    /// Test that produced it
    pub test_name: String,
    /// Reason, step or region tag
    pub tag: Option<String>,
    /// Capture time
    pub captured_at: DateTime<Local>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format of the stored PNG
    pub color_type: ColorType,
    /// Size on disk in bytes
    pub file_size: u64,
}

impl ScreenshotArtifact {
    /// Whether this artifact was captured as a baseline
    #[must_use]
    pub fn is_baseline(&self) -> bool {
        self.tag.as_deref() == Some(BASELINE_TAG)
    }
}

/// Replace characters that would split or break a file name
#[must_use]
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Format `now` with a chrono format string, rejecting invalid formats
pub(crate) fn format_timestamp(now: &DateTime<Local>, format: &str) -> VerifyResult<String> {
    let mut out = String::new();
    write!(out, "{}", now.format(format))
        .map_err(|_| VerifyError::config(format!("invalid timestamp format {format:?}")))?;
    Ok(out)
}

/// Pick the file path for `{stem}.png` in `dir` according to `policy`
pub(crate) fn reserve_path(dir: &Path, stem: &str, policy: CollisionPolicy) -> PathBuf {
    let candidate = dir.join(format!("{stem}.png"));
    if policy == CollisionPolicy::Overwrite || !candidate.exists() {
        return candidate;
    }
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{stem}_{n}.png"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Captures screenshots into the configured directory
#[derive(Debug, Clone)]
pub struct ScreenshotCapture {
    config: ArtifactConfig,
    clock: Clock,
}

impl Default for ScreenshotCapture {
    fn default() -> Self {
        Self::new(ArtifactConfig::default())
    }
}

impl ScreenshotCapture {
    /// Create a capture helper using the local clock
    #[must_use]
    pub fn new(config: ArtifactConfig) -> Self {
        Self {
            config,
            clock: Local::now,
        }
    }

    /// Replace the clock (fixed timestamps in tests)
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ArtifactConfig {
        &self.config
    }

    /// Current time according to the configured clock
    pub(crate) fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    /// Capture the full viewport.
    ///
    /// Named `{test}_{reason}_{timestamp}.png`, or `{test}_{timestamp}.png`
    /// without a reason.
    pub fn capture_viewport(
        &self,
        source: &dyn ScreenshotSource,
        test_name: &str,
        reason: Option<&str>,
    ) -> VerifyResult<ScreenshotArtifact> {
        let result = self.store(source, test_name, reason, |s| s.capture_viewport());
        log_failure(&result, test_name, "screenshot");
        result
    }

    /// Capture the area of a single element, named `{test}_{region}_{timestamp}.png`
    pub fn capture_region(
        &self,
        source: &dyn ScreenshotSource,
        element: &ElementHandle,
        test_name: &str,
        region_name: &str,
    ) -> VerifyResult<ScreenshotArtifact> {
        let result = self.store(source, test_name, Some(region_name), |s| {
            s.capture_element(element)
        });
        log_failure(&result, test_name, "element screenshot");
        result
    }

    /// Capture the viewport tagged `step_{step_name}`
    pub fn capture_step(
        &self,
        source: &dyn ScreenshotSource,
        test_name: &str,
        step_name: &str,
    ) -> VerifyResult<ScreenshotArtifact> {
        self.capture_viewport(source, test_name, Some(&format!("step_{step_name}")))
    }

    /// Delete captures older than `days_to_keep` days
    pub fn cleanup(&self, days_to_keep: u64) -> CleanupReport {
        cleanup_older_than(&self.config.screenshot_dir, days_to_keep)
    }

    fn store(
        &self,
        source: &dyn ScreenshotSource,
        test_name: &str,
        tag: Option<&str>,
        grab: impl FnOnce(&dyn ScreenshotSource) -> VerifyResult<Vec<u8>>,
    ) -> VerifyResult<ScreenshotArtifact> {
        if !source.is_available() {
            return Err(VerifyError::SourceUnavailable);
        }

        let now = self.now();
        let timestamp =
            sanitize_component(&format_timestamp(&now, &self.config.timestamp_format)?);
        let stem = match tag {
            Some(tag) => format!(
                "{}_{}_{timestamp}",
                sanitize_component(test_name),
                sanitize_component(tag)
            ),
            None => format!("{}_{timestamp}", sanitize_component(test_name)),
        };

        let png = grab(source)?;
        let (width, height, color_type) = inspect_png(&png)?;

        let dir = &self.config.screenshot_dir;
        fs::create_dir_all(dir)?;
        let path = reserve_path(dir, &stem, self.config.collision);
        fs::write(&path, &png)?;
        info!(path = %path.display(), width, height, "screenshot saved");

        Ok(ScreenshotArtifact {
            path,
            test_name: test_name.to_string(),
            tag: tag.map(str::to_string),
            captured_at: now,
            width,
            height,
            color_type,
            file_size: png.len() as u64,
        })
    }
}

fn log_failure(result: &VerifyResult<ScreenshotArtifact>, test_name: &str, what: &str) {
    if let Err(e) = result {
        warn!(test = test_name, error = %e, "failed to capture {what}");
    }
}

/// Read dimensions and colour type from a PNG header
fn inspect_png(bytes: &[u8]) -> VerifyResult<(u32, u32, ColorType)> {
    let decoder = PngDecoder::new(Cursor::new(bytes))
        .map_err(|e| VerifyError::capture(format!("source returned an invalid PNG: {e}")))?;
    let (width, height) = decoder.dimensions();
    Ok((width, height, decoder.color_type()))
}
