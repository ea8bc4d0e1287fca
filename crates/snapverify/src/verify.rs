//! Baseline visual verification.
//!
//! A baseline is an ordinary capture tagged `baseline`; the caller keeps its
//! path and hands it back on later runs. Verification captures the current
//! state, compares it with the baseline and writes a diff image into the
//! comparison directory when the difference ratio exceeds the threshold or the
//! dimensions differ.

use crate::capture::{
    format_timestamp, reserve_path, sanitize_component, ScreenshotArtifact, ScreenshotCapture,
    BASELINE_TAG, VERIFICATION_TAG,
};
use crate::config::ArtifactConfig;
use crate::diff::{diff_images, placeholder_diff, ExactMatch, PixelComparator};
use crate::driver::{ElementHandle, ScreenshotSource};
use crate::result::{check_threshold, VerifyError, VerifyResult};
use crate::retention::{cleanup_older_than, CleanupReport};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// How a comparison ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Outcome {
    /// Difference ratio within threshold
    Match,
    /// Same size, too many differing pixels
    PixelMismatch,
    /// Different sizes; pixels were not compared
    DimensionMismatch {
        /// Baseline width and height
        baseline: (u32, u32),
        /// Current width and height
        current: (u32, u32),
    },
}

/// Result of comparing a baseline with a current image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// How the comparison ended
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Fraction of differing pixels; 1.0 for a dimension mismatch
    pub diff_ratio: f64,
    /// Number of differing pixels (0 for a dimension mismatch)
    pub diff_pixels: u64,
    /// Number of compared pixels (0 for a dimension mismatch)
    pub total_pixels: u64,
    /// Threshold the ratio was held against
    pub threshold: f64,
    /// Diff image written for a failed comparison
    pub diff_path: Option<PathBuf>,
}

impl ComparisonReport {
    /// Whether the images match within threshold
    #[must_use]
    pub const fn matched(&self) -> bool {
        matches!(self.outcome, Outcome::Match)
    }

    /// Turn a failed comparison into an error
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::DimensionMismatch`] or
    /// [`VerifyError::VisualMismatch`] when the report did not match
    pub fn ensure_matched(&self) -> VerifyResult<()> {
        match self.outcome {
            Outcome::Match => Ok(()),
            Outcome::PixelMismatch => Err(VerifyError::VisualMismatch {
                ratio: self.diff_ratio,
                threshold: self.threshold,
            }),
            Outcome::DimensionMismatch { baseline, current } => {
                Err(VerifyError::DimensionMismatch { baseline, current })
            }
        }
    }
}

/// Compares live UI state with stored baselines
#[derive(Debug)]
pub struct VisualVerifier {
    capture: ScreenshotCapture,
    comparator: Box<dyn PixelComparator>,
}

impl Default for VisualVerifier {
    fn default() -> Self {
        Self::new(ArtifactConfig::default())
    }
}

impl VisualVerifier {
    /// Create a verifier with exact per-pixel equality
    #[must_use]
    pub fn new(config: ArtifactConfig) -> Self {
        Self::with_capture(ScreenshotCapture::new(config))
    }

    /// Create a verifier around an existing capture helper
    #[must_use]
    pub fn with_capture(capture: ScreenshotCapture) -> Self {
        Self {
            capture,
            comparator: Box::new(ExactMatch),
        }
    }

    /// Replace the per-pixel comparator
    #[must_use]
    pub fn with_comparator(mut self, comparator: impl PixelComparator + 'static) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ArtifactConfig {
        self.capture.config()
    }

    /// The capture helper used for baselines and verification shots
    #[must_use]
    pub const fn capture(&self) -> &ScreenshotCapture {
        &self.capture
    }

    /// Capture the viewport as a baseline for `test_name`
    pub fn create_baseline(
        &self,
        source: &dyn ScreenshotSource,
        test_name: &str,
    ) -> VerifyResult<ScreenshotArtifact> {
        self.capture
            .capture_viewport(source, test_name, Some(BASELINE_TAG))
    }

    /// Capture one element as a baseline
    pub fn create_element_baseline(
        &self,
        source: &dyn ScreenshotSource,
        element: &ElementHandle,
        test_name: &str,
        element_name: &str,
    ) -> VerifyResult<ScreenshotArtifact> {
        self.capture
            .capture_region(source, element, test_name, element_name)
    }

    /// Capture the viewport and compare it with `baseline`.
    ///
    /// `threshold` defaults to the configured value. Any failure (capture,
    /// decode, I/O, invalid threshold) is logged and reported as `false`.
    pub fn verify_against_baseline(
        &self,
        source: &dyn ScreenshotSource,
        test_name: &str,
        baseline: impl AsRef<Path>,
        threshold: Option<f64>,
    ) -> bool {
        soft(
            self.try_verify_against_baseline(source, test_name, baseline, threshold),
            test_name,
        )
    }

    /// Typed form of [`Self::verify_against_baseline`]
    pub fn try_verify_against_baseline(
        &self,
        source: &dyn ScreenshotSource,
        test_name: &str,
        baseline: impl AsRef<Path>,
        threshold: Option<f64>,
    ) -> VerifyResult<ComparisonReport> {
        let threshold = self.resolve_threshold(threshold)?;
        let current = self
            .capture
            .capture_viewport(source, test_name, Some(VERIFICATION_TAG))?;
        self.compare_files(baseline, &current.path, test_name, Some(threshold))
    }

    /// Capture one element and compare it with `baseline`; fail-soft
    pub fn verify_element_against_baseline(
        &self,
        source: &dyn ScreenshotSource,
        element: &ElementHandle,
        test_name: &str,
        element_name: &str,
        baseline: impl AsRef<Path>,
        threshold: Option<f64>,
    ) -> bool {
        soft(
            self.try_verify_element_against_baseline(
                source,
                element,
                test_name,
                element_name,
                baseline,
                threshold,
            ),
            test_name,
        )
    }

    /// Typed form of [`Self::verify_element_against_baseline`]
    pub fn try_verify_element_against_baseline(
        &self,
        source: &dyn ScreenshotSource,
        element: &ElementHandle,
        test_name: &str,
        element_name: &str,
        baseline: impl AsRef<Path>,
        threshold: Option<f64>,
    ) -> VerifyResult<ComparisonReport> {
        let threshold = self.resolve_threshold(threshold)?;
        let current = self
            .capture
            .capture_region(source, element, test_name, element_name)?;
        self.compare_files(
            baseline,
            &current.path,
            &format!("{test_name}_{element_name}"),
            Some(threshold),
        )
    }

    /// Compare two stored images. Diff images are named `{name}_diff_{timestamp}.png`.
    ///
    /// # Errors
    ///
    /// Returns error if either image cannot be decoded, the threshold is out
    /// of range, or the diff image cannot be written
    pub fn compare_files(
        &self,
        baseline: impl AsRef<Path>,
        current: impl AsRef<Path>,
        name: &str,
        threshold: Option<f64>,
    ) -> VerifyResult<ComparisonReport> {
        let threshold = self.resolve_threshold(threshold)?;
        let expected = load_image(baseline.as_ref())?;
        let actual = load_image(current.as_ref())?;
        self.compare_images(&expected, &actual, name, threshold)
    }

    /// Compare two decoded images, writing a diff image on failure
    ///
    /// # Errors
    ///
    /// Returns error if the threshold is out of range or the diff image
    /// cannot be written
    pub fn compare_images(
        &self,
        baseline: &DynamicImage,
        current: &DynamicImage,
        name: &str,
        threshold: f64,
    ) -> VerifyResult<ComparisonReport> {
        let threshold = check_threshold(threshold)?;
        let expected_dims = baseline.dimensions();
        let actual_dims = current.dimensions();

        let Some(diff) = diff_images(baseline, current, self.comparator.as_ref()) else {
            warn!(
                name,
                expected_width = expected_dims.0,
                expected_height = expected_dims.1,
                actual_width = actual_dims.0,
                actual_height = actual_dims.1,
                "images have different dimensions"
            );
            let diff_path =
                self.write_diff(&placeholder_diff(expected_dims, actual_dims), name)?;
            return Ok(ComparisonReport {
                outcome: Outcome::DimensionMismatch {
                    baseline: expected_dims,
                    current: actual_dims,
                },
                diff_ratio: 1.0,
                diff_pixels: 0,
                total_pixels: 0,
                threshold,
                diff_path: Some(diff_path),
            });
        };

        let ratio = diff.ratio();
        if diff.exceeds(threshold) {
            let diff_path = self.write_diff(&diff.highlight, name)?;
            info!(
                name,
                difference = %format!("{:.2}%", ratio * 100.0),
                threshold = %format!("{:.2}%", threshold * 100.0),
                diff = %diff_path.display(),
                "images differ beyond threshold"
            );
            return Ok(ComparisonReport {
                outcome: Outcome::PixelMismatch,
                diff_ratio: ratio,
                diff_pixels: diff.diff_pixels,
                total_pixels: diff.total_pixels,
                threshold,
                diff_path: Some(diff_path),
            });
        }

        info!(
            name,
            difference = %format!("{:.2}%", ratio * 100.0),
            "images match within threshold"
        );
        Ok(ComparisonReport {
            outcome: Outcome::Match,
            diff_ratio: ratio,
            diff_pixels: diff.diff_pixels,
            total_pixels: diff.total_pixels,
            threshold,
            diff_path: None,
        })
    }

    /// Delete diff images older than `days_to_keep` days
    pub fn cleanup_comparisons(&self, days_to_keep: u64) -> CleanupReport {
        cleanup_older_than(&self.config().comparison_dir, days_to_keep)
    }

    fn resolve_threshold(&self, threshold: Option<f64>) -> VerifyResult<f64> {
        check_threshold(threshold.unwrap_or(self.config().default_threshold))
    }

    fn write_diff(&self, image: &RgbImage, name: &str) -> VerifyResult<PathBuf> {
        let config = self.config();
        let timestamp =
            sanitize_component(&format_timestamp(&self.capture.now(), &config.timestamp_format)?);
        let stem = format!("{}_diff_{timestamp}", sanitize_component(name));
        fs::create_dir_all(&config.comparison_dir)?;
        let path = reserve_path(&config.comparison_dir, &stem, config.collision);
        image.save_with_format(&path, ImageFormat::Png)?;
        Ok(path)
    }
}

/// Read and decode an image file
fn load_image(path: &Path) -> VerifyResult<DynamicImage> {
    image::open(path).map_err(|e| VerifyError::decode(path, e.to_string()))
}

fn soft(result: VerifyResult<ComparisonReport>, test_name: &str) -> bool {
    match result {
        Ok(report) => report.matched(),
        Err(e) => {
            warn!(test = test_name, error = %e, kind = ?e.kind(), "visual verification failed");
            false
        }
    }
}
