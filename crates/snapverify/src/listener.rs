//! Test lifecycle hooks.
//!
//! [`SuiteListener`] records how each test ended, captures the viewport for
//! failed tests and prunes old screenshots when the suite finishes.
//! [`FailureGuard`] covers plain `#[test]` functions: it captures on drop
//! while the thread is unwinding from a panic.

use crate::capture::{ScreenshotArtifact, ScreenshotCapture};
use crate::config::DEFAULT_RETENTION_DAYS;
use crate::driver::ScreenshotSource;
use crate::retention::CleanupReport;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Reason tag for a failed test
pub const FAILURE_TAG: &str = "failure";

/// Reason tag for a failure still inside the allowed success percentage
pub const PARTIAL_FAILURE_TAG: &str = "failedWithinSuccessPercentage";

/// How a test ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test failed, but the suite tolerates this many failures
    FailedWithinSuccessPercentage,
    /// Test was skipped
    Skipped,
}

impl TestStatus {
    /// Reason tag for the screenshot taken on this status, if any
    #[must_use]
    pub const fn capture_tag(self) -> Option<&'static str> {
        match self {
            Self::Failed => Some(FAILURE_TAG),
            Self::FailedWithinSuccessPercentage => Some(PARTIAL_FAILURE_TAG),
            Self::Passed | Self::Skipped => None,
        }
    }

    /// Check if status is a failure of either kind
    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed | Self::FailedWithinSuccessPercentage)
    }
}

/// Per-status test counts for a suite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    /// Passed tests
    pub passed: usize,
    /// Failed tests
    pub failed: usize,
    /// Failures inside the success percentage
    pub failed_within_percentage: usize,
    /// Skipped tests
    pub skipped: usize,
}

impl SuiteSummary {
    /// Tests recorded so far
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.failed_within_percentage + self.skipped
    }

    fn record(&mut self, status: TestStatus) {
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::FailedWithinSuccessPercentage => self.failed_within_percentage += 1,
            TestStatus::Skipped => self.skipped += 1,
        }
    }
}

/// Suite-level hook: failure screenshots plus retention on teardown
#[derive(Debug)]
pub struct SuiteListener {
    name: String,
    capture: ScreenshotCapture,
    retention_days: u64,
    summary: SuiteSummary,
}

impl SuiteListener {
    /// Start a suite
    #[must_use]
    pub fn new(name: impl Into<String>, capture: ScreenshotCapture) -> Self {
        let name = name.into();
        info!(suite = %name, "starting test suite");
        Self {
            name,
            capture,
            retention_days: DEFAULT_RETENTION_DAYS,
            summary: SuiteSummary::default(),
        }
    }

    /// Keep screenshots for `days` instead of [`DEFAULT_RETENTION_DAYS`]
    #[must_use]
    pub const fn with_retention_days(mut self, days: u64) -> Self {
        self.retention_days = days;
        self
    }

    /// Counts recorded so far
    #[must_use]
    pub const fn summary(&self) -> &SuiteSummary {
        &self.summary
    }

    /// Record a finished test.
    ///
    /// Failed tests get a viewport screenshot tagged with
    /// [`TestStatus::capture_tag`]. A failed capture is logged and yields
    /// `None`; it never changes the recorded status.
    pub fn on_test_finish(
        &mut self,
        source: &dyn ScreenshotSource,
        test_name: &str,
        status: TestStatus,
    ) -> Option<ScreenshotArtifact> {
        self.summary.record(status);
        info!(suite = %self.name, test = test_name, status = ?status, "test finished");
        let tag = status.capture_tag()?;
        self.capture.capture_viewport(source, test_name, Some(tag)).ok()
    }

    /// Finish the suite and delete screenshots past the retention window
    pub fn finish(self) -> (SuiteSummary, CleanupReport) {
        let s = self.summary;
        info!(
            suite = %self.name,
            total = s.total(),
            passed = s.passed,
            failed = s.failed + s.failed_within_percentage,
            skipped = s.skipped,
            "finished test suite"
        );
        let report = self.capture.cleanup(self.retention_days);
        if !report.skipped.is_empty() {
            warn!(suite = %self.name, skipped = report.skipped.len(), "some screenshots were not removed");
        }
        (s, report)
    }
}

/// Captures a `failure` screenshot if dropped during a panic.
///
/// ```no_run
/// # use snapverify::{FailureGuard, MockSource, ScreenshotCapture};
/// # fn run(capture: &ScreenshotCapture, page: &MockSource) {
/// let _guard = FailureGuard::new(capture, page, "checkout_total");
/// assert_eq!(1 + 1, 2);
/// # }
/// ```
pub struct FailureGuard<'a> {
    capture: &'a ScreenshotCapture,
    source: &'a dyn ScreenshotSource,
    test_name: String,
}

impl<'a> FailureGuard<'a> {
    /// Guard the rest of the current scope
    #[must_use]
    pub fn new(
        capture: &'a ScreenshotCapture,
        source: &'a dyn ScreenshotSource,
        test_name: impl Into<String>,
    ) -> Self {
        Self {
            capture,
            source,
            test_name: test_name.into(),
        }
    }
}

impl Drop for FailureGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            // Already logged by capture_viewport
            let _ = self
                .capture
                .capture_viewport(self.source, &self.test_name, Some(FAILURE_TAG));
        }
    }
}

impl std::fmt::Debug for FailureGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureGuard")
            .field("test_name", &self.test_name)
            .finish_non_exhaustive()
    }
}
