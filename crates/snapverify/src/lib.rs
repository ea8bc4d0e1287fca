//! Snapverify: screenshot artifacts and baseline visual verification for
//! browser UI tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ScreenshotSource ──► ScreenshotCapture ──► screenshot_dir   │
//! │  (mock / chromium)          │                                │
//! │                             ▼                                │
//! │                      VisualVerifier ──► comparison_dir       │
//! │                    (PixelComparator)     (diff images)       │
//! │                                                              │
//! │  tabular::{csv, sheet} ──► DataRow ──► tabular::params       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Artifacts are named `{test}_{tag}_{timestamp}.png`. Old artifacts are
//! removed with [`cleanup_older_than`] or the per-component `cleanup`
//! helpers. [`SuiteListener`] and [`FailureGuard`] take failure screenshots
//! and prune the screenshot directory at the end of a suite.

#![warn(missing_docs)]

#[cfg(feature = "browser")]
mod browser;
mod capture;
mod config;
mod diff;
mod driver;
mod listener;
mod result;
mod retention;
mod verify;

/// CSV and spreadsheet readers for data-driven tests
pub mod tabular;

#[cfg(feature = "browser")]
pub use browser::{ChromiumConfig, ChromiumSource};
pub use capture::{
    sanitize_component, Clock, ScreenshotArtifact, ScreenshotCapture, BASELINE_TAG,
    VERIFICATION_TAG,
};
pub use config::{
    ArtifactConfig, CollisionPolicy, DEFAULT_COMPARISON_DIR, DEFAULT_RETENTION_DAYS,
    DEFAULT_SCREENSHOT_DIR, DEFAULT_THRESHOLD, DEFAULT_TIMESTAMP_FORMAT,
};
pub use diff::{
    channel_distance, diff_images, placeholder_diff, ColorTolerance, ExactMatch, ImageDiff,
    PixelComparator, HIGHLIGHT,
};
pub use driver::{BoundingBox, ElementHandle, MockSource, ScreenshotSource};
pub use listener::{
    FailureGuard, SuiteListener, SuiteSummary, TestStatus, FAILURE_TAG, PARTIAL_FAILURE_TAG,
};
pub use result::{ErrorKind, VerifyError, VerifyResult};
pub use retention::{cleanup_older_than, cleanup_older_than_at, CleanupReport};
pub use tabular::csv::{parse_csv, read_csv, CsvOptions, QuoteMode};
pub use tabular::params::{projected_parameters, row_parameters, DataSource, RowParameters};
pub use tabular::sheet::{cell_to_string, read_sheet};
pub use tabular::DataRow;
pub use verify::{ComparisonReport, Outcome, VisualVerifier};

/// Common imports for tests
pub mod prelude {
    pub use super::{
        ArtifactConfig, CollisionPolicy, ComparisonReport, CsvOptions, DataRow, DataSource,
        ElementHandle, ErrorKind, FailureGuard, MockSource, Outcome, ScreenshotArtifact,
        ScreenshotCapture, ScreenshotSource, SuiteListener, TestStatus, VerifyError, VerifyResult,
        VisualVerifier,
    };
    #[cfg(feature = "browser")]
    pub use super::{ChromiumConfig, ChromiumSource};
}
