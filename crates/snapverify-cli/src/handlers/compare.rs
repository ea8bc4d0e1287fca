//! Compare command handler

use crate::commands::CompareArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{percent, Reporter};
use snapverify::{ColorTolerance, ComparisonReport, Outcome, VisualVerifier};
use std::path::Path;

/// Largest meaningful summed RGB difference
const MAX_TOLERANCE: u32 = 255 * 3;

/// Build the verifier for the requested tolerance
pub fn build_verifier(config: &CliConfig, tolerance: u32) -> CliResult<VisualVerifier> {
    if tolerance > MAX_TOLERANCE {
        return Err(CliError::invalid_argument(format!(
            "tolerance {tolerance} exceeds {MAX_TOLERANCE}"
        )));
    }
    let verifier = VisualVerifier::new(config.artifacts.clone());
    Ok(if tolerance == 0 {
        verifier
    } else {
        verifier.with_comparator(ColorTolerance::new(tolerance))
    })
}

/// Name used for the diff image when `--name` is absent
#[must_use]
pub fn default_name(current: &Path) -> String {
    current
        .file_stem()
        .map_or_else(|| "comparison".to_string(), |s| s.to_string_lossy().into_owned())
}

/// Execute the compare command
///
/// Returns the report; the caller decides the exit status from it.
pub fn execute_compare(config: &CliConfig, args: &CompareArgs) -> CliResult<ComparisonReport> {
    let verifier = build_verifier(config, args.tolerance)?;
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| default_name(&args.current));
    let report = verifier.compare_files(&args.baseline, &args.current, &name, args.threshold)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let reporter = Reporter::for_config(config);
        reporter.verbose_detail("baseline", &args.baseline.display().to_string());
        reporter.verbose_detail("current", &args.current.display().to_string());
        print_report(&reporter, &report);
    }
    Ok(report)
}

fn print_report(reporter: &Reporter, report: &ComparisonReport) {
    match report.outcome {
        Outcome::Match => reporter.success(&format!(
            "images match ({} differ, threshold {})",
            percent(report.diff_ratio),
            percent(report.threshold)
        )),
        Outcome::PixelMismatch => reporter.failure(&format!(
            "images differ by {} ({} of {} pixels), threshold {}",
            percent(report.diff_ratio),
            report.diff_pixels,
            report.total_pixels,
            percent(report.threshold)
        )),
        Outcome::DimensionMismatch { baseline, current } => reporter.failure(&format!(
            "dimensions differ: baseline {}x{}, current {}x{}",
            baseline.0, baseline.1, current.0, current.1
        )),
    }
    if let Some(ref path) = report.diff_path {
        reporter.detail("diff", &path.display().to_string());
    }
}

/// Turn a finished comparison into the command result
pub fn require_match(report: &ComparisonReport) -> CliResult<()> {
    if report.matched() {
        Ok(())
    } else {
        Err(CliError::Mismatch)
    }
}
