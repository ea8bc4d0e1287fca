//! Cleanup command handler

use crate::commands::CleanupArgs;
use crate::config::CliConfig;
use crate::output::Reporter;
use snapverify::{cleanup_older_than, CleanupReport};
use std::path::Path;

/// Execute the cleanup command, returning one report per cleaned directory
pub fn execute_cleanup(config: &CliConfig, args: &CleanupArgs) -> Vec<(String, CleanupReport)> {
    let reporter = Reporter::for_config(config);
    let mut targets: Vec<&Path> = vec![&config.artifacts.screenshot_dir];
    if args.comparisons {
        targets.push(&config.artifacts.comparison_dir);
    }

    targets
        .into_iter()
        .map(|dir| {
            let report = cleanup_older_than(dir, args.days);
            let label = dir.display().to_string();
            print_report(&reporter, &label, &report);
            (label, report)
        })
        .collect()
}

fn print_report(reporter: &Reporter, dir: &str, report: &CleanupReport) {
    reporter.info(&format!(
        "{dir}: deleted {}, kept {}",
        report.deleted_count(),
        report.retained
    ));
    for path in &report.deleted {
        reporter.verbose_detail("deleted", &path.display().to_string());
    }
    if !report.skipped.is_empty() {
        reporter.failure(&format!(
            "{dir}: {} file(s) could not be removed",
            report.skipped.len()
        ));
    }
}
