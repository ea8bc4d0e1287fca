//! Age-based cleanup of artifact directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// What a cleanup pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Files that were removed
    pub deleted: Vec<PathBuf>,
    /// Files older than the cutoff that could not be inspected or removed
    pub skipped: Vec<PathBuf>,
    /// Files kept because they are recent enough
    pub retained: usize,
}

impl CleanupReport {
    /// Number of deleted files
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Whether nothing was deleted or skipped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.skipped.is_empty()
    }
}

/// Delete regular files in `dir` last modified more than `days_to_keep` days ago.
///
/// Non-recursive. A missing or non-directory `dir` is a no-op. Individual
/// failures are logged and recorded in [`CleanupReport::skipped`].
pub fn cleanup_older_than(dir: impl AsRef<Path>, days_to_keep: u64) -> CleanupReport {
    cleanup_older_than_at(dir, days_to_keep, SystemTime::now())
}

/// [`cleanup_older_than`] with an explicit "now"
pub fn cleanup_older_than_at(
    dir: impl AsRef<Path>,
    days_to_keep: u64,
    now: SystemTime,
) -> CleanupReport {
    let dir = dir.as_ref();
    let mut report = CleanupReport::default();

    if !dir.is_dir() {
        debug!(dir = %dir.display(), "cleanup target is not a directory, nothing to do");
        return report;
    }

    let keep = Duration::from_secs(days_to_keep.saturating_mul(SECONDS_PER_DAY));
    let cutoff = now.checked_sub(keep).unwrap_or(SystemTime::UNIX_EPOCH);

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list artifact directory");
            return report;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "cannot read metadata");
                report.skipped.push(path);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "no modification time");
                report.skipped.push(path);
                continue;
            }
        };

        if modified < cutoff {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!(file = %path.display(), "deleted old artifact");
                    report.deleted.push(path);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to delete old artifact");
                    report.skipped.push(path);
                }
            }
        } else {
            report.retained += 1;
        }
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs::File;

    const DAY: Duration = Duration::from_secs(SECONDS_PER_DAY);

    fn touch(dir: &Path, name: &str, modified: SystemTime) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(modified).unwrap();
        path
    }

    #[test]
    fn test_deletes_only_older_files() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        let old = touch(dir.path(), "old.png", now - DAY * 10);
        let edge = touch(dir.path(), "edge.png", now - DAY * 7 + Duration::from_secs(60));
        let fresh = touch(dir.path(), "fresh.png", now - DAY);

        let report = cleanup_older_than_at(dir.path(), 7, now);

        assert_eq!(report.deleted, vec![old.clone()]);
        assert_eq!(report.retained, 2);
        assert!(report.skipped.is_empty());
        assert!(!old.exists());
        assert!(edge.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn test_cutoff_is_strict() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::UNIX_EPOCH + DAY * 100;
        let exact = touch(dir.path(), "exact.png", now - DAY * 3);

        let report = cleanup_older_than_at(dir.path(), 3, now);
        assert_eq!(report.deleted_count(), 0);
        assert!(exact.exists());
    }

    #[test]
    fn test_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let inner = touch(&nested, "inner.png", now - DAY * 30);

        let report = cleanup_older_than_at(dir.path(), 1, now);
        assert!(report.is_empty());
        assert!(inner.exists());
        assert!(nested.exists());
    }

    #[test]
    fn test_zero_days_deletes_everything_older_than_now() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        touch(dir.path(), "a.png", now - Duration::from_secs(5));
        touch(dir.path(), "b.png", now - Duration::from_secs(10));

        let report = cleanup_older_than_at(dir.path(), 0, now);
        assert_eq!(report.deleted_count(), 2);
    }

    #[test]
    fn test_missing_directory_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let report = cleanup_older_than(dir.path().join("absent"), 1);
        assert!(report.is_empty());
        assert_eq!(report.retained, 0);
    }

    #[test]
    fn test_file_target_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let file = touch(dir.path(), "plain.png", SystemTime::UNIX_EPOCH + DAY);
        let report = cleanup_older_than(&file, 0);
        assert!(report.is_empty());
        assert!(file.exists());
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let report = cleanup_older_than(dir.path(), 1);
        assert_eq!(report, CleanupReport::default());
    }

    #[test]
    fn test_huge_retention_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let kept = touch(dir.path(), "kept.png", SystemTime::UNIX_EPOCH + DAY);
        let report = cleanup_older_than(dir.path(), u64::MAX);
        assert_eq!(report.deleted_count(), 0);
        assert!(kept.exists());
    }
}
