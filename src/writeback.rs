//! Writing optimized content back to disk
//!
//! Two modes: copy results into a separate output directory, or overwrite
//! the originals with a mandatory backup first. The backup is a hard
//! precondition for overwrite; a file whose backup cannot be verified is
//! never touched.

use crate::fmt::format_timestamp;
use crate::infra::FileSystem;
use crate::model::FileResult;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Prefix for files written into a separate output directory
pub const OPTIMIZED_PREFIX: &str = "optimized_";

/// Write-back failures that abort the whole operation
#[derive(Debug, Error)]
pub enum WriteBackError {
    /// The target directory could not be created
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Per-file outcome of an overwrite pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Backup verified and original replaced
    Overwritten,
    /// Backup could not be made; the original was left untouched
    BackupFailed(String),
    /// Backup succeeded but the overwrite itself failed
    OverwriteFailed(String),
}

impl WriteOutcome {
    /// Whether this outcome represents a completed overwrite
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Overwritten)
    }
}

/// Accumulated outcomes of an overwrite pass
#[derive(Debug, Default)]
pub struct WriteBackReport {
    /// Per-file outcomes, in batch order
    pub outcomes: Vec<(PathBuf, WriteOutcome)>,
    /// Backup directory used for this pass
    pub backup_dir: Option<PathBuf>,
}

impl WriteBackReport {
    /// Number of files successfully overwritten
    pub fn overwritten(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    /// Number of files that failed at either stage
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.overwritten()
    }
}

/// Writes optimized content to disk, with backups for in-place mode
pub struct WriteBackManager<FS: FileSystem> {
    fs: FS,
}

impl<FS: FileSystem> WriteBackManager<FS> {
    /// Create a manager over the given filesystem
    pub fn new(fs: FS) -> Self {
        Self { fs }
    }

    /// Write each optimized file into `out_dir` as `optimized_<basename>`.
    ///
    /// Originals are never touched. Failed results and results without
    /// optimizations are skipped. Running twice over the same results
    /// produces the same tree. Inputs sharing a basename collapse into one
    /// output, with the later result winning; the collision is logged.
    pub fn save_to_directory(
        &self,
        results: &[FileResult],
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, WriteBackError> {
        self.fs
            .create_dir_all(out_dir)
            .map_err(|source| WriteBackError::CreateDir {
                path: out_dir.to_path_buf(),
                source,
            })?;

        let mut written: Vec<PathBuf> = Vec::new();
        for result in results.iter().filter(|r| Self::eligible(r)) {
            let target = out_dir.join(format!("{}{}", OPTIMIZED_PREFIX, result.file_name()));
            if written.contains(&target) {
                // Output names flatten to the basename, so inputs sharing a
                // basename collide and the later result wins.
                log::warn!(
                    "{} collides with an earlier result, overwriting",
                    target.display()
                );
            }
            match self.fs.write(&target, result.optimized.as_bytes()) {
                Ok(()) => {
                    log::debug!("wrote {}", target.display());
                    written.push(target);
                }
                Err(e) => {
                    log::warn!("failed to write {}: {}", target.display(), e);
                }
            }
        }
        Ok(written)
    }

    /// Overwrite each optimized file in place, backing it up first.
    ///
    /// Per file: the original is copied to `backup_dir/<basename>` and only
    /// after that copy succeeds is the original replaced. A basename
    /// collision in the backup directory counts as a backup failure, so a
    /// prior backup is never silently clobbered. One file's failure never
    /// stops the rest.
    pub fn overwrite_in_place(
        &self,
        results: &[FileResult],
        backup_dir: &Path,
    ) -> Result<WriteBackReport, WriteBackError> {
        self.fs
            .create_dir_all(backup_dir)
            .map_err(|source| WriteBackError::CreateDir {
                path: backup_dir.to_path_buf(),
                source,
            })?;

        let mut report = WriteBackReport {
            backup_dir: Some(backup_dir.to_path_buf()),
            ..WriteBackReport::default()
        };

        for result in results.iter().filter(|r| Self::eligible(r)) {
            let backup = backup_dir.join(result.file_name());

            let outcome = if self.fs.exists(&backup) {
                log::warn!("backup target {} already exists, skipping", backup.display());
                WriteOutcome::BackupFailed(format!(
                    "backup target {} already exists",
                    backup.display()
                ))
            } else {
                match self.fs.copy(&result.path, &backup) {
                    Err(e) => {
                        log::warn!("backup failed for {}: {}", result.path.display(), e);
                        WriteOutcome::BackupFailed(e.to_string())
                    }
                    Ok(_) => match self.fs.write(&result.path, result.optimized.as_bytes()) {
                        Ok(()) => {
                            log::debug!("overwrote {}", result.path.display());
                            WriteOutcome::Overwritten
                        }
                        Err(e) => {
                            log::warn!("overwrite failed for {}: {}", result.path.display(), e);
                            WriteOutcome::OverwriteFailed(e.to_string())
                        }
                    },
                }
            };

            report.outcomes.push((result.path.clone(), outcome));
        }
        Ok(report)
    }

    fn eligible(result: &FileResult) -> bool {
        result.success && result.has_optimizations()
    }
}

/// Default backup directory: `backup_<YYYYMMDD_HHMMSS>` beside the root
pub fn default_backup_dir(root: &Path) -> PathBuf {
    let name = format!("backup_{}", format_timestamp(SystemTime::now()));
    match root.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from(name),
        Some(parent) => parent.join(name),
        None => root.join(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::RealFileSystem;
    use crate::model::{FileRecord, MemorySnapshot, Severity, Suggestion};
    use tempfile::TempDir;

    /// Delegates to the real filesystem except that writes to one
    /// designated path fail.
    struct WriteFailingFs {
        fail_on: PathBuf,
    }

    impl FileSystem for WriteFailingFs {
        fn copy(&self, from: &Path, to: &Path) -> std::io::Result<u64> {
            RealFileSystem.copy(from, to)
        }

        fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
            RealFileSystem.create_dir_all(path)
        }

        fn exists(&self, path: &Path) -> bool {
            RealFileSystem.exists(path)
        }

        fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
            RealFileSystem.read_to_string(path)
        }

        fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> std::io::Result<()> {
            if path == self.fail_on {
                return Err(std::io::Error::other("disk full"));
            }
            RealFileSystem.write(path, contents)
        }
    }

    fn optimized_result(path: &Path, original: &str, optimized: &str) -> FileResult {
        let file = FileRecord::new(path, original);
        let mut r = FileResult::failed(&file, MemorySnapshot::zero(), String::new());
        r.success = true;
        r.error = None;
        r.optimized = optimized.to_string();
        r.suggestions = vec![Suggestion {
            category: "String Concatenation".to_string(),
            description: "use a builder".to_string(),
            location: None,
            severity: Severity::Medium,
            before: None,
            after: None,
        }];
        r
    }

    #[test]
    fn test_save_to_directory_prefixes_and_preserves_originals() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("program.cs");
        std::fs::write(&src, "original").unwrap();

        let out = temp.path().join("out");
        let manager = WriteBackManager::new(RealFileSystem);
        let results = vec![optimized_result(&src, "original", "better")];
        let written = manager.save_to_directory(&results, &out).unwrap();

        assert_eq!(written, vec![out.join("optimized_program.cs")]);
        assert_eq!(
            std::fs::read_to_string(out.join("optimized_program.cs")).unwrap(),
            "better"
        );
        assert_eq!(std::fs::read_to_string(&src).unwrap(), "original");
    }

    #[test]
    fn test_save_to_directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.cs");
        std::fs::write(&src, "x").unwrap();
        let out = temp.path().join("out");
        let manager = WriteBackManager::new(RealFileSystem);
        let results = vec![optimized_result(&src, "x", "y")];

        let first = manager.save_to_directory(&results, &out).unwrap();
        let second = manager.save_to_directory(&results, &out).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            std::fs::read_to_string(out.join("optimized_a.cs")).unwrap(),
            "y"
        );
    }

    #[test]
    fn test_save_skips_failed_and_unoptimized_results() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let manager = WriteBackManager::new(RealFileSystem);

        let file = FileRecord::new(temp.path().join("f.cs"), "x");
        let failed = FileResult::failed(&file, MemorySnapshot::zero(), "boom".to_string());
        let mut clean = FileResult::failed(&file, MemorySnapshot::zero(), String::new());
        clean.success = true;
        clean.error = None;

        let written = manager.save_to_directory(&[failed, clean], &out).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_save_warns_but_writes_on_duplicate_basenames() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("a").join("program.cs");
        let second = temp.path().join("b").join("program.cs");
        std::fs::create_dir_all(first.parent().unwrap()).unwrap();
        std::fs::create_dir_all(second.parent().unwrap()).unwrap();
        std::fs::write(&first, "one").unwrap();
        std::fs::write(&second, "two").unwrap();

        let out = temp.path().join("out");
        let manager = WriteBackManager::new(RealFileSystem);
        let results = vec![
            optimized_result(&first, "one", "optimized one"),
            optimized_result(&second, "two", "optimized two"),
        ];
        let written = manager.save_to_directory(&results, &out).unwrap();

        // Both writes happen against the same flattened name; the later
        // result is what survives on disk.
        let target = out.join("optimized_program.cs");
        assert_eq!(written, vec![target.clone(), target.clone()]);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "optimized two");
    }

    #[test]
    fn test_failed_overwrite_is_reported_and_keeps_the_backup() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("program.cs");
        std::fs::write(&src, "original").unwrap();
        let backup_dir = temp.path().join("backup");

        let manager = WriteBackManager::new(WriteFailingFs {
            fail_on: src.clone(),
        });
        let results = vec![optimized_result(&src, "original", "better")];
        let report = manager.overwrite_in_place(&results, &backup_dir).unwrap();

        assert_eq!(report.overwritten(), 0);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.outcomes[0].1,
            WriteOutcome::OverwriteFailed(_)
        ));
        // The backup was taken before the overwrite attempt and survives it,
        // and the original still holds its old content.
        assert_eq!(
            std::fs::read_to_string(backup_dir.join("program.cs")).unwrap(),
            "original"
        );
        assert_eq!(std::fs::read_to_string(&src).unwrap(), "original");
    }

    #[test]
    fn test_overwrite_backs_up_before_mutating() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("program.cs");
        std::fs::write(&src, "original").unwrap();
        let backup_dir = temp.path().join("backup");

        let manager = WriteBackManager::new(RealFileSystem);
        let results = vec![optimized_result(&src, "original", "better")];
        let report = manager.overwrite_in_place(&results, &backup_dir).unwrap();

        assert_eq!(report.overwritten(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(
            std::fs::read_to_string(backup_dir.join("program.cs")).unwrap(),
            "original"
        );
        assert_eq!(std::fs::read_to_string(&src).unwrap(), "better");
    }

    #[test]
    fn test_backup_collision_leaves_original_untouched() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("program.cs");
        std::fs::write(&src, "original").unwrap();
        let backup_dir = temp.path().join("backup");
        std::fs::create_dir_all(&backup_dir).unwrap();
        std::fs::write(backup_dir.join("program.cs"), "previous backup").unwrap();

        let manager = WriteBackManager::new(RealFileSystem);
        let results = vec![optimized_result(&src, "original", "better")];
        let report = manager.overwrite_in_place(&results, &backup_dir).unwrap();

        assert_eq!(report.overwritten(), 0);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.outcomes[0].1,
            WriteOutcome::BackupFailed(_)
        ));
        assert_eq!(std::fs::read_to_string(&src).unwrap(), "original");
        assert_eq!(
            std::fs::read_to_string(backup_dir.join("program.cs")).unwrap(),
            "previous backup"
        );
    }

    #[test]
    fn test_missing_source_counts_as_backup_failure() {
        let temp = TempDir::new().unwrap();
        let ghost = temp.path().join("ghost.cs");
        let backup_dir = temp.path().join("backup");

        let manager = WriteBackManager::new(RealFileSystem);
        let results = vec![optimized_result(&ghost, "x", "y")];
        let report = manager.overwrite_in_place(&results, &backup_dir).unwrap();

        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.outcomes[0].1,
            WriteOutcome::BackupFailed(_)
        ));
    }

    #[test]
    fn test_one_failure_does_not_stop_the_rest() {
        let temp = TempDir::new().unwrap();
        let ghost = temp.path().join("ghost.cs");
        let real = temp.path().join("real.cs");
        std::fs::write(&real, "original").unwrap();
        let backup_dir = temp.path().join("backup");

        let manager = WriteBackManager::new(RealFileSystem);
        let results = vec![
            optimized_result(&ghost, "x", "y"),
            optimized_result(&real, "original", "better"),
        ];
        let report = manager.overwrite_in_place(&results, &backup_dir).unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.overwritten(), 1);
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "better");
    }

    #[test]
    fn test_default_backup_dir_sits_beside_root() {
        let dir = default_backup_dir(Path::new("/work/project"));
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("backup_"));
        assert_eq!(dir.parent().unwrap(), Path::new("/work"));
    }

    #[test]
    fn test_default_backup_dir_for_bare_relative_root() {
        let dir = default_backup_dir(Path::new("project"));
        assert!(dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("backup_"));
        assert!(dir.parent().unwrap().as_os_str().is_empty());
    }
}
