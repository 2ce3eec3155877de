//! Source tree discovery and prioritization
//!
//! The orchestrator consumes only the [`FileSource`] contract: `scan`
//! enumerates candidate files and `prioritize` stably reorders the same
//! element set. [`DirectoryScanner`] is the stock implementation; its
//! ordering heuristic is deliberately simple and replaceable.

use crate::model::FileRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors that can occur during discovery
#[derive(Error, Debug)]
pub enum ScanError {
    /// Root path missing or not a directory
    #[error("root path not found or not a directory: {root}")]
    RootNotFound {
        /// The offending root path
        root: PathBuf,
    },
}

/// Discovery/prioritization collaborator contract.
///
/// `prioritize` must be a stable reordering of the same element set.
pub trait FileSource {
    /// Enumerate candidate files under the root
    fn scan(&self, root: &Path) -> Result<Vec<FileRecord>, ScanError>;

    /// Stably reorder the candidates by estimated optimization potential
    fn prioritize(&self, files: Vec<FileRecord>) -> Vec<FileRecord>;
}

/// Filesystem-backed discovery: walks a tree, keeps files with configured
/// extensions, skips build/VCS directories and oversized files.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    extensions: Vec<String>,
    skip_dirs: Vec<String>,
    max_file_bytes: u64,
}

impl DirectoryScanner {
    /// Create a scanner with explicit filters
    pub fn new(extensions: Vec<String>, skip_dirs: Vec<String>, max_file_bytes: u64) -> Self {
        Self {
            extensions,
            skip_dirs,
            max_file_bytes,
        }
    }

    fn wanted_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|want| want == ext))
            .unwrap_or(false)
    }

    fn skipped_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|skip| skip == name)
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new(
            vec!["cs".to_string()],
            vec![
                "target".to_string(),
                "bin".to_string(),
                "obj".to_string(),
                ".git".to_string(),
                "node_modules".to_string(),
            ],
            512 * 1024,
        )
    }
}

impl FileSource for DirectoryScanner {
    fn scan(&self, root: &Path) -> Result<Vec<FileRecord>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound {
                root: root.to_path_buf(),
            });
        }

        let mut records = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.file_type().is_dir() {
                    let name = entry.file_name().to_string_lossy();
                    !self.skipped_dir(&name)
                } else {
                    true
                }
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // An unreadable subtree degrades discovery, it does not
                    // abort it. Only a bad root is fatal.
                    log::warn!("skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.wanted_extension(entry.path()) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() > self.max_file_bytes => {
                    log::debug!(
                        "skipping {} ({} bytes over cap)",
                        entry.path().display(),
                        meta.len()
                    );
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            }

            match std::fs::read_to_string(entry.path()) {
                Ok(content) => records.push(FileRecord::new(entry.path(), content)),
                Err(e) => {
                    // Binary or unreadable files are skipped, not fatal.
                    log::warn!("skipping {}: {}", entry.path().display(), e);
                }
            }
        }

        log::info!("discovered {} candidate files under {}", records.len(), root.display());
        Ok(records)
    }

    fn prioritize(&self, mut files: Vec<FileRecord>) -> Vec<FileRecord> {
        // Longer files expose more optimization surface. Stable sort keeps
        // scan order for equal lengths.
        files.sort_by(|a, b| b.content.len().cmp(&a.content.len()));
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> DirectoryScanner {
        DirectoryScanner::default()
    }

    #[test]
    fn test_scan_missing_root_returns_root_not_found() {
        let err = scanner().scan(Path::new("/no/such/dir")).unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.cs"), "class A {}").unwrap();
        fs::write(temp.path().join("b.txt"), "not code").unwrap();

        let files = scanner().scan(temp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("a.cs"));
        assert_eq!(files[0].language, "csharp");
    }

    #[test]
    fn test_scan_skips_configured_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("obj")).unwrap();
        fs::write(temp.path().join("obj").join("gen.cs"), "generated").unwrap();
        fs::write(temp.path().join("real.cs"), "class R {}").unwrap();

        let files = scanner().scan(temp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("real.cs"));
    }

    #[test]
    fn test_scan_skips_oversized_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.cs"), "x".repeat(64)).unwrap();
        fs::write(temp.path().join("small.cs"), "y").unwrap();

        let small_cap = DirectoryScanner::new(vec!["cs".into()], vec![], 32);
        let files = small_cap.scan(temp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("small.cs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_survives_unreadable_subdirectory() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("ok.cs"), "class Ok {}").unwrap();
        let locked = temp.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("hidden.cs"), "class Hidden {}").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root bypasses mode bits, so only check the degraded listing when
        // the directory is actually unreadable. Scan must succeed either way.
        let unreadable = fs::read_dir(&locked).is_err();
        let result = scanner().scan(temp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let files = result.unwrap();
        if unreadable {
            assert_eq!(files.len(), 1);
            assert!(files[0].path.ends_with("ok.cs"));
        }
    }

    #[test]
    fn test_scan_empty_directory_is_ok_and_empty() {
        let temp = TempDir::new().unwrap();
        let files = scanner().scan(temp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_prioritize_orders_by_descending_length_stably() {
        let files = vec![
            FileRecord::new("a.cs", "xx"),
            FileRecord::new("b.cs", "xxxx"),
            FileRecord::new("c.cs", "xx"),
        ];

        let ordered = scanner().prioritize(files);
        assert!(ordered[0].path.ends_with("b.cs"));
        // Tie between a and c keeps input order.
        assert!(ordered[1].path.ends_with("a.cs"));
        assert!(ordered[2].path.ends_with("c.cs"));
    }

    #[test]
    fn test_prioritize_preserves_element_set() {
        let files = vec![
            FileRecord::new("a.cs", "1"),
            FileRecord::new("b.cs", "22"),
        ];
        let ordered = scanner().prioritize(files.clone());
        assert_eq!(ordered.len(), files.len());
    }
}
