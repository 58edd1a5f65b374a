use crate::error::{AppError, Result};
use crate::exclude::ExclusionMatcher;
use crate::extensions::{ExtensionSet, extension_of};
use serde::{Deserialize, Serialize};
use std::fs::FileType;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to do when a directory entry cannot be read during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalPolicy {
    /// Log a warning and continue with the rest of the tree.
    #[default]
    Skip,
    /// Abort the run with [`AppError::Traversal`].
    FailFast,
}

impl TraversalPolicy {
    pub(crate) fn handle(self, err: walkdir::Error) -> Result<()> {
        match self {
            TraversalPolicy::Skip => {
                log::warn!(
                    "Skipping unreadable entry: {} (at {})",
                    err,
                    err.path()
                        .map_or_else(|| "unknown path".into(), |p| p.display().to_string())
                );
                Ok(())
            }
            TraversalPolicy::FailFast => Err(AppError::from(err)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    /// Lower-cased and dot-prefixed, e.g. `.py`.
    pub extension: String,
}

impl FileRecord {
    pub fn relative_display(&self) -> String {
        self.relative_path.to_string_lossy().into_owned()
    }
}

/// Regular files, plus symlinks that resolve to one. Symlinked directories are
/// never descended into.
pub(crate) fn is_file_entry(path: &Path, file_type: FileType) -> bool {
    file_type.is_file() || (file_type.is_symlink() && path.is_file())
}

/// Collects every kept file under `base`, sorted by case-insensitive relative path.
pub fn collect_files(
    base: &Path,
    extensions: &ExtensionSet,
    matcher: &ExclusionMatcher,
    policy: TraversalPolicy,
) -> Result<Vec<FileRecord>> {
    collect_files_with(base, extensions, matcher, policy, |_| {})
}

/// Same as [`collect_files`], calling `on_visit` for every entry the walk enumerates.
/// Entries inside excluded directories are never enumerated.
pub fn collect_files_with<F>(
    base: &Path,
    extensions: &ExtensionSet,
    matcher: &ExclusionMatcher,
    policy: TraversalPolicy,
    mut on_visit: F,
) -> Result<Vec<FileRecord>>
where
    F: FnMut(&Path),
{
    log::info!("Collecting files under: {}", base.display());
    let mut files = Vec::<FileRecord>::new();

    let walker = WalkDir::new(base)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            on_visit(entry.path());
            if matcher.is_excluded(entry.path()) {
                if entry.file_type().is_dir() {
                    log::trace!("Pruning excluded directory: {}", entry.path().display());
                }
                return false;
            }
            true
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                policy.handle(e)?;
                continue;
            }
        };
        if entry.depth() == 0 || !is_file_entry(entry.path(), entry.file_type()) {
            continue;
        }
        if !extensions.matches_path(entry.path()) {
            log::trace!("Extension not selected: {}", entry.path().display());
            continue;
        }
        let Some(relative_path) = pathdiff::diff_paths(entry.path(), base) else {
            log::warn!("Could not get relative path for: {}", entry.path().display());
            continue;
        };
        let Some(extension) = extension_of(entry.path()) else {
            continue;
        };
        log::trace!("Collected: {}", relative_path.display());
        files.push(FileRecord {
            path: entry.into_path(),
            relative_path,
            extension,
        });
    }

    files.sort_by_cached_key(|f| {
        (
            f.relative_path.to_string_lossy().to_lowercase(),
            f.relative_path.clone(),
        )
    });
    log::info!("Collected {} files.", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn rel_paths(files: &[FileRecord]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.relative_display().replace('\\', "/"))
            .collect()
    }

    fn py() -> ExtensionSet {
        [".py"].into_iter().collect()
    }

    #[test]
    fn test_orders_case_insensitively_by_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "b/a.py");
        touch(root, "a.py");
        touch(root, "B/z.py");

        let matcher = ExclusionMatcher::new(root, &[] as &[&str]);
        let files = collect_files(root, &py(), &matcher, TraversalPolicy::Skip).unwrap();
        assert_eq!(rel_paths(&files), vec!["a.py", "b/a.py", "B/z.py"]);
    }

    #[test]
    fn test_subdirectory_files_interleave_with_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "a/z.py");
        touch(root, "a_b.py");
        touch(root, "a.py");

        let matcher = ExclusionMatcher::new(root, &[] as &[&str]);
        let files = collect_files(root, &py(), &matcher, TraversalPolicy::Skip).unwrap();
        // '.' < '/' < '_' in code point order.
        assert_eq!(rel_paths(&files), vec!["a.py", "a/z.py", "a_b.py"]);
    }

    #[test]
    fn test_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for rel in ["src/main.py", "src/util/io.py", "tests/test_main.py", "setup.py"] {
            touch(root, rel);
        }
        let matcher = ExclusionMatcher::new(root, &["tests"]);
        let first = collect_files(root, &py(), &matcher, TraversalPolicy::Skip).unwrap();
        let second = collect_files(root, &py(), &matcher, TraversalPolicy::Skip).unwrap();
        assert_eq!(first, second);
        assert_eq!(rel_paths(&first), vec!["setup.py", "src/main.py", "src/util/io.py"]);
    }

    #[test]
    fn test_wildcard_excludes_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "app.log");
        touch(root, "app.py");

        let exts: ExtensionSet = [".py", ".log"].into_iter().collect();
        let matcher = ExclusionMatcher::new(root, &["dist", "*.log", "vendor"]);
        let files = collect_files(root, &exts, &matcher, TraversalPolicy::Skip).unwrap();
        assert_eq!(rel_paths(&files), vec!["app.py"]);
    }

    #[test]
    fn test_excluded_directory_is_never_enumerated() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "node_modules/x.js");
        touch(root, "node_modules/deep/y.js");
        touch(root, "index.js");

        let exts: ExtensionSet = [".js"].into_iter().collect();
        let matcher = ExclusionMatcher::new(root, &["node_modules"]);
        let mut visited = Vec::new();
        let files = collect_files_with(root, &exts, &matcher, TraversalPolicy::Skip, |p| {
            visited.push(p.to_path_buf())
        })
        .unwrap();

        assert_eq!(rel_paths(&files), vec!["index.js"]);
        let inside = visited
            .iter()
            .filter(|p| p.starts_with(root.join("node_modules")) && *p != &root.join("node_modules"))
            .count();
        assert_eq!(inside, 0, "pruned subtree was enumerated: {:?}", visited);
        assert!(visited.contains(&root.join("node_modules")));
    }

    #[test]
    fn test_extension_filter_and_records() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "Main.PY");
        touch(root, "README.md");
        touch(root, "Makefile");

        let matcher = ExclusionMatcher::new(root, &[] as &[&str]);
        let files = collect_files(root, &py(), &matcher, TraversalPolicy::Skip).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].extension, ".py");
        assert_eq!(files[0].path, root.join("Main.PY"));
        assert_eq!(files[0].relative_path, PathBuf::from("Main.PY"));
    }

    #[test]
    fn test_missing_base_respects_policy() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let matcher = ExclusionMatcher::new(&missing, &[] as &[&str]);

        let skipped = collect_files(&missing, &py(), &matcher, TraversalPolicy::Skip).unwrap();
        assert!(skipped.is_empty());

        let err = collect_files(&missing, &py(), &matcher, TraversalPolicy::FailFast).unwrap_err();
        assert!(matches!(err, AppError::Traversal(_)));
    }
}
