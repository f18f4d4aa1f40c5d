//! Filesystem discovery: module directories and pattern matches.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A module directory under a stage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDir {
    pub name: String,
    pub path: PathBuf,
}

/// Immediate subdirectories of `stage_dir`, sorted by name.
///
/// Symlinks are followed. Entries that cannot be read are logged and
/// skipped.
pub fn module_dirs(stage_dir: &Path) -> Vec<ModuleDir> {
    WalkDir::new(stage_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", stage_dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| ModuleDir {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
        })
        .collect()
}

/// Regular files under `module_dir` matching `pattern`, sorted.
///
/// `pattern` is relative to the module directory and may use `**`. The
/// module directory itself is escaped, so only the pattern is interpreted.
pub fn matching_files(
    module_dir: &Path,
    pattern: &str,
) -> Result<Vec<PathBuf>, glob::PatternError> {
    let root = glob::Pattern::escape(&module_dir.to_string_lossy());
    let full = format!("{}/{}", root.trim_end_matches('/'), pattern);

    let mut files: Vec<PathBuf> = glob::glob(&full)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Skipping unreadable match for '{}': {}", pattern, e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_module_dirs_sorted_and_dirs_only() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("m2")).unwrap();
        std::fs::create_dir(dir.path().join("m10")).unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "a/nested/deep.csv");

        let names: Vec<String> = module_dirs(dir.path()).into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["a", "m10", "m2"]);
    }

    #[test]
    fn test_matching_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.csv");
        touch(dir.path(), "a.csv");
        touch(dir.path(), "c.json");
        touch(dir.path(), "sub/d.csv");
        std::fs::create_dir(dir.path().join("dir.csv")).unwrap();

        let files = matching_files(dir.path(), "*.csv").unwrap();
        assert_eq!(files, vec![dir.path().join("a.csv"), dir.path().join("b.csv")]);

        let files = matching_files(dir.path(), "**/*.csv").unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.contains(&dir.path().join("sub/d.csv")));

        assert!(matching_files(dir.path(), "*.tsv").unwrap().is_empty());
    }

    #[test]
    fn test_module_dir_with_glob_characters() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "run[1]/out.csv");
        let files = matching_files(&dir.path().join("run[1]"), "out.csv").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        assert!(matching_files(dir.path(), "[unclosed").is_err());
    }
}
