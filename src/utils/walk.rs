//! Source collection for groups and assets.

use crate::error::BuildError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
pub const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect root-relative source paths: explicit files first, in the given
/// order, then every regular file under each directory.
///
/// Directory walks are sorted by file name at every level, so the result
/// is lexicographic by path component and identical across runs.
pub fn collect_sources(
    root: &Path,
    files: &[PathBuf],
    directories: &[PathBuf],
) -> Result<Vec<PathBuf>, BuildError> {
    let mut sources = Vec::with_capacity(files.len());

    for file in files {
        if !root.join(file).is_file() {
            return Err(BuildError::SourceNotFound { path: file.clone() });
        }
        sources.push(file.clone());
    }

    for dir in directories {
        let full = root.join(dir);
        if !full.is_dir() {
            return Err(BuildError::SourceNotFound { path: dir.clone() });
        }
        for entry in WalkDir::new(&full).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(full.as_path()).to_path_buf();
                BuildError::io(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_str().unwrap_or_default();
            if IGNORED_FILES.contains(&name) {
                continue;
            }
            let relative = entry.path().strip_prefix(&full).unwrap_or(entry.path());
            sources.push(dir.join(relative));
        }
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, path: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_files_then_sorted_walk() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "index.md");
        touch(root, "posts/b.md");
        touch(root, "posts/a.md");
        touch(root, "posts/2024/z.md");
        touch(root, "posts/.DS_Store");

        let sources = collect_sources(
            root,
            &[PathBuf::from("index.md")],
            &[PathBuf::from("posts")],
        )
        .unwrap();

        assert_eq!(
            sources,
            vec![
                PathBuf::from("index.md"),
                PathBuf::from("posts/2024/z.md"),
                PathBuf::from("posts/a.md"),
                PathBuf::from("posts/b.md"),
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = collect_sources(dir.path(), &[PathBuf::from("gone.md")], &[]).unwrap_err();
        assert!(matches!(err, BuildError::SourceNotFound { path } if path == Path::new("gone.md")));
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = collect_sources(dir.path(), &[], &[PathBuf::from("posts")]).unwrap_err();
        assert!(matches!(err, BuildError::SourceNotFound { .. }));
    }

    #[test]
    fn test_directory_given_as_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("posts")).unwrap();
        let err = collect_sources(dir.path(), &[PathBuf::from("posts")], &[]).unwrap_err();
        assert!(matches!(err, BuildError::SourceNotFound { .. }));
    }
}
