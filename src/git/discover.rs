use crate::error::{Result, StatsError};
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory names never descended into.
pub const SKIPPED_DIRS: &[&str] = &["vendor", "node_modules"];

const GIT_DIR: &str = ".git";

/// Absolute paths of every git work tree under `root`, nested ones included.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(StatsError::NotADirectory(root.to_path_buf()));
    }
    let root = root.canonicalize()?;

    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if is_dir && is_skipped(entry.file_name()) {
                return false;
            }
            // never walk the contents of a .git directory
            entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map_or(true, |parent| parent != GIT_DIR)
        })
        .build();

    let mut repos = Vec::new();
    for entry in walker {
        let entry = entry?;
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        if is_dir && entry.file_name() == GIT_DIR {
            if let Some(repo) = entry.path().parent() {
                debug!(path = %repo.display(), "found repository");
                repos.push(repo.to_path_buf());
            }
        }
    }
    Ok(repos)
}

fn is_skipped(name: &OsStr) -> bool {
    SKIPPED_DIRS.iter().any(|skip| name == *skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn mkrepo(path: &Path) {
        fs::create_dir_all(path.join(GIT_DIR).join("objects")).unwrap();
        fs::write(path.join(GIT_DIR).join("HEAD"), "ref: refs/heads/main\n").unwrap();
    }

    #[test]
    fn finds_nested_repositories_and_skips_vendored_ones() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        mkrepo(&root.join("alpha"));
        mkrepo(&root.join("alpha").join("inner"));
        mkrepo(&root.join("group").join("beta"));
        mkrepo(&root.join("node_modules").join("dep"));
        mkrepo(&root.join("beta").join("vendor").join("lib"));
        fs::create_dir_all(root.join("plain")).unwrap();

        let found = discover(&root).unwrap();
        assert_eq!(
            found,
            vec![
                root.join("alpha"),
                root.join("alpha").join("inner"),
                root.join("group").join("beta"),
            ]
        );
    }

    #[test]
    fn root_itself_can_be_a_repository() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        mkrepo(&root);
        assert_eq!(discover(&root).unwrap(), vec![root.clone()]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            discover(&dir.path().join("absent")),
            Err(StatsError::NotADirectory(_))
        ));
    }
}
