//! File system utility functions

use anyhow::Result;
use std::path::Path;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Check whether a path holds a git repository
///
/// An empty or missing `.git` directory counts as no repository, so an
/// interrupted `git init` is redone instead of trusted.
pub fn has_git_dir(path: &Path) -> bool {
    let git_dir = path.join(".git");
    if git_dir.is_file() {
        // worktree or submodule gitlink
        return true;
    }
    match std::fs::read_dir(&git_dir) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory_exists_new_directory() {
        let temp_dir = TempDir::new().unwrap();
        let new_dir = temp_dir.path().join("new_directory");

        assert!(!new_dir.exists());
        ensure_directory_exists(&new_dir).unwrap();
        assert!(new_dir.is_dir());
    }

    #[test]
    fn test_ensure_directory_exists_nested_path() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("level1").join("level2").join("level3");

        ensure_directory_exists(&nested_path).unwrap();
        assert!(nested_path.is_dir());

        // Should not error on existing directory
        ensure_directory_exists(&nested_path).unwrap();
    }

    #[test]
    fn test_has_git_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!has_git_dir(temp_dir.path()));

        let git_dir = temp_dir.path().join(".git");
        fs::create_dir(&git_dir).unwrap();
        assert!(!has_git_dir(temp_dir.path()));

        fs::write(git_dir.join("HEAD"), "ref: refs/heads/master\n").unwrap();
        assert!(has_git_dir(temp_dir.path()));
    }

    #[test]
    fn test_has_git_dir_gitlink_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".git"),
            "gitdir: ../.git/modules/foo\n",
        )
        .unwrap();
        assert!(has_git_dir(temp_dir.path()));
    }
}
