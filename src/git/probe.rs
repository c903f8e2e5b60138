use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Answers "is this a repository" without running any queries.
pub trait RepoProbe {
    /// True if `dir` is the root of a git working tree.
    fn is_repository(&self, dir: &Path) -> bool;

    /// Root of the working tree that contains `file`, if any.
    fn project_root(&self, file: &Path) -> Option<PathBuf>;
}

impl<P: RepoProbe + ?Sized> RepoProbe for &P {
    fn is_repository(&self, dir: &Path) -> bool {
        (**self).is_repository(dir)
    }

    fn project_root(&self, file: &Path) -> Option<PathBuf> {
        (**self).project_root(file)
    }
}

/// Repository discovery backed by `gix`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GixProbe;

impl GixProbe {
    fn workdir_of(start: &Path) -> Result<Option<PathBuf>> {
        let repo = gix::discover(start)?;
        Ok(repo.workdir().map(Path::to_path_buf))
    }
}

impl RepoProbe for GixProbe {
    fn is_repository(&self, dir: &Path) -> bool {
        if dir.as_os_str().is_empty() || !dir.is_dir() {
            return false;
        }
        match Self::workdir_of(dir) {
            Ok(Some(workdir)) => same_path(&workdir, dir),
            Ok(None) => false,
            Err(e) => {
                trace!(dir = %dir.display(), error = %e, "not a repository");
                false
            }
        }
    }

    fn project_root(&self, file: &Path) -> Option<PathBuf> {
        let start = if file.is_dir() { file } else { file.parent()? };
        let start = if start.as_os_str().is_empty() {
            Path::new(".")
        } else {
            start
        };
        match Self::workdir_of(start) {
            Ok(root) => root.and_then(|r| r.canonicalize().ok()),
            Err(e) => {
                trace!(file = %file.display(), error = %e, "no enclosing repository");
                None
            }
        }
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::tempdir;

    fn init_repo(dir: &Path) -> bool {
        Command::new("git")
            .arg("init")
            .arg("--quiet")
            .current_dir(dir)
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn worktree_root_is_a_repository_but_subdirectories_are_not() {
        let dir = tempdir().unwrap();
        if !init_repo(dir.path()) {
            return;
        }
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        assert!(GixProbe.is_repository(dir.path()));
        assert!(!GixProbe.is_repository(&dir.path().join("src")));
        assert!(!GixProbe.is_repository(&nested));
    }

    #[test]
    fn project_root_discovers_upward_from_a_file() {
        let dir = tempdir().unwrap();
        if !init_repo(dir.path()) {
            return;
        }
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();
        let file = nested.join("lib.rs");
        std::fs::write(&file, "pub fn hi() {}\n").unwrap();

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(GixProbe.project_root(&file), Some(root.clone()));
        assert_eq!(GixProbe.project_root(&nested), Some(root.clone()));
        assert_eq!(GixProbe.project_root(dir.path()), Some(root));
    }

    #[test]
    fn project_root_outside_a_repository_is_none() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("loose.txt");
        std::fs::write(&file, "x\n").unwrap();
        assert_eq!(GixProbe.project_root(&file), None);
    }

    #[test]
    fn plain_directory_is_not_a_repository() {
        let dir = tempdir().unwrap();
        assert!(!GixProbe.is_repository(dir.path()));
        assert!(!GixProbe.is_repository(Path::new("")));
        assert!(!GixProbe.is_repository(&dir.path().join("missing")));
    }
}
