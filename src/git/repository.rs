use git2::{Repository, Status};
use std::path::{Path, PathBuf};

use crate::error::{AppError, BlameError, Result};
use crate::git::blame::BlameSource;

pub struct GitRepository {
    pub repo: Repository,
    pub workdir: PathBuf,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(&path).map_err(|_| AppError::RepoNotFound(path_str.clone()))?;
        let workdir = workdir_of(&repo).ok_or(AppError::RepoNotFound(path_str))?;

        Ok(Self { repo, workdir })
    }

    /// Find the repository owning `file` and check that git tracks it.
    pub fn locate(file: &Path) -> std::result::Result<BlameSource, BlameError> {
        let shown = file.to_string_lossy().to_string();
        if !file.is_file() {
            return Err(BlameError::FileNotFound(shown));
        }

        let absolute = std::fs::canonicalize(file).map_err(|_| BlameError::FileNotFound(shown.clone()))?;
        let parent = absolute.parent().unwrap_or(&absolute);
        let repo = Repository::discover(parent).map_err(|_| BlameError::NotInRepository(shown.clone()))?;
        let workdir = workdir_of(&repo).ok_or_else(|| BlameError::NotInRepository(shown.clone()))?;

        let relative = absolute
            .strip_prefix(&workdir)
            .map_err(|_| BlameError::NotInRepository(shown.clone()))?
            .to_path_buf();

        let git = GitRepository { repo, workdir };
        if !git.is_tracked(&relative) {
            return Err(BlameError::Untracked(shown));
        }

        Ok(BlameSource {
            path: file.to_path_buf(),
            workdir: git.workdir,
            relative,
        })
    }

    pub fn is_tracked(&self, relative: &Path) -> bool {
        match self.repo.status_file(relative) {
            Ok(status) => !status.intersects(Status::WT_NEW | Status::IGNORED),
            Err(_) => false,
        }
    }

    pub fn name(&self) -> String {
        self.workdir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

fn workdir_of(repo: &Repository) -> Option<PathBuf> {
    let workdir = repo.workdir()?;
    Some(std::fs::canonicalize(workdir).unwrap_or_else(|_| workdir.to_path_buf()))
}
