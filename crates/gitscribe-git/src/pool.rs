// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! A shareable history source backed by pooled repository handles
//!
//! `git2::Repository` is `Send` but not `Sync`, so concurrent readers each
//! need their own handle. [`RepoPool`] keeps idle handles in a stack and opens
//! a new one whenever every existing handle is checked out; the pool therefore
//! grows to the number of threads that read at the same time.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::commit::{CommitRecord, TagRecord};
use crate::error::GitError;
use crate::repo::{GitRepo, WalkOptions};
use crate::source::{DiffFetch, Fetch, HistorySource};

/// Thread-safe [`HistorySource`] over a local repository
pub struct RepoPool {
    git_dir: PathBuf,
    walk: WalkOptions,
    idle: Mutex<Vec<GitRepo>>,
}

impl RepoPool {
    /// Discover the repository containing `path` and open the first handle
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let repo = GitRepo::discover(path)?;
        Ok(Self::from_repo(repo))
    }

    /// Seed a pool with an already opened handle
    #[must_use]
    pub fn from_repo(repo: GitRepo) -> Self {
        Self {
            git_dir: repo.path().to_path_buf(),
            walk: WalkOptions::default(),
            idle: Mutex::new(vec![repo]),
        }
    }

    /// Walk options used by [`HistorySource::all_commits`]
    #[must_use]
    pub fn with_walk_options(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }

    /// Path of the repository's `.git` directory
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Working directory of the repository, if it has one
    #[must_use]
    pub fn workdir(&self) -> Option<PathBuf> {
        self.with_repo(|repo| repo.workdir().map(Path::to_path_buf))
            .ok()
            .flatten()
    }

    /// Number of handles currently idle in the pool
    #[must_use]
    pub fn idle_handles(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Run `f` with a handle checked out of the pool
    fn with_repo<T>(&self, f: impl FnOnce(&GitRepo) -> T) -> Result<T, GitError> {
        let checked_out = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let repo = match checked_out {
            Some(repo) => repo,
            None => {
                debug!(git_dir = %self.git_dir.display(), "Opening additional repository handle");
                GitRepo::open(&self.git_dir)?
            }
        };

        let value = f(&repo);
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(repo);
        Ok(value)
    }
}

impl HistorySource for RepoPool {
    fn all_commits(&self) -> Result<Vec<CommitRecord>, GitError> {
        self.with_repo(|repo| repo.walk_commits(&self.walk))?
    }

    fn diff_stats(&self, sha: &str) -> DiffFetch {
        match self.with_repo(|repo| repo.diff_stats(sha)) {
            Ok(Ok(stats)) => Fetch::Fetched(stats),
            Ok(Err(e)) | Err(e) => {
                warn!(sha, error = %e, "Diff unavailable");
                Fetch::Unavailable
            }
        }
    }

    fn tree_paths_at(&self, rev: &str) -> Fetch<Vec<String>> {
        match self.with_repo(|repo| repo.tree_paths_at(rev)) {
            Ok(Ok(paths)) => Fetch::Fetched(paths),
            Ok(Err(e)) | Err(e) => {
                warn!(rev, error = %e, "Tree listing unavailable");
                Fetch::Unavailable
            }
        }
    }

    fn tags(&self) -> Vec<TagRecord> {
        match self.with_repo(GitRepo::tags) {
            Ok(Ok(tags)) => tags,
            Ok(Err(e)) | Err(e) => {
                warn!(error = %e, "Cannot list tags");
                Vec::new()
            }
        }
    }
}
