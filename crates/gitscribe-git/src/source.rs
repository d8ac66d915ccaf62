// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The history source contract consumed by the analyzers
//!
//! Per-commit lookups never fail outright: a diff or tree that cannot be read
//! comes back as [`Fetch::Unavailable`], so one bad commit degrades only its own
//! contribution to a report.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::commit::{CommitRecord, DiffStat, TagRecord};
use crate::error::GitError;

/// Outcome of a per-commit or per-revision lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fetch<T> {
    /// The data was read (it may still be empty)
    Fetched(T),
    /// The lookup failed; the caller treats this as "no data"
    Unavailable,
}

/// Per-file diff statistics for one commit
pub type DiffFetch = Fetch<Vec<DiffStat>>;

impl<T> Fetch<T> {
    /// Borrow the fetched value, if any
    #[must_use]
    pub fn as_fetched(&self) -> Option<&T> {
        match self {
            Self::Fetched(value) => Some(value),
            Self::Unavailable => None,
        }
    }

    /// Take the fetched value, if any
    #[must_use]
    pub fn into_fetched(self) -> Option<T> {
        match self {
            Self::Fetched(value) => Some(value),
            Self::Unavailable => None,
        }
    }

    /// Whether the lookup failed
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl<T, E> From<Result<T, E>> for Fetch<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Fetched(value),
            Err(_) => Self::Unavailable,
        }
    }
}

/// Aggregate size of one commit's diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffTotals {
    /// Number of files touched
    pub files: usize,
    /// Total lines added
    pub insertions: usize,
    /// Total lines removed
    pub deletions: usize,
}

impl DiffTotals {
    /// Sum a list of per-file stats
    #[must_use]
    pub fn of(stats: &[DiffStat]) -> Self {
        stats.iter().fold(
            Self {
                files: stats.len(),
                ..Self::default()
            },
            |acc, s| Self {
                insertions: acc.insertions + s.insertions,
                deletions: acc.deletions + s.deletions,
                ..acc
            },
        )
    }

    /// Insertions plus deletions
    #[must_use]
    pub fn changed_lines(&self) -> usize {
        self.insertions + self.deletions
    }
}

impl DiffFetch {
    /// Totals of a fetched diff; `None` when unavailable
    #[must_use]
    pub fn totals(&self) -> Option<DiffTotals> {
        self.as_fetched().map(|stats| DiffTotals::of(stats))
    }
}

/// A read-only, repository-local view of commit history
///
/// Implementations must be safe to share across worker threads; analyzers
/// fetch diffs for many commits concurrently.
pub trait HistorySource: Sync {
    /// All first-parent commits, newest first, with tags and branches joined
    ///
    /// # Errors
    ///
    /// Returns `GitError` only when the history cannot be read at all.
    fn all_commits(&self) -> Result<Vec<CommitRecord>, GitError>;

    /// Per-file diff statistics of a commit against its first parent, sorted by path
    fn diff_stats(&self, sha: &str) -> DiffFetch;

    /// Sorted paths of every tracked file at a revision
    fn tree_paths_at(&self, rev: &str) -> Fetch<Vec<String>>;

    /// All tags; unresolvable tags carry no target
    fn tags(&self) -> Vec<TagRecord>;
}

/// A history held entirely in memory
///
/// Diffs or trees that were never registered are reported as unavailable,
/// which makes fetch-failure paths easy to exercise.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    commits: Vec<CommitRecord>,
    diffs: HashMap<String, Vec<DiffStat>>,
    trees: HashMap<String, Vec<String>>,
    tags: Vec<TagRecord>,
}

impl MemorySource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit; commits are kept in insertion order (newest first)
    #[must_use]
    pub fn with_commit(mut self, commit: CommitRecord) -> Self {
        self.commits.push(commit);
        self
    }

    /// Register the diff of a commit
    #[must_use]
    pub fn with_diff(mut self, sha: impl Into<String>, mut stats: Vec<DiffStat>) -> Self {
        stats.sort_by(|a, b| a.path.cmp(&b.path));
        self.diffs.insert(sha.into(), stats);
        self
    }

    /// Register the tree listing of a revision
    #[must_use]
    pub fn with_tree<I, S>(mut self, rev: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        paths.sort();
        self.trees.insert(rev.into(), paths);
        self
    }

    /// Add a tag and attach its name to the target commit, if present
    #[must_use]
    pub fn with_tag(mut self, tag: TagRecord) -> Self {
        if let Some(target) = tag.target_sha.as_deref() {
            if let Some(commit) = self.commits.iter_mut().find(|c| c.sha == target) {
                commit.tags.insert(tag.name.clone());
            }
        }
        self.tags.push(tag);
        self
    }

    /// Commits in stored order
    #[must_use]
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }
}

impl HistorySource for MemorySource {
    fn all_commits(&self) -> Result<Vec<CommitRecord>, GitError> {
        Ok(self.commits.clone())
    }

    fn diff_stats(&self, sha: &str) -> DiffFetch {
        self.diffs
            .get(sha)
            .cloned()
            .map_or(Fetch::Unavailable, Fetch::Fetched)
    }

    fn tree_paths_at(&self, rev: &str) -> Fetch<Vec<String>> {
        self.trees
            .get(rev)
            .cloned()
            .map_or(Fetch::Unavailable, Fetch::Fetched)
    }

    fn tags(&self) -> Vec<TagRecord> {
        self.tags.clone()
    }
}
