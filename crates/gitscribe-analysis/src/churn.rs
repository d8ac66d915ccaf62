// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! File and directory churn
//!
//! Churn is accumulated per path over the whole history, then ranked in two
//! stages: a coarse "touched often" pass that keeps a doubled candidate pool,
//! followed by a volume pass that picks the final top N. Both stages are
//! separate functions so the intermediate pool can be inspected on its own.

use std::collections::{BTreeMap, BTreeSet};

use gitscribe_git::{CommitRecord, DiffStat, HistorySource};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetch::fetch_diffs;
use crate::text::parent_dir;

/// Churn of one file across the scanned history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChurn {
    /// File path
    pub path: String,
    /// Distinct commits that touched the file
    pub commit_count: usize,
    /// Lines added over all commits
    pub total_insertions: usize,
    /// Lines removed over all commits
    pub total_deletions: usize,
    /// Insertions plus deletions
    pub total_changes: usize,
}

impl FileChurn {
    /// First-stage score: commit count plus one point per hundred changed lines
    #[must_use]
    pub fn activity_score(&self) -> usize {
        self.commit_count + self.total_changes / 100
    }
}

/// Churn rolled up to a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryChurn {
    /// Directory path (never empty)
    pub dir: String,
    /// Distinct commits touching any file directly in the directory
    pub commit_count: usize,
    /// Changed lines summed over those files
    pub total_changes: usize,
}

/// Ranked churn summaries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnReport {
    /// Top files, highest volume first
    pub file_churns: Vec<FileChurn>,
    /// Top directories, highest volume first
    pub dir_churns: Vec<DirectoryChurn>,
    /// Frequently touched files with little total change
    pub unstable_paths: Vec<String>,
}

/// Limits and thresholds for the churn report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnOptions {
    /// Files kept in the final ranking
    pub top_files: usize,
    /// Directories kept in the final ranking
    pub top_dirs: usize,
    /// Minimum commit count for an unstable path
    pub unstable_min_commits: usize,
    /// Unstable paths must have fewer changed lines than this
    pub unstable_max_changes: usize,
    /// Maximum number of unstable paths reported
    pub unstable_cap: usize,
}

impl Default for ChurnOptions {
    fn default() -> Self {
        Self {
            top_files: 50,
            top_dirs: 20,
            unstable_min_commits: 10,
            unstable_max_changes: 500,
            unstable_cap: 30,
        }
    }
}

#[derive(Debug, Default)]
struct PathAccumulator {
    commits: BTreeSet<String>,
    insertions: usize,
    deletions: usize,
}

/// Running per-path totals, keyed in path order
#[derive(Debug, Default)]
pub struct ChurnAccumulator {
    paths: BTreeMap<String, PathAccumulator>,
}

impl ChurnAccumulator {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one commit's diff
    pub fn record(&mut self, sha: &str, stats: &[DiffStat]) {
        for stat in stats {
            let entry = self.paths.entry(stat.path.clone()).or_default();
            entry.commits.insert(sha.to_string());
            entry.insertions += stat.insertions;
            entry.deletions += stat.deletions;
        }
    }

    /// Number of distinct paths seen
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Per-file totals in path order
    #[must_use]
    pub fn file_churns(&self) -> Vec<FileChurn> {
        self.paths
            .iter()
            .map(|(path, acc)| FileChurn {
                path: path.clone(),
                commit_count: acc.commits.len(),
                total_insertions: acc.insertions,
                total_deletions: acc.deletions,
                total_changes: acc.insertions + acc.deletions,
            })
            .collect()
    }

    /// Directory rollups ranked by changed lines, then commit count
    ///
    /// Root-level files have no directory and are left out.
    #[must_use]
    pub fn directory_churns(&self, top_n: usize) -> Vec<DirectoryChurn> {
        let mut dirs: BTreeMap<String, (BTreeSet<&str>, usize)> = BTreeMap::new();
        for (path, acc) in &self.paths {
            let dir = parent_dir(path);
            if dir.is_empty() {
                continue;
            }
            let (commits, lines) = dirs.entry(dir).or_default();
            commits.extend(acc.commits.iter().map(String::as_str));
            *lines += acc.insertions + acc.deletions;
        }

        let mut ranked: Vec<DirectoryChurn> = dirs
            .into_iter()
            .map(|(dir, (commits, total_changes))| DirectoryChurn {
                dir,
                commit_count: commits.len(),
                total_changes,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.total_changes
                .cmp(&a.total_changes)
                .then(b.commit_count.cmp(&a.commit_count))
        });
        ranked.truncate(top_n);
        ranked
    }
}

/// Stage one: keep the `2 * top_n` most active files
///
/// Ordered by [`FileChurn::activity_score`] descending; the sort is stable, so
/// equal scores keep their incoming order.
#[must_use]
pub fn rank_by_activity(mut files: Vec<FileChurn>, top_n: usize) -> Vec<FileChurn> {
    files.sort_by_key(|f| std::cmp::Reverse(f.activity_score()));
    files.truncate(top_n.saturating_mul(2));
    files
}

/// Stage two: order by `(total_changes, commit_count)` descending and keep `top_n`
#[must_use]
pub fn rank_by_volume(mut files: Vec<FileChurn>, top_n: usize) -> Vec<FileChurn> {
    files.sort_by_key(|f| std::cmp::Reverse((f.total_changes, f.commit_count)));
    files.truncate(top_n);
    files
}

/// Frequently but lightly edited files from an already ranked list
#[must_use]
pub fn unstable_paths(ranked: &[FileChurn], options: &ChurnOptions) -> Vec<String> {
    ranked
        .iter()
        .filter(|f| {
            f.commit_count >= options.unstable_min_commits
                && f.total_changes < options.unstable_max_changes
        })
        .take(options.unstable_cap)
        .map(|f| f.path.clone())
        .collect()
}

/// Build the churn report for `commits`
///
/// Commits whose diff is unavailable contribute nothing.
pub fn compute_churn<S>(source: &S, commits: &[CommitRecord], options: &ChurnOptions) -> ChurnReport
where
    S: HistorySource + ?Sized,
{
    let diffs = fetch_diffs(source, commits);

    let mut acc = ChurnAccumulator::new();
    for (commit, diff) in commits.iter().zip(&diffs) {
        if let Some(stats) = diff.as_fetched() {
            acc.record(&commit.sha, stats);
        }
    }

    let candidates = rank_by_activity(acc.file_churns(), options.top_files);
    let file_churns = rank_by_volume(candidates, options.top_files);
    let dir_churns = acc.directory_churns(options.top_dirs);
    let unstable = unstable_paths(&file_churns, options);

    debug!(
        paths = acc.len(),
        files = file_churns.len(),
        dirs = dir_churns.len(),
        unstable = unstable.len(),
        "Churn aggregation complete"
    );

    ChurnReport {
        file_churns,
        dir_churns,
        unstable_paths: unstable,
    }
}
