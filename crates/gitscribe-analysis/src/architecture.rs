// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Architecture evolution
//!
//! Directory structure is captured at a sampled set of revisions (see
//! [`crate::sampling`]), and a lifecycle pass over every commit records file
//! additions, deletions and renames plus the first appearance of new
//! top-level areas. The lifecycle pass walks commits oldest-first, since
//! "first appearance" is only meaningful in chronological order.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, FixedOffset};
use gitscribe_git::{CommitRecord, DiffStat, HistorySource};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fetch::fetch_diffs;
use crate::sampling::{SampleReason, SampledRevision, select_revisions};
use crate::text::top_level;

/// Tree structure at one revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureSnapshot {
    /// Full commit SHA
    pub rev: String,
    /// Tag name or short SHA
    pub rev_display: String,
    /// Author date of the revision
    pub date: DateTime<FixedOffset>,
    /// Why the revision was sampled
    pub reason: SampleReason,
    /// Sorted top-level entries (directories, or root-level file names)
    pub top_level_dirs: Vec<String>,
    /// File count under each top-level entry
    pub file_counts: BTreeMap<String, usize>,
    /// Number of tracked files
    pub total_files: usize,
}

impl ArchitectureSnapshot {
    /// Group a revision's file list by top-level segment
    #[must_use]
    pub fn from_paths(
        revision: &SampledRevision,
        date: DateTime<FixedOffset>,
        paths: &[String],
    ) -> Self {
        let mut file_counts: BTreeMap<String, usize> = BTreeMap::new();
        for path in paths {
            *file_counts.entry(top_level(path)).or_default() += 1;
        }
        Self {
            rev: revision.sha.clone(),
            rev_display: revision.display.clone(),
            date,
            reason: revision.reason,
            top_level_dirs: file_counts.keys().cloned().collect(),
            file_counts,
            total_files: paths.len(),
        }
    }
}

/// What happened to a path in one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// The file appeared
    Added,
    /// The file was removed
    Deleted,
    /// The file was moved to the given path
    RenamedTo(String),
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => f.write_str("added"),
            Self::Deleted => f.write_str("deleted"),
            Self::RenamedTo(to) => write!(f, "renamed-to {to}"),
        }
    }
}

/// One entry of a path's lifecycle log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEntry {
    /// Commit in which the action happened
    pub commit_sha: String,
    /// The action
    pub action: LifecycleAction,
}

/// Kind of structural event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralKind {
    /// A top-level area absent from the oldest snapshot gained files
    NewTopLevel,
}

/// An architecturally significant change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralEvent {
    /// Commit that introduced the change
    pub commit_sha: String,
    /// Event kind
    pub kind: StructuralKind,
    /// Human-readable description
    pub description: String,
}

/// Snapshots plus lifecycle history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureEvolution {
    /// Snapshots, oldest first; the last one is the current structure
    pub snapshots: Vec<ArchitectureSnapshot>,
    /// Per-path log, each in chronological order
    pub file_lifetime: BTreeMap<String, Vec<LifecycleEntry>>,
    /// Structural events in chronological order
    pub structural_events: Vec<StructuralEvent>,
}

impl ArchitectureEvolution {
    /// The most recent snapshot
    #[must_use]
    pub fn current(&self) -> Option<&ArchitectureSnapshot> {
        self.snapshots.last()
    }
}

/// Sampling and per-commit caps for the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureOptions {
    /// Target number of stride samples
    pub sample_count: usize,
    /// Added-path entries logged per commit
    pub max_added_per_commit: usize,
    /// Deleted-path entries logged per commit
    pub max_deleted_per_commit: usize,
    /// Rename entries logged per commit
    pub max_renamed_per_commit: usize,
}

impl Default for ArchitectureOptions {
    fn default() -> Self {
        Self {
            sample_count: 20,
            max_added_per_commit: 30,
            max_deleted_per_commit: 30,
            max_renamed_per_commit: 20,
        }
    }
}

/// Paths of one diff, split by lifecycle action
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PathChanges<'a> {
    /// Insertions only, not a rename
    pub added: Vec<&'a str>,
    /// Deletions only
    pub deleted: Vec<&'a str>,
    /// `(old, new)` pairs
    pub renamed: Vec<(&'a str, &'a str)>,
}

impl<'a> PathChanges<'a> {
    /// Split a diff into added, deleted and renamed paths
    #[must_use]
    pub fn classify(stats: &'a [DiffStat]) -> Self {
        let mut changes = Self::default();
        for stat in stats {
            if let Some(from) = stat.renamed_from.as_deref() {
                changes.renamed.push((from, stat.path.as_str()));
            } else if stat.insertions > 0 && stat.deletions == 0 {
                changes.added.push(&stat.path);
            }
            if stat.deletions > 0 && stat.insertions == 0 {
                changes.deleted.push(&stat.path);
            }
        }
        changes
    }
}

/// Take a snapshot at each sampled revision, oldest first
///
/// Revisions whose tree cannot be listed are skipped.
pub fn take_snapshots<S>(
    source: &S,
    commits: &[CommitRecord],
    revisions: &[SampledRevision],
) -> Vec<ArchitectureSnapshot>
where
    S: HistorySource + ?Sized,
{
    revisions
        .par_iter()
        .filter_map(|revision| {
            let Some(paths) = source.tree_paths_at(&revision.sha).into_fetched() else {
                warn!(rev = %revision.display, "Tree listing unavailable, snapshot skipped");
                return None;
            };
            let date = commits.get(revision.position).map(|c| c.authored_at)?;
            Some(ArchitectureSnapshot::from_paths(revision, date, &paths))
        })
        .collect()
}

/// Track the architecture of a newest-first commit sequence
pub fn track_architecture<S>(
    source: &S,
    commits: &[CommitRecord],
    tag_shas: &HashSet<String>,
    options: &ArchitectureOptions,
) -> ArchitectureEvolution
where
    S: HistorySource + ?Sized,
{
    let revisions = select_revisions(commits, tag_shas, options.sample_count);
    let snapshots = take_snapshots(source, commits, &revisions);

    let baseline: BTreeSet<&str> = snapshots
        .first()
        .map(|s| s.top_level_dirs.iter().map(String::as_str).collect())
        .unwrap_or_default();

    let chronological: Vec<CommitRecord> = commits.iter().rev().cloned().collect();
    let diffs = fetch_diffs(source, &chronological);

    let mut file_lifetime: BTreeMap<String, Vec<LifecycleEntry>> = BTreeMap::new();
    let mut structural_events = Vec::new();

    for (commit, diff) in chronological.iter().zip(&diffs) {
        let Some(stats) = diff.as_fetched() else {
            continue;
        };
        let changes = PathChanges::classify(stats);
        let mut log = |path: &str, action: LifecycleAction| {
            file_lifetime
                .entry(path.to_string())
                .or_default()
                .push(LifecycleEntry {
                    commit_sha: commit.sha.clone(),
                    action,
                });
        };

        for path in changes.added.iter().take(options.max_added_per_commit) {
            log(path, LifecycleAction::Added);
        }
        for path in changes.deleted.iter().take(options.max_deleted_per_commit) {
            log(path, LifecycleAction::Deleted);
        }
        for (from, to) in changes.renamed.iter().take(options.max_renamed_per_commit) {
            log(from, LifecycleAction::RenamedTo((*to).to_string()));
        }

        let new_top = changes
            .added
            .iter()
            .map(|path| top_level(path))
            .find(|top| !top.is_empty() && !baseline.contains(top.as_str()));
        if let Some(top) = new_top {
            structural_events.push(StructuralEvent {
                commit_sha: commit.sha.clone(),
                kind: StructuralKind::NewTopLevel,
                description: format!("Top-level directory '{top}' appears"),
            });
        }
    }

    debug!(
        snapshots = snapshots.len(),
        tracked_paths = file_lifetime.len(),
        structural_events = structural_events.len(),
        "Architecture tracking complete"
    );

    ArchitectureEvolution {
        snapshots,
        file_lifetime,
        structural_events,
    }
}
