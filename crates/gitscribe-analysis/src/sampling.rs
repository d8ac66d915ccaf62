// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Selection of the revisions at which structure snapshots are taken

use std::collections::{BTreeMap, HashSet};

use gitscribe_git::CommitRecord;
use serde::{Deserialize, Serialize};

/// Why a revision was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleReason {
    /// The commit carries a release tag
    Tagged,
    /// The commit fell on the sampling stride
    Stride,
}

/// A revision picked for a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledRevision {
    /// Index in the newest-first commit sequence (0 is the newest)
    pub position: usize,
    /// Full commit SHA
    pub sha: String,
    /// First tag name for tagged revisions, otherwise the short SHA
    pub display: String,
    /// Why the revision was selected
    pub reason: SampleReason,
}

/// Stride used to sample a newest-first history of `total` commits
#[must_use]
pub fn sample_stride(total: usize, sample_count: usize) -> usize {
    (total / sample_count.max(1)).max(1)
}

/// Pick tagged commits plus evenly spaced samples, oldest first
///
/// Every commit whose SHA is in `tag_shas` and which carries at least one tag
/// name is selected and displayed by its first tag. The newest-first sequence
/// is then walked at [`sample_stride`] and any commit not yet selected is
/// added under its short SHA. The result holds each SHA once and is ordered
/// chronologically, regardless of selection order.
#[must_use]
pub fn select_revisions(
    commits: &[CommitRecord],
    tag_shas: &HashSet<String>,
    sample_count: usize,
) -> Vec<SampledRevision> {
    let mut selected: BTreeMap<usize, SampledRevision> = BTreeMap::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (position, commit) in commits.iter().enumerate() {
        let Some(tag) = commit.first_tag() else {
            continue;
        };
        if tag_shas.contains(&commit.sha) && seen.insert(commit.sha.as_str()) {
            selected.insert(
                position,
                SampledRevision {
                    position,
                    sha: commit.sha.clone(),
                    display: tag.to_string(),
                    reason: SampleReason::Tagged,
                },
            );
        }
    }

    let stride = sample_stride(commits.len(), sample_count);
    for (position, commit) in commits.iter().enumerate().step_by(stride) {
        if seen.insert(commit.sha.as_str()) {
            selected.insert(
                position,
                SampledRevision {
                    position,
                    sha: commit.sha.clone(),
                    display: commit.short_sha.clone(),
                    reason: SampleReason::Stride,
                },
            );
        }
    }

    // Highest position is the oldest commit
    selected.into_values().rev().collect()
}
