// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Parallel diff fetching
//!
//! Diff retrieval dominates the cost of every pass, and each commit's diff is
//! independent of every other's. Fetches run on the rayon pool; results always
//! come back in input order because the parallel iterators used here are
//! indexed, so no caller depends on completion order.

use gitscribe_git::{CommitRecord, DiffFetch, HistorySource};
use rayon::prelude::*;
use tracing::debug;

/// Commits fetched per parallel batch by [`diffs_in_chunks`]
pub const FETCH_CHUNK: usize = 64;

/// Fetch the diff of every commit, in input order
pub fn fetch_diffs<S>(source: &S, commits: &[CommitRecord]) -> Vec<DiffFetch>
where
    S: HistorySource + ?Sized,
{
    let fetched: Vec<DiffFetch> = commits
        .par_iter()
        .map(|commit| source.diff_stats(&commit.sha))
        .collect();

    let unavailable = fetched.iter().filter(|f| f.is_unavailable()).count();
    if unavailable > 0 {
        debug!(
            unavailable,
            total = commits.len(),
            "Some diffs were unavailable and contribute no data"
        );
    }
    fetched
}

/// Lazily pair commits with their diffs, fetching one batch at a time
///
/// A consumer that stops early never pays for batches it did not reach.
pub fn diffs_in_chunks<'a, S>(
    source: &'a S,
    commits: &'a [CommitRecord],
    chunk: usize,
) -> impl Iterator<Item = (&'a CommitRecord, DiffFetch)> + 'a
where
    S: HistorySource + ?Sized,
{
    commits.chunks(chunk.max(1)).flat_map(move |batch| {
        let fetched = fetch_diffs(source, batch);
        batch.iter().zip(fetched)
    })
}
