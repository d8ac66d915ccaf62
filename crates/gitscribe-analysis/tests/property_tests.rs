// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for gitscribe-analysis
//!
//! These tests drive the analyzers with generated histories held in a
//! `MemorySource` and check the invariants every report must keep.

use std::collections::HashSet;

use chrono::{FixedOffset, TimeZone};
use gitscribe_analysis::churn::{FileChurn, rank_by_activity, rank_by_volume};
use gitscribe_analysis::{
    AnalysisOptions, ArchitectureOptions, BreakingOptions, ChurnOptions, EventKind,
    EvidenceKind, TimelineOptions, analyze_all, build_timeline, compute_churn,
    detect_breaking_changes, track_architecture,
};
use gitscribe_git::{CommitRecord, DiffStat, MemorySource};
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn commit(i: usize, message: &str) -> CommitRecord {
    let utc = FixedOffset::east_opt(0).expect("offset");
    let when = utc
        .timestamp_opt(1_767_225_600 - i as i64 * 60, 0)
        .single()
        .expect("timestamp");
    CommitRecord::new(
        format!("{:040x}", i + 1),
        "Prop Author",
        "prop@example.com",
        when,
        message,
        vec![],
    )
}

/// A generated commit: message plus an optional diff
#[derive(Debug, Clone)]
struct GenCommit {
    message: String,
    diff: Option<Vec<DiffStat>>,
}

fn message_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("feat: add parser".to_string()),
        Just("feat(api)!: drop v1".to_string()),
        Just("fix: BREAKING CHANGE in config".to_string()),
        Just("breaking: remove flag".to_string()),
        Just("Refactor loader\n\nBREAKING CHANGE: new layout".to_string()),
        Just("update readme".to_string()),
        Just("tweak".to_string()),
        Just("".to_string()),
        "[a-z ]{0,40}",
    ]
}

fn diff_strategy() -> impl Strategy<Value = Option<Vec<DiffStat>>> {
    let stat = (
        prop_oneof![
            Just("README.md"),
            Just("src/lib.rs"),
            Just("src/core/mod.rs"),
            Just("docs/guide.md"),
            Just("tests/it.rs"),
        ],
        0usize..2000,
        0usize..2000,
    )
        .prop_map(|(path, ins, del)| DiffStat::new(path, ins, del));
    proptest::option::weighted(0.85, prop::collection::vec(stat, 0..4))
}

fn history_strategy() -> impl Strategy<Value = Vec<GenCommit>> {
    prop::collection::vec(
        (message_strategy(), diff_strategy()).prop_map(|(message, diff)| GenCommit { message, diff }),
        0..40,
    )
}

fn build(history: &[GenCommit]) -> (Vec<CommitRecord>, MemorySource) {
    let commits: Vec<CommitRecord> = history
        .iter()
        .enumerate()
        .map(|(i, g)| commit(i, &g.message))
        .collect();
    let source = commits
        .iter()
        .zip(history)
        .fold(MemorySource::new(), |source, (c, g)| match &g.diff {
            Some(diff) => source.with_diff(c.sha.clone(), diff.clone()),
            None => source,
        });
    (commits, source)
}

// ============================================================================
// Breaking changes
// ============================================================================

proptest! {
    /// Property: a commit is reported at most once, and only if it was scanned
    #[test]
    fn prop_breaking_at_most_once_per_commit(history in history_strategy()) {
        let (commits, source) = build(&history);
        let found = detect_breaking_changes(&source, &commits, &BreakingOptions::default());

        let shas: HashSet<&str> = found.iter().map(|b| b.commit_sha.as_str()).collect();
        prop_assert_eq!(shas.len(), found.len());
        let scanned: HashSet<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
        prop_assert!(shas.is_subset(&scanned));
    }

    /// Property: keyword evidence always wins over the other rules
    #[test]
    fn prop_keyword_precedence(
        subject in prop_oneof![Just("feat!: x"), Just("refactor(core)!: y"), Just("cleanup")],
        deletions in 0usize..5000,
    ) {
        let c = commit(0, &format!("{subject}\n\nBREAKING CHANGE: removed things"));
        let source = MemorySource::new()
            .with_diff(c.sha.clone(), vec![DiffStat::new("src/a.rs", 0, deletions)]);
        let found = detect_breaking_changes(&source, &[c], &BreakingOptions::default());
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(found[0].evidence, EvidenceKind::ExplicitKeyword);
    }

    /// Property: fewer deletions than the threshold never trigger the heuristic
    #[test]
    fn prop_below_threshold_never_large_deletion(deletions in 0usize..500, insertions in 0usize..100) {
        let c = commit(0, "cleanup");
        let source = MemorySource::new()
            .with_diff(c.sha.clone(), vec![DiffStat::new("src/a.rs", insertions, deletions)]);
        prop_assert!(detect_breaking_changes(&source, &[c], &BreakingOptions::default()).is_empty());
    }
}

#[test]
fn test_large_deletion_examples() {
    let flagged = commit(0, "remove old engine");
    let spared = commit(1, "remove old engine");
    let source = MemorySource::new()
        .with_diff(flagged.sha.clone(), vec![DiffStat::new("engine.rs", 100, 1000)])
        .with_diff(spared.sha.clone(), vec![DiffStat::new("engine.rs", 0, 499)]);

    let found = detect_breaking_changes(&source, &[flagged.clone(), spared], &BreakingOptions::default());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].commit_sha, flagged.sha);
    assert_eq!(found[0].evidence, EvidenceKind::LargeDeletionHeuristic);
}

// ============================================================================
// Churn
// ============================================================================

proptest! {
    /// Property: the report is a pure function of its input
    #[test]
    fn prop_churn_is_idempotent(history in history_strategy()) {
        let (commits, source) = build(&history);
        let options = ChurnOptions { top_files: 3, top_dirs: 2, ..Default::default() };
        let first = compute_churn(&source, &commits, &options);
        let second = compute_churn(&source, &commits, &options);
        prop_assert_eq!(first.clone(), second);
        prop_assert!(first.file_churns.len() <= 3);
        prop_assert!(first.dir_churns.len() <= 2);
        prop_assert!(first.dir_churns.iter().all(|d| !d.dir.is_empty()));
    }

    /// Property: final ranking is ordered by (total_changes, commit_count) descending
    #[test]
    fn prop_churn_final_order(history in history_strategy()) {
        let (commits, source) = build(&history);
        let report = compute_churn(&source, &commits, &ChurnOptions::default());
        for pair in report.file_churns.windows(2) {
            prop_assert!(
                (pair[0].total_changes, pair[0].commit_count)
                    >= (pair[1].total_changes, pair[1].commit_count)
            );
        }
        for path in &report.unstable_paths {
            prop_assert!(report.file_churns.iter().any(|f| &f.path == path));
        }
    }
}

#[test]
fn test_two_stage_ranking_scenario() {
    let file = |path: &str, commit_count: usize, total_changes: usize| FileChurn {
        path: path.to_string(),
        commit_count,
        total_insertions: total_changes,
        total_deletions: 0,
        total_changes,
    };
    let a = file("a", 3, 10_000);
    let b = file("b", 50, 200);

    let pool = rank_by_activity(vec![b, a], 1);
    assert_eq!(pool.len(), 2, "both files fit in the doubled pool");
    assert_eq!(pool[0].path, "a");

    let winner = rank_by_volume(pool, 1);
    assert_eq!(winner.len(), 1);
    assert_eq!(winner[0].path, "a");
}

// ============================================================================
// Timeline
// ============================================================================

#[test]
fn test_timeline_size_filter_only_applies_to_other() {
    let doc = commit(0, "update readme");
    let other = commit(1, "tweak");
    let source = MemorySource::new()
        .with_diff(doc.sha.clone(), vec![DiffStat::new("README.md", 3, 2)])
        .with_diff(other.sha.clone(), vec![DiffStat::new("src/a.rs", 3, 2)]);

    let events = build_timeline(
        &source,
        &[doc.clone(), other],
        &HashSet::new(),
        &TimelineOptions::default(),
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].commit_sha, doc.sha);
    assert_eq!(events[0].kind, EventKind::Doc);
}

proptest! {
    /// Property: events keep input order and never exceed the cap
    #[test]
    fn prop_timeline_order_and_cap(history in history_strategy(), max_events in 1usize..20) {
        let (commits, source) = build(&history);
        let options = TimelineOptions { max_events, ..Default::default() };
        let events = build_timeline(&source, &commits, &HashSet::new(), &options);

        prop_assert!(events.len() <= max_events);
        let positions: Vec<usize> = events
            .iter()
            .map(|e| commits.iter().position(|c| c.sha == e.commit_sha).expect("scanned commit"))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(events.iter().all(|e| e.kind != EventKind::Release));
    }
}

// ============================================================================
// Architecture
// ============================================================================

proptest! {
    /// Property: snapshots are chronological whatever the tag placement
    #[test]
    fn prop_snapshots_oldest_first(
        total in 1usize..60,
        tagged in prop::collection::vec(0usize..60, 0..6),
        sample_count in 1usize..25,
    ) {
        let mut commits: Vec<CommitRecord> = (0..total).map(|i| commit(i, "c")).collect();
        let mut tag_shas = HashSet::new();
        for (n, position) in tagged.into_iter().filter(|p| *p < total).enumerate() {
            commits[position].tags.insert(format!("v0.{n}"));
            tag_shas.insert(commits[position].sha.clone());
        }
        let source = commits.iter().fold(MemorySource::new(), |s, c| {
            s.with_tree(c.sha.clone(), ["src/lib.rs"])
        });

        let options = ArchitectureOptions { sample_count, ..Default::default() };
        let evolution = track_architecture(&source, &commits, &tag_shas, &options);

        let ranks: Vec<usize> = evolution
            .snapshots
            .iter()
            .map(|s| commits.iter().position(|c| c.sha == s.rev).expect("scanned commit"))
            .collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] > w[1]));
        prop_assert_eq!(evolution.current().map(|s| s.rev.as_str()), Some(commits[0].sha.as_str()));
    }
}

#[test]
fn test_structural_event_once_per_commit() {
    let import = commit(0, "import services");
    let root = commit(1, "init");
    let added: Vec<DiffStat> = (0..50)
        .map(|i| DiffStat::new(format!("{}/file{i}.rs", ["alpha", "beta", "gamma"][i % 3]), 10, 0))
        .collect();
    let source = MemorySource::new()
        .with_tree(root.sha.clone(), ["src/main.rs"])
        .with_diff(root.sha.clone(), vec![DiffStat::new("src/main.rs", 5, 0)])
        .with_diff(import.sha.clone(), added);

    let evolution = track_architecture(
        &source,
        &[import.clone(), root],
        &HashSet::new(),
        &ArchitectureOptions::default(),
    );
    let for_import = evolution
        .structural_events
        .iter()
        .filter(|e| e.commit_sha == import.sha)
        .count();
    assert_eq!(for_import, 1);
    assert_eq!(evolution.structural_events.len(), 1);
}

// ============================================================================
// Empty input
// ============================================================================

#[test]
fn test_empty_history_yields_empty_facts() {
    let facts = analyze_all(
        &MemorySource::new(),
        &[],
        &HashSet::new(),
        &AnalysisOptions::default(),
    );
    assert!(facts.breaking.is_empty());
    assert!(facts.churn.file_churns.is_empty());
    assert!(facts.churn.dir_churns.is_empty());
    assert!(facts.churn.unstable_paths.is_empty());
    assert!(facts.timeline.is_empty());
    assert!(facts.architecture.snapshots.is_empty());
    assert!(facts.architecture.file_lifetime.is_empty());
    assert!(facts.architecture.structural_events.is_empty());
}
