// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Development timeline
//!
//! Commits are classified into event kinds by keyword and filtered down to the
//! notable ones. Input order is kept, so a newest-first history yields a
//! newest-first timeline.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use gitscribe_git::{CommitRecord, DiffTotals, HistorySource};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetch::{FETCH_CHUNK, diffs_in_chunks};
use crate::text::clip;

/// Kind of development event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A tagged commit
    Release,
    /// New functionality
    Feature,
    /// Restructuring
    Refactor,
    /// Bug fix
    Fix,
    /// Documentation
    Doc,
    /// Performance work
    Perf,
    /// Tests and CI
    Test,
    /// Maintenance
    Chore,
    /// No keyword matched
    Other,
}

impl EventKind {
    /// All kinds in classification priority order
    pub const ALL: [EventKind; 9] = [
        Self::Release,
        Self::Feature,
        Self::Refactor,
        Self::Fix,
        Self::Doc,
        Self::Perf,
        Self::Test,
        Self::Chore,
        Self::Other,
    ];

    /// Lower-case name used in reports
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Feature => "feature",
            Self::Refactor => "refactor",
            Self::Fix => "fix",
            Self::Doc => "doc",
            Self::Perf => "perf",
            Self::Test => "test",
            Self::Chore => "chore",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword classes checked against the lower-cased subject, in priority order
pub const KIND_KEYWORDS: [(EventKind, &[&str]); 7] = [
    (
        EventKind::Feature,
        &["feat", "feature", "add", "implement", "support", "introduce"],
    ),
    (
        EventKind::Refactor,
        &["refactor", "rework", "restructure", "migrate", "move", "extract", "simplify"],
    ),
    (EventKind::Fix, &["fix", "bugfix", "patch", "correct", "resolve"]),
    (EventKind::Doc, &["doc", "readme", "changelog", "documentation"]),
    (EventKind::Perf, &["perf", "performance", "optimize", "speed"]),
    (EventKind::Test, &["test", "tests", "ci", "coverage"]),
    (
        EventKind::Chore,
        &["chore", "deps", "dependencies", "bump", "style", "lint"],
    ),
];

/// One notable commit on the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Full commit SHA
    pub commit_sha: String,
    /// Abbreviated SHA
    pub short_sha: String,
    /// Author date
    pub date: DateTime<FixedOffset>,
    /// Event classification
    pub kind: EventKind,
    /// Commit subject, or `(no subject)`
    pub subject: String,
    /// Start of the commit body
    pub body_snippet: String,
    /// Tags on the commit
    pub tags: Vec<String>,
    /// `"{files} files, +{insertions} -{deletions}"`
    pub change_scope: String,
    /// Files touched
    pub files: usize,
    /// Lines added
    pub insertions: usize,
    /// Lines removed
    pub deletions: usize,
}

/// Limits for the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineOptions {
    /// Stop once this many events have been produced
    pub max_events: usize,
    /// Unclassified, untagged commits smaller than this are dropped
    pub min_diff_lines: usize,
    /// Body snippet length in characters
    pub body_snippet_len: usize,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            max_events: 150,
            min_diff_lines: 30,
            body_snippet_len: 300,
        }
    }
}

/// Classify a commit; only the subject line is inspected for keywords
#[must_use]
pub fn classify(commit: &CommitRecord, tag_shas: &HashSet<String>) -> EventKind {
    if tag_shas.contains(&commit.sha) && commit.is_tagged() {
        return EventKind::Release;
    }
    let subject = commit.message_subject.to_lowercase();
    KIND_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| subject.contains(w)))
        .map_or(EventKind::Other, |(kind, _)| *kind)
}

/// Format a change-scope summary
#[must_use]
pub fn change_scope(totals: DiffTotals) -> String {
    format!(
        "{} files, +{} -{}",
        totals.files, totals.insertions, totals.deletions
    )
}

/// Build the timeline from a newest-first commit sequence
///
/// Diffs are fetched a batch at a time; once `max_events` events exist no
/// further batches are requested.
pub fn build_timeline<S>(
    source: &S,
    commits: &[CommitRecord],
    tag_shas: &HashSet<String>,
    options: &TimelineOptions,
) -> Vec<TimelineEvent>
where
    S: HistorySource + ?Sized,
{
    if options.max_events == 0 {
        return Vec::new();
    }

    let mut events = Vec::new();
    for (commit, diff) in diffs_in_chunks(source, commits, FETCH_CHUNK) {
        let kind = classify(commit, tag_shas);
        let totals = diff.totals().unwrap_or_default();

        if kind == EventKind::Other
            && !commit.is_tagged()
            && totals.changed_lines() < options.min_diff_lines
        {
            continue;
        }

        let subject = if commit.message_subject.is_empty() {
            "(no subject)".to_string()
        } else {
            commit.message_subject.clone()
        };

        events.push(TimelineEvent {
            commit_sha: commit.sha.clone(),
            short_sha: commit.short_sha.clone(),
            date: commit.authored_at,
            kind,
            subject,
            body_snippet: clip(&commit.message_body, options.body_snippet_len),
            tags: commit.tags.iter().cloned().collect(),
            change_scope: change_scope(totals),
            files: totals.files,
            insertions: totals.insertions,
            deletions: totals.deletions,
        });
        if events.len() >= options.max_events {
            break;
        }
    }

    debug!(
        commits = commits.len(),
        events = events.len(),
        "Timeline built"
    );
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit, commit_with_body, tagged};
    use gitscribe_git::{DiffStat, MemorySource};
    use similar_asserts::assert_eq;

    fn small_diff(source: MemorySource, sha: &str, lines: usize) -> MemorySource {
        source.with_diff(sha.to_string(), vec![DiffStat::new("README.md", lines, 0)])
    }

    #[test]
    fn test_keyword_priority() {
        let none = HashSet::new();
        let cases = [
            ("Add parser", EventKind::Feature),
            ("fix: refactor broken feature flag", EventKind::Feature),
            ("Refactor and fix loader", EventKind::Refactor),
            ("Resolve crash", EventKind::Fix),
            ("update readme", EventKind::Doc),
            ("Optimize hot loop", EventKind::Perf),
            ("more coverage", EventKind::Test),
            ("bump serde", EventKind::Chore),
            ("tweak", EventKind::Other),
            ("", EventKind::Other),
        ];
        for (subject, expected) in cases {
            assert_eq!(classify(&commit(0, subject), &none), expected, "{subject:?}");
        }
    }

    #[test]
    fn test_body_is_not_classified() {
        let c = commit_with_body(0, "tweak", "fix the feature docs");
        assert_eq!(classify(&c, &HashSet::new()), EventKind::Other);
    }

    #[test]
    fn test_release_needs_tag_set_membership() {
        let c = tagged(commit(0, "fix: last bug"), "v1.0.0");
        assert_eq!(classify(&c, &HashSet::new()), EventKind::Fix);
        let tags: HashSet<String> = [c.sha.clone()].into();
        assert_eq!(classify(&c, &tags), EventKind::Release);
    }

    #[test]
    fn test_small_doc_kept_small_other_dropped() {
        let commits = vec![commit(0, "update readme"), commit(1, "tweak")];
        let source = small_diff(small_diff(MemorySource::new(), &commits[0].sha, 5), &commits[1].sha, 5);

        let events = build_timeline(&source, &commits, &HashSet::new(), &TimelineOptions::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Doc);
        assert_eq!(events[0].change_scope, "1 files, +5 -0");
    }

    #[test]
    fn test_large_other_and_tagged_other_are_kept() {
        let commits = vec![
            commit(0, "tweak"),
            tagged(commit(1, "misc"), "nightly"),
            commit(2, "tweak again"),
        ];
        let source = small_diff(MemorySource::new(), &commits[0].sha, 30);

        let events = build_timeline(&source, &commits, &HashSet::new(), &TimelineOptions::default());
        let shas: Vec<&str> = events.iter().map(|e| e.commit_sha.as_str()).collect();
        assert_eq!(shas, vec![commits[0].sha.as_str(), commits[1].sha.as_str()]);
        assert_eq!(events[1].kind, EventKind::Other);
        assert_eq!(events[1].change_scope, "0 files, +0 -0");
        assert_eq!(events[1].tags, vec!["nightly".to_string()]);
    }

    #[test]
    fn test_cap_stops_iteration() {
        let commits: Vec<CommitRecord> = (0..500).map(|i| commit(i, "feat: thing")).collect();
        let options = TimelineOptions {
            max_events: 10,
            ..Default::default()
        };
        let events = build_timeline(&MemorySource::new(), &commits, &HashSet::new(), &options);
        assert_eq!(events.len(), 10);
        assert_eq!(events[9].commit_sha, commits[9].sha);
    }

    #[test]
    fn test_event_fields() {
        let c = commit_with_body(3, "", &"x".repeat(400));
        let source = MemorySource::new().with_diff(
            c.sha.clone(),
            vec![DiffStat::new("a", 20, 5), DiffStat::new("b", 10, 0)],
        );
        let events = build_timeline(&source, &[c.clone()], &HashSet::new(), &TimelineOptions::default());
        let event = &events[0];
        assert_eq!(event.subject, "(no subject)");
        assert_eq!(event.body_snippet.chars().count(), 300);
        assert_eq!(event.change_scope, "2 files, +30 -5");
        assert_eq!((event.files, event.insertions, event.deletions), (2, 30, 5));
        assert_eq!(event.date, c.authored_at);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&EventKind::Release).expect("serialize");
        assert_eq!(json, "\"release\"");
        assert_eq!(EventKind::Perf.to_string(), "perf");
    }

    #[test]
    fn test_empty_history() {
        assert!(build_timeline(&MemorySource::new(), &[], &HashSet::new(), &TimelineOptions::default()).is_empty());
    }
}
