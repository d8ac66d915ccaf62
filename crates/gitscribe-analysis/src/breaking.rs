// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Breaking-change detection
//!
//! Each commit is checked against an ordered list of rules and tagged with the
//! first one that matches. Message rules are pure text checks; the
//! large-deletion rule needs the commit's diff and is only evaluated when the
//! rules before it did not match.

use std::collections::HashSet;
use std::sync::OnceLock;

use gitscribe_git::{CommitRecord, DiffTotals, HistorySource};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::truncate_snippet;

/// The rule that classified a commit as breaking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceKind {
    /// The message says so ("BREAKING CHANGE", "breaking:", ...)
    ExplicitKeyword,
    /// Conventional-commit `type(scope)!:` subject
    ConventionalBang,
    /// Mostly deletions, above a size threshold
    LargeDeletionHeuristic,
}

impl EvidenceKind {
    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ExplicitKeyword => "explicit keyword",
            Self::ConventionalBang => "conventional commit `!`",
            Self::LargeDeletionHeuristic => "large deletion",
        }
    }
}

/// Rule precedence: earlier entries win
pub const DEFAULT_RULE_ORDER: [EvidenceKind; 3] = [
    EvidenceKind::ExplicitKeyword,
    EvidenceKind::ConventionalBang,
    EvidenceKind::LargeDeletionHeuristic,
];

/// A commit judged to break a public contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakingChange {
    /// Full commit SHA
    pub commit_sha: String,
    /// Abbreviated SHA
    pub short_sha: String,
    /// Commit subject
    pub subject: String,
    /// Rule that matched
    pub evidence: EvidenceKind,
    /// Subject and body, shortened at a word boundary
    pub message_snippet: String,
}

/// Thresholds and rule order for the detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakingOptions {
    /// Minimum total deletions for the large-deletion rule
    pub large_deletion_threshold: usize,
    /// Deletions must exceed insertions times this factor
    pub deletion_ratio: usize,
    /// Maximum snippet length in characters
    pub snippet_len: usize,
    /// Rules in evaluation order
    pub rule_order: Vec<EvidenceKind>,
}

impl Default for BreakingOptions {
    fn default() -> Self {
        Self {
            large_deletion_threshold: 500,
            deletion_ratio: 2,
            snippet_len: 200,
            rule_order: DEFAULT_RULE_ORDER.to_vec(),
        }
    }
}

fn keyword_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)\bBREAKING\s+CHANGES?\b",
            r"(?i)\bbreaking\s*:\s*",
            r"(?i)^break(s|ing)?\s*[:\s]",
            r"(?i)\[breaking\s*change\]",
            r"(?i)BREAKING\s*-\s*",
            r"(?i)incompatible\s+change",
            r"(?i)api\s+breaking",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    })
}

fn conventional_bang() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^\w+(\([^)]*\))?!\s*:").expect("valid regex"))
}

/// Whether the subject plus body contains an explicit breaking-change marker
#[must_use]
pub fn has_breaking_keyword(subject: &str, body: &str) -> bool {
    let text = format!("{subject}\n{body}");
    keyword_patterns().iter().any(|p| p.is_match(&text))
}

/// Whether the trimmed subject is a conventional commit with a `!` marker
#[must_use]
pub fn has_conventional_bang(subject: &str) -> bool {
    conventional_bang().is_match(subject.trim())
}

/// Whether a diff is dominated by a large number of deletions
#[must_use]
pub fn is_large_deletion(totals: DiffTotals, options: &BreakingOptions) -> bool {
    totals.deletions >= options.large_deletion_threshold
        && totals.deletions > totals.insertions.saturating_mul(options.deletion_ratio)
}

/// First rule in `options.rule_order` that matches `commit`
///
/// The diff is fetched only if the large-deletion rule is reached; an
/// unavailable diff counts as no evidence.
pub fn classify<S>(source: &S, commit: &CommitRecord, options: &BreakingOptions) -> Option<EvidenceKind>
where
    S: HistorySource + ?Sized,
{
    options.rule_order.iter().copied().find(|kind| match kind {
        EvidenceKind::ExplicitKeyword => {
            has_breaking_keyword(&commit.message_subject, &commit.message_body)
        }
        EvidenceKind::ConventionalBang => has_conventional_bang(&commit.message_subject),
        EvidenceKind::LargeDeletionHeuristic => source
            .diff_stats(&commit.sha)
            .totals()
            .is_some_and(|totals| is_large_deletion(totals, options)),
    })
}

/// Detect breaking changes across `commits`
///
/// At most one result per SHA; results follow input order.
pub fn detect_breaking_changes<S>(
    source: &S,
    commits: &[CommitRecord],
    options: &BreakingOptions,
) -> Vec<BreakingChange>
where
    S: HistorySource + ?Sized,
{
    let mut seen = HashSet::new();
    let unique: Vec<&CommitRecord> = commits
        .iter()
        .filter(|c| seen.insert(c.sha.as_str()))
        .collect();

    let found: Vec<BreakingChange> = unique
        .par_iter()
        .filter_map(|commit| {
            classify(source, commit, options).map(|evidence| BreakingChange {
                commit_sha: commit.sha.clone(),
                short_sha: commit.short_sha.clone(),
                subject: commit.message_subject.clone(),
                evidence,
                message_snippet: truncate_snippet(&commit.full_message(), options.snippet_len),
            })
        })
        .collect();

    debug!(
        commits = commits.len(),
        breaking = found.len(),
        "Breaking-change detection complete"
    );
    found
}
