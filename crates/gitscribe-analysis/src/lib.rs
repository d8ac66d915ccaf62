// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Deterministic analyzers over a repository's commit history
//!
//! Four independent passes turn a newest-first sequence of commits into
//! derived facts:
//!
//! - [`breaking`]: commits that break a public contract, with one reason each
//! - [`churn`]: ranked file and directory churn plus "unstable" paths
//! - [`timeline`]: notable commits classified into event kinds
//! - [`architecture`]: sampled structure snapshots and a path lifecycle log
//!
//! Every pass reads the same [`HistorySource`] and shares no mutable state with
//! the others, so [`analyze_all`] runs them concurrently.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use gitscribe_analysis::{AnalysisOptions, analyze_all};
//! use gitscribe_git::MemorySource;
//!
//! let source = MemorySource::new();
//! let facts = analyze_all(&source, &[], &HashSet::new(), &AnalysisOptions::default());
//! assert!(facts.breaking.is_empty());
//! assert!(facts.timeline.is_empty());
//! ```

#![warn(missing_docs)]

pub mod architecture;
pub mod breaking;
pub mod churn;
pub mod fetch;
pub mod sampling;
pub mod text;
pub mod timeline;

use std::collections::HashSet;

use gitscribe_git::{CommitRecord, HistorySource};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use architecture::{
    ArchitectureEvolution, ArchitectureOptions, ArchitectureSnapshot, LifecycleAction,
    LifecycleEntry, StructuralEvent, StructuralKind, track_architecture,
};
pub use breaking::{
    BreakingChange, BreakingOptions, DEFAULT_RULE_ORDER, EvidenceKind, detect_breaking_changes,
};
pub use churn::{ChurnOptions, ChurnReport, DirectoryChurn, FileChurn, compute_churn};
pub use timeline::{EventKind, KIND_KEYWORDS, TimelineEvent, TimelineOptions, build_timeline};

/// Options for every analyzer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Breaking-change thresholds
    pub breaking: BreakingOptions,
    /// Churn ranking limits
    pub churn: ChurnOptions,
    /// Timeline limits
    pub timeline: TimelineOptions,
    /// Architecture sampling and caps
    pub architecture: ArchitectureOptions,
}

/// All derived facts for one history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFacts {
    /// Breaking changes in input order
    pub breaking: Vec<BreakingChange>,
    /// Churn report
    pub churn: ChurnReport,
    /// Timeline events, newest first
    pub timeline: Vec<TimelineEvent>,
    /// Architecture evolution
    pub architecture: ArchitectureEvolution,
}

/// Run all four analyzers concurrently over the same history
pub fn analyze_all<S>(
    source: &S,
    commits: &[CommitRecord],
    tag_shas: &HashSet<String>,
    options: &AnalysisOptions,
) -> HistoryFacts
where
    S: HistorySource + ?Sized,
{
    info!(commits = commits.len(), tags = tag_shas.len(), "Analyzing history");

    let ((breaking, churn), (timeline, architecture)) = rayon::join(
        || {
            rayon::join(
                || detect_breaking_changes(source, commits, &options.breaking),
                || compute_churn(source, commits, &options.churn),
            )
        },
        || {
            rayon::join(
                || build_timeline(source, commits, tag_shas, &options.timeline),
                || track_architecture(source, commits, tag_shas, &options.architecture),
            )
        },
    );

    HistoryFacts {
        breaking,
        churn,
        timeline,
        architecture,
    }
}
