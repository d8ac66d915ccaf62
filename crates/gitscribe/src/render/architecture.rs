// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! ARCHITECTURE.md: current layout, sampled snapshots and structural changes

use gitscribe_analysis::{ArchitectureEvolution, ArchitectureSnapshot};
use gitscribe_git::commit::short_sha;

use super::finish;

const MAX_HISTORY_SNAPSHOTS: usize = 10;
const MAX_STRUCTURAL_EVENTS: usize = 15;

/// Render ARCHITECTURE.md
///
/// The last snapshot is the current structure; up to ten snapshots before it
/// are listed oldest first.
#[must_use]
pub fn architecture(evolution: &ArchitectureEvolution, name: &str) -> String {
    let mut lines = vec![
        "# Architecture".to_string(),
        String::new(),
        format!(
            "Module and directory structure of **{name}**, inferred from Git history. \
             This document reflects how the codebase was organized at key points in time."
        ),
        String::new(),
        "---".to_string(),
        String::new(),
        "## Current structure".to_string(),
        String::new(),
    ];

    match evolution.current() {
        Some(current) => {
            lines.push(format!("As of `{}` ({}):", current.rev_display, current.date.format("%Y-%m-%d")));
            lines.push(String::new());
            push_summary(&mut lines, current);
            lines.push("| Module | Files |".to_string());
            lines.push("|--------|-------|".to_string());
            for (module, count) in &current.file_counts {
                lines.push(format!("| `{module}` | {count} |"));
            }
            lines.push(String::new());
        }
        None => {
            lines.push("No revision data available.".to_string());
            lines.push(String::new());
        }
    }

    let earlier = match evolution.snapshots.split_last() {
        Some((_, earlier)) => earlier,
        None => &[],
    };
    if !earlier.is_empty() {
        lines.push("## Evolution over time".to_string());
        lines.push(String::new());
        lines.push("Snapshots at tagged or sampled revisions:".to_string());
        lines.push(String::new());
        let skip = earlier.len().saturating_sub(MAX_HISTORY_SNAPSHOTS);
        for snapshot in &earlier[skip..] {
            lines.push(format!(
                "### At {} ({})",
                snapshot.rev_display,
                snapshot.date.format("%Y-%m-%d")
            ));
            lines.push(String::new());
            push_summary(&mut lines, snapshot);
            for (module, count) in &snapshot.file_counts {
                lines.push(format!("- `{module}`: {count} files"));
            }
            lines.push(String::new());
        }
    }

    if !evolution.structural_events.is_empty() {
        lines.push("## Notable structural changes".to_string());
        lines.push(String::new());
        for event in evolution.structural_events.iter().take(MAX_STRUCTURAL_EVENTS) {
            lines.push(format!(
                "- {} (commit `{}`)",
                event.description,
                short_sha(&event.commit_sha)
            ));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("*Generated from Git tree and commit history. No external APIs used.*".to_string());
    finish(lines)
}

fn push_summary(lines: &mut Vec<String>, snapshot: &ArchitectureSnapshot) {
    let dirs = if snapshot.top_level_dirs.is_empty() {
        "(none)".to_string()
    } else {
        snapshot.top_level_dirs.join(", ")
    };
    lines.push(format!("- **Total files:** {}", snapshot.total_files));
    lines.push(format!("- **Top-level entries:** {dirs}"));
    lines.push(String::new());
}
