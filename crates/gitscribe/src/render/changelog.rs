// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CHANGELOG.md: release sections built from tags and breaking changes

use std::collections::{BTreeMap, HashMap};

use gitscribe_analysis::BreakingChange;
use gitscribe_git::CommitRecord;

use super::{escape_md, finish};

/// Render CHANGELOG.md
///
/// `commits` is newest first. Each tagged commit opens a release section that
/// holds it and every older commit up to the next older tagged commit.
/// Commits newer than the newest tag form the "Unreleased" section, which
/// holds the whole history when nothing is tagged.
#[must_use]
pub fn changelog(
    commits: &[CommitRecord],
    tags_by_sha: &BTreeMap<String, Vec<String>>,
    breaking: &[BreakingChange],
    name: &str,
) -> String {
    let mut lines = vec![
        "# Changelog".to_string(),
        String::new(),
        format!(
            "All notable changes to **{name}** are documented here. \
             Generated from Git history (tags and commits)."
        ),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    let breaking_by_sha: HashMap<&str, &BreakingChange> = breaking
        .iter()
        .map(|b| (b.commit_sha.as_str(), b))
        .collect();

    let release_starts: Vec<usize> = commits
        .iter()
        .enumerate()
        .filter(|(_, c)| tags_by_sha.contains_key(&c.sha))
        .map(|(i, _)| i)
        .collect();

    for (k, &start) in release_starts.iter().enumerate() {
        let end = release_starts.get(k + 1).copied().unwrap_or(commits.len());
        let tagged = &commits[start];
        let version = tags_by_sha
            .get(&tagged.sha)
            .and_then(|names| names.first())
            .map_or(tagged.short_sha.as_str(), String::as_str);

        lines.push(format!("## [{}] - {}", escape_md(version), tagged.date_label()));
        lines.push(String::new());
        push_changes(&mut lines, &commits[start..end], &breaking_by_sha);
        lines.push("---".to_string());
        lines.push(String::new());
    }

    let unreleased_end = release_starts.first().copied().unwrap_or(commits.len());
    lines.push("## [Unreleased]".to_string());
    lines.push(String::new());
    if unreleased_end == 0 {
        lines.push("No unreleased changes.".to_string());
        lines.push(String::new());
    } else {
        push_changes(&mut lines, &commits[..unreleased_end], &breaking_by_sha);
    }

    finish(lines)
}

fn push_changes(
    lines: &mut Vec<String>,
    range: &[CommitRecord],
    breaking_by_sha: &HashMap<&str, &BreakingChange>,
) {
    let section_breaking: Vec<&BreakingChange> = range
        .iter()
        .filter_map(|c| breaking_by_sha.get(c.sha.as_str()).copied())
        .collect();

    if !section_breaking.is_empty() {
        lines.push("### Breaking changes".to_string());
        lines.push(String::new());
        for b in &section_breaking {
            lines.push(format!("- **{}** (`{}`)", escape_md(&b.subject), b.short_sha));
            let snippet = b.message_snippet.split_whitespace().collect::<Vec<_>>().join(" ");
            if !snippet.is_empty() {
                lines.push(format!("  - {}", escape_md(&snippet)));
            }
        }
        lines.push(String::new());
        lines.push("### Other changes".to_string());
        lines.push(String::new());
    }

    for c in range {
        if breaking_by_sha.contains_key(c.sha.as_str()) {
            continue;
        }
        let subject = if c.message_subject.is_empty() {
            "(no subject)"
        } else {
            c.message_subject.as_str()
        };
        lines.push(format!("- {} (`{}`)", escape_md(subject), c.short_sha));
    }
    lines.push(String::new());
}
