// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! DEVELOPMENT.md: notable commits grouped by event kind

use std::collections::BTreeMap;

use gitscribe_analysis::{EventKind, TimelineEvent};

use super::{escape_md, finish};

/// Render DEVELOPMENT.md from newest-first timeline events
#[must_use]
pub fn development(events: &[TimelineEvent], name: &str) -> String {
    let mut lines = vec![
        "# Development timeline".to_string(),
        String::new(),
        format!(
            "Chronological view of notable development events for **{name}**, \
             derived from commit history (messages and change scope)."
        ),
        String::new(),
        "---".to_string(),
        String::new(),
        "## Summary by type".to_string(),
        String::new(),
    ];

    let mut counts: BTreeMap<EventKind, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.kind).or_default() += 1;
    }
    if counts.is_empty() {
        lines.push("No notable commits found.".to_string());
    }
    // EventKind orders by priority
    for (kind, count) in &counts {
        lines.push(format!("- **{kind}**: {count} notable commit(s)"));
    }
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Timeline (newest first)".to_string());
    lines.push(String::new());

    for event in events {
        lines.push(format!(
            "### {} - {} **[{}]**",
            event.date.format("%Y-%m-%d"),
            event.short_sha,
            event.kind
        ));
        lines.push(String::new());
        lines.push(escape_md(&event.subject));
        lines.push(String::new());
        if !event.tags.is_empty() {
            lines.push(format!("Tags: `{}`", event.tags.join("`, `")));
            lines.push(String::new());
        }
        lines.push(format!("Scope: {}", event.change_scope));
        lines.push(String::new());
        if !event.body_snippet.is_empty() {
            lines.push("<details>".to_string());
            lines.push("<summary>Commit body</summary>".to_string());
            lines.push(String::new());
            lines.push(event.body_snippet.clone());
            lines.push(String::new());
            lines.push("</details>".to_string());
            lines.push(String::new());
        }
        lines.push("---".to_string());
        lines.push(String::new());
    }

    lines.push("*Generated from Git commits. Deterministic; no LLM inference.*".to_string());
    finish(lines)
}
