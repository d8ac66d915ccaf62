// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! SUMMARY.md: churn tables for files, directories and unstable paths

use gitscribe_analysis::ChurnReport;

use super::finish;

const MAX_FILES: usize = 40;
const MAX_DIRS: usize = 20;
const MAX_UNSTABLE: usize = 25;

/// Render SUMMARY.md: churn tables and unstable components
#[must_use]
pub fn summary(churn: &ChurnReport, name: &str) -> String {
    let mut lines = vec![
        "# GitScribe summary report".to_string(),
        String::new(),
        format!(
            "High-churn and frequently changed areas in **{name}**, \
             computed from commit history (deterministic)."
        ),
        String::new(),
        "---".to_string(),
        String::new(),
        "## High-churn files".to_string(),
        String::new(),
        "Files with the most commits and line changes over the project history.".to_string(),
        String::new(),
        "| Path | Commits | Insertions | Deletions | Total changes |".to_string(),
        "|------|---------|------------|-----------|---------------|".to_string(),
    ];
    for file in churn.file_churns.iter().take(MAX_FILES) {
        lines.push(format!(
            "| `{}` | {} | {} | {} | {} |",
            file.path,
            file.commit_count,
            file.total_insertions,
            file.total_deletions,
            file.total_changes
        ));
    }
    lines.push(String::new());

    lines.push("## Directory activity".to_string());
    lines.push(String::new());
    lines.push("| Directory | Commits touching | Total line changes |".to_string());
    lines.push("|-----------|------------------|--------------------|".to_string());
    for dir in churn.dir_churns.iter().take(MAX_DIRS) {
        lines.push(format!(
            "| `{}/` | {} | {} |",
            dir.dir, dir.commit_count, dir.total_changes
        ));
    }
    lines.push(String::new());

    if !churn.unstable_paths.is_empty() {
        lines.push("## Unstable components".to_string());
        lines.push(String::new());
        lines.push(
            "Files changed often with relatively small diffs (possible refactors or volatile logic):"
                .to_string(),
        );
        lines.push(String::new());
        for path in churn.unstable_paths.iter().take(MAX_UNSTABLE) {
            lines.push(format!("- `{path}`"));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("*Generated from Git diff stats. Offline and deterministic.*".to_string());
    finish(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitscribe_analysis::{DirectoryChurn, FileChurn};

    fn file(path: &str) -> FileChurn {
        FileChurn {
            path: path.to_string(),
            commit_count: 12,
            total_insertions: 90,
            total_deletions: 30,
            total_changes: 120,
        }
    }

    #[test]
    fn test_tables() {
        let report = ChurnReport {
            file_churns: vec![file("src/lib.rs")],
            dir_churns: vec![DirectoryChurn {
                dir: "src".into(),
                commit_count: 12,
                total_changes: 120,
            }],
            unstable_paths: vec!["src/lib.rs".into()],
        };
        let doc = summary(&report, "demo");
        assert!(doc.contains("| `src/lib.rs` | 12 | 90 | 30 | 120 |\n"));
        assert!(doc.contains("| `src/` | 12 | 120 |\n"));
        assert!(doc.contains("## Unstable components"));
        assert!(doc.contains("- `src/lib.rs`\n"));
    }

    #[test]
    fn test_row_limits() {
        let report = ChurnReport {
            file_churns: (0..50).map(|i| file(&format!("f{i}.rs"))).collect(),
            dir_churns: vec![],
            unstable_paths: (0..30).map(|i| format!("u{i}.rs")).collect(),
        };
        let doc = summary(&report, "demo");
        assert_eq!(doc.matches("| 12 | 90 | 30 | 120 |").count(), 40);
        assert_eq!(doc.matches("- `u").count(), 25);
    }

    #[test]
    fn test_no_unstable_section_when_empty() {
        let doc = summary(&ChurnReport::default(), "demo");
        assert!(!doc.contains("## Unstable components"));
        assert!(doc.contains("## Directory activity"));
    }
}
