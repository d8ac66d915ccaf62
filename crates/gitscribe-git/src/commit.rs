//! Commit, diff and tag records produced by a history scan

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Number of hex characters shown for abbreviated SHAs
pub const SHORT_SHA_LEN: usize = 7;

/// One commit on the first-parent history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit SHA (40 hex characters)
    pub sha: String,
    /// Abbreviated SHA for display
    pub short_sha: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp, in the author's recorded offset
    pub authored_at: DateTime<FixedOffset>,
    /// Committer name
    pub committer_name: String,
    /// Committer timestamp
    pub committed_at: DateTime<FixedOffset>,
    /// First line of the message, trimmed
    pub message_subject: String,
    /// Remainder of the message, trimmed
    pub message_body: String,
    /// Parent commit SHAs, first parent first
    pub parent_shas: Vec<String>,
    /// Tag names pointing at this commit
    pub tags: BTreeSet<String>,
    /// Local branches whose tip is this commit
    pub branches: BTreeSet<String>,
}

impl CommitRecord {
    /// Build a record from a raw message, splitting subject and body
    ///
    /// Refs are left empty; they are joined in a second pass once the whole
    /// history is known.
    #[must_use]
    pub fn new(
        sha: impl Into<String>,
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        authored_at: DateTime<FixedOffset>,
        message: &str,
        parent_shas: Vec<String>,
    ) -> Self {
        let sha = sha.into();
        let author_name = author_name.into();
        let (message_subject, message_body) = split_message(message);
        Self {
            short_sha: short_sha(&sha).to_string(),
            sha,
            committer_name: author_name.clone(),
            author_name,
            author_email: author_email.into(),
            authored_at,
            committed_at: authored_at,
            message_subject,
            message_body,
            parent_shas,
            tags: BTreeSet::new(),
            branches: BTreeSet::new(),
        }
    }

    /// Validate that a SHA is a valid 40-character hex string
    #[must_use]
    pub fn is_valid_sha(sha: &str) -> bool {
        sha.len() == 40 && sha.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Check if this is a merge commit (has multiple parents)
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parent_shas.len() > 1
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_shas.is_empty()
    }

    /// Check if at least one tag points at this commit
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// First tag name in sorted order, if any
    #[must_use]
    pub fn first_tag(&self) -> Option<&str> {
        self.tags.iter().next().map(String::as_str)
    }

    /// Subject and body joined by a newline
    #[must_use]
    pub fn full_message(&self) -> String {
        format!("{}\n{}", self.message_subject, self.message_body)
    }

    /// Author date formatted as `YYYY-MM-DD`
    #[must_use]
    pub fn date_label(&self) -> String {
        self.authored_at.format("%Y-%m-%d").to_string()
    }
}

/// Abbreviate a SHA to its display prefix
#[must_use]
pub fn short_sha(sha: &str) -> &str {
    sha.get(..SHORT_SHA_LEN).unwrap_or(sha)
}

/// Split a raw commit message into a trimmed subject and body
#[must_use]
pub fn split_message(message: &str) -> (String, String) {
    match message.split_once('\n') {
        Some((subject, body)) => (subject.trim().to_string(), body.trim().to_string()),
        None => (message.trim().to_string(), String::new()),
    }
}

/// Per-file change statistics of one commit against its first parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStat {
    /// Current path of the file
    pub path: String,
    /// Lines added (zero for binary files)
    pub insertions: usize,
    /// Lines removed (zero for binary files)
    pub deletions: usize,
    /// Whether line counts were unavailable because the file is binary
    pub is_binary: bool,
    /// Previous path, for detected renames only
    pub renamed_from: Option<String>,
}

impl DiffStat {
    /// A text file change
    #[must_use]
    pub fn new(path: impl Into<String>, insertions: usize, deletions: usize) -> Self {
        Self {
            path: path.into(),
            insertions,
            deletions,
            is_binary: false,
            renamed_from: None,
        }
    }

    /// A binary file change; line counts are unknown and reported as zero
    #[must_use]
    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            is_binary: true,
            ..Self::new(path, 0, 0)
        }
    }

    /// Mark this change as a rename from `from`
    #[must_use]
    pub fn renamed_from(mut self, from: impl Into<String>) -> Self {
        self.renamed_from = Some(from.into());
        self
    }

    /// Insertions plus deletions
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.insertions + self.deletions
    }
}

/// A tag reference and, when it resolves, the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Tag name without the `refs/tags/` prefix
    pub name: String,
    /// Commit the tag peels to, `None` when resolution failed
    pub target_sha: Option<String>,
    /// Whether this is an annotated tag object
    pub is_annotated: bool,
    /// Tagger name (annotated tags only)
    pub tagger: Option<String>,
    /// Tagger timestamp (annotated tags only)
    pub tagged_at: Option<DateTime<FixedOffset>>,
    /// Tag message (annotated tags only)
    pub tag_message: Option<String>,
}

impl TagRecord {
    /// A lightweight tag pointing at `target_sha`
    #[must_use]
    pub fn lightweight(name: impl Into<String>, target_sha: Option<String>) -> Self {
        Self {
            name: name.into(),
            target_sha,
            is_annotated: false,
            tagger: None,
            tagged_at: None,
            tag_message: None,
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy to generate valid 40-character hex SHA strings
    fn sha_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[0-9a-f]{40}").expect("valid regex")
    }

    proptest! {
        /// Property: the subject never contains a newline and is trimmed
        #[test]
        fn prop_subject_is_single_trimmed_line(message in ".*(\n.*){0,3}") {
            let (subject, body) = split_message(&message);
            prop_assert!(!subject.contains('\n'));
            prop_assert_eq!(subject.trim(), subject.as_str());
            prop_assert_eq!(body.trim(), body.as_str());
        }

        /// Property: short_sha is a prefix of the sha of at most 7 characters
        #[test]
        fn prop_short_sha_is_prefix(sha in sha_strategy()) {
            let short = short_sha(&sha);
            prop_assert_eq!(short.len(), SHORT_SHA_LEN);
            prop_assert!(sha.starts_with(short));
        }

        /// Property: is_valid_sha rejects strings of wrong length
        #[test]
        fn prop_invalid_sha_wrong_length(
            prefix in "[0-9a-f]{0,39}",
            suffix in "[0-9a-f]{0,10}"
        ) {
            let combined = format!("{}{}", prefix, suffix);
            if combined.len() != 40 {
                prop_assert!(!CommitRecord::is_valid_sha(&combined));
            }
        }
    }
}
