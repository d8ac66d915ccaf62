// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Small string helpers shared by the analyzers

use std::borrow::Cow;

/// Marker appended to shortened snippets
pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_chars` characters, ending on a word boundary
///
/// The text is trimmed first. When it is still too long, it is cut so that the
/// ellipsis fits, any partial word left at the cut is dropped, and
/// [`ELLIPSIS`] is appended. A single word longer than the budget is cut hard.
/// Budgets too small to hold the ellipsis get a hard cut with no marker.
#[must_use]
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let cut = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
    let mut head = &text[..cut];

    if !text[cut..].starts_with(char::is_whitespace) {
        if let Some(space) = head.rfind(char::is_whitespace) {
            head = &head[..space];
        }
    }

    format!("{}{ELLIPSIS}", head.trim_end())
}

/// First `max_chars` characters of `text`, trimmed, without any marker
#[must_use]
pub fn clip(text: &str, max_chars: usize) -> String {
    let end = text.char_indices().nth(max_chars).map_or(text.len(), |(i, _)| i);
    text[..end].trim().to_string()
}

fn normalize(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// First path segment, or the whole path for root-level files
#[must_use]
pub fn top_level(path: &str) -> String {
    let path = normalize(path);
    match path.split_once('/') {
        Some((head, _)) => head.to_string(),
        None => path.into_owned(),
    }
}

/// Everything before the last separator; empty for root-level files
#[must_use]
pub fn parent_dir(path: &str) -> String {
    let path = normalize(path);
    match path.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_snippet("  short message \n", 200), "short message");
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        let text = "a".repeat(200);
        assert_eq!(truncate_snippet(&text, 200), text);
    }

    #[test]
    fn test_truncate_drops_partial_word() {
        // cut falls inside "jumps"
        let snippet = truncate_snippet("the quick brown fox jumps over", 24);
        assert_eq!(snippet, "the quick brown fox...");
        assert!(snippet.chars().count() <= 24);
    }

    #[test]
    fn test_truncate_cut_on_boundary_keeps_word() {
        let snippet = truncate_snippet("the quick brown fox jumps over", 22);
        assert_eq!(snippet, "the quick brown fox...");
        let snippet = truncate_snippet("alpha beta gamma", 13);
        assert_eq!(snippet, "alpha beta...");
    }

    #[test]
    fn test_truncate_single_long_word() {
        let snippet = truncate_snippet(&"x".repeat(50), 10);
        assert_eq!(snippet, "xxxxxxx...");
    }

    #[test]
    fn test_truncate_tiny_budget_stays_within_limit() {
        assert_eq!(truncate_snippet("breaking change", 0), "");
        assert_eq!(truncate_snippet("breaking change", 2), "br");
        assert_eq!(truncate_snippet("breaking change", 3), "bre");
        assert_eq!(truncate_snippet("breaking change", 4), "b...");
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "é".repeat(300);
        let snippet = truncate_snippet(&text, 200);
        assert_eq!(snippet.chars().count(), 200);
        assert!(snippet.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("  body text  ", 300), "body text");
        assert_eq!(clip("abcdef", 3), "abc");
        assert_eq!(clip("ab ", 3), "ab");
    }

    #[test]
    fn test_top_level() {
        assert_eq!(top_level("src/analysis/mod.rs"), "src");
        assert_eq!(top_level("README.md"), "README.md");
        assert_eq!(top_level("docs\\guide.md"), "docs");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("src/analysis/mod.rs"), "src/analysis");
        assert_eq!(parent_dir("src/lib.rs"), "src");
        assert_eq!(parent_dir("Cargo.toml"), "");
    }
}
