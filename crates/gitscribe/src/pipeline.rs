// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! End-to-end run: open the repository, analyze, render, write
//!
//! The repository is opened before anything else; if that fails no analyzer
//! runs and nothing is written.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use gitscribe_analysis::{HistoryFacts, analyze_all};
use gitscribe_git::{GitError, HistorySource, RepoPool, TagRecord, WalkOptions};
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::render;

/// Changelog file name
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";
/// Architecture document file name
pub const ARCHITECTURE_FILE: &str = "ARCHITECTURE.md";
/// Development timeline file name
pub const DEVELOPMENT_FILE: &str = "DEVELOPMENT.md";
/// Churn summary file name
pub const SUMMARY_FILE: &str = "SUMMARY.md";
/// Derived-facts dump file name
pub const FACTS_FILE: &str = "gitscribe-facts.json";

/// Errors that stop a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Repository could not be opened or walked
    #[error(transparent)]
    Git(#[from] GitError),

    /// Output could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Path being written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Facts could not be serialized
    #[error("Failed to serialize facts: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tag-name lists keyed by target commit, names sorted
///
/// Tags that did not resolve to a commit are dropped.
#[must_use]
pub fn tags_by_sha(tags: &[TagRecord]) -> BTreeMap<String, Vec<String>> {
    let mut by_sha: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for tag in tags {
        if let Some(target) = &tag.target_sha {
            by_sha.entry(target.clone()).or_default().push(tag.name.clone());
        }
    }
    for names in by_sha.values_mut() {
        names.sort();
    }
    by_sha
}

/// Display name for a repository: its directory name
#[must_use]
pub fn repo_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .or_else(|| root.file_name())
        .map_or_else(|| "Repository".to_string(), |n| n.to_string_lossy().into_owned())
}

/// Run the pipeline and return the paths written
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the repository cannot be
/// opened or walked, or an output file cannot be written.
pub fn run(config: &Config) -> Result<Vec<PathBuf>, PipelineError> {
    config.validate()?;

    let source = RepoPool::discover(&config.repo)?
        .with_walk_options(WalkOptions::latest(config.max_commits));
    let root = source
        .workdir()
        .unwrap_or_else(|| source.git_dir().to_path_buf());
    let name = repo_name(&root);

    info!(repo = %root.display(), "Analyzing git history");

    let commits = source.all_commits()?;
    info!(commits = commits.len(), "Commits loaded");

    let by_sha = tags_by_sha(&source.tags());
    let tag_shas: HashSet<String> = by_sha.keys().cloned().collect();
    debug!(tagged_commits = tag_shas.len(), "Tags resolved");

    let facts = analyze_all(&source, &commits, &tag_shas, &config.analysis_options());

    let output_dir = config.output_path(&root);
    fs::create_dir_all(&output_dir).map_err(|source| PipelineError::Write {
        path: output_dir.clone(),
        source,
    })?;

    let mut documents = vec![
        (
            CHANGELOG_FILE,
            render::changelog(&commits, &by_sha, &facts.breaking, &name),
        ),
        (
            ARCHITECTURE_FILE,
            render::architecture(&facts.architecture, &name),
        ),
        (DEVELOPMENT_FILE, render::development(&facts.timeline, &name)),
    ];
    if config.with_summary {
        documents.push((SUMMARY_FILE, render::summary(&facts.churn, &name)));
    }
    if config.json {
        documents.push((FACTS_FILE, facts_json(&facts)?));
    }

    let mut written = Vec::with_capacity(documents.len());
    for (file, contents) in documents {
        let path = output_dir.join(file);
        fs::write(&path, contents).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Wrote");
        written.push(path);
    }

    Ok(written)
}

fn facts_json(facts: &HistoryFacts) -> Result<String, PipelineError> {
    let mut json = serde_json::to_string_pretty(facts)?;
    json.push('\n');
    Ok(json)
}
