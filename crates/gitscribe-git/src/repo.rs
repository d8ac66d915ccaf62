// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository access through `git2`
//!
//! [`GitRepo`] wraps a single `git2::Repository` handle. All reads are local:
//! no remote is ever contacted.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use git2::{
    Delta, DiffFindOptions, DiffOptions, ErrorCode, ObjectType, Oid, Patch, Repository, Sort,
    TreeWalkMode, TreeWalkResult,
};
use tracing::{debug, warn};

use crate::commit::{CommitRecord, DiffStat, TagRecord, short_sha, split_message};
use crate::error::GitError;

/// Configuration for walking commits
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum number of commits to retrieve
    pub limit: Option<usize>,
    /// Start from this commit (defaults to HEAD)
    pub from_ref: Option<String>,
    /// Follow only the first parent of each commit
    pub first_parent: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            limit: None,
            from_ref: None,
            first_parent: true,
        }
    }
}

impl WalkOptions {
    /// Create options for walking the N most recent commits
    #[must_use]
    pub fn latest(n: usize) -> Self {
        Self {
            limit: Some(n),
            ..Default::default()
        }
    }

    /// Set the starting reference
    #[must_use]
    pub fn from(mut self, reference: &str) -> Self {
        self.from_ref = Some(reference.to_string());
        self
    }

    /// Walk every parent instead of only the first
    #[must_use]
    pub fn all_parents(mut self) -> Self {
        self.first_parent = false;
        self
    }
}

/// A git repository wrapper for reading history
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Get the repository's `.git` path
    #[must_use]
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Get the working directory path (None for bare repos)
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Check if the repository is bare
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    /// Get the HEAD commit SHA
    ///
    /// # Errors
    ///
    /// Returns `GitError` if HEAD cannot be resolved.
    pub fn head_sha(&self) -> Result<String, GitError> {
        let head = self.repo.head()?;
        let oid = head.target().ok_or_else(|| GitError::InvalidReference {
            reference: "HEAD".to_string(),
        })?;
        Ok(oid.to_string())
    }

    /// Count first-parent commits reachable from HEAD
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the repository cannot be walked.
    pub fn commit_count(&self) -> Result<usize, GitError> {
        if self.head_is_unborn()? {
            return Ok(0);
        }
        let mut revwalk = self.repo.revwalk()?;
        revwalk.simplify_first_parent()?;
        revwalk.push_head()?;
        Ok(revwalk.count())
    }

    /// Whether HEAD names a branch that has no commits yet
    ///
    /// git2 reports a fresh `git init` either as an unborn branch or as a
    /// missing reference depending on how HEAD is resolved.
    fn head_is_unborn(&self) -> Result<bool, GitError> {
        match self.repo.head() {
            Ok(_) => Ok(false),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Walk commits newest first according to the given options
    ///
    /// An empty repository (unborn HEAD) yields no commits. Tag and branch
    /// membership is joined after the walk.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the repository cannot be walked.
    pub fn walk_commits(&self, options: &WalkOptions) -> Result<Vec<CommitRecord>, GitError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        if options.first_parent {
            revwalk.simplify_first_parent()?;
        }

        // Start from specified ref or HEAD
        if let Some(ref from_ref) = options.from_ref {
            let oid = self
                .repo
                .revparse_single(from_ref)
                .and_then(|obj| obj.peel_to_commit())
                .map_err(|_| GitError::InvalidReference {
                    reference: from_ref.clone(),
                })?
                .id();
            revwalk.push(oid)?;
        } else {
            if self.head_is_unborn()? {
                debug!("HEAD is unborn, history is empty");
                return Ok(Vec::new());
            }
            revwalk.push_head()?;
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        let mut commits = Vec::new();
        for oid_result in revwalk.take(limit) {
            let git_commit = self.repo.find_commit(oid_result?)?;
            commits.push(extract_commit(&git_commit));
        }

        self.attach_refs(&mut commits);
        Ok(commits)
    }

    /// Join tag and local branch names onto the commits they point at
    ///
    /// References that cannot be resolved are skipped.
    fn attach_refs(&self, commits: &mut [CommitRecord]) {
        let index: HashMap<String, usize> = commits
            .iter()
            .enumerate()
            .map(|(i, c)| (c.sha.clone(), i))
            .collect();

        let references = match self.repo.references() {
            Ok(references) => references,
            Err(e) => {
                warn!(error = %e, "Cannot list references; tags and branches left empty");
                return;
            }
        };

        for reference in references.flatten() {
            let Some(name) = reference.name() else {
                continue;
            };
            let (is_tag, short_name) = if let Some(tag) = name.strip_prefix("refs/tags/") {
                (true, tag.to_string())
            } else if let Some(branch) = name.strip_prefix("refs/heads/") {
                (false, branch.to_string())
            } else {
                continue;
            };
            let sha = match reference.peel_to_commit() {
                Ok(commit) => commit.id().to_string(),
                Err(e) => {
                    debug!(reference = name, error = %e, "Dropping unresolvable reference");
                    continue;
                }
            };
            if let Some(&i) = index.get(&sha) {
                if is_tag {
                    commits[i].tags.insert(short_name);
                } else {
                    commits[i].branches.insert(short_name);
                }
            }
        }
    }

    /// Per-file diff statistics of a commit against its first parent
    ///
    /// Renames are detected; binary files report zero line counts with
    /// `is_binary` set. Results are sorted by path.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit or its trees cannot be read.
    pub fn diff_stats(&self, sha: &str) -> Result<Vec<DiffStat>, GitError> {
        let oid = Oid::from_str(sha).map_err(|_| GitError::InvalidSha {
            sha: sha.to_string(),
        })?;
        let git_commit = self.repo.find_commit(oid)?;
        let tree = git_commit.tree()?;

        // Get parent tree (or empty for root commits)
        let parent_tree = if git_commit.parent_count() > 0 {
            Some(git_commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        opts.ignore_whitespace(false);

        let mut diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;

        let mut stats = Vec::with_capacity(diff.deltas().len());
        for (idx, delta) in diff.deltas().enumerate() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| "<unknown>".to_string());

            let renamed_from = (delta.status() == Delta::Renamed)
                .then(|| delta.old_file().path())
                .flatten()
                .map(|p| p.to_string_lossy().into_owned());

            let (insertions, deletions, is_binary) = match Patch::from_diff(&diff, idx)? {
                Some(patch) if !patch.delta().flags().is_binary() => {
                    let (_, additions, removals) = patch.line_stats()?;
                    (additions, removals, false)
                }
                Some(_) => (0, 0, true),
                None => (0, 0, delta.flags().is_binary()),
            };

            stats.push(DiffStat {
                path,
                insertions,
                deletions,
                is_binary,
                renamed_from,
            });
        }

        stats.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(stats)
    }

    /// Sorted paths of every blob in the tree of `rev`
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if `rev` does not resolve to a tree.
    pub fn tree_paths_at(&self, rev: &str) -> Result<Vec<String>, GitError> {
        let tree = self
            .repo
            .revparse_single(rev)
            .and_then(|obj| obj.peel_to_tree())
            .map_err(|_| GitError::InvalidReference {
                reference: rev.to_string(),
            })?;

        let mut paths = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                let name = String::from_utf8_lossy(entry.name_bytes());
                paths.push(format!("{dir}{name}"));
            }
            TreeWalkResult::Ok
        })?;

        paths.sort();
        Ok(paths)
    }

    /// All tags in the repository
    ///
    /// Annotated tags carry their tagger and message. A tag whose target
    /// cannot be peeled to a commit is still listed, with no target.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the tag names cannot be listed.
    pub fn tags(&self) -> Result<Vec<TagRecord>, GitError> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::with_capacity(names.len());

        for name in names.iter().flatten() {
            let object = match self.repo.revparse_single(&format!("refs/tags/{name}")) {
                Ok(object) => object,
                Err(e) => {
                    debug!(tag = name, error = %e, "Tag does not resolve");
                    tags.push(TagRecord::lightweight(name, None));
                    continue;
                }
            };
            let target_sha = object.peel_to_commit().ok().map(|c| c.id().to_string());

            let record = match object.as_tag() {
                Some(tag) => TagRecord {
                    name: name.to_string(),
                    target_sha,
                    is_annotated: true,
                    tagger: tag
                        .tagger()
                        .map(|sig| String::from_utf8_lossy(sig.name_bytes()).into_owned()),
                    tagged_at: tag.tagger().map(|sig| to_datetime(&sig.when())),
                    tag_message: tag
                        .message_bytes()
                        .map(|m| String::from_utf8_lossy(m).trim().to_string())
                        .filter(|m| !m.is_empty()),
                },
                None => TagRecord::lightweight(name, target_sha),
            };
            tags.push(record);
        }

        Ok(tags)
    }
}

/// Extract commit metadata from a git2 commit, decoding text lossily
fn extract_commit(git_commit: &git2::Commit<'_>) -> CommitRecord {
    let sha = git_commit.id().to_string();
    let author = git_commit.author();
    let committer = git_commit.committer();
    let message = String::from_utf8_lossy(git_commit.message_bytes());
    let (message_subject, message_body) = split_message(&message);

    CommitRecord {
        short_sha: short_sha(&sha).to_string(),
        sha,
        author_name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
        author_email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
        authored_at: to_datetime(&author.when()),
        committer_name: String::from_utf8_lossy(committer.name_bytes()).into_owned(),
        committed_at: to_datetime(&committer.when()),
        message_subject,
        message_body,
        parent_shas: git_commit.parent_ids().map(|id| id.to_string()).collect(),
        tags: Default::default(),
        branches: Default::default(),
    }
}

/// Convert a git timestamp to a timezone-aware datetime, keeping its offset
fn to_datetime(time: &git2::Time) -> DateTime<FixedOffset> {
    let utc = DateTime::<Utc>::from_timestamp(time.seconds(), 0).unwrap_or_default();
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .unwrap_or_else(|| utc.fixed_offset().timezone());
    utc.with_timezone(&offset)
}
