// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gitscribe-git

use thiserror::Error;

/// Errors raised while reading repository history
///
/// Only opening the repository and listing its history are fatal; per-commit
/// failures are folded into [`crate::Fetch::Unavailable`] by the sources.
#[derive(Debug, Error)]
pub enum GitError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// No repository at (or above) the specified path
    #[error("not a git repository: {path}")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// Reference (branch, tag, revision expression) that does not resolve
    #[error("Invalid commit reference: {reference}")]
    InvalidReference {
        /// The reference string that could not be resolved
        reference: String,
    },

    /// String that is not a hex object id
    #[error("Invalid commit SHA: {sha}")]
    InvalidSha {
        /// The rejected SHA
        sha: String,
    },
}
