// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitscribe-git: local git history source for gitscribe
//!
//! This library crate reads commits, per-file diff statistics, tree listings
//! and tags from a local repository. Nothing here touches the network.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use gitscribe_git::{HistorySource, RepoPool};
//!
//! let source = RepoPool::discover(".").expect("open repo");
//! let commits = source.all_commits().expect("walk commits");
//!
//! for c in commits.iter().take(10) {
//!     let files = source.diff_stats(&c.sha).totals().map_or(0, |t| t.files);
//!     println!("{} - {} ({} files)", c.short_sha, c.message_subject, files);
//! }
//! ```

pub mod commit;
pub mod error;
pub mod pool;
pub mod repo;
pub mod source;

pub use commit::{CommitRecord, DiffStat, TagRecord};
pub use error::GitError;
pub use pool::RepoPool;
pub use repo::{GitRepo, WalkOptions};
pub use source::{DiffFetch, DiffTotals, Fetch, HistorySource, MemorySource};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::{CommitRecord, DiffStat, TagRecord};
    pub use crate::error::GitError;
    pub use crate::source::{DiffFetch, Fetch, HistorySource};
}
