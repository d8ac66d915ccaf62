//! Configuration for the gitscribe command line
//!
//! This module provides the CLI definition, validation of paths and limits,
//! and the mapping from flags onto analyzer options.

use std::path::{Path, PathBuf};

use clap::Parser;
use gitscribe_analysis::{
    AnalysisOptions, ArchitectureOptions, BreakingOptions, ChurnOptions, TimelineOptions,
};

const OUTPUTS: &str = "\
Outputs (Markdown, written to the repository root or --output-dir):
  CHANGELOG.md     From tags, commit history, and detected breaking changes
  ARCHITECTURE.md  Module structure and how it evolved over time
  DEVELOPMENT.md   Timeline of features, refactors, and fixes
  SUMMARY.md       (--with-summary) High-churn files and unstable components";

/// gitscribe - history-driven documentation from git repository analysis
#[derive(Parser, Debug, Clone)]
#[command(name = "gitscribe")]
#[command(version, about, long_about = None, after_help = OUTPUTS)]
pub struct Config {
    /// Path to the local git repository
    #[arg(default_value = ".", env = "GITSCRIBE_REPO")]
    pub repo: PathBuf,

    /// Directory to write the Markdown files to
    ///
    /// Defaults to the repository's working directory root.
    #[arg(short, long, env = "GITSCRIBE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also write SUMMARY.md (high-churn and unstable components)
    #[arg(long, default_value = "false")]
    pub with_summary: bool,

    /// Also write the derived facts as gitscribe-facts.json
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Maximum number of commits to analyze, newest first
    #[arg(long, default_value_t = 5000, env = "GITSCRIBE_MAX_COMMITS")]
    pub max_commits: usize,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Minimum deletions for the large-deletion breaking-change heuristic
    #[arg(long, default_value_t = 500, env = "GITSCRIBE_LARGE_DELETION_THRESHOLD")]
    pub large_deletion_threshold: usize,

    /// Files listed in the churn ranking
    #[arg(long, default_value_t = 50, env = "GITSCRIBE_TOP_FILES")]
    pub top_files: usize,

    /// Directories listed in the churn ranking
    #[arg(long, default_value_t = 20, env = "GITSCRIBE_TOP_DIRS")]
    pub top_dirs: usize,

    /// Maximum events on the development timeline
    #[arg(long, default_value_t = 150, env = "GITSCRIBE_MAX_EVENTS")]
    pub max_events: usize,

    /// Unlabelled commits smaller than this are left off the timeline
    #[arg(long, default_value_t = 30, env = "GITSCRIBE_MIN_DIFF_LINES")]
    pub min_diff_lines: usize,

    /// Evenly spaced revisions sampled for architecture snapshots
    #[arg(long, default_value_t = 20, env = "GITSCRIBE_SAMPLE_COUNT")]
    pub sample_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        let analysis = AnalysisOptions::default();
        Self {
            repo: PathBuf::from("."),
            output_dir: None,
            with_summary: false,
            json: false,
            max_commits: 5000,
            verbose: false,
            quiet: false,
            large_deletion_threshold: analysis.breaking.large_deletion_threshold,
            top_files: analysis.churn.top_files,
            top_dirs: analysis.churn.top_dirs,
            max_events: analysis.timeline.max_events,
            min_diff_lines: analysis.timeline.min_diff_lines,
            sample_count: analysis.architecture.sample_count,
        }
    }
}

impl Config {
    /// Output directory, falling back to `repo_root`
    #[must_use]
    pub fn output_path(&self, repo_root: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| repo_root.to_path_buf())
    }

    /// Analyzer options built from the threshold flags
    #[must_use]
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            breaking: BreakingOptions {
                large_deletion_threshold: self.large_deletion_threshold,
                ..Default::default()
            },
            churn: ChurnOptions {
                top_files: self.top_files,
                top_dirs: self.top_dirs,
                ..Default::default()
            },
            timeline: TimelineOptions {
                max_events: self.max_events,
                min_diff_lines: self.min_diff_lines,
                ..Default::default()
            },
            architecture: ArchitectureOptions {
                sample_count: self.sample_count,
                ..Default::default()
            },
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository path doesn't exist
    /// - The output path exists but is not a directory
    /// - `max_commits` or `sample_count` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.repo.exists() {
            return Err(ConfigError::RepoPathNotFound(self.repo.clone()));
        }

        if let Some(ref output) = self.output_dir {
            if output.exists() && !output.is_dir() {
                return Err(ConfigError::OutputNotDirectory(output.clone()));
            }
        }

        if self.max_commits == 0 {
            return Err(ConfigError::ZeroLimit("--max-commits"));
        }
        if self.sample_count == 0 {
            return Err(ConfigError::ZeroLimit("--sample-count"));
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoPathNotFound(PathBuf),

    /// Output path exists and is not a directory
    #[error("Output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),

    /// A limit that must be positive was zero
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.repo, PathBuf::from("."));
        assert!(config.output_dir.is_none());
        assert!(!config.with_summary);
        assert!(!config.json);
        assert_eq!(config.max_commits, 5000);
        assert!(!config.verbose);
        assert!(!config.quiet);
    }

    #[test]
    fn test_default_matches_cli_defaults() {
        let parsed = Config::try_parse_from(["gitscribe"]).expect("parse should succeed");
        let default = Config::default();
        assert_eq!(parsed.repo, default.repo);
        assert_eq!(parsed.max_commits, default.max_commits);
        assert_eq!(parsed.large_deletion_threshold, default.large_deletion_threshold);
        assert_eq!(parsed.top_files, default.top_files);
        assert_eq!(parsed.top_dirs, default.top_dirs);
        assert_eq!(parsed.max_events, default.max_events);
        assert_eq!(parsed.min_diff_lines, default.min_diff_lines);
        assert_eq!(parsed.sample_count, default.sample_count);
    }

    #[test]
    fn test_output_path_default() {
        let config = Config::default();
        assert_eq!(
            config.output_path(Path::new("/work/repo")),
            PathBuf::from("/work/repo")
        );
    }

    #[test]
    fn test_output_path_custom() {
        let config = Config {
            output_dir: Some(PathBuf::from("/tmp/docs")),
            ..Default::default()
        };
        assert_eq!(
            config.output_path(Path::new("/work/repo")),
            PathBuf::from("/tmp/docs")
        );
    }

    #[test]
    fn test_analysis_options_follow_flags() {
        let config = Config {
            large_deletion_threshold: 50,
            top_files: 5,
            top_dirs: 2,
            max_events: 7,
            min_diff_lines: 1,
            sample_count: 3,
            ..Default::default()
        };
        let options = config.analysis_options();
        assert_eq!(options.breaking.large_deletion_threshold, 50);
        assert_eq!(options.breaking.deletion_ratio, 2);
        assert_eq!(options.churn.top_files, 5);
        assert_eq!(options.churn.top_dirs, 2);
        assert_eq!(options.churn.unstable_cap, 30);
        assert_eq!(options.timeline.max_events, 7);
        assert_eq!(options.timeline.min_diff_lines, 1);
        assert_eq!(options.architecture.sample_count, 3);
    }

    #[test]
    fn test_default_options_match_analysis_defaults() {
        assert_eq!(Config::default().analysis_options(), AnalysisOptions::default());
    }

    #[test]
    fn test_log_level_default() {
        let config = Config::default();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_nonexistent_repo() {
        let config = Config {
            repo: PathBuf::from("/nonexistent/path/12345"),
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::RepoPathNotFound(_))));
    }

    #[test]
    fn test_validate_output_is_file() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let config = Config {
            output_dir: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutputNotDirectory(_))
        ));
    }

    #[test]
    fn test_validate_zero_limits() {
        let config = Config {
            max_commits: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroLimit("--max-commits"))
        ));

        let config = Config {
            sample_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroLimit("--sample-count"))
        ));
    }

    #[test]
    fn test_validate_current_dir() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
