//! gitscribe: history-driven documentation from local git repository analysis
//!
//! Reads the repository's history, runs the deterministic analyzers and writes
//! CHANGELOG.md, ARCHITECTURE.md, DEVELOPMENT.md and optionally SUMMARY.md.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use gitscribe::config::Config;
use gitscribe::pipeline;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout stays clean for the list of written files
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let written = pipeline::run(&config)
        .with_context(|| format!("Failed to document {}", config.repo.display()))?;

    for path in &written {
        println!("{}", path.display());
    }
    info!(files = written.len(), "Done");
    Ok(())
}
