//! Command-line interface for lektury-mirror.
//!
//! Running without flags mirrors the whole catalog into the current
//! directory, downloading whatever is not cached yet.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::config::{self, CachePolicy, FailurePolicy, MirrorConfig};
use crate::core::Orchestrator;

/// lektury-mirror - cache the Wolne Lektury catalog on local disk
#[derive(Parser, Debug)]
#[command(name = "lektury-mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Don't download anything from origin; fail on any cache miss
    #[arg(long)]
    pub offline: bool,

    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Mirror root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Catalog listing endpoint
    #[arg(long)]
    pub api_url: Option<String>,

    /// Re-download cached files older than this many days
    #[arg(long)]
    pub max_age_days: Option<u64>,

    /// Skip works that fail instead of aborting the whole run
    #[arg(long)]
    pub keep_going: bool,
}

impl Cli {
    /// Resolve flags, config file and defaults into one configuration
    pub fn resolve_config(&self) -> Result<MirrorConfig> {
        let mut config = MirrorConfig::default();

        if let Some(path) = &self.config {
            let file = config::load_config_file(path)?;
            let base = path.parent().unwrap_or(Path::new("."));
            config = config.apply_file(file, base)?;
        }

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(url) = &self.api_url {
            config.listing_url = url
                .parse()
                .with_context(|| format!("Invalid --api-url: {}", url))?;
        }
        if self.offline {
            config.offline = true;
        }
        if let Some(days) = self.max_age_days {
            let max_age = config::days_to_duration(days);
            config = config.with_cache_policy(CachePolicy::MaxAge(max_age));
        }
        if self.keep_going {
            config.failure_policy = FailurePolicy::KeepGoing;
        }

        Ok(config)
    }

    /// Execute the mirror run
    pub async fn execute(self) -> Result<()> {
        let config = self.resolve_config()?;
        info!(
            root = %config.root.display(),
            offline = config.offline,
            "Starting mirror"
        );

        let orchestrator =
            Orchestrator::new(&config).context("Failed to set up HTTP client")?;
        let report = orchestrator.mirror_all().await?;

        if !report.is_success() {
            for failure in &report.failures {
                eprintln!("  ✗ {}: {}", failure.slug, failure.error);
            }
            anyhow::bail!(
                "{} of {} works failed to mirror",
                report.failures.len(),
                report.total
            );
        }

        println!(
            "✓ Mirrored {} works ({} files)",
            report.done, report.files
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_plain_invocation() {
        let cli = Cli::parse_from(["lektury-mirror"]);
        let config = cli.resolve_config().unwrap();
        assert!(!config.offline);
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.listing_url.as_str(), config::DEFAULT_LISTING_URL);
        assert_eq!(config.cache_policy, CachePolicy::TrustForever);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::parse_from([
            "lektury-mirror",
            "--offline",
            "--root",
            "/srv/lektury",
            "--api-url",
            "http://localhost:9000/api/books/",
            "--max-age-days",
            "30",
            "--keep-going",
        ]);
        let config = cli.resolve_config().unwrap();
        assert!(config.offline);
        assert_eq!(config.root, PathBuf::from("/srv/lektury"));
        assert_eq!(config.listing_url.as_str(), "http://localhost:9000/api/books/");
        assert_eq!(
            config.cache_policy,
            CachePolicy::MaxAge(config::days_to_duration(30))
        );
        assert_eq!(config.failure_policy, FailurePolicy::KeepGoing);
    }

    #[test]
    fn test_huge_max_age_does_not_overflow() {
        let cli = Cli::parse_from(["lektury-mirror", "--max-age-days", "18446744073709551615"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(
            config.cache_policy,
            CachePolicy::MaxAge(std::time::Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn test_bad_api_url() {
        let cli = Cli::parse_from(["lektury-mirror", "--api-url", "nope"]);
        assert!(cli.resolve_config().is_err());
    }
}
