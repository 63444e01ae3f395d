// src/config.rs
// =============================================================================
// Validated run configuration.
//
// The CLI gives us raw values; CrawlConfig checks them once and hands each
// layer the settings it needs (fetch settings, politeness, page addressing).
// =============================================================================

use crate::cli::CrawlArgs;
use crate::crawl::{PageAddress, Politeness};
use crate::fetch::FetchSettings;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: String,
    pub page_param: Option<String>,
    pub start_page: u32,
    pub max_page: u32,
    pub max_repeats: u32,
    pub verify_certificates: bool,
    pub timeout: Duration,
    pub request_delay: Duration,
    pub backup_dir: PathBuf,
    pub document_dir: PathBuf,
    pub export_dir: PathBuf,
    pub json: bool,
}

impl CrawlConfig {
    pub fn from_args(args: CrawlArgs) -> Result<Self> {
        if args.start_page == 0 {
            bail!("--start-page must be at least 1");
        }
        // the counter is bumped before the ceiling check, so 1 would never crawl
        if args.max_repeats < 2 {
            bail!("--max-repeats must be at least 2, got {}", args.max_repeats);
        }
        if args.timeout_secs == 0 {
            bail!("--timeout-secs must be positive");
        }
        url::Url::parse(&args.base_url)
            .with_context(|| format!("invalid --base-url '{}'", args.base_url))?;

        Ok(Self {
            base_url: args.base_url,
            page_param: args.page_param.filter(|p| !p.trim().is_empty()),
            start_page: args.start_page,
            max_page: args.max_page,
            max_repeats: args.max_repeats,
            verify_certificates: !args.insecure,
            timeout: Duration::from_secs(args.timeout_secs),
            request_delay: Duration::from_millis(args.delay_ms),
            backup_dir: args.backup_dir,
            document_dir: args.document_dir,
            export_dir: args.export_dir,
            json: args.json,
        })
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: self.timeout,
            verify_certificates: self.verify_certificates,
            ..FetchSettings::default()
        }
    }

    pub fn politeness(&self) -> Politeness {
        Politeness {
            request_delay: self.request_delay,
            ..Politeness::default()
        }
    }

    pub fn address(&self) -> Result<PageAddress> {
        PageAddress::new(&self.base_url, self.page_param.clone())
            .with_context(|| format!("invalid --base-url '{}'", self.base_url))
    }

    pub fn export_path(&self, stamp: &str) -> PathBuf {
        self.export_dir.join(format!("{stamp}_kosovajob.csv"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn args(extra: &[&str]) -> CrawlArgs {
        let argv = ["kosova-crawl", "crawl"].iter().chain(extra.iter()).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Crawl { args, .. } => args,
            Commands::Resume { args, .. } => args,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = CrawlConfig::from_args(args(&[])).unwrap();
        assert!(config.verify_certificates);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.politeness().request_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_insecure_only_touches_primary_fetches() {
        let config = CrawlConfig::from_args(args(&["--insecure"])).unwrap();
        assert!(!config.fetch_settings().verify_certificates);
    }

    #[test]
    fn test_rejects_repeat_ceiling_below_two() {
        assert!(CrawlConfig::from_args(args(&["--max-repeats", "1"])).is_err());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(CrawlConfig::from_args(args(&["--base-url", "not a url"])).is_err());
    }

    #[test]
    fn test_empty_page_param_means_none() {
        let config = CrawlConfig::from_args(args(&["--page-param", " "])).unwrap();
        assert!(config.page_param.is_none());
    }

    #[test]
    fn test_export_path() {
        let config = CrawlConfig::from_args(args(&["--export-dir", "out"])).unwrap();
        assert_eq!(
            config.export_path("20240510_080000"),
            PathBuf::from("out/20240510_080000_kosovajob.csv")
        );
    }
}
