// src/cli.rs
// =============================================================================
// The command-line interface, built with clap's derive API.
//
// Two subcommands:
// - crawl: start a fresh run
// - resume: continue a run from a checkpoint file written by `crawl`
//
// Every option can also come from a KOSOVA_* environment variable, which is
// handy for scheduled runs.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kosova-crawl",
    version,
    about = "Crawls a paginated job portal and collects every listing into a table",
    long_about = "kosova-crawl walks the listing pages of a job portal, visits every listing's \
                  detail page, downloads attached adverts, keeps a raw backup of each page and \
                  exports all listings as one CSV file. Interrupted runs can be resumed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug output of the crawler itself (RUST_LOG overrides this)
    #[arg(long, short, global = true, env = "KOSOVA_VERBOSE")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "KOSOVA_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a fresh crawl
    ///
    /// Example: kosova-crawl crawl --max-repeats 10 --checkpoint data/run.json
    Crawl {
        #[command(flatten)]
        args: CrawlArgs,

        /// Write a checkpoint after every completed page so the run can be resumed
        #[arg(long, env = "KOSOVA_CHECKPOINT")]
        checkpoint: Option<PathBuf>,
    },

    /// Continue a crawl from its checkpoint
    ///
    /// Example: kosova-crawl resume data/run.json
    Resume {
        /// Checkpoint file written by an earlier `crawl --checkpoint`
        checkpoint: PathBuf,

        #[command(flatten)]
        args: CrawlArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Listing page URL of the portal
    #[arg(long, env = "KOSOVA_BASE_URL", default_value = "https://www.kosovajob.com")]
    pub base_url: String,

    /// Query parameter that selects page N (unset: every page is the base URL)
    #[arg(long, env = "KOSOVA_PAGE_PARAM")]
    pub page_param: Option<String>,

    /// First listing page to visit
    #[arg(long, env = "KOSOVA_START_PAGE", default_value_t = 1)]
    pub start_page: u32,

    /// Exclusive upper bound of the initial page list
    #[arg(long, env = "KOSOVA_MAX_PAGE", default_value_t = 1000)]
    pub max_page: u32,

    /// Outer iterations before giving up and returning a partial result
    #[arg(long, env = "KOSOVA_MAX_REPEATS", default_value_t = 20)]
    pub max_repeats: u32,

    /// Do not verify TLS certificates of listing and detail pages
    #[arg(long, env = "KOSOVA_INSECURE")]
    pub insecure: bool,

    /// Timeout of every request, in seconds
    #[arg(long, env = "KOSOVA_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Delay before every request, in milliseconds
    #[arg(long, env = "KOSOVA_DELAY_MS", default_value_t = 1000)]
    pub delay_ms: u64,

    /// Root of the per-run folders holding raw detail pages
    #[arg(
        long,
        env = "KOSOVA_BACKUP_DIR",
        default_value = "data/daily_scraping/single_listings_htmls"
    )]
    pub backup_dir: PathBuf,

    /// Where downloaded attachments go
    #[arg(long, env = "KOSOVA_DOCUMENT_DIR", default_value = "data/listing_files")]
    pub document_dir: PathBuf,

    /// Where the CSV export goes
    #[arg(long, env = "KOSOVA_EXPORT_DIR", default_value = "data/daily_scraping")]
    pub export_dir: PathBuf,

    /// Print the run summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
