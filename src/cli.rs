//! Command-line interface definition, built with `clap`'s derive API.
//!
//! Flags are grouped by concern (input / spider / download / search / output
//! / other); `Cli::parse()` populates this struct from
//! `std::env::args()` and `config::Config::from_cli` turns it into a validated,
//! immutable engine configuration.

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Concurrent recursive web spider")]
pub struct Cli {
    // ---- input ----
    /// Seed URL(s) to crawl. May contain the literal substring `{page}`,
    /// expanded against `-p/--pages` ranges.
    pub urls: Vec<String>,

    /// Read additional newline-delimited seed URLs from a file (repeatable).
    #[arg(short = 'f', long = "file")]
    pub files: Vec<String>,

    // ---- spider ----
    /// Recurse into discovered links.
    #[arg(short, long)]
    pub recurse: bool,

    /// Maximum recursion depth.
    #[arg(short = 'd', long = "max-depth", default_value_t = 3)]
    pub max_depth: u32,

    /// Maximum retries per request on transport failure.
    #[arg(short = 'm', long = "max-retries", default_value_t = 0)]
    pub max_retries: u32,

    /// Page ranges to expand `{page}` against, e.g. `1-2,5,6-10` (repeatable).
    #[arg(short = 'p', long = "pages")]
    pub pages: Vec<String>,

    /// Proxy URL used for both http and https requests.
    #[arg(long)]
    pub proxy: Option<String>,

    /// Override the random-from-file user agent with a fixed string.
    #[arg(short = 'A', long = "user-agent")]
    pub user_agent: Option<String>,

    /// Path to a newline-delimited user-agent list file.
    #[arg(long = "user-agent-file")]
    pub user_agent_file: Option<String>,

    /// Maximum number of concurrent in-flight fetches.
    #[arg(short = 't', long = "max-threads", default_value_t = 10)]
    pub max_threads: usize,

    /// Soft-stop the crawl once this pattern is seen in a response body.
    #[arg(short = 's', long = "stop-pattern")]
    pub stop_pattern: Option<String>,

    /// Soft-stop the crawl on the first 404.
    #[arg(long)]
    pub stop_on_404: bool,

    /// Requeue URLs that return a Cloudflare challenge page instead of dropping them.
    #[arg(long)]
    pub requeue_cloudflare: bool,

    /// Only recurse into links whose path matches one of these patterns (repeatable).
    #[arg(long = "recurse-pattern")]
    pub recurse_pattern: Vec<String>,

    /// Never recurse into links whose path matches one of these patterns (repeatable).
    #[arg(long = "recurse-ignore-pattern")]
    pub recurse_ignore_pattern: Vec<String>,

    /// Allow recursion across domains unconditionally.
    #[arg(long)]
    pub cross_domains: bool,

    /// Extra hosts allowed for recursion besides the parent's own host (repeatable).
    #[arg(long)]
    pub domains: Vec<String>,

    /// Only recurse into links whose path is below the seed's path.
    #[arg(short = 'n', long = "no-parent")]
    pub no_parent: bool,

    /// Insert newly discovered links at the head of the frontier (LIFO) instead of the tail (FIFO).
    #[arg(long = "depth-first")]
    pub depth_first: bool,

    // ---- download ----
    /// Download responses whose path ends in one of these extensions (repeatable).
    #[arg(long = "download-extension")]
    pub download_extensions: Vec<String>,

    /// Download responses whose path matches one of these regexes (repeatable).
    #[arg(long = "download-regex")]
    pub download_regexes: Vec<String>,

    /// Download responses whose path is below one of these prefixes (repeatable).
    #[arg(long = "download-within")]
    pub download_within: Vec<String>,

    // ---- search ----
    /// Emit lines matching this regex (repeatable).
    #[arg(long = "search-regex")]
    pub search_regex: Vec<String>,

    /// Extract plain email addresses.
    #[arg(long)]
    pub search_emails: bool,

    /// Extract `mailto:`-prefixed email addresses.
    #[arg(long)]
    pub search_mailtos: bool,

    /// Regex whose first capture group (or whole match) names a person co-located with an email.
    #[arg(long = "email-names")]
    pub email_names: Option<String>,

    /// Line window `"start [end]"` (relative to the email's line) searched for a name.
    #[arg(long = "email-names-lines")]
    pub email_names_lines: Option<String>,

    // ---- output ----
    /// Mirror downloaded bodies under this directory tree.
    #[arg(short = 'o', long = "out-dir")]
    pub out_dir: Option<String>,

    /// Append successfully-fetched URLs to this file.
    #[arg(long = "out-urls")]
    pub out_urls: Option<String>,

    /// Append extracted email records to this file (stdout if unset).
    #[arg(long = "out-emails")]
    pub out_emails: Option<String>,

    /// Append regex-match records to this file (stdout if unset).
    #[arg(long = "out-regex")]
    pub out_regex: Option<String>,

    /// Append engine log lines to this file (stderr if unset).
    #[arg(long = "out-log")]
    pub out_log: Option<String>,

    // ---- other ----
    /// Enable verbose (debug-level) logging.
    #[arg(short = 'D', long)]
    pub debug: bool,
}
