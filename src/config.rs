//! Validated, immutable run configuration built from [`crate::cli::Cli`].
//!
//! `Config::from_cli` is the single place where user input becomes engine
//! state: regexes are compiled once, page ranges are expanded, and the
//! startup-fatal checks ("no seeds", "no output method", "bad --search-regex")
//! are enforced before the engine ever spawns a worker.

use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::SpiderError;

pub const FAIL_SLEEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct LineRange {
    pub start: i64,
    pub end: i64,
}

pub struct Config {
    // input
    pub seed_templates: Vec<String>,
    pub pages: Vec<i64>,

    // scope
    pub max_depth: u32,
    pub depth_first: bool,
    pub cross_domains: bool,
    pub domains: Vec<String>,
    pub no_parent: bool,
    pub recurse_pattern: Vec<Regex>,
    pub recurse_ignore_pattern: Vec<Regex>,

    // network
    pub max_retries: u32,
    pub fail_sleep: Duration,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    pub user_agent_file: Option<PathBuf>,
    pub max_threads: usize,

    // stop
    pub stop_pattern: Option<Regex>,
    pub stop_on_404: bool,
    pub requeue_cloudflare: bool,

    // search
    pub search_regex: Vec<Regex>,
    pub search_emails: bool,
    pub search_mailtos: bool,
    pub email_names: Option<Regex>,
    pub email_names_lines: Option<LineRange>,

    // download
    pub download_extensions: Vec<String>,
    pub download_regexes: Vec<Regex>,
    pub download_within: Vec<String>,

    // outputs
    pub out_dir: Option<PathBuf>,
    pub out_urls: Option<PathBuf>,
    pub out_emails: Option<PathBuf>,
    pub out_regex: Option<PathBuf>,
    pub out_log: Option<PathBuf>,

    pub debug: bool,
}

impl Config {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self, SpiderError> {
        let mut seed_templates = cli.urls.clone();
        for path in &cli.files {
            let contents = std::fs::read_to_string(path)?;
            seed_templates.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            );
        }
        if seed_templates.is_empty() {
            return Err(SpiderError::NoSeeds);
        }

        let pages = parse_page_ranges(&cli.pages)?;

        let recurse_pattern = compile_all(&cli.recurse_pattern)?;
        let recurse_ignore_pattern = compile_all(&cli.recurse_ignore_pattern)?;
        let search_regex = compile_all(&cli.search_regex)?;
        let download_regexes = compile_all(&cli.download_regexes)?;
        let stop_pattern = cli
            .stop_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(SpiderError::BadRegex)?;
        let email_names = cli
            .email_names
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(SpiderError::BadRegex)?;
        let email_names_lines = cli
            .email_names_lines
            .as_deref()
            .map(parse_line_range)
            .transpose()?;

        let out_dir = cli.out_dir.as_ref().map(PathBuf::from);
        let out_urls = cli.out_urls.as_ref().map(PathBuf::from);
        let out_emails = cli.out_emails.as_ref().map(PathBuf::from);
        let out_regex = cli.out_regex.as_ref().map(PathBuf::from);
        let out_log = cli.out_log.as_ref().map(PathBuf::from);

        let has_output_method = out_dir.is_some()
            || out_urls.is_some()
            || out_emails.is_some()
            || out_regex.is_some()
            || cli.search_emails
            || cli.search_mailtos
            || !search_regex.is_empty();
        if !has_output_method {
            return Err(SpiderError::NoOutputMethod);
        }

        Ok(Config {
            seed_templates,
            pages,
            max_depth: cli.max_depth,
            depth_first: cli.depth_first,
            cross_domains: cli.cross_domains,
            domains: cli.domains.clone(),
            no_parent: cli.no_parent,
            recurse_pattern,
            recurse_ignore_pattern,
            max_retries: cli.max_retries,
            fail_sleep: FAIL_SLEEP,
            proxy: cli.proxy.clone(),
            user_agent: cli.user_agent.clone(),
            user_agent_file: cli.user_agent_file.as_ref().map(PathBuf::from),
            max_threads: cli.max_threads,
            stop_pattern,
            stop_on_404: cli.stop_on_404,
            requeue_cloudflare: cli.requeue_cloudflare,
            search_regex,
            search_emails: cli.search_emails,
            search_mailtos: cli.search_mailtos,
            email_names,
            email_names_lines,
            download_extensions: cli
                .download_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            download_regexes,
            download_within: cli.download_within.clone(),
            out_dir,
            out_urls,
            out_emails,
            out_regex,
            out_log,
            debug: cli.debug,
        })
    }

    /// Whether downloading is selectively restricted (any of the three rules is set).
    pub fn selective_download(&self) -> bool {
        !self.download_extensions.is_empty()
            || !self.download_regexes.is_empty()
            || !self.download_within.is_empty()
    }

    /// Whether downloading is enabled at all (an out_dir was given).
    pub fn downloading_enabled(&self) -> bool {
        self.out_dir.is_some()
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, SpiderError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(SpiderError::BadRegex))
        .collect()
}

/// Parses `"1-2,5,6-10"` style page-range lists into a flat, de-duplication-free
/// sequence of page numbers, preserving the order the ranges were given in.
fn parse_page_ranges(ranges: &[String]) -> Result<Vec<i64>, SpiderError> {
    let mut pages = Vec::new();
    for group in ranges {
        for part in group.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo: i64 = lo
                        .trim()
                        .parse()
                        .map_err(|_| SpiderError::BadPageRange(part.to_string()))?;
                    let hi: i64 = hi
                        .trim()
                        .parse()
                        .map_err(|_| SpiderError::BadPageRange(part.to_string()))?;
                    if hi < lo {
                        return Err(SpiderError::BadPageRange(part.to_string()));
                    }
                    pages.extend(lo..=hi);
                }
                None => {
                    let n: i64 = part
                        .parse()
                        .map_err(|_| SpiderError::BadPageRange(part.to_string()))?;
                    pages.push(n);
                }
            }
        }
    }
    Ok(pages)
}

/// Parses `"start [end]"`; a bare start means `end = start`.
fn parse_line_range(s: &str) -> Result<LineRange, SpiderError> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let bad = || SpiderError::BadPageRange(s.to_string());
    match parts.as_slice() {
        [start] => {
            let start: i64 = start.parse().map_err(|_| bad())?;
            Ok(LineRange { start, end: start })
        }
        [start, end] => {
            let start: i64 = start.parse().map_err(|_| bad())?;
            let end: i64 = end.parse().map_err(|_| bad())?;
            Ok(LineRange { start, end })
        }
        _ => Err(bad()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_mixed_ranges_in_order() {
        let pages = parse_page_ranges(&["1-2,5,6-10".to_string()]).unwrap();
        assert_eq!(pages, vec![1, 2, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(parse_page_ranges(&["5-1".to_string()]).is_err());
    }

    #[test]
    fn single_value_line_range_repeats_as_end() {
        let r = parse_line_range("-3").unwrap();
        assert_eq!(r.start, -3);
        assert_eq!(r.end, -3);
    }

    #[test]
    fn two_value_line_range() {
        let r = parse_line_range("-3 -1").unwrap();
        assert_eq!((r.start, r.end), (-3, -1));
    }

    #[test]
    fn rejects_missing_seeds() {
        let cli = crate::cli::Cli {
            urls: vec![],
            files: vec![],
            recurse: false,
            max_depth: 3,
            max_retries: 0,
            pages: vec![],
            proxy: None,
            user_agent: None,
            user_agent_file: None,
            max_threads: 10,
            stop_pattern: None,
            stop_on_404: false,
            requeue_cloudflare: false,
            recurse_pattern: vec![],
            recurse_ignore_pattern: vec![],
            cross_domains: false,
            domains: vec![],
            no_parent: false,
            depth_first: false,
            download_extensions: vec![],
            download_regexes: vec![],
            download_within: vec![],
            search_regex: vec![],
            search_emails: false,
            search_mailtos: false,
            email_names: None,
            email_names_lines: None,
            out_dir: None,
            out_urls: None,
            out_emails: None,
            out_regex: None,
            out_log: None,
            debug: false,
        };
        assert!(matches!(Config::from_cli(&cli), Err(SpiderError::NoSeeds)));
    }
}
