//! Admission filter: the only place recursion policy lives.

use url::Url;

use crate::absolute_url;
use crate::config::Config;
use crate::frontier::Frontier;

/// Runs the full admission gate for one candidate link discovered on `parent`,
/// submitting it to `frontier` at `remaining_depth - 1` if it passes. Returns
/// `true` if the URL was admitted.
pub fn admit(
    config: &Config,
    frontier: &Frontier,
    candidate: &str,
    parent: &Url,
    remaining_depth: u32,
) -> bool {
    let normalized = match absolute_url::normalize(candidate, Some(parent)) {
        Ok(u) => u,
        Err(_) => return false,
    };

    if frontier.has_seen(&normalized) {
        return false;
    }

    if !absolute_url::SUPPORTED_SCHEMES.contains(&normalized.scheme()) {
        return false;
    }

    let path = normalized.path();

    if !config.recurse_pattern.is_empty() && !matches_any_anchored(&config.recurse_pattern, path) {
        return false;
    }

    if matches_any_anchored(&config.recurse_ignore_pattern, path) {
        return false;
    }

    if config.no_parent {
        let parent_prefix = format!("{}/", parent.path().trim_end_matches('/'));
        if !path.starts_with(&parent_prefix) {
            return false;
        }
    }

    if !scope_allows(config, parent, &normalized) {
        return false;
    }

    frontier.submit(normalized, remaining_depth - 1)
}

fn scope_allows(config: &Config, parent: &Url, candidate: &Url) -> bool {
    if config.cross_domains {
        return true;
    }
    let candidate_host = candidate.host_str().unwrap_or_default();
    let parent_host = parent.host_str().unwrap_or_default();
    if !config.domains.is_empty() {
        return candidate_host == parent_host
            || config.domains.iter().any(|d| d == candidate_host);
    }
    candidate_host == parent_host
}

/// `re.match` semantics: anchored at the start of the string only.
fn matches_any_anchored(patterns: &[regex::Regex], subject: &str) -> bool {
    patterns.iter().any(|re| match re.find(subject) {
        Some(m) => m.start() == 0,
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn base_config() -> Config {
        Config {
            seed_templates: vec![],
            pages: vec![],
            max_depth: 3,
            depth_first: false,
            cross_domains: false,
            domains: vec![],
            no_parent: false,
            recurse_pattern: vec![],
            recurse_ignore_pattern: vec![],
            max_retries: 0,
            fail_sleep: std::time::Duration::from_secs(1),
            proxy: None,
            user_agent: None,
            user_agent_file: None,
            max_threads: 10,
            stop_pattern: None,
            stop_on_404: false,
            requeue_cloudflare: false,
            search_regex: vec![],
            search_emails: false,
            search_mailtos: false,
            email_names: None,
            email_names_lines: None,
            download_extensions: vec![],
            download_regexes: vec![],
            download_within: vec![],
            out_dir: None,
            out_urls: None,
            out_emails: None,
            out_regex: None,
            out_log: None,
            debug: false,
        }
    }

    #[test]
    fn same_host_admitted_by_default() {
        let config = base_config();
        let frontier = Frontier::new(false);
        let parent = Url::parse("http://a.test/").unwrap();
        assert!(admit(&config, &frontier, "/x", &parent, 2));
    }

    #[test]
    fn cross_host_rejected_by_default() {
        let config = base_config();
        let frontier = Frontier::new(false);
        let parent = Url::parse("http://a.test/").unwrap();
        assert!(!admit(&config, &frontier, "http://b.test/y", &parent, 2));
    }

    #[test]
    fn domains_list_admits_extra_hosts() {
        let mut config = base_config();
        config.domains = vec!["b.test".to_string()];
        let frontier = Frontier::new(false);
        let parent = Url::parse("http://a.test/").unwrap();
        assert!(admit(&config, &frontier, "http://b.test/y", &parent, 2));
        assert!(!admit(&config, &frontier, "http://c.test/y", &parent, 2));
    }

    #[test]
    fn cross_domains_admits_everything() {
        let mut config = base_config();
        config.cross_domains = true;
        let frontier = Frontier::new(false);
        let parent = Url::parse("http://a.test/").unwrap();
        assert!(admit(&config, &frontier, "http://zzz.test/y", &parent, 2));
    }

    #[test]
    fn no_parent_rejects_sibling_paths() {
        let mut config = base_config();
        config.no_parent = true;
        let frontier = Frontier::new(false);
        let parent = Url::parse("http://a.test/dir/").unwrap();
        assert!(admit(&config, &frontier, "/dir/child", &parent, 2));
        assert!(!admit(&config, &frontier, "/other", &parent, 2));
    }

    #[test]
    fn recurse_ignore_pattern_rejects_matching_path() {
        let mut config = base_config();
        config.recurse_ignore_pattern = vec![Regex::new(r"^/skip").unwrap()];
        let frontier = Frontier::new(false);
        let parent = Url::parse("http://a.test/").unwrap();
        assert!(!admit(&config, &frontier, "/skip/b", &parent, 2));
        assert!(admit(&config, &frontier, "/a", &parent, 2));
    }

    #[test]
    fn recurse_pattern_requires_a_match() {
        let mut config = base_config();
        config.recurse_pattern = vec![Regex::new(r"^/allowed").unwrap()];
        let frontier = Frontier::new(false);
        let parent = Url::parse("http://a.test/").unwrap();
        assert!(admit(&config, &frontier, "/allowed/x", &parent, 2));
        assert!(!admit(&config, &frontier, "/other", &parent, 2));
    }

    #[test]
    fn depth_decrements_on_admission() {
        let config = base_config();
        let frontier = Frontier::new(false);
        let parent = Url::parse("http://a.test/").unwrap();
        assert!(admit(&config, &frontier, "/x", &parent, 1));
        let items = frontier.dispatch(1);
        assert_eq!(items[0].remaining_depth, 0);
    }
}
