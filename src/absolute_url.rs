//! Absolute URL normalization and validation.
//!
//! The two promotion rules and the supported-scheme check are the only URL
//! canonicalization this crate performs. Everything else is delegated to the
//! `url` crate.

use url::Url;

use crate::error::SpiderError;

pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Turn a possibly-relative, possibly scheme-less link into an absolute URL.
///
/// Promotion rules, applied in order:
///   1. A leading `/` means "relative to the parent's host" — prepend
///      `parent`'s scheme and host.
///   2. A link with no scheme at all gets `http://` prepended.
///
/// Anything else is handed to `Url::parse`/`Url::join` as-is. Rejects schemes
/// outside `SUPPORTED_SCHEMES` and URLs with no host.
pub fn normalize(raw: &str, parent: Option<&Url>) -> Result<Url, SpiderError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SpiderError::InvalidUrl(raw.to_string()));
    }

    // Exactly the two promotion rules — no other normalization (no urljoin
    // against the parent path, even though that would "fix up" bare relative
    // links like "about.html").
    let candidate = if let Some(rest) = trimmed.strip_prefix('/') {
        match parent {
            Some(p) => format!("{}://{}/{}", p.scheme(), host_and_port(p), rest),
            None => format!("http://{rest}"),
        }
    } else if !has_scheme(trimmed) {
        format!("http://{trimmed}")
    } else {
        trimmed.to_string()
    };

    let url = Url::parse(&candidate).map_err(|_| SpiderError::InvalidUrl(raw.to_string()))?;
    validate(url)
}

fn validate(url: Url) -> Result<Url, SpiderError> {
    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(SpiderError::InvalidUrl(url.to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(SpiderError::InvalidUrl(url.to_string()));
    }
    Ok(url)
}

fn has_scheme(s: &str) -> bool {
    match s.find(':') {
        Some(idx) => {
            let scheme = &s[..idx];
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
                && s[idx + 1..].starts_with("//")
        }
        None => false,
    }
}

fn host_and_port(url: &Url) -> String {
    match url.port() {
        Some(p) => format!("{}:{}", url.host_str().unwrap_or_default(), p),
        None => url.host_str().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_less_gets_http_prepended() {
        let u = normalize("example.com/path", None).unwrap();
        assert_eq!(u.as_str(), "http://example.com/path");
    }

    #[test]
    fn leading_slash_uses_parent_host() {
        let parent = Url::parse("https://a.test/x/y").unwrap();
        let u = normalize("/z", Some(&parent)).unwrap();
        assert_eq!(u.as_str(), "https://a.test/z");
    }

    #[test]
    fn scheme_less_relative_link_is_not_joined_against_parent() {
        // Only the two prepend rules apply — a bare relative link is NOT
        // resolved against the parent's path, it just gets `http://` glued on.
        let parent = Url::parse("https://a.test/x/y").unwrap();
        let u = normalize("z", Some(&parent)).unwrap();
        assert_eq!(u.as_str(), "http://z/");
    }

    #[test]
    fn absolute_url_passes_through() {
        let u = normalize("http://b.test/q", None).unwrap();
        assert_eq!(u.as_str(), "http://b.test/q");
    }

    #[test]
    fn unsupported_scheme_rejected() {
        assert!(normalize("mailto:a@b.com", None).is_err());
        assert!(normalize("javascript:alert(1)", None).is_err());
    }

    #[test]
    fn empty_host_rejected() {
        assert!(normalize("http:///path", None).is_err());
    }

    #[test]
    fn ftp_scheme_supported() {
        let u = normalize("ftp://files.test/a", None).unwrap();
        assert_eq!(u.scheme(), "ftp");
    }
}
