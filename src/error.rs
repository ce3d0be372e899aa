//! Central error type for the spider.
//!
//! One flat enum, manual `Display`/`Error` impls, and `From` conversions so `?`
//! works at call sites without pulling in an error-wrapping crate.

use std::{error::Error, fmt};

#[derive(Debug)]
pub enum SpiderError {
    /// The provided URL has no supported scheme (http/https/ftp) or no host.
    InvalidUrl(String),

    /// Wrapper for file/stream I/O errors (wordlist, output sinks, downloads).
    Io(std::io::Error),

    /// Wrapper for HTTP client errors (DNS/TLS/connect/timeouts/protocol).
    Http(reqwest::Error),

    /// Header value could not be interpreted as UTF-8 text.
    HeaderToStr(reqwest::header::ToStrError),

    /// An async task failed to join (panic/cancellation surfaced as `JoinError`).
    Join(tokio::task::JoinError),

    /// A user-supplied regular expression failed to compile.
    BadRegex(regex::Error),

    /// No seed URLs were supplied on the command line or via `-f/--file`.
    NoSeeds,

    /// None of the output methods (`-o`, `--out-urls`, `--out-emails`, `--out-regex`)
    /// and none of the search options were configured, so the run would produce nothing.
    NoOutputMethod,

    /// A `-p/--pages` range expression could not be parsed (e.g. `"a-b"`).
    BadPageRange(String),
}

impl fmt::Display for SpiderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiderError::InvalidUrl(u) => write!(f, "invalid url: {u}"),
            SpiderError::Io(e) => write!(f, "io error: {e}"),
            SpiderError::Http(e) => write!(f, "http error: {e}"),
            SpiderError::HeaderToStr(e) => write!(f, "header to_str error: {e}"),
            SpiderError::Join(e) => write!(f, "task join error: {e}"),
            SpiderError::BadRegex(e) => write!(f, "invalid regex: {e}"),
            SpiderError::NoSeeds => write!(f, "no seed urls supplied"),
            SpiderError::NoOutputMethod => {
                write!(f, "no output method or search option configured")
            }
            SpiderError::BadPageRange(s) => write!(f, "invalid page range: {s}"),
        }
    }
}

impl Error for SpiderError {}

impl From<std::io::Error> for SpiderError {
    fn from(e: std::io::Error) -> Self {
        SpiderError::Io(e)
    }
}

impl From<reqwest::Error> for SpiderError {
    fn from(e: reqwest::Error) -> Self {
        SpiderError::Http(e)
    }
}

impl From<reqwest::header::ToStrError> for SpiderError {
    fn from(e: reqwest::header::ToStrError) -> Self {
        SpiderError::HeaderToStr(e)
    }
}

impl From<tokio::task::JoinError> for SpiderError {
    fn from(e: tokio::task::JoinError) -> Self {
        SpiderError::Join(e)
    }
}

impl From<regex::Error> for SpiderError {
    fn from(e: regex::Error) -> Self {
        SpiderError::BadRegex(e)
    }
}
