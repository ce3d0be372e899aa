//! Fetcher: one HTTP GET per `FrontierItem`, with retry and result
//! classification.

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::absolute_url;
use crate::config::Config;

pub const CLOUDFLARE_TITLE_NEEDLE: &str = "Attention Required! | Cloudflare";

/// What happened to a single fetch attempt, once retries are exhausted.
pub enum FetchOutcome {
    /// 200 OK — body and content-type ready for the analyzer.
    Success { body: Vec<u8>, content_type: Option<String> },
    /// 404 — caller decides whether to soft-stop.
    NotFound,
    /// 403 whose body's `<title>` names the Cloudflare challenge page.
    CloudflareChallenge,
    /// Any other non-200 status, or retries exhausted on transport errors.
    Dropped,
}

/// Performs the GET (with retry on transport failure) and classifies the
/// result. Does not itself decide soft-stop or requeue — those are the
/// caller's (Controller's) responsibility, since they touch the Frontier.
pub async fn fetch(client: &Client, url: &reqwest::Url, config: &Config) -> FetchOutcome {
    if !absolute_url::SUPPORTED_SCHEMES.contains(&url.scheme()) {
        warn!(%url, "rejecting url with unsupported scheme");
        return FetchOutcome::Dropped;
    }

    let mut attempts_left = config.max_retries;
    loop {
        let mut request = client.get(url.clone());
        if let Some(ua) = &config.user_agent {
            request = request.header(reqwest::header::USER_AGENT, ua.clone());
        }

        match request.send().await {
            Ok(response) => return classify(response).await,
            Err(e) => {
                if attempts_left == 0 {
                    warn!(%url, error = %e, "transport error, retries exhausted");
                    return FetchOutcome::Dropped;
                }
                debug!(%url, error = %e, attempts_left, "transport error, retrying");
                attempts_left -= 1;
                tokio::time::sleep(config.fail_sleep).await;
            }
        }
    }
}

async fn classify(response: reqwest::Response) -> FetchOutcome {
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match status {
        StatusCode::OK => match response.bytes().await {
            Ok(bytes) => FetchOutcome::Success {
                body: bytes.to_vec(),
                content_type,
            },
            Err(e) => {
                warn!(error = %e, "failed to read response body");
                FetchOutcome::Dropped
            }
        },
        StatusCode::NOT_FOUND => FetchOutcome::NotFound,
        StatusCode::FORBIDDEN => match response.bytes().await {
            Ok(bytes) if body_is_cloudflare_challenge(&bytes) => FetchOutcome::CloudflareChallenge,
            _ => FetchOutcome::Dropped,
        },
        other => {
            debug!(%other, "non-success status, dropping");
            FetchOutcome::Dropped
        }
    }
}

/// Cheap substring check on the decoded-as-UTF8-lossy body for the exact
/// Cloudflare challenge title; not a full HTML parse.
fn body_is_cloudflare_challenge(body: &[u8]) -> bool {
    let text = String::from_utf8_lossy(body);
    text.contains(CLOUDFLARE_TITLE_NEEDLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cloudflare_title_substring() {
        let body = b"<html><head><title>Attention Required! | Cloudflare</title></head></html>";
        assert!(body_is_cloudflare_challenge(body));
    }

    #[test]
    fn plain_403_body_is_not_cloudflare() {
        let body = b"<html><head><title>Forbidden</title></head></html>";
        assert!(!body_is_cloudflare_challenge(body));
    }
}
