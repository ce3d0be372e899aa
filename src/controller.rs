//! Controller: seed expansion, the frontier-to-pool dispatch loop, and
//! soft/hard-stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::{Client, Url};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::absolute_url;
use crate::admission;
use crate::analyzer;
use crate::config::Config;
use crate::fetcher::{self, FetchOutcome};
use crate::frontier::{Frontier, FrontierItem};
use crate::outputs::{self, BlobWriter, LineWriter};

/// Extra slots beyond `max_threads` dispatched per loop iteration, letting
/// newly-discovered URLs enter before a batch drains.
const DISPATCH_SLACK: usize = 2;

struct Shared {
    config: Config,
    client: Client,
    frontier: Frontier,
    running: AtomicBool,
    stop_pattern_reached: AtomicBool,
    stop_on_404_reached: AtomicBool,
    urls_sink: Option<LineWriter>,
    regex_sink: LineWriter,
    emails_sink: LineWriter,
    downloads: Option<BlobWriter>,
}

pub struct Controller {
    shared: Arc<Shared>,
}

impl Controller {
    pub fn new(config: Config, client: Client) -> Result<Self, crate::error::SpiderError> {
        let urls_sink = config
            .out_urls
            .as_deref()
            .map(LineWriter::new)
            .transpose()?;
        let regex_sink = LineWriter::new(config.out_regex.as_deref())?;
        let emails_sink = LineWriter::new(config.out_emails.as_deref())?;
        let downloads = config.out_dir.clone().map(BlobWriter::new);
        let depth_first = config.depth_first;

        Ok(Controller {
            shared: Arc::new(Shared {
                config,
                client,
                frontier: Frontier::new(depth_first),
                running: AtomicBool::new(true),
                stop_pattern_reached: AtomicBool::new(false),
                stop_on_404_reached: AtomicBool::new(false),
                urls_sink,
                regex_sink,
                emails_sink,
                downloads,
            }),
        })
    }

    /// Expands `{page}` templates against configured page ranges and seeds the
    /// frontier with the results.
    pub fn seed(&self) -> Result<(), crate::error::SpiderError> {
        let config = &self.shared.config;
        for template in &config.seed_templates {
            if template.contains("{page}") {
                for page in &config.pages {
                    let raw = template.replace("{page}", &page.to_string());
                    self.seed_one(&raw);
                }
            } else {
                self.seed_one(template);
            }
        }
        Ok(())
    }

    fn seed_one(&self, raw: &str) {
        match absolute_url::normalize(raw, None) {
            Ok(url) => {
                self.shared.frontier.submit(url, self.shared.config.max_depth);
            }
            Err(e) => warn!(seed = raw, error = %e, "dropping unparseable seed"),
        }
    }

    /// Runs the dispatch loop until the frontier and all in-flight work drain.
    pub async fn run(&self) {
        let mut tasks: JoinSet<()> = JoinSet::new();

        loop {
            if self.shared.running.load(Ordering::SeqCst) {
                let limit = (self.shared.config.max_threads + DISPATCH_SLACK)
                    .saturating_sub(tasks.len());
                let batch = self.shared.frontier.dispatch(limit);
                for item in batch {
                    let shared = Arc::clone(&self.shared);
                    tasks.spawn(async move { run_one(shared, item).await });
                }
            }

            if tasks.is_empty() {
                if self.shared.frontier.is_empty() || !self.shared.running.load(Ordering::SeqCst) {
                    break;
                }
                // Nothing dispatched and nothing in flight, but pending is
                // nonempty (it was at the dispatch cap) — loop to redispatch.
                continue;
            }

            if let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    if !e.is_cancelled() {
                        warn!(error = %e, "worker task panicked");
                    }
                }
            }
            // Drain any further already-completed tasks without blocking, so a
            // burst of fast responses doesn't serialize one-at-a-time.
            while let Some(result) = tasks.try_join_next() {
                if let Err(e) = result {
                    if !e.is_cancelled() {
                        warn!(error = %e, "worker task panicked");
                    }
                }
            }
        }

        info!("crawl finished");
    }
}

async fn run_one(shared: Arc<Shared>, item: FrontierItem) {
    let config = &shared.config;

    if should_skip_binary(config, &item.url) {
        debug!(url = %item.url, "skipping binary-extension url (selective download active)");
        return;
    }

    match fetcher::fetch(&shared.client, &item.url, config).await {
        FetchOutcome::Success { body, content_type } => {
            handle_success(&shared, &item, body, content_type).await;
        }
        FetchOutcome::NotFound => {
            debug!(url = %item.url, "404");
            if config.stop_on_404 {
                shared.stop_on_404_reached.store(true, Ordering::SeqCst);
                shared.frontier.drain();
                info!(url = %item.url, "404 reached, soft-stopping");
            }
        }
        FetchOutcome::CloudflareChallenge => {
            if config.requeue_cloudflare {
                info!(url = %item.url, "cloudflare challenge, requeuing");
                shared.frontier.requeue(item.url, item.remaining_depth);
            } else {
                debug!(url = %item.url, "cloudflare challenge, dropping");
            }
        }
        FetchOutcome::Dropped => {}
    }
}

async fn handle_success(
    shared: &Arc<Shared>,
    item: &FrontierItem,
    body: Vec<u8>,
    content_type: Option<String>,
) {
    let config = &shared.config;

    if let Some(sink) = &shared.urls_sink {
        if let Err(e) = sink.append(item.url.as_str()) {
            warn!(error = %e, "failed to append url log");
        }
    }

    if let Some(downloads) = &shared.downloads {
        if outputs::qualifies_for_download(config, &item.url) {
            if let Err(e) = downloads.write(&item.url, &body) {
                warn!(url = %item.url, error = %e, "failed to write download");
            }
        }
    }

    if !analyzer::is_html(content_type.as_deref()) {
        return;
    }

    let header_charset = content_type
        .as_deref()
        .and_then(|ct| ct.split("charset=").nth(1))
        .map(str::trim);
    let text = analyzer::decode_body(&body, header_charset);

    let already_stopped = shared.stop_pattern_reached.load(Ordering::SeqCst);
    let analysis = analyzer::analyze(config, &text, item.remaining_depth, already_stopped);

    if analysis.stop_pattern_hit {
        shared.stop_pattern_reached.store(true, Ordering::SeqCst);
        shared.frontier.drain();
        info!(url = %item.url, "stop pattern matched, soft-stopping");
    }

    for hit in &analysis.regex_hits {
        let record = outputs::format_regex_record(&item.url, hit.line_number, &hit.matched);
        if let Err(e) = shared.regex_sink.append(&record) {
            warn!(error = %e, "failed to append regex record");
        }
    }

    for hit in &analysis.email_hits {
        let record = outputs::format_email_record(&hit.address, hit.name.as_deref());
        if let Err(e) = shared.emails_sink.append(&record) {
            warn!(error = %e, "failed to append email record");
        }
    }

    let recursion_halted = shared.stop_pattern_reached.load(Ordering::SeqCst)
        || shared.stop_on_404_reached.load(Ordering::SeqCst);
    if !recursion_halted {
        for link in &analysis.links {
            admission::admit(config, &shared.frontier, link, &item.url, item.remaining_depth);
        }
    }
}

fn should_skip_binary(config: &Config, url: &Url) -> bool {
    config.selective_download()
        && !outputs::qualifies_for_download(config, url)
        && crate::binary_ext::is_binary_extension(url.path())
}
