//! src/main.rs
//!
//! Entry point for the webspider binary.
//!
//! Responsibilities of this file:
//!   1) Parse command-line arguments into a typed `Cli` struct (via `clap`).
//!   2) Initialize `tracing` logging, honoring `-D/--debug` and `--out-log`.
//!   3) Validate flags into an immutable `Config` (regex compilation, page
//!      ranges, startup-fatal checks).
//!   4) Build a reusable HTTP client (`reqwest::Client`) with the configured
//!      proxy and user agent.
//!   5) Seed and run the `Controller` until the crawl completes.

use clap::Parser;
use reqwest::Client;
use webspider_core::cli::Cli;
use webspider_core::{Config, Controller, SpiderError};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), SpiderError> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    init_logging(config.debug, config.out_log.as_deref());

    let user_agent = resolve_user_agent(&config)?;

    let mut builder = Client::builder().user_agent(user_agent);
    if let Some(proxy_url) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    let client = builder.build()?;

    let controller = Controller::new(config, client)?;
    controller.seed()?;
    controller.run().await;

    Ok(())
}

fn resolve_user_agent(config: &Config) -> Result<String, SpiderError> {
    if let Some(ua) = &config.user_agent {
        return Ok(ua.clone());
    }
    if let Some(path) = &config.user_agent_file {
        return webspider_core::user_agent::pick_from_file(path);
    }
    Ok(webspider_core::user_agent::DEFAULT_USER_AGENT.to_string())
}

fn init_logging(debug: bool, out_log: Option<&std::path::Path>) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match out_log {
        Some(path) => match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => subscriber.with_writer(std::sync::Mutex::new(file)).init(),
            Err(e) => {
                subscriber.init();
                tracing::warn!(path = %path.display(), error = %e, "failed to open --out-log file, logging to stderr");
            }
        },
        None => subscriber.init(),
    }
}
