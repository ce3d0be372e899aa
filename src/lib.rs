//! Core library for the concurrent web spider: frontier, admission filter,
//! fetcher, HTML analyzer, outputs, and the controller that wires them
//! together. The `webspider` binary is a thin CLI shell around this crate.

pub mod absolute_url;
pub mod admission;
pub mod analyzer;
pub mod binary_ext;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod frontier;
pub mod outputs;
pub mod user_agent;

pub use config::Config;
pub use controller::Controller;
pub use error::SpiderError;
