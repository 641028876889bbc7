//! poule - mass interact with GitHub issues and pull requests
//!
//! Runs rule-driven bulk operations (labeling, cleaning, pruning, rebuild
//! requests, audits) over a repository's issues and pull requests, with
//! dry-run support and a throttling delay between mutations.

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod operations;
pub mod settings;
pub mod types;
