//! Error types for poule

use crate::types::ItemKind;
use thiserror::Error;

/// Errors produced while configuring or running operations
#[derive(Debug, Error)]
pub enum Error {
    /// Global configuration is missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// A `--filter` token could not be parsed
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Operation arguments or settings are invalid
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configured regular expression failed to compile
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Pattern as written by the user
        pattern: String,
        /// Underlying compile error
        #[source]
        source: regex::Error,
    },

    /// No operation registered under this name
    #[error("operation not found: {0}")]
    OperationNotFound(String),

    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Listing a page of items failed; the run was aborted there
    #[error("{operation}: listing {kind}s (page {page}): {source}")]
    Listing {
        /// Name of the operation being run
        operation: String,
        /// Kind of item being listed
        kind: ItemKind,
        /// Page that failed
        page: u32,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },

    /// Processing a single item failed; the run was aborted there
    #[error("{operation}: {item}: {source}")]
    Item {
        /// Name of the operation being run
        operation: String,
        /// Item identifier (e.g. "issue #12")
        item: String,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },

    /// Batch file could not be read or parsed
    #[error("batch file error: {0}")]
    BatchFile(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

impl Error {
    /// Wrap `self` as a failure listing `page` of `kind` for `operation`
    #[must_use]
    pub fn for_listing(self, operation: &str, kind: ItemKind, page: u32) -> Self {
        Self::Listing {
            operation: operation.to_string(),
            kind,
            page,
            source: Box::new(self),
        }
    }

    /// Wrap `self` with the operation and item it occurred on
    #[must_use]
    pub fn for_item(self, operation: &str, item: impl std::fmt::Display) -> Self {
        Self::Item {
            operation: operation.to_string(),
            item: item.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
