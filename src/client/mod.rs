//! Remote tracker client
//!
//! Provides the narrow capability operations and runners need from GitHub.

mod github;

pub use github::GitHubClient;

use crate::error::Result;
use crate::types::{CombinedStatus, Issue, ItemState, PullRequest, Repository};
use async_trait::async_trait;

/// GitHub's maximum page size
pub const MAX_PER_PAGE: u8 = 100;

/// State filter for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    /// Open items only
    #[default]
    Open,
    /// Closed items only
    Closed,
    /// Both
    All,
}

impl StateFilter {
    /// Whether an item in `state` passes this filter
    pub const fn matches(self, state: ItemState) -> bool {
        match self {
            Self::Open => matches!(state, ItemState::Open),
            Self::Closed => matches!(state, ItemState::Closed),
            Self::All => true,
        }
    }
}

/// Query parameters for listing issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueListOptions {
    /// State filter
    pub state: StateFilter,
    /// Page size
    pub per_page: u8,
}

impl Default for IssueListOptions {
    fn default() -> Self {
        Self {
            state: StateFilter::Open,
            per_page: MAX_PER_PAGE,
        }
    }
}

/// Query parameters for listing pull requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestListOptions {
    /// State filter
    pub state: StateFilter,
    /// Page size
    pub per_page: u8,
    /// Fill in comment counts, which the pull request listing omits
    pub comment_counts: bool,
}

impl Default for PullRequestListOptions {
    fn default() -> Self {
        Self {
            state: StateFilter::Open,
            per_page: MAX_PER_PAGE,
            comment_counts: false,
        }
    }
}

/// One page of results
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Next page number, `None` on the last page
    pub next_page: Option<u32>,
}

/// Client trait for the remote issue tracker
///
/// Everything the engine and the operations do remotely goes through this
/// trait, so tests can substitute a mock.
#[async_trait]
pub trait Client: Send + Sync {
    /// Repository this client is bound to
    fn repository(&self) -> &Repository;

    /// List one page of issues (pull requests excluded)
    async fn list_issues(&self, options: &IssueListOptions, page: u32) -> Result<Page<Issue>>;

    /// List one page of pull requests
    ///
    /// Comment counts are zero unless `options.comment_counts` is set.
    async fn list_pull_requests(
        &self,
        options: &PullRequestListOptions,
        page: u32,
    ) -> Result<Page<PullRequest>>;

    /// Add labels to an issue or pull request
    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()>;

    /// Remove a single label from an issue or pull request
    async fn remove_label(&self, number: u64, label: &str) -> Result<()>;

    /// Comment on an issue or pull request
    async fn create_comment(&self, number: u64, body: &str) -> Result<()>;

    /// Close an issue or pull request
    async fn close(&self, number: u64) -> Result<()>;

    /// Get the combined status of a commit
    async fn combined_status(&self, sha: &str) -> Result<CombinedStatus>;
}
