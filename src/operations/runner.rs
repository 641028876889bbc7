//! Kind-specific paginators
//!
//! A runner turns an operation's list options into a paginated query and
//! hands the engine one page of [`Item`]s at a time. Runners are not
//! restartable; build a new one per invocation.

use crate::error::Result;
use crate::operations::{Context, Operation};
use crate::settings::FilterSet;
use crate::types::{Item, ItemKind};
use async_trait::async_trait;
use tracing::debug;

/// Paginates one kind of item
#[async_trait]
pub trait Runner: Send {
    /// Kind of item produced
    fn kind(&self) -> ItemKind;

    /// Fetch the next page, `None` once exhausted
    async fn next_page(
        &mut self,
        ctx: &Context<'_>,
        op: &dyn Operation,
    ) -> Result<Option<Vec<Item>>>;
}

/// Runner over issues
#[derive(Debug)]
pub struct IssueRunner {
    next: Option<u32>,
}

impl IssueRunner {
    /// Start at the first page
    pub const fn new() -> Self {
        Self { next: Some(1) }
    }
}

impl Default for IssueRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for IssueRunner {
    fn kind(&self) -> ItemKind {
        ItemKind::Issue
    }

    async fn next_page(
        &mut self,
        ctx: &Context<'_>,
        op: &dyn Operation,
    ) -> Result<Option<Vec<Item>>> {
        let Some(page) = self.next else {
            return Ok(None);
        };
        let options = op.issue_list_options(ctx);
        let result = ctx
            .client
            .list_issues(&options, page)
            .await
            .map_err(|e| e.for_listing(op.name(), ItemKind::Issue, page))?;

        debug!(page, count = result.items.len(), "fetched issue page");
        self.next = result.next_page;
        Ok(Some(result.items.into_iter().map(Item::Issue).collect()))
    }
}

/// Runner over pull requests
#[derive(Debug)]
pub struct PullRequestRunner {
    next: Option<u32>,
    comment_counts: bool,
}

impl PullRequestRunner {
    /// Start at the first page
    pub const fn new() -> Self {
        Self {
            next: Some(1),
            comment_counts: false,
        }
    }

    /// Also request comment counts for every pull request
    #[must_use]
    pub const fn with_comment_counts(mut self) -> Self {
        self.comment_counts = true;
        self
    }
}

impl Default for PullRequestRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for PullRequestRunner {
    fn kind(&self) -> ItemKind {
        ItemKind::PullRequest
    }

    async fn next_page(
        &mut self,
        ctx: &Context<'_>,
        op: &dyn Operation,
    ) -> Result<Option<Vec<Item>>> {
        let Some(page) = self.next else {
            return Ok(None);
        };
        let mut options = op.pull_request_list_options(ctx);
        options.comment_counts |= self.comment_counts;
        let result = ctx
            .client
            .list_pull_requests(&options, page)
            .await
            .map_err(|e| e.for_listing(op.name(), ItemKind::PullRequest, page))?;

        debug!(page, count = result.items.len(), "fetched pull request page");
        self.next = result.next_page;
        Ok(Some(
            result.items.into_iter().map(Item::PullRequest).collect(),
        ))
    }
}

/// Fresh runner for `kind`, fetching what `filters` need
pub fn runner_for(kind: ItemKind, filters: &FilterSet) -> Box<dyn Runner> {
    match kind {
        ItemKind::Issue => Box::new(IssueRunner::new()),
        ItemKind::PullRequest if filters.needs_comment_counts() => {
            Box::new(PullRequestRunner::new().with_comment_counts())
        }
        ItemKind::PullRequest => Box::new(PullRequestRunner::new()),
    }
}
