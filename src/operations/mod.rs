//! Bulk operations over issues and pull requests
//!
//! An [`Operation`] decides, item by item, whether it wants to act
//! ([`Operation::filter`]), what it would do ([`Operation::describe`]) and
//! how to do it ([`Operation::apply`]). The engine in [`run`] drives it over
//! the items produced by a [`Runner`].

pub mod catalog;
mod run;
mod runner;

pub use run::{Progress, RunSummary, eligible_kinds, run, run_single_operation};
pub use runner::{IssueRunner, PullRequestRunner, Runner, runner_for};

use crate::client::{Client, IssueListOptions, PullRequestListOptions};
use crate::error::Result;
use crate::types::{Item, ItemKind, Repository};
use async_trait::async_trait;
use bitflags::bitflags;

bitflags! {
    /// Item kinds an operation supports
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AcceptedType: u8 {
        /// Issues
        const ISSUES = 1 << 0;
        /// Pull requests
        const PULL_REQUESTS = 1 << 1;
    }
}

impl AcceptedType {
    /// Flag corresponding to a single item kind
    pub const fn of(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Issue => Self::ISSUES,
            ItemKind::PullRequest => Self::PULL_REQUESTS,
        }
    }

    /// Whether items of `kind` are accepted
    pub const fn accepts(self, kind: ItemKind) -> bool {
        self.contains(Self::of(kind))
    }
}

/// Outcome of [`Operation::filter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    /// Act on the item
    ///
    /// Carries values the operation computed while filtering (labels to
    /// add or remove, failing contexts, ...) so `apply` and `describe` do
    /// not recompute them.
    Accept(Vec<String>),
    /// Leave the item alone
    Reject,
}

impl FilterResult {
    /// Whether the item was accepted
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }
}

/// Per-run state shared with operations and runners
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// Remote tracker client
    pub client: &'a dyn Client,
    /// Target repository
    pub repository: &'a Repository,
    /// Describe only, never mutate
    pub dry_run: bool,
}

impl<'a> Context<'a> {
    /// Create a context bound to `client`'s repository
    pub fn new(client: &'a dyn Client, dry_run: bool) -> Self {
        Self {
            client,
            repository: client.repository(),
            dry_run,
        }
    }
}

/// A pluggable bulk action
///
/// Operations are built once per run by a catalog descriptor and are
/// immutable afterwards.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Catalog name, used in error context
    fn name(&self) -> &'static str;

    /// Item kinds this operation supports
    fn accepts(&self) -> AcceptedType;

    /// Whether `apply` changes anything remotely
    ///
    /// Report-only operations are not throttled.
    fn is_mutating(&self) -> bool {
        true
    }

    /// Decide whether to act on `item`
    ///
    /// Errors abort the run; they are never treated as a rejection.
    async fn filter(&self, ctx: &Context<'_>, item: &Item) -> Result<FilterResult>;

    /// Perform the mutation for an accepted item
    async fn apply(&self, ctx: &Context<'_>, item: &Item, user_data: &[String]) -> Result<()>;

    /// One-line summary of what `apply` does for this item
    fn describe(&self, ctx: &Context<'_>, item: &Item, user_data: &[String]) -> String;

    /// Query parameters for listing issues
    fn issue_list_options(&self, _ctx: &Context<'_>) -> IssueListOptions {
        IssueListOptions::default()
    }

    /// Query parameters for listing pull requests
    fn pull_request_list_options(&self, _ctx: &Context<'_>) -> PullRequestListOptions {
        PullRequestListOptions::default()
    }
}
