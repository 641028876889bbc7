//! Execution engine
//!
//! Streams items from a runner through the filter set and the operation,
//! applying accepted items one at a time. The first error stops the run;
//! items already mutated stay mutated.

use crate::config::Config;
use crate::error::Result;
use crate::operations::{AcceptedType, Context, FilterResult, Operation, Runner, runner_for};
use crate::settings::FilterSet;
use crate::types::{Item, ItemKind};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Receives user-facing output while a run progresses
#[async_trait]
pub trait Progress: Send + Sync {
    /// Called for every accepted item, before it is applied
    async fn on_describe(&self, item: &Item, description: &str, dry_run: bool);

    /// Called when a run over one item kind completes
    async fn on_complete(&self, summary: &RunSummary);
}

/// Counters for one run over one item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Kind of item processed
    pub kind: ItemKind,
    /// Items fetched
    pub seen: usize,
    /// Items accepted by both the filter set and the operation
    pub accepted: usize,
    /// Items the operation was applied to
    pub applied: usize,
    /// Whether applying the operation changes items
    pub mutating: bool,
}

impl RunSummary {
    const fn new(kind: ItemKind, mutating: bool) -> Self {
        Self {
            kind,
            mutating,
            seen: 0,
            accepted: 0,
            applied: 0,
        }
    }
}

/// Item kinds to process for `accepted`, honoring `is=` filters
///
/// Issues come first. A filter set restricting to both kinds at once
/// selects nothing.
pub fn eligible_kinds(filters: &FilterSet, accepted: AcceptedType) -> Vec<ItemKind> {
    let issues = filters.includes_issues();
    let pull_requests = filters.includes_pull_requests();
    if !issues && !pull_requests {
        warn!("filters restrict to both issues and pull requests only, nothing to do");
    }

    let mut kinds = Vec::with_capacity(2);
    if issues && accepted.accepts(ItemKind::Issue) {
        kinds.push(ItemKind::Issue);
    }
    if pull_requests && accepted.accepts(ItemKind::PullRequest) {
        kinds.push(ItemKind::PullRequest);
    }
    kinds
}

/// Run `op` over every item `runner` produces
pub async fn run(
    ctx: &Context<'_>,
    config: &Config,
    op: &dyn Operation,
    runner: &mut dyn Runner,
    filters: &FilterSet,
    progress: &dyn Progress,
) -> Result<RunSummary> {
    let mut summary = RunSummary::new(runner.kind(), op.is_mutating());
    let now = Utc::now();
    debug!(operation = op.name(), kind = %summary.kind, dry_run = config.dry_run, "starting run");

    while let Some(items) = runner.next_page(ctx, op).await? {
        for item in items {
            summary.seen += 1;

            if let Some(filter) = filters.rejecting(&item, now) {
                debug!(%item, %filter, "rejected by filter");
                continue;
            }

            let result = op
                .filter(ctx, &item)
                .await
                .map_err(|e| e.for_item(op.name(), &item))?;
            let FilterResult::Accept(user_data) = result else {
                debug!(%item, operation = op.name(), "rejected by operation");
                continue;
            };
            summary.accepted += 1;

            let description = op.describe(ctx, &item, &user_data);
            progress
                .on_describe(&item, &description, config.dry_run)
                .await;

            if config.dry_run {
                continue;
            }

            op.apply(ctx, &item, &user_data)
                .await
                .map_err(|e| e.for_item(op.name(), &item))?;
            summary.applied += 1;

            if op.is_mutating() && !config.delay.is_zero() {
                tokio::time::sleep(config.delay).await;
            }
        }
    }

    info!(
        operation = op.name(),
        kind = %summary.kind,
        seen = summary.seen,
        accepted = summary.accepted,
        applied = summary.applied,
        "run complete"
    );
    progress.on_complete(&summary).await;
    Ok(summary)
}

/// Run `op` over every eligible item kind, issues first
pub async fn run_single_operation(
    ctx: &Context<'_>,
    config: &Config,
    op: &dyn Operation,
    filters: &FilterSet,
    progress: &dyn Progress,
) -> Result<Vec<RunSummary>> {
    let mut summaries = Vec::new();
    for kind in eligible_kinds(filters, op.accepts()) {
        let mut runner = runner_for(kind, filters);
        summaries.push(run(ctx, config, op, runner.as_mut(), filters, progress).await?);
    }
    Ok(summaries)
}
