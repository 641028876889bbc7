//! `clean` - strip transient labels from closed items

use super::{OperationDescriptor, decode_settings, ensure_known_keys};
use crate::client::{IssueListOptions, PullRequestListOptions, StateFilter};
use crate::error::{Error, Result};
use crate::operations::{AcceptedType, Context, FilterResult, Operation};
use crate::settings::MultiValuedKeys;
use crate::types::{Item, ItemState};
use async_trait::async_trait;
use serde::Deserialize;

/// Settings for the clean operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanConfig {
    /// Labels that make no sense once an item is closed
    pub labels: Vec<String>,
}

/// Descriptor for [`CleanOperation`]
pub struct CleanDescriptor;

impl OperationDescriptor for CleanDescriptor {
    fn name(&self) -> &'static str {
        "clean"
    }

    fn description(&self) -> &'static str {
        "Remove transient labels from closed issues and pull requests"
    }

    fn from_args(&self, args: &[String]) -> Result<Box<dyn Operation>> {
        let keys = MultiValuedKeys::from_tokens(args)?;
        ensure_known_keys(self.name(), &keys, &["label"])?;
        let labels = keys.get("label").map(<[String]>::to_vec).unwrap_or_default();
        Ok(Box::new(CleanOperation::new(CleanConfig { labels })?))
    }

    fn from_config(&self, settings: toml::Value) -> Result<Box<dyn Operation>> {
        let config: CleanConfig = decode_settings(self.name(), settings)?;
        Ok(Box::new(CleanOperation::new(config)?))
    }
}

/// Removes configured labels still attached to closed items
#[derive(Debug)]
pub struct CleanOperation {
    labels: Vec<String>,
}

impl CleanOperation {
    /// Validate the label list
    pub fn new(config: CleanConfig) -> Result<Self> {
        let mut labels: Vec<String> = Vec::with_capacity(config.labels.len());
        for label in config.labels {
            let label = label.trim().to_string();
            if label.is_empty() {
                return Err(Error::InvalidArgument(
                    "clean: empty label name".to_string(),
                ));
            }
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        if labels.is_empty() {
            return Err(Error::InvalidArgument(
                "clean: at least one label=<name> is required".to_string(),
            ));
        }
        Ok(Self { labels })
    }
}

#[async_trait]
impl Operation for CleanOperation {
    fn name(&self) -> &'static str {
        "clean"
    }

    fn accepts(&self) -> AcceptedType {
        AcceptedType::ISSUES | AcceptedType::PULL_REQUESTS
    }

    async fn filter(&self, _ctx: &Context<'_>, item: &Item) -> Result<FilterResult> {
        if item.state() != ItemState::Closed {
            return Ok(FilterResult::Reject);
        }
        let present: Vec<String> = self
            .labels
            .iter()
            .filter(|l| item.has_label(l))
            .cloned()
            .collect();
        if present.is_empty() {
            return Ok(FilterResult::Reject);
        }
        Ok(FilterResult::Accept(present))
    }

    async fn apply(&self, ctx: &Context<'_>, item: &Item, user_data: &[String]) -> Result<()> {
        for label in user_data {
            ctx.client.remove_label(item.number(), label).await?;
        }
        Ok(())
    }

    fn describe(&self, _ctx: &Context<'_>, item: &Item, user_data: &[String]) -> String {
        format!("Removing labels {} from closed {item}", user_data.join(", "))
    }

    fn issue_list_options(&self, _ctx: &Context<'_>) -> IssueListOptions {
        IssueListOptions {
            state: StateFilter::Closed,
            ..IssueListOptions::default()
        }
    }

    fn pull_request_list_options(&self, _ctx: &Context<'_>) -> PullRequestListOptions {
        PullRequestListOptions {
            state: StateFilter::Closed,
            ..PullRequestListOptions::default()
        }
    }
}
