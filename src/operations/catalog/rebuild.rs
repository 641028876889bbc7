//! `rebuild` - request a new CI run for pull requests with failed statuses

use super::{OperationDescriptor, decode_settings, ensure_known_keys};
use crate::error::{Error, Result};
use crate::operations::{AcceptedType, Context, FilterResult, Operation};
use crate::settings::MultiValuedKeys;
use crate::types::Item;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

fn default_label() -> String {
    "rebuild".to_string()
}

/// Settings for the rebuild operation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RebuildConfig {
    /// Status contexts to watch; empty watches all of them
    #[serde(default)]
    pub contexts: Vec<String>,
    /// Label the CI system reacts to
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            contexts: Vec::new(),
            label: default_label(),
        }
    }
}

/// Descriptor for [`RebuildOperation`]
pub struct RebuildDescriptor;

impl OperationDescriptor for RebuildDescriptor {
    fn name(&self) -> &'static str {
        "rebuild"
    }

    fn description(&self) -> &'static str {
        "Request a rebuild of pull requests with failed statuses"
    }

    fn from_args(&self, args: &[String]) -> Result<Box<dyn Operation>> {
        let keys = MultiValuedKeys::from_tokens(args)?;
        ensure_known_keys(self.name(), &keys, &["context", "label"])?;

        let mut config = RebuildConfig {
            contexts: keys.get("context").map(<[String]>::to_vec).unwrap_or_default(),
            ..RebuildConfig::default()
        };
        if let Some(label) = keys.get_single("label")? {
            config.label = label.to_string();
        }
        Ok(Box::new(RebuildOperation::new(config)?))
    }

    fn from_config(&self, settings: toml::Value) -> Result<Box<dyn Operation>> {
        let config: RebuildConfig = decode_settings(self.name(), settings)?;
        Ok(Box::new(RebuildOperation::new(config)?))
    }
}

/// Labels pull requests whose head commit has failing statuses
#[derive(Debug)]
pub struct RebuildOperation {
    contexts: Vec<String>,
    label: String,
}

impl RebuildOperation {
    /// Validate the configuration
    pub fn new(config: RebuildConfig) -> Result<Self> {
        let label = config.label.trim().to_string();
        if label.is_empty() {
            return Err(Error::InvalidArgument(
                "rebuild: label must not be empty".to_string(),
            ));
        }
        Ok(Self {
            contexts: config.contexts,
            label,
        })
    }

    fn watches(&self, context: &str) -> bool {
        self.contexts.is_empty() || self.contexts.iter().any(|c| c == context)
    }
}

#[async_trait]
impl Operation for RebuildOperation {
    fn name(&self) -> &'static str {
        "rebuild"
    }

    fn accepts(&self) -> AcceptedType {
        AcceptedType::PULL_REQUESTS
    }

    async fn filter(&self, ctx: &Context<'_>, item: &Item) -> Result<FilterResult> {
        let Item::PullRequest(pr) = item else {
            return Ok(FilterResult::Reject);
        };
        // A rebuild was already requested and not yet picked up
        if item.has_label(&self.label) {
            return Ok(FilterResult::Reject);
        }

        let status = ctx.client.combined_status(&pr.head_sha).await?;
        let mut failing: Vec<String> = Vec::new();
        for s in status.statuses {
            if s.state.is_failed() && self.watches(&s.context) && !failing.contains(&s.context) {
                failing.push(s.context);
            }
        }

        debug!(number = pr.number, ?failing, "checked statuses");
        if failing.is_empty() {
            return Ok(FilterResult::Reject);
        }
        Ok(FilterResult::Accept(failing))
    }

    async fn apply(&self, ctx: &Context<'_>, item: &Item, _user_data: &[String]) -> Result<()> {
        ctx.client
            .add_labels(item.number(), std::slice::from_ref(&self.label))
            .await
    }

    fn describe(&self, _ctx: &Context<'_>, item: &Item, user_data: &[String]) -> String {
        format!(
            "Requesting rebuild of {item} (failing: {})",
            user_data.join(", ")
        )
    }
}
