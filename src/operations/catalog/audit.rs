//! `audit` - report items missing a classification label

use super::{OperationDescriptor, decode_settings, ensure_known_keys};
use crate::error::{Error, Result};
use crate::operations::{AcceptedType, Context, FilterResult, Operation};
use crate::settings::MultiValuedKeys;
use crate::types::Item;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

fn default_prefixes() -> Vec<String> {
    vec!["kind/".to_string()]
}

/// Settings for the audit operation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Every item must carry a label starting with each prefix
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
        }
    }
}

/// Descriptor for [`AuditOperation`]
pub struct AuditDescriptor;

impl OperationDescriptor for AuditDescriptor {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn description(&self) -> &'static str {
        "Report issues and pull requests missing a classification label"
    }

    fn from_args(&self, args: &[String]) -> Result<Box<dyn Operation>> {
        let keys = MultiValuedKeys::from_tokens(args)?;
        ensure_known_keys(self.name(), &keys, &["prefix"])?;
        let config = keys
            .get("prefix")
            .map_or_else(AuditConfig::default, |prefixes| AuditConfig {
                prefixes: prefixes.to_vec(),
            });
        Ok(Box::new(AuditOperation::new(config)?))
    }

    fn from_config(&self, settings: toml::Value) -> Result<Box<dyn Operation>> {
        let config: AuditConfig = decode_settings(self.name(), settings)?;
        Ok(Box::new(AuditOperation::new(config)?))
    }
}

/// Reports items without a label for one of the configured prefixes
///
/// Nothing is changed remotely.
#[derive(Debug)]
pub struct AuditOperation {
    prefixes: Vec<String>,
}

impl AuditOperation {
    /// Validate the prefix list
    pub fn new(config: AuditConfig) -> Result<Self> {
        if config.prefixes.is_empty() || config.prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::InvalidArgument(
                "audit: prefixes must be non-empty".to_string(),
            ));
        }
        Ok(Self {
            prefixes: config.prefixes,
        })
    }

    /// Prefixes for which `item` has no label
    pub fn missing_prefixes(&self, item: &Item) -> Vec<String> {
        self.prefixes
            .iter()
            .filter(|p| !item.labels().iter().any(|l| l.starts_with(p.as_str())))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Operation for AuditOperation {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn accepts(&self) -> AcceptedType {
        AcceptedType::ISSUES | AcceptedType::PULL_REQUESTS
    }

    fn is_mutating(&self) -> bool {
        false
    }

    async fn filter(&self, _ctx: &Context<'_>, item: &Item) -> Result<FilterResult> {
        let missing = self.missing_prefixes(item);
        if missing.is_empty() {
            return Ok(FilterResult::Reject);
        }
        Ok(FilterResult::Accept(missing))
    }

    async fn apply(&self, _ctx: &Context<'_>, item: &Item, user_data: &[String]) -> Result<()> {
        warn!(%item, missing = ?user_data, "audit finding");
        Ok(())
    }

    fn describe(&self, _ctx: &Context<'_>, item: &Item, user_data: &[String]) -> String {
        format!(
            "{item} has no label starting with {}",
            user_data.join(", ")
        )
    }
}
