//! `prune` - ping or close issues without recent activity

use super::{OperationDescriptor, decode_settings, ensure_known_keys};
use crate::config::parse_duration;
use crate::error::{Error, Result};
use crate::operations::{AcceptedType, Context, FilterResult, Operation};
use crate::settings::MultiValuedKeys;
use crate::types::{Item, ItemState};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use serde::Deserialize;
use std::time::Duration;

/// What to do with an outdated issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PruneAction {
    /// Leave a comment asking whether the issue is still relevant
    #[default]
    Ping,
    /// Comment, then close
    Close,
    /// Close without commenting
    ForceClose,
}

impl std::str::FromStr for PruneAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ping" => Ok(Self::Ping),
            "close" => Ok(Self::Close),
            "force-close" => Ok(Self::ForceClose),
            _ => Err(Error::InvalidArgument(format!(
                "prune: unknown action {s:?} (expected ping, close or force-close)"
            ))),
        }
    }
}

fn default_outdated() -> String {
    "30d".to_string()
}

/// Settings for the prune operation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PruneConfig {
    /// Action to take
    #[serde(default)]
    pub action: PruneAction,
    /// Inactivity after which an issue is outdated (e.g. `30d`)
    #[serde(default = "default_outdated")]
    pub outdated: String,
    /// Comment replacing the default text
    #[serde(default)]
    pub comment: Option<String>,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            action: PruneAction::default(),
            outdated: default_outdated(),
            comment: None,
        }
    }
}

/// Descriptor for [`PruneOperation`]
pub struct PruneDescriptor;

impl OperationDescriptor for PruneDescriptor {
    fn name(&self) -> &'static str {
        "prune"
    }

    fn description(&self) -> &'static str {
        "Ping or close issues without recent activity"
    }

    fn from_args(&self, args: &[String]) -> Result<Box<dyn Operation>> {
        let keys = MultiValuedKeys::from_tokens(args)?;
        ensure_known_keys(self.name(), &keys, &["action", "outdated", "comment"])?;

        let mut config = PruneConfig::default();
        if let Some(action) = keys.get_single("action")? {
            config.action = action.parse()?;
        }
        if let Some(outdated) = keys.get_single("outdated")? {
            config.outdated = outdated.to_string();
        }
        config.comment = keys.get_single("comment")?.map(ToString::to_string);
        Ok(Box::new(PruneOperation::new(&config)?))
    }

    fn from_config(&self, settings: toml::Value) -> Result<Box<dyn Operation>> {
        let config: PruneConfig = decode_settings(self.name(), settings)?;
        Ok(Box::new(PruneOperation::new(&config)?))
    }
}

/// Acts on open issues not updated within the configured period
#[derive(Debug)]
pub struct PruneOperation {
    action: PruneAction,
    outdated: Duration,
    comment: Option<String>,
}

impl PruneOperation {
    /// Validate the configuration
    pub fn new(config: &PruneConfig) -> Result<Self> {
        let outdated = parse_duration(&config.outdated)?;
        if outdated.is_zero() {
            return Err(Error::InvalidArgument(
                "prune: outdated must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            action: config.action,
            outdated,
            comment: config
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToString::to_string),
        })
    }

    fn comment_for(&self, days: &str) -> String {
        if let Some(comment) = &self.comment {
            return comment.clone();
        }
        match self.action {
            PruneAction::Ping | PruneAction::ForceClose => format!(
                "This issue has had no activity for {days} days. Is it still relevant? \
                 Please comment if so, otherwise it may be closed."
            ),
            PruneAction::Close => format!(
                "Closing this issue after {days} days without activity. \
                 Feel free to reopen it if it is still relevant."
            ),
        }
    }
}

#[async_trait]
impl Operation for PruneOperation {
    fn name(&self) -> &'static str {
        "prune"
    }

    fn accepts(&self) -> AcceptedType {
        AcceptedType::ISSUES
    }

    async fn filter(&self, _ctx: &Context<'_>, item: &Item) -> Result<FilterResult> {
        if item.state() != ItemState::Open {
            return Ok(FilterResult::Reject);
        }
        let outdated = TimeDelta::from_std(self.outdated).unwrap_or(TimeDelta::MAX);
        let inactive = Utc::now().signed_duration_since(item.updated_at());
        if inactive < outdated {
            return Ok(FilterResult::Reject);
        }
        Ok(FilterResult::Accept(vec![inactive.num_days().to_string()]))
    }

    async fn apply(&self, ctx: &Context<'_>, item: &Item, user_data: &[String]) -> Result<()> {
        let days = user_data.first().map_or("many", String::as_str);
        match self.action {
            PruneAction::Ping => {
                ctx.client
                    .create_comment(item.number(), &self.comment_for(days))
                    .await
            }
            PruneAction::Close => {
                ctx.client
                    .create_comment(item.number(), &self.comment_for(days))
                    .await?;
                ctx.client.close(item.number()).await
            }
            PruneAction::ForceClose => ctx.client.close(item.number()).await,
        }
    }

    fn describe(&self, _ctx: &Context<'_>, item: &Item, user_data: &[String]) -> String {
        let days = user_data.first().map_or("many", String::as_str);
        let verb = match self.action {
            PruneAction::Ping => "Pinging",
            PruneAction::Close => "Closing",
            PruneAction::ForceClose => "Force-closing",
        };
        format!("{verb} {item} (inactive for {days} days)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let op = PruneOperation::new(&PruneConfig::default()).unwrap();
        assert_eq!(op.action, PruneAction::Ping);
        assert_eq!(op.outdated, Duration::from_secs(30 * 86_400));
        assert!(op.comment.is_none());
    }

    #[test]
    fn test_from_args() {
        let op = PruneDescriptor
            .from_args(&["action=force-close".to_string(), "outdated=2w".to_string()])
            .unwrap();
        assert_eq!(op.accepts(), AcceptedType::ISSUES);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(PruneDescriptor.from_args(&["action=burn".to_string()]).is_err());
        assert!(PruneDescriptor.from_args(&["outdated=0d".to_string()]).is_err());
        assert!(PruneDescriptor.from_args(&["outdated=soon".to_string()]).is_err());
        assert!(
            PruneDescriptor
                .from_args(&["action=ping".to_string(), "action=close".to_string()])
                .is_err()
        );
    }

    #[test]
    fn test_from_config() {
        let settings: toml::Value =
            toml::from_str("action = \"close\"\noutdated = \"60d\"").unwrap();
        assert!(PruneDescriptor.from_config(settings).is_ok());

        let settings: toml::Value = toml::from_str("action = \"burn\"").unwrap();
        assert!(PruneDescriptor.from_config(settings).is_err());
    }

    #[test]
    fn test_custom_comment_wins() {
        let op = PruneOperation::new(&PruneConfig {
            comment: Some("Still an issue?".to_string()),
            ..PruneConfig::default()
        })
        .unwrap();
        assert_eq!(op.comment_for("40"), "Still an issue?");
    }
}
