//! `label` - apply labels to items whose body matches patterns

use super::{OperationDescriptor, decode_settings};
use crate::error::{Error, Result};
use crate::operations::{AcceptedType, Context, FilterResult, Operation};
use crate::settings::MultiValuedKeys;
use crate::types::Item;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

/// Settings for the label operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelConfig {
    /// Label name → patterns matched against the item body
    pub patterns: MultiValuedKeys,
}

/// Descriptor for [`LabelOperation`]
pub struct LabelDescriptor;

impl OperationDescriptor for LabelDescriptor {
    fn name(&self) -> &'static str {
        "label"
    }

    fn description(&self) -> &'static str {
        "Apply labels to issues and pull requests"
    }

    fn from_args(&self, args: &[String]) -> Result<Box<dyn Operation>> {
        let patterns = MultiValuedKeys::from_tokens(args)?;
        Ok(Box::new(LabelOperation::new(&LabelConfig { patterns })?))
    }

    fn from_config(&self, settings: toml::Value) -> Result<Box<dyn Operation>> {
        let config: LabelConfig = decode_settings(self.name(), settings)?;
        Ok(Box::new(LabelOperation::new(&config)?))
    }
}

/// Adds every label with at least one pattern matching the item body
#[derive(Debug)]
pub struct LabelOperation {
    patterns: Vec<(String, Vec<Regex>)>,
}

impl LabelOperation {
    /// Compile the configured patterns
    pub fn new(config: &LabelConfig) -> Result<Self> {
        if config.patterns.is_empty() {
            return Err(Error::InvalidArgument(
                "label: at least one label=pattern is required".to_string(),
            ));
        }

        let mut patterns: Vec<(String, Vec<Regex>)> = Vec::new();
        config.patterns.try_for_each(|label, pattern| {
            let re = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            match patterns.iter_mut().find(|(l, _)| l == label) {
                Some((_, res)) => res.push(re),
                None => patterns.push((label.to_string(), vec![re])),
            }
            Ok(())
        })?;
        Ok(Self { patterns })
    }

    /// Labels whose patterns match `body`, in configuration order
    ///
    /// Each label is tested until its first matching pattern.
    pub fn matching_labels(&self, body: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, res)| res.iter().any(|re| re.is_match(body)))
            .map(|(label, _)| label.clone())
            .collect()
    }
}

#[async_trait]
impl Operation for LabelOperation {
    fn name(&self) -> &'static str {
        "label"
    }

    fn accepts(&self) -> AcceptedType {
        AcceptedType::ISSUES | AcceptedType::PULL_REQUESTS
    }

    async fn filter(&self, _ctx: &Context<'_>, item: &Item) -> Result<FilterResult> {
        let labels = self.matching_labels(item.body());
        if labels.is_empty() {
            return Ok(FilterResult::Reject);
        }
        Ok(FilterResult::Accept(labels))
    }

    async fn apply(&self, ctx: &Context<'_>, item: &Item, user_data: &[String]) -> Result<()> {
        ctx.client.add_labels(item.number(), user_data).await
    }

    fn describe(&self, _ctx: &Context<'_>, item: &Item, user_data: &[String]) -> String {
        format!("Adding labels {} to {item}", user_data.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(tokens: &[&str]) -> Result<LabelOperation> {
        LabelOperation::new(&LabelConfig {
            patterns: MultiValuedKeys::from_tokens(tokens)?,
        })
    }

    #[test]
    fn test_matching_labels() {
        let op = operation(&["bug=crash", "docs=typo"]).unwrap();
        assert_eq!(op.matching_labels("this is a crash bug"), vec!["bug"]);
        assert!(op.matching_labels("nothing relevant").is_empty());
    }

    #[test]
    fn test_label_reported_once_when_several_patterns_match() {
        let op = operation(&["bug=crash", "bug=panic", "bug=(?i)segfault"]).unwrap();
        assert_eq!(
            op.matching_labels("crash with a panic and a SEGFAULT"),
            vec!["bug"]
        );
    }

    #[test]
    fn test_labels_follow_configuration_order() {
        let op = operation(&["docs=typo", "bug=crash"]).unwrap();
        assert_eq!(op.matching_labels("crash typo"), vec!["docs", "bug"]);
    }

    #[test]
    fn test_invalid_pattern_is_construction_error() {
        match operation(&["bug=("]) {
            Err(Error::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "("),
            other => panic!("Expected InvalidPattern, got: {other:?}"),
        }
    }

    #[test]
    fn test_no_patterns_is_error() {
        assert!(matches!(operation(&[]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_cli_and_config_paths_agree() {
        let from_cli = LabelDescriptor
            .from_args(&["bug=crash".to_string(), "docs=typo".to_string()])
            .unwrap();
        let settings: toml::Value = toml::from_str(
            r#"
            [patterns]
            bug = "crash"
            docs = ["typo"]
            "#,
        )
        .unwrap();
        let from_config = LabelDescriptor.from_config(settings).unwrap();

        assert_eq!(from_cli.name(), from_config.name());
        assert_eq!(from_cli.accepts(), from_config.accepts());
    }

    #[test]
    fn test_config_rejects_unknown_setting() {
        let settings: toml::Value = toml::from_str("pattern = \"typo\"").unwrap();
        assert!(LabelDescriptor.from_config(settings).is_err());
    }
}
