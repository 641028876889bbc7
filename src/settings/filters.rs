//! Generic item filters (`--filter key=value`)

use crate::config::parse_duration;
use crate::error::{Error, Result};
use crate::types::{Item, ItemKind};
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Comparison applied to a count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Strictly less than
    Less,
    /// Equal to
    Equal,
    /// Strictly greater than
    Greater,
}

impl Comparison {
    const fn holds(self, actual: u32, expected: u32) -> bool {
        match self {
            Self::Less => actual < expected,
            Self::Equal => actual == expected,
            Self::Greater => actual > expected,
        }
    }
}

/// A predicate over a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStrategy {
    /// Restrict to one item kind (`is=issue`, `is=pr`)
    Is(ItemKind),
    /// Item carries every listed label (`labels=a,b`)
    Labels(Vec<String>),
    /// Item carries none of the listed labels (`~labels=a,b`)
    NotLabels(Vec<String>),
    /// Item was created at least this long ago (`age=30d`)
    Age(Duration),
    /// Item was last updated at least this long ago (`stale=2w`)
    Stale(Duration),
    /// Item assignment state (`assigned=true`)
    Assigned(bool),
    /// Comment count comparison (`comments=>10`)
    Comments(Comparison, u32),
}

impl FilterStrategy {
    /// Parse one `key`/`value` pair
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        match key {
            "is" => match value {
                "issue" | "issues" => Ok(Self::Is(ItemKind::Issue)),
                "pr" | "prs" | "pull-request" | "pull-requests" => {
                    Ok(Self::Is(ItemKind::PullRequest))
                }
                _ => Err(Error::InvalidFilter(format!(
                    "is: expected \"issue\" or \"pr\", got {value:?}"
                ))),
            },
            "labels" => Ok(Self::Labels(parse_label_list(key, value)?)),
            "~labels" => Ok(Self::NotLabels(parse_label_list(key, value)?)),
            "age" => Ok(Self::Age(parse_filter_duration(key, value)?)),
            "stale" => Ok(Self::Stale(parse_filter_duration(key, value)?)),
            "assigned" => value
                .parse()
                .map(Self::Assigned)
                .map_err(|_| {
                    Error::InvalidFilter(format!(
                        "assigned: expected true or false, got {value:?}"
                    ))
                }),
            "comments" => parse_comments(value),
            _ => Err(Error::InvalidFilter(format!("unknown filter {key:?}"))),
        }
    }

    /// Whether `item` passes this predicate at time `now`
    pub fn accepts(&self, item: &Item, now: DateTime<Utc>) -> bool {
        match self {
            Self::Is(kind) => item.kind() == *kind,
            Self::Labels(labels) => labels.iter().all(|l| item.has_label(l)),
            Self::NotLabels(labels) => !labels.iter().any(|l| item.has_label(l)),
            Self::Age(min) => older_than(item.created_at(), *min, now),
            Self::Stale(min) => older_than(item.updated_at(), *min, now),
            Self::Assigned(assigned) => item.is_assigned() == *assigned,
            Self::Comments(cmp, expected) => cmp.holds(item.comments(), *expected),
        }
    }
}

fn older_than(at: DateTime<Utc>, min: Duration, now: DateTime<Utc>) -> bool {
    let min = TimeDelta::from_std(min).unwrap_or(TimeDelta::MAX);
    now.signed_duration_since(at) >= min
}

fn parse_label_list(key: &str, value: &str) -> Result<Vec<String>> {
    let labels: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect();
    if labels.is_empty() {
        return Err(Error::InvalidFilter(format!("{key}: no labels given")));
    }
    Ok(labels)
}

fn parse_filter_duration(key: &str, value: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| Error::InvalidFilter(format!("{key}: {e}")))
}

fn parse_comments(value: &str) -> Result<FilterStrategy> {
    let (cmp, count) = if let Some(rest) = value.strip_prefix('<') {
        (Comparison::Less, rest)
    } else if let Some(rest) = value.strip_prefix('>') {
        (Comparison::Greater, rest)
    } else if let Some(rest) = value.strip_prefix('=') {
        (Comparison::Equal, rest)
    } else {
        (Comparison::Equal, value)
    };
    let count = count
        .trim()
        .parse()
        .map_err(|_| Error::InvalidFilter(format!("comments: invalid count in {value:?}")))?;
    Ok(FilterStrategy::Comments(cmp, count))
}

/// A parsed filter and the token it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// The predicate
    pub strategy: FilterStrategy,
    /// Source token, for reporting
    pub token: String,
}

impl Filter {
    /// Parse one `key=value` token
    ///
    /// The token is split at its first `=`.
    pub fn parse(token: &str) -> Result<Self> {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| Error::InvalidFilter(format!("expected key=value, got {token:?}")))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidFilter(format!("missing key in {token:?}")));
        }
        Ok(Self {
            strategy: FilterStrategy::parse(key, value)?,
            token: format!("{key}={value}"),
        })
    }

    /// Whether this filter restricts the run to pull requests
    pub const fn pull_request_only(&self) -> bool {
        matches!(self.strategy, FilterStrategy::Is(ItemKind::PullRequest))
    }

    /// Whether this filter restricts the run to issues
    pub const fn issue_only(&self) -> bool {
        matches!(self.strategy, FilterStrategy::Is(ItemKind::Issue))
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token)
    }
}

/// Ordered set of filters, combined by conjunction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Build from already parsed filters
    pub const fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    /// Parse `key=value` tokens, keeping their order
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        tokens
            .iter()
            .map(|token| Filter::parse(token.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// First filter rejecting `item`, if any
    pub fn rejecting(&self, item: &Item, now: DateTime<Utc>) -> Option<&Filter> {
        self.filters
            .iter()
            .find(|f| !f.strategy.accepts(item, now))
    }

    /// Whether every filter accepts `item`
    pub fn accepts(&self, item: &Item, now: DateTime<Utc>) -> bool {
        self.rejecting(item, now).is_none()
    }

    /// Whether issues may be processed at all
    pub fn includes_issues(&self) -> bool {
        !self.filters.iter().any(Filter::pull_request_only)
    }

    /// Whether pull requests may be processed at all
    pub fn includes_pull_requests(&self) -> bool {
        !self.filters.iter().any(Filter::issue_only)
    }

    /// Whether a filter reads comment counts
    ///
    /// Pull request listings do not carry them, so runners fetch them
    /// separately when this holds.
    pub fn needs_comment_counts(&self) -> bool {
        self.filters
            .iter()
            .any(|f| matches!(f.strategy, FilterStrategy::Comments(..)))
    }

    /// Filters in order
    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
