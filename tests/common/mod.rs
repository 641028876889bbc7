//! Shared test helpers

#![allow(dead_code)]

mod mock_client;

pub use mock_client::{AddLabelsCall, CommentCall, ListCall, MockClient, RemoveLabelCall};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use poule::config::Config;
use poule::operations::{Progress, RunSummary};
use poule::types::{Issue, Item, ItemState, PullRequest};
use std::sync::Mutex;
use std::time::Duration;

/// Open issue updated just now
pub fn make_issue(number: u64, body: &str) -> Issue {
    let now = Utc::now();
    Issue {
        number,
        title: format!("Issue {number}"),
        body: body.to_string(),
        state: ItemState::Open,
        labels: Vec::new(),
        author: "octocat".to_string(),
        assignees: Vec::new(),
        comments: 0,
        created_at: now,
        updated_at: now,
        html_url: format!("https://github.com/docker/docker/issues/{number}"),
    }
}

/// Closed issue carrying `labels`
pub fn closed_issue(number: u64, labels: &[&str]) -> Issue {
    Issue {
        state: ItemState::Closed,
        labels: labels.iter().map(ToString::to_string).collect(),
        ..make_issue(number, "")
    }
}

/// Open issue last updated `days` ago
pub fn stale_issue(number: u64, days: i64) -> Issue {
    let then = Utc::now() - TimeDelta::days(days);
    Issue {
        created_at: then,
        updated_at: then,
        ..make_issue(number, "")
    }
}

/// Open pull request with head commit `sha`
pub fn make_pr(number: u64, sha: &str) -> PullRequest {
    let now = Utc::now();
    PullRequest {
        number,
        title: format!("PR {number}"),
        body: String::new(),
        state: ItemState::Open,
        labels: Vec::new(),
        author: "octocat".to_string(),
        assignees: Vec::new(),
        comments: 0,
        created_at: now,
        updated_at: now,
        html_url: format!("https://github.com/docker/docker/pull/{number}"),
        head_ref: format!("feature-{number}"),
        head_sha: sha.to_string(),
    }
}

/// Configuration with `delay` between mutations
pub fn test_config(dry_run: bool, delay: Duration) -> Config {
    Config {
        delay,
        dry_run,
        repository: Some("docker/docker".to_string()),
        token: Some("test-token".to_string()),
        ..Config::default()
    }
}

/// Progress sink recording everything it receives
#[derive(Default)]
pub struct RecordingProgress {
    descriptions: Mutex<Vec<(u64, String, bool)>>,
    summaries: Mutex<Vec<RunSummary>>,
}

impl RecordingProgress {
    /// `(item number, description, dry_run)` per accepted item
    pub fn descriptions(&self) -> Vec<(u64, String, bool)> {
        self.descriptions.lock().unwrap().clone()
    }

    /// Summaries in completion order
    pub fn summaries(&self) -> Vec<RunSummary> {
        self.summaries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Progress for RecordingProgress {
    async fn on_describe(&self, item: &Item, description: &str, dry_run: bool) {
        self.descriptions
            .lock()
            .unwrap()
            .push((item.number(), description.to_string(), dry_run));
    }

    async fn on_complete(&self, summary: &RunSummary) {
        self.summaries.lock().unwrap().push(*summary);
    }
}
