//! Mock GitHub client for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use poule::client::{Client, IssueListOptions, Page, PullRequestListOptions, StateFilter};
use poule::error::{Error, Result};
use poule::types::{
    CombinedStatus, CommitStatus, Issue, PullRequest, Repository, StatusState,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `list_issues` / `list_pull_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub state: StateFilter,
    pub page: u32,
    pub comment_counts: bool,
}

/// Call record for `add_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelsCall {
    pub number: u64,
    pub labels: Vec<String>,
}

/// Call record for `remove_label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLabelCall {
    pub number: u64,
    pub label: String,
}

/// Call record for `create_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCall {
    pub number: u64,
    pub body: String,
}

/// Simple mock client for testing
///
/// Features:
/// - Paged issue and pull request listings, filtered by state
/// - Pull request comment counts only when requested
/// - Configurable combined statuses per commit
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockClient {
    repository: Repository,
    issue_pages: Mutex<Vec<Vec<Issue>>>,
    pr_pages: Mutex<Vec<Vec<PullRequest>>>,
    statuses: Mutex<HashMap<String, CombinedStatus>>,
    // Call tracking
    list_issues_calls: Mutex<Vec<ListCall>>,
    list_prs_calls: Mutex<Vec<ListCall>>,
    add_labels_calls: Mutex<Vec<AddLabelsCall>>,
    remove_label_calls: Mutex<Vec<RemoveLabelCall>>,
    comment_calls: Mutex<Vec<CommentCall>>,
    close_calls: Mutex<Vec<u64>>,
    status_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_list_issues: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<(u64, String)>>,
    error_on_close: Mutex<Option<String>>,
    error_on_status: Mutex<Option<String>>,
}

impl MockClient {
    /// Create a mock bound to `owner/name`
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            repository: Repository {
                owner: owner.to_string(),
                name: name.to_string(),
            },
            issue_pages: Mutex::new(Vec::new()),
            pr_pages: Mutex::new(Vec::new()),
            statuses: Mutex::new(HashMap::new()),
            list_issues_calls: Mutex::new(Vec::new()),
            list_prs_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            remove_label_calls: Mutex::new(Vec::new()),
            comment_calls: Mutex::new(Vec::new()),
            close_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            error_on_list_issues: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
            error_on_close: Mutex::new(None),
            error_on_status: Mutex::new(None),
        }
    }

    // === Response setup ===

    /// Serve `issues` as a single page
    pub fn with_issues(self, issues: Vec<Issue>) -> Self {
        self.issue_pages.lock().unwrap().push(issues);
        self
    }

    /// Append a page of issues
    pub fn add_issue_page(&self, issues: Vec<Issue>) {
        self.issue_pages.lock().unwrap().push(issues);
    }

    /// Serve `prs` as a single page
    pub fn with_pull_requests(self, prs: Vec<PullRequest>) -> Self {
        self.pr_pages.lock().unwrap().push(prs);
        self
    }

    /// Append a page of pull requests
    pub fn add_pr_page(&self, prs: Vec<PullRequest>) {
        self.pr_pages.lock().unwrap().push(prs);
    }

    /// Set the statuses reported for `sha`
    pub fn set_statuses(&self, sha: &str, statuses: &[(&str, StatusState)]) {
        let combined = CombinedStatus {
            statuses: statuses
                .iter()
                .map(|(context, state)| CommitStatus {
                    context: (*context).to_string(),
                    state: *state,
                })
                .collect(),
        };
        self.statuses
            .lock()
            .unwrap()
            .insert(sha.to_string(), combined);
    }

    // === Error injection methods ===

    /// Make `list_issues` return an error
    pub fn fail_list_issues(&self, msg: &str) {
        *self.error_on_list_issues.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_labels` fail for item `number`
    pub fn fail_add_labels_on(&self, number: u64, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some((number, msg.to_string()));
    }

    /// Make `close` return an error
    pub fn fail_close(&self, msg: &str) {
        *self.error_on_close.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `combined_status` return an error
    pub fn fail_combined_status(&self, msg: &str) {
        *self.error_on_status.lock().unwrap() = Some(msg.to_string());
    }

    // === Call accessors ===

    pub fn list_issues_calls(&self) -> Vec<ListCall> {
        self.list_issues_calls.lock().unwrap().clone()
    }

    pub fn list_prs_calls(&self) -> Vec<ListCall> {
        self.list_prs_calls.lock().unwrap().clone()
    }

    pub fn add_labels_calls(&self) -> Vec<AddLabelsCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    pub fn remove_label_calls(&self) -> Vec<RemoveLabelCall> {
        self.remove_label_calls.lock().unwrap().clone()
    }

    pub fn comment_calls(&self) -> Vec<CommentCall> {
        self.comment_calls.lock().unwrap().clone()
    }

    pub fn close_calls(&self) -> Vec<u64> {
        self.close_calls.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    /// Total number of mutating calls
    pub fn mutation_count(&self) -> usize {
        self.add_labels_calls.lock().unwrap().len()
            + self.remove_label_calls.lock().unwrap().len()
            + self.comment_calls.lock().unwrap().len()
            + self.close_calls.lock().unwrap().len()
    }

    // === Assertion helpers ===

    /// Assert that no mutating call was made
    pub fn assert_no_mutations(&self) {
        assert_eq!(
            self.mutation_count(),
            0,
            "expected no mutations, got labels={:?} removed={:?} comments={:?} closed={:?}",
            self.add_labels_calls(),
            self.remove_label_calls(),
            self.comment_calls(),
            self.close_calls()
        );
    }

    /// Assert that `add_labels` was called for `number` with `labels`
    pub fn assert_labels_added(&self, number: u64, labels: &[&str]) {
        let expected = AddLabelsCall {
            number,
            labels: labels.iter().map(ToString::to_string).collect(),
        };
        let calls = self.add_labels_calls();
        assert!(
            calls.contains(&expected),
            "expected {expected:?}, got {calls:?}"
        );
    }
}

fn page_of<T: Clone>(pages: &[Vec<T>], page: u32) -> Page<T> {
    let index = page.saturating_sub(1) as usize;
    let items = pages.get(index).cloned().unwrap_or_default();
    let next_page = (index + 1 < pages.len()).then_some(page + 1);
    Page { items, next_page }
}

#[async_trait]
impl Client for MockClient {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    async fn list_issues(&self, options: &IssueListOptions, page: u32) -> Result<Page<Issue>> {
        self.list_issues_calls.lock().unwrap().push(ListCall {
            state: options.state,
            page,
            comment_counts: true,
        });
        if let Some(msg) = self.error_on_list_issues.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        let mut result = page_of(&self.issue_pages.lock().unwrap(), page);
        result.items.retain(|i| options.state.matches(i.state));
        Ok(result)
    }

    async fn list_pull_requests(
        &self,
        options: &PullRequestListOptions,
        page: u32,
    ) -> Result<Page<PullRequest>> {
        self.list_prs_calls.lock().unwrap().push(ListCall {
            state: options.state,
            page,
            comment_counts: options.comment_counts,
        });
        let mut result = page_of(&self.pr_pages.lock().unwrap(), page);
        result.items.retain(|pr| options.state.matches(pr.state));
        // Pull request listings carry no comment counts
        if !options.comment_counts {
            for pr in &mut result.items {
                pr.comments = 0;
            }
        }
        Ok(result)
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        if let Some((failing, msg)) = self.error_on_add_labels.lock().unwrap().clone() {
            if failing == number {
                return Err(Error::GitHubApi(msg));
            }
        }
        self.add_labels_calls.lock().unwrap().push(AddLabelsCall {
            number,
            labels: labels.to_vec(),
        });
        Ok(())
    }

    async fn remove_label(&self, number: u64, label: &str) -> Result<()> {
        self.remove_label_calls
            .lock()
            .unwrap()
            .push(RemoveLabelCall {
                number,
                label: label.to_string(),
            });
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        self.comment_calls.lock().unwrap().push(CommentCall {
            number,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn close(&self, number: u64) -> Result<()> {
        if let Some(msg) = self.error_on_close.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        self.close_calls.lock().unwrap().push(number);
        Ok(())
    }

    async fn combined_status(&self, sha: &str) -> Result<CombinedStatus> {
        self.status_calls.lock().unwrap().push(sha.to_string());
        if let Some(msg) = self.error_on_status.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }
}
