//! GitHub client implementation

use crate::client::{
    Client, IssueListOptions, MAX_PER_PAGE, Page, PullRequestListOptions, StateFilter,
};
use crate::error::{Error, Result};
use crate::types::{
    CombinedStatus, CommitStatus, Issue, ItemState, PullRequest, Repository, StatusState,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;

/// GitHub client using octocrab
pub struct GitHubClient {
    client: Octocrab,
    repository: Repository,
    /// Token for raw HTTP requests (commit status)
    token: String,
    /// HTTP client for raw requests (commit status)
    http_client: HttpClient,
    /// API host for raw requests
    api_host: String,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(token: &str, repository: Repository, host: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_host = if let Some(h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            format!("{h}/api/v3")
        } else {
            "api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = HttpClient::builder()
            .user_agent("poule")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            repository,
            token: token.to_string(),
            http_client,
            api_host,
        })
    }
}

const fn state_param(state: StateFilter) -> octocrab::params::State {
    match state {
        StateFilter::Open => octocrab::params::State::Open,
        StateFilter::Closed => octocrab::params::State::Closed,
        StateFilter::All => octocrab::params::State::All,
    }
}

fn item_state(state: Option<&octocrab::models::IssueState>) -> ItemState {
    match state {
        Some(octocrab::models::IssueState::Open) => ItemState::Open,
        // IssueState is non-exhaustive
        Some(_) | None => ItemState::Closed,
    }
}

/// Helper to convert an octocrab issue to our `Issue` type
fn issue_from_octocrab(issue: octocrab::models::issues::Issue) -> Issue {
    Issue {
        number: issue.number,
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        state: item_state(Some(&issue.state)),
        labels: issue.labels.into_iter().map(|l| l.name).collect(),
        author: issue.user.login,
        assignees: issue.assignees.into_iter().map(|a| a.login).collect(),
        comments: issue.comments,
        created_at: issue.created_at,
        updated_at: issue.updated_at,
        html_url: issue.html_url.to_string(),
    }
}

/// Helper to convert an octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: octocrab::models::pulls::PullRequest) -> PullRequest {
    let created_at = pr.created_at.unwrap_or_default();
    PullRequest {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        body: pr.body.unwrap_or_default(),
        state: item_state(pr.state.as_ref()),
        labels: pr
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|l| l.name)
            .collect(),
        author: pr.user.map(|u| u.login).unwrap_or_default(),
        assignees: pr
            .assignees
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.login)
            .collect(),
        comments: pr
            .comments
            .map_or(0, |c| u32::try_from(c).unwrap_or(u32::MAX)),
        created_at,
        updated_at: pr.updated_at.unwrap_or(created_at),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        head_ref: pr.head.ref_field,
        head_sha: pr.head.sha,
    }
}

#[derive(Deserialize)]
struct RawCombinedStatus {
    total_count: usize,
    statuses: Vec<RawStatus>,
}

#[derive(Deserialize)]
struct RawStatus {
    context: String,
    state: StatusState,
}

fn status_url(api_host: &str, repository: &Repository, sha: &str, page: u32) -> String {
    format!(
        "https://{api_host}/repos/{}/{}/commits/{sha}/status?per_page={MAX_PER_PAGE}&page={page}",
        repository.owner, repository.name
    )
}

/// Whether another page of statuses remains after `collected` of `total`
const fn has_more_statuses(collected: usize, total: usize, last_page_len: usize) -> bool {
    last_page_len > 0 && collected < total
}

impl GitHubClient {
    async fn combined_status_page(&self, sha: &str, page: u32) -> Result<RawCombinedStatus> {
        let url = status_url(&self.api_host, &self.repository, sha, page);
        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch commit status: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Commit status for {sha} returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse commit status: {e}")))
    }
}

#[async_trait]
impl Client for GitHubClient {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    async fn list_issues(&self, options: &IssueListOptions, page: u32) -> Result<Page<Issue>> {
        debug!(page, state = ?options.state, "listing issues");
        let result = self
            .client
            .issues(&self.repository.owner, &self.repository.name)
            .list()
            .state(state_param(options.state))
            .per_page(options.per_page)
            .page(page)
            .send()
            .await?;

        let next_page = result.next.as_ref().map(|_| page + 1);
        // The issues endpoint also returns pull requests
        let items: Vec<Issue> = result
            .items
            .into_iter()
            .filter(|i| i.pull_request.is_none())
            .map(issue_from_octocrab)
            .collect();

        debug!(page, count = items.len(), has_next = next_page.is_some(), "listed issues");
        Ok(Page { items, next_page })
    }

    async fn list_pull_requests(
        &self,
        options: &PullRequestListOptions,
        page: u32,
    ) -> Result<Page<PullRequest>> {
        debug!(page, state = ?options.state, "listing pull requests");
        let result = self
            .client
            .pulls(&self.repository.owner, &self.repository.name)
            .list()
            .state(state_param(options.state))
            .per_page(options.per_page)
            .page(page)
            .send()
            .await?;

        let next_page = result.next.as_ref().map(|_| page + 1);
        let mut items: Vec<PullRequest> = result.items.into_iter().map(pr_from_octocrab).collect();

        // Only the issues endpoint reports comment counts for pull requests
        if options.comment_counts {
            for pr in &mut items {
                let issue = self
                    .client
                    .issues(&self.repository.owner, &self.repository.name)
                    .get(pr.number)
                    .await?;
                pr.comments = issue.comments;
            }
        }

        debug!(page, count = items.len(), has_next = next_page.is_some(), "listed pull requests");
        Ok(Page { items, next_page })
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        debug!(number, ?labels, "adding labels");
        self.client
            .issues(&self.repository.owner, &self.repository.name)
            .add_labels(number, labels)
            .await?;
        debug!(number, "added labels");
        Ok(())
    }

    async fn remove_label(&self, number: u64, label: &str) -> Result<()> {
        debug!(number, label, "removing label");
        self.client
            .issues(&self.repository.owner, &self.repository.name)
            .remove_label(number, label)
            .await?;
        debug!(number, label, "removed label");
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        debug!(number, "creating comment");
        self.client
            .issues(&self.repository.owner, &self.repository.name)
            .create_comment(number, body)
            .await?;
        debug!(number, "created comment");
        Ok(())
    }

    async fn close(&self, number: u64) -> Result<()> {
        debug!(number, "closing item");
        self.client
            .issues(&self.repository.owner, &self.repository.name)
            .update(number)
            .state(octocrab::models::IssueState::Closed)
            .send()
            .await?;
        debug!(number, "closed item");
        Ok(())
    }

    async fn combined_status(&self, sha: &str) -> Result<CombinedStatus> {
        debug!(sha, "fetching combined status");
        let mut statuses = Vec::new();
        let mut page = 1;
        loop {
            let raw = self.combined_status_page(sha, page).await?;
            let fetched = raw.statuses.len();
            statuses.extend(raw.statuses.into_iter().map(|s| CommitStatus {
                context: s.context,
                state: s.state,
            }));
            if !has_more_statuses(statuses.len(), raw.total_count, fetched) {
                break;
            }
            page += 1;
        }

        debug!(sha, count = statuses.len(), "fetched combined status");
        Ok(CombinedStatus { statuses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_url_requests_full_pages() {
        let repository = Repository {
            owner: "docker".to_string(),
            name: "docker".to_string(),
        };
        assert_eq!(
            status_url("api.github.com", &repository, "abc123", 2),
            "https://api.github.com/repos/docker/docker/commits/abc123/status?per_page=100&page=2"
        );
    }

    #[test]
    fn test_has_more_statuses() {
        assert!(has_more_statuses(100, 130, 100));
        assert!(!has_more_statuses(130, 130, 30));
        assert!(!has_more_statuses(12, 12, 12));
        // An empty page ends the walk even if the total disagrees
        assert!(!has_more_statuses(100, 130, 0));
    }
}
