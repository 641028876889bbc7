//! Core types for poule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Issue or pull request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    /// Item is open
    Open,
    /// Item was closed (or merged)
    Closed,
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// An issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Issue body (empty when GitHub returns none)
    pub body: String,
    /// Current state
    pub state: ItemState,
    /// Label names
    pub labels: Vec<String>,
    /// Author login
    pub author: String,
    /// Assignee logins
    pub assignees: Vec<String>,
    /// Number of comments
    pub comments: u32,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Web URL
    pub html_url: String,
}

/// A pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR body (empty when GitHub returns none)
    pub body: String,
    /// Current state
    pub state: ItemState,
    /// Label names
    pub labels: Vec<String>,
    /// Author login
    pub author: String,
    /// Assignee logins
    pub assignees: Vec<String>,
    /// Number of issue comments
    pub comments: u32,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Web URL
    pub html_url: String,
    /// Head branch name
    pub head_ref: String,
    /// Head commit SHA
    pub head_sha: String,
}

/// Kind of item a runner produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Issues
    Issue,
    /// Pull requests
    PullRequest,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Issue => write!(f, "issue"),
            Self::PullRequest => write!(f, "pull request"),
        }
    }
}

/// An issue or a pull request
#[derive(Debug, Clone)]
pub enum Item {
    /// An issue
    Issue(Issue),
    /// A pull request
    PullRequest(PullRequest),
}

impl Item {
    /// Kind of this item
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Issue(_) => ItemKind::Issue,
            Self::PullRequest(_) => ItemKind::PullRequest,
        }
    }

    /// Issue or PR number
    pub const fn number(&self) -> u64 {
        match self {
            Self::Issue(i) => i.number,
            Self::PullRequest(pr) => pr.number,
        }
    }

    /// Title
    pub fn title(&self) -> &str {
        match self {
            Self::Issue(i) => &i.title,
            Self::PullRequest(pr) => &pr.title,
        }
    }

    /// Textual body
    pub fn body(&self) -> &str {
        match self {
            Self::Issue(i) => &i.body,
            Self::PullRequest(pr) => &pr.body,
        }
    }

    /// State
    pub const fn state(&self) -> ItemState {
        match self {
            Self::Issue(i) => i.state,
            Self::PullRequest(pr) => pr.state,
        }
    }

    /// Label names
    pub fn labels(&self) -> &[String] {
        match self {
            Self::Issue(i) => &i.labels,
            Self::PullRequest(pr) => &pr.labels,
        }
    }

    /// Whether the item carries `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.labels().iter().any(|l| l == label)
    }

    /// Whether anyone is assigned
    pub fn is_assigned(&self) -> bool {
        match self {
            Self::Issue(i) => !i.assignees.is_empty(),
            Self::PullRequest(pr) => !pr.assignees.is_empty(),
        }
    }

    /// Comment count
    pub const fn comments(&self) -> u32 {
        match self {
            Self::Issue(i) => i.comments,
            Self::PullRequest(pr) => pr.comments,
        }
    }

    /// Creation time
    pub const fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Issue(i) => i.created_at,
            Self::PullRequest(pr) => pr.created_at,
        }
    }

    /// Last update time
    pub const fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Self::Issue(i) => i.updated_at,
            Self::PullRequest(pr) => pr.updated_at,
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.kind(), self.number())
    }
}

impl From<Issue> for Item {
    fn from(issue: Issue) -> Self {
        Self::Issue(issue)
    }
}

impl From<PullRequest> for Item {
    fn from(pr: PullRequest) -> Self {
        Self::PullRequest(pr)
    }
}

/// State reported by a commit status context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Still running
    Pending,
    /// Passed
    Success,
    /// Failed
    Failure,
    /// Errored
    Error,
}

impl StatusState {
    /// Whether this state warrants a rebuild
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failure | Self::Error)
    }
}

/// A single status context on a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitStatus {
    /// Context name (e.g. "ci/jenkins")
    pub context: String,
    /// Reported state
    pub state: StatusState,
}

/// Combined status of a commit, one entry per context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombinedStatus {
    /// Latest status per context
    pub statuses: Vec<CommitStatus>,
}
