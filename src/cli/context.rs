//! Shared command context for CLI commands
//!
//! Validates the global configuration and creates the GitHub client used by
//! single operations and batch runs.

use poule::client::GitHubClient;
use poule::config::Config;
use poule::error::Result;
use poule::operations::Context;
use poule::types::Repository;
use tracing::debug;

/// Validated configuration plus the client it describes
pub struct CommandContext {
    /// Global run configuration
    pub config: Config,
    /// Target repository
    pub repository: Repository,
    /// GitHub client bound to `repository`
    pub client: GitHubClient,
}

impl CommandContext {
    /// Validate `config` and create the client
    ///
    /// Reads the token file if one is configured. No remote call is made.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let repository = config.repository()?;
        let token = config.token()?;
        debug!(%repository, host = ?config.host, "creating GitHub client");
        let client = GitHubClient::new(&token, repository.clone(), config.host.as_deref())?;
        Ok(Self {
            config,
            repository,
            client,
        })
    }

    /// Engine context borrowing this command's client
    pub fn context(&self) -> Context<'_> {
        Context::new(&self.client, self.config.dry_run)
    }
}
