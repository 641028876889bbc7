//! Global run configuration

use crate::error::{Error, Result};
use crate::types::Repository;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Delay between mutating calls when none is given
pub const DEFAULT_DELAY: Duration = Duration::from_secs(10);

/// Settings shared by every operation of a run
#[derive(Debug, Clone)]
pub struct Config {
    /// Pause after each applied mutation
    pub delay: Duration,
    /// Describe mutations without performing them
    pub dry_run: bool,
    /// Target repository (`owner/name` or a GitHub URL)
    pub repository: Option<String>,
    /// API token
    pub token: Option<String>,
    /// File containing the API token
    pub token_file: Option<PathBuf>,
    /// GitHub Enterprise host (None for github.com)
    pub host: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            dry_run: false,
            repository: None,
            token: None,
            token_file: None,
            host: None,
        }
    }
}

impl Config {
    /// Check that the run can start
    ///
    /// Fails when the repository or the credential is missing, or the
    /// repository cannot be parsed. No remote call is made.
    pub fn validate(&self) -> Result<()> {
        let Some(repository) = self.repository.as_deref() else {
            return Err(Error::Config("no repository specified".to_string()));
        };
        parse_repository(repository)?;

        if self.token.as_deref().is_none_or(str::is_empty) && self.token_file.is_none() {
            return Err(Error::Config(
                "no GitHub token specified (use --token or --token-file)".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed repository coordinates
    pub fn repository(&self) -> Result<Repository> {
        let raw = self
            .repository
            .as_deref()
            .ok_or_else(|| Error::Config("no repository specified".to_string()))?;
        parse_repository(raw)
    }

    /// Resolve the API token, reading the token file if needed
    ///
    /// An explicit token takes precedence over the token file.
    pub fn token(&self) -> Result<String> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(token.to_string());
        }
        let path = self
            .token_file
            .as_ref()
            .ok_or_else(|| Error::Config("no GitHub token specified".to_string()))?;
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read token file {}: {e}", path.display()))
        })?;
        let token = content.trim();
        if token.is_empty() {
            return Err(Error::Config(format!(
                "token file {} is empty",
                path.display()
            )));
        }
        Ok(token.to_string())
    }
}

/// Parse a repository given as `owner/name`, an https URL or an SSH remote
pub fn parse_repository(raw: &str) -> Result<Repository> {
    let raw = raw.trim();
    let path = if let Some(rest) = raw.strip_prefix("git@") {
        rest.split_once(':')
            .map(|(_, path)| path.to_string())
            .ok_or_else(|| Error::Config(format!("invalid repository: {raw}")))?
    } else if raw.contains("://") {
        let url = url::Url::parse(raw)
            .map_err(|e| Error::Config(format!("invalid repository URL {raw}: {e}")))?;
        url.path().to_string()
    } else {
        raw.to_string()
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    match path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Repository {
            owner: (*owner).to_string(),
            name: (*name).to_string(),
        }),
        _ => Err(Error::Config(format!(
            "invalid repository {raw:?}, expected owner/name"
        ))),
    }
}

/// Parse a duration such as `500ms`, `10s`, `5m`, `12h`, `30d` or `2w`
///
/// A bare number is read as seconds.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid duration: {raw:?}")))?;

    let seconds = match unit {
        "ms" => return Ok(Duration::from_millis(value)),
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        _ => {
            return Err(Error::InvalidArgument(format!(
                "invalid duration unit {unit:?} in {raw:?}"
            )));
        }
    };
    Ok(Duration::from_secs(value.saturating_mul(seconds)))
}
