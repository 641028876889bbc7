//! Batch files: several operations executed in one invocation
//!
//! ```toml
//! [[operations]]
//! type = "label"
//! filters = ["is=issue"]
//! [operations.settings]
//! patterns = { bug = ["crash", "panic"], docs = "typo" }
//! ```
//!
//! Every entry is built and validated before the first one runs.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::operations::catalog::Catalog;
use crate::operations::{Context, Operation, Progress, RunSummary, run_single_operation};
use crate::settings::FilterSet;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Parsed batch file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchFile {
    /// Entries, executed in order
    pub operations: Vec<BatchEntry>,
}

/// One operation in a batch file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchEntry {
    /// Catalog name of the operation
    #[serde(rename = "type")]
    pub operation: String,
    /// `key=value` filter tokens
    #[serde(default)]
    pub filters: Vec<String>,
    /// Operation settings table
    #[serde(default)]
    pub settings: Option<toml::Value>,
}

/// An operation ready to run with its filters
pub struct PreparedOperation {
    /// The operation
    pub operation: Box<dyn Operation>,
    /// Its filter set
    pub filters: FilterSet,
}

impl BatchFile {
    /// Parse batch file contents
    pub fn parse(content: &str) -> Result<Self> {
        let batch: Self = toml::from_str(content).map_err(|e| Error::BatchFile(e.to_string()))?;
        if batch.operations.is_empty() {
            return Err(Error::BatchFile("no operations defined".to_string()));
        }
        Ok(batch)
    }

    /// Read and parse a batch file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::BatchFile(format!("failed to read {}: {e}", path.display())))?;
        Self::parse(&content)
    }

    /// Build every operation and filter set through `catalog`
    pub fn prepare(&self, catalog: &Catalog) -> Result<Vec<PreparedOperation>> {
        self.operations
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<PreparedOperation> {
                let descriptor = catalog.get(&entry.operation)?;
                let settings = entry
                    .settings
                    .clone()
                    .unwrap_or_else(|| toml::Value::Table(toml::Table::new()));
                let operation = descriptor.from_config(settings).map_err(|e| {
                    Error::BatchFile(format!("operation {} ({}): {e}", index + 1, entry.operation))
                })?;
                let filters = FilterSet::parse(entry.filters.as_slice()).map_err(|e| {
                    Error::BatchFile(format!("operation {} ({}): {e}", index + 1, entry.operation))
                })?;
                Ok(PreparedOperation { operation, filters })
            })
            .collect()
    }
}

/// Run prepared operations in order, stopping at the first error
pub async fn run_batch(
    ctx: &Context<'_>,
    config: &Config,
    prepared: &[PreparedOperation],
    progress: &dyn Progress,
) -> Result<Vec<RunSummary>> {
    let mut summaries = Vec::new();
    for (index, entry) in prepared.iter().enumerate() {
        info!(
            index = index + 1,
            total = prepared.len(),
            operation = entry.operation.name(),
            "running batch entry"
        );
        summaries.extend(
            run_single_operation(ctx, config, entry.operation.as_ref(), &entry.filters, progress)
                .await?,
        );
    }
    Ok(summaries)
}
