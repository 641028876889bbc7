//! Registry of available operations
//!
//! Each operation kind provides an [`OperationDescriptor`] able to build it
//! from command line arguments or from a batch file table. Both paths go
//! through the same constructor, so settings are validated (and patterns
//! compiled) before any remote call.

mod audit;
mod clean;
mod label;
mod prune;
mod rebuild;

pub use audit::{AuditConfig, AuditDescriptor, AuditOperation};
pub use clean::{CleanConfig, CleanDescriptor, CleanOperation};
pub use label::{LabelConfig, LabelDescriptor, LabelOperation};
pub use prune::{PruneAction, PruneConfig, PruneDescriptor, PruneOperation};
pub use rebuild::{RebuildConfig, RebuildDescriptor, RebuildOperation};

use crate::error::{Error, Result};
use crate::operations::Operation;
use serde::de::DeserializeOwned;

/// Builds one kind of operation
pub trait OperationDescriptor: Send + Sync {
    /// Name used on the command line and in batch files
    fn name(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Build from `key=value` command line arguments
    fn from_args(&self, args: &[String]) -> Result<Box<dyn Operation>>;

    /// Build from a batch file `settings` table
    fn from_config(&self, settings: toml::Value) -> Result<Box<dyn Operation>>;
}

/// Name → descriptor registry
///
/// Built once at startup and passed to the command layer.
#[derive(Default)]
pub struct Catalog {
    descriptors: Vec<Box<dyn OperationDescriptor>>,
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every built-in operation
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(AuditDescriptor);
        catalog.register(CleanDescriptor);
        catalog.register(LabelDescriptor);
        catalog.register(PruneDescriptor);
        catalog.register(RebuildDescriptor);
        catalog
    }

    /// Add a descriptor, replacing any with the same name
    pub fn register(&mut self, descriptor: impl OperationDescriptor + 'static) {
        self.descriptors.retain(|d| d.name() != descriptor.name());
        self.descriptors.push(Box::new(descriptor));
    }

    /// Look up a descriptor by name
    pub fn get(&self, name: &str) -> Result<&dyn OperationDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
            .ok_or_else(|| Error::OperationNotFound(name.to_string()))
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn OperationDescriptor> {
        self.descriptors.iter().map(|d| d.as_ref())
    }
}

/// Decode a batch file settings table into an operation config
fn decode_settings<T: DeserializeOwned>(operation: &str, settings: toml::Value) -> Result<T> {
    settings
        .try_into()
        .map_err(|e| Error::InvalidArgument(format!("{operation}: invalid settings: {e}")))
}

/// Reject keys an operation does not understand
fn ensure_known_keys(
    operation: &str,
    keys: &crate::settings::MultiValuedKeys,
    known: &[&str],
) -> Result<()> {
    match keys.keys().find(|k| !known.contains(k)) {
        Some(unknown) => Err(Error::InvalidArgument(format!(
            "{operation}: unknown setting {unknown:?} (expected one of: {})",
            known.join(", ")
        ))),
        None => Ok(()),
    }
}
