//! Metadata source abstraction.
//!
//! A `MetadataSource` produces the raw `Key: Value` metadata text for one
//! package, e.g. by running `pip show <name>`. Implementations are shared
//! across concurrently running fetch tasks.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fetches raw metadata text for installed packages.
pub trait MetadataSource: Send + Sync + 'static {
    /// Fetch the metadata text for `name`.
    ///
    /// Any error marks the package's metadata as unavailable; it never
    /// fails the batch.
    fn fetch(&self, name: &str) -> impl Future<Output = Result<String>> + Send;
}

/// An installed package as listed by the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Distribution name.
    pub name: String,
    /// Installed version, when the listing reports one.
    #[serde(default)]
    pub version: String,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            version: String::new(),
        }
    }
}

/// Parse `pip list --format=json` output, preserving listing order.
pub fn parse_pip_list(json: &str) -> Result<Vec<Package>> {
    Ok(serde_json::from_str(json)?)
}
