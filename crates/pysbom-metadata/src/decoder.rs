//! Concurrent metadata resolution.
//!
//! `MetadataDecoder::resolve_all` starts one task per package. Each task
//! runs fetch → parse → derive as a unit and returns its own record; the
//! records are gathered only after every task of the batch has finished,
//! so no caller ever sees a partially derived record.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::{MetadataError, Result};
use crate::identifier;
use crate::metadata::Metadata;
use crate::parser;
use crate::source::{MetadataSource, Package};

/// Lower-cased package name → finished record.
pub type MetadataTable = HashMap<String, Arc<Metadata>>;

/// Tuning for a resolution batch.
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Upper bound on a single fetch. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
    /// Maximum number of fetches in flight at once.
    pub max_concurrent: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            fetch_timeout: Some(Duration::from_secs(30)),
            max_concurrent: 16,
        }
    }
}

/// Records produced by one batch.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMetadata {
    /// Records keyed by lower-cased input name.
    pub table: MetadataTable,
    /// Records in input order.
    pub ordered: Vec<Arc<Metadata>>,
}

impl ResolvedMetadata {
    /// Number of records that fell back to `NOASSERTION`.
    pub fn unasserted_count(&self) -> usize {
        self.ordered.iter().filter(|m| !m.is_resolved()).count()
    }
}

/// Resolves package metadata through a [`MetadataSource`].
pub struct MetadataDecoder<S> {
    source: Arc<S>,
    options: DecoderOptions,
}

impl<S: MetadataSource> MetadataDecoder<S> {
    pub fn new(source: Arc<S>) -> Self {
        MetadataDecoder {
            source,
            options: DecoderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve metadata for every package, returning once all are done.
    ///
    /// Failures are isolated per package: a failed, timed-out or panicked
    /// fetch yields an unasserted record for that package only.
    pub async fn resolve_all(&self, packages: &[Package]) -> ResolvedMetadata {
        // one limiter per batch; concurrent batches do not share it
        let permits = Arc::new(Semaphore::new(self.options.max_concurrent.max(1)));

        let handles: Vec<_> = packages
            .iter()
            .map(|package| {
                let source = Arc::clone(&self.source);
                let permits = Arc::clone(&permits);
                let name = package.name.clone();
                let timeout = self.options.fetch_timeout;
                tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    build_metadata(source.as_ref(), &name, timeout).await
                })
            })
            .collect();

        let outcomes = join_all(handles).await;

        let mut resolved = ResolvedMetadata {
            table: HashMap::with_capacity(packages.len()),
            ordered: Vec::with_capacity(packages.len()),
        };
        for (package, outcome) in packages.iter().zip(outcomes) {
            let metadata = match outcome {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(package = %package.name, "metadata task failed: {e}");
                    Metadata::unasserted(&package.name, format!("metadata task failed: {e}"))
                }
            };
            let metadata = Arc::new(metadata);
            resolved
                .table
                .insert(package.name.to_lowercase(), Arc::clone(&metadata));
            resolved.ordered.push(metadata);
        }

        info!(
            packages = packages.len(),
            unasserted = resolved.unasserted_count(),
            "resolved package metadata"
        );
        resolved
    }
}

/// Fetch, parse and derive one package's record.
pub async fn build_metadata<S: MetadataSource>(
    source: &S,
    name: &str,
    timeout: Option<Duration>,
) -> Metadata {
    match fetch_with_timeout(source, name, timeout).await {
        Ok(raw) => {
            let mut metadata = parser::parse_metadata(&raw);
            if metadata.name.is_empty() {
                metadata.name = name.to_string();
            }
            identifier::derive_identifiers(&mut metadata);
            debug!(package = name, requires = metadata.modules.len(), "parsed metadata");
            metadata
        }
        Err(e) => {
            warn!(package = name, "metadata unavailable: {e}");
            Metadata::unasserted(name, e.to_string())
        }
    }
}

async fn fetch_with_timeout<S: MetadataSource>(
    source: &S,
    name: &str,
    timeout: Option<Duration>,
) -> Result<String> {
    let Some(limit) = timeout else {
        return source.fetch(name).await;
    };
    match tokio::time::timeout(limit, source.fetch(name)).await {
        Ok(result) => result,
        Err(_) => Err(MetadataError::FetchTimeout {
            name: name.to_string(),
            after: limit,
        }),
    }
}
