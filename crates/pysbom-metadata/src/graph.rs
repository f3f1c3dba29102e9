//! Dependency graph assembly over projected modules.
//!
//! The graph is a tree of copies: each module's dependency map holds
//! snapshots of its direct dependencies, keyed by their exact-cased name.
//! No cycle detection is performed; a snapshot never carries its own
//! dependencies, so cycles cannot recurse.

use std::collections::HashMap;

use tracing::debug;

use crate::decoder::MetadataTable;
use crate::error::{MetadataError, Result};
use crate::module::Module;

/// How a single declared dependency was handled by [`link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// A snapshot of the dependency was inserted into the owner's map.
    Linked { owner: String, dependency: String },
    /// The owner or the dependency was not among the modules.
    Skipped { owner: String, dependency: String },
}

/// Link every module to the dependencies declared in `metadata`.
///
/// Owners and dependencies are looked up by lower-cased name; when two
/// modules share a name the later one wins. Unresolvable edges are
/// skipped, never reported as errors.
pub fn link(modules: &mut [Module], metadata: &MetadataTable) -> Result<()> {
    link_edges(modules, metadata).map(|_| ())
}

/// Like [`link`], also returning the outcome of every declared edge.
pub fn link_edges(modules: &mut [Module], metadata: &MetadataTable) -> Result<Vec<EdgeOutcome>> {
    let mut owners: HashMap<String, usize> = HashMap::with_capacity(modules.len());
    let mut snapshots: HashMap<String, Module> = HashMap::with_capacity(modules.len());
    for (index, module) in modules.iter().enumerate() {
        let key = module.name.to_lowercase();
        owners.insert(key.clone(), index);
        snapshots.insert(key, module.snapshot());
    }

    let mut outcomes = Vec::new();
    for record in metadata.values() {
        let owner = owners.get(&record.name.to_lowercase()).copied();
        for dependency in &record.modules {
            let snapshot = snapshots.get(&dependency.to_lowercase());
            match (owner, snapshot) {
                (Some(index), Some(snapshot)) => {
                    modules[index]
                        .modules
                        .insert(snapshot.name.clone(), snapshot.snapshot());
                    outcomes.push(EdgeOutcome::Linked {
                        owner: record.name.clone(),
                        dependency: snapshot.name.clone(),
                    });
                }
                _ => {
                    debug!(
                        owner = %record.name,
                        dependency = %dependency,
                        "skipping unresolved dependency"
                    );
                    outcomes.push(EdgeOutcome::Skipped {
                        owner: record.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
    }

    Ok(outcomes)
}

/// Overlay root metadata onto the non-root table; root entries win.
pub fn merge(root: MetadataTable, mut nonroot: MetadataTable) -> MetadataTable {
    nonroot.extend(root);
    nonroot
}

/// Drop any later module that repeats the root (first) module's name.
pub fn dedupe_root(modules: Vec<Module>) -> Result<Vec<Module>> {
    let Some(root_name) = modules.first().map(|root| root.name.clone()) else {
        return Err(MetadataError::EmptyModuleList {
            operation: "root deduplication",
        });
    };

    Ok(modules
        .into_iter()
        .enumerate()
        .filter(|(index, module)| *index == 0 || module.name != root_name)
        .map(|(_, module)| module)
        .collect())
}
