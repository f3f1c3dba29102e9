//! End-to-end inventory of a Python environment.
//!
//! Resolves the root package and the installed packages, merges their
//! metadata, drops the root's reappearance among the dependencies, and
//! links the dependency graph.

use tracing::info;

use crate::decoder::{MetadataDecoder, MetadataTable};
use crate::error::{MetadataError, Result};
use crate::graph;
use crate::metadata::MetadataStatus;
use crate::module::Module;
use crate::projector::ModuleProjector;
use crate::source::{MetadataSource, Package};

/// Runs the full pipeline for one environment.
pub struct Inventory<'a, S> {
    decoder: MetadataDecoder<S>,
    projector: ModuleProjector<'a>,
}

impl<'a, S: MetadataSource> Inventory<'a, S> {
    pub fn new(decoder: MetadataDecoder<S>, projector: ModuleProjector<'a>) -> Self {
        Inventory { decoder, projector }
    }

    /// Resolve the project's own package.
    ///
    /// Fails when no root package is listed or its metadata is unavailable.
    pub async fn root_module(&self, root_packages: &[Package]) -> Result<(Module, MetadataTable)> {
        let Some(first) = root_packages.first() else {
            return Err(MetadataError::RootModuleUnresolved {
                reason: "no root package was listed".to_string(),
            });
        };

        let projection = self.projector.project(&self.decoder, true, root_packages).await;

        if let Some(MetadataStatus::Unasserted { reason }) = projection
            .metadata
            .get(&first.name.to_lowercase())
            .map(|metadata| &metadata.status)
        {
            return Err(MetadataError::RootModuleUnresolved {
                reason: format!("metadata for '{}' unavailable: {reason}", first.name),
            });
        }

        let root = projection.modules.into_iter().next().ok_or_else(|| {
            MetadataError::RootModuleUnresolved {
                reason: format!("no module was built for '{}'", first.name),
            }
        })?;
        Ok((root, projection.metadata))
    }

    /// Root module followed by every listed package, with merged metadata.
    pub async fn list_used_modules(
        &self,
        root_packages: &[Package],
        packages: &[Package],
    ) -> Result<(Vec<Module>, MetadataTable)> {
        let (root, root_metadata) = self.root_module(root_packages).await?;

        let projection = self.projector.project(&self.decoder, false, packages).await;

        let mut modules = Vec::with_capacity(projection.modules.len() + 1);
        modules.push(root);
        modules.extend(projection.modules);

        let metadata = graph::merge(root_metadata, projection.metadata);
        Ok((modules, metadata))
    }

    /// Root module and packages with populated dependency maps.
    pub async fn list_modules_with_deps(
        &self,
        root_packages: &[Package],
        packages: &[Package],
    ) -> Result<Vec<Module>> {
        let (modules, metadata) = self.list_used_modules(root_packages, packages).await?;
        let mut modules = graph::dedupe_root(modules)?;
        graph::link(&mut modules, &metadata)?;

        info!(modules = modules.len(), root = %modules[0].name, "built dependency graph");
        Ok(modules)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::checksum::{Checksum, ChecksumProvider};
    use crate::license::{LicenseInfo, LicenseReader};

    struct ShowSource(HashMap<String, String>);

    impl ShowSource {
        fn new(entries: &[(&str, &str)]) -> Self {
            ShowSource(
                entries
                    .iter()
                    .map(|(name, requires)| {
                        (
                            name.to_string(),
                            format!(
                                "Name: {name}\nVersion: 1.0\nAuthor-email: dev@{name}.io\nLocation: /site\nRequires: {requires}\n"
                            ),
                        )
                    })
                    .collect(),
            )
        }
    }

    impl MetadataSource for ShowSource {
        async fn fetch(&self, name: &str) -> Result<String> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| MetadataError::Fetch {
                    name: name.to_string(),
                    detail: "not installed".to_string(),
                })
        }
    }

    struct MitEverywhere;

    impl LicenseReader for MitEverywhere {
        fn read(&self, _: &Path) -> Result<LicenseInfo> {
            Ok(LicenseInfo {
                id: "MIT".to_string(),
                extracted_text: String::new(),
                comments: String::new(),
            })
        }
    }

    struct NoChecksum;

    impl ChecksumProvider for NoChecksum {
        fn checksum(&self, _: &str, _: &str, _: &Path) -> Option<Checksum> {
            None
        }
    }

    fn packages(names: &[&str]) -> Vec<Package> {
        names.iter().map(|n| Package::new(*n)).collect()
    }

    #[tokio::test]
    async fn full_pipeline() {
        let source = ShowSource::new(&[
            ("myapp", "requests, myapp-extra"),
            ("requests", "idna, urllib3"),
            ("idna", ""),
            ("urllib3", ""),
        ]);
        let inventory = Inventory::new(
            MetadataDecoder::new(Arc::new(source)),
            ModuleProjector::new(&MitEverywhere, &NoChecksum),
        );

        let modules = inventory
            .list_modules_with_deps(
                &packages(&["myapp"]),
                &packages(&["requests", "myapp", "idna", "urllib3"]),
            )
            .await
            .unwrap();

        let names: Vec<_> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["myapp", "requests", "idna", "urllib3"]);
        assert!(modules[0].root);
        assert!(!modules[1].root);

        // myapp-extra is not installed and is skipped
        assert_eq!(modules[0].modules.len(), 1);
        assert!(modules[0].modules.contains_key("requests"));
        assert_eq!(modules[1].modules.len(), 2);
        assert_eq!(modules[1].modules["idna"].license_declared, "MIT");
        assert_eq!(modules[1].supplier.as_ref().unwrap().email, "dev@requests.io");
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let inventory = Inventory::new(
            MetadataDecoder::new(Arc::new(ShowSource::new(&[("idna", "")]))),
            ModuleProjector::new(&MitEverywhere, &NoChecksum),
        );

        let empty = inventory.list_modules_with_deps(&[], &packages(&["idna"])).await;
        assert!(matches!(empty, Err(MetadataError::RootModuleUnresolved { .. })));

        let unavailable = inventory
            .list_modules_with_deps(&packages(&["absent"]), &packages(&["idna"]))
            .await;
        match unavailable {
            Err(MetadataError::RootModuleUnresolved { reason }) => {
                assert!(reason.contains("absent"))
            }
            other => panic!("expected root resolution failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unavailable_dependency_is_unasserted() {
        let inventory = Inventory::new(
            MetadataDecoder::new(Arc::new(ShowSource::new(&[("app", "lost")]))),
            ModuleProjector::new(&MitEverywhere, &NoChecksum),
        );

        let modules = inventory
            .list_modules_with_deps(&packages(&["app"]), &packages(&["lost"]))
            .await
            .unwrap();

        assert_eq!(modules[1].version, crate::metadata::NOASSERTION);
        assert!(modules[1].license_declared.is_empty());
        // the unasserted module is still linked by name
        assert!(modules[0].modules.contains_key("lost"));
    }
}
