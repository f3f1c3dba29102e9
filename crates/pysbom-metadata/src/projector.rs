//! Projection of resolved metadata into SBOM modules.
//!
//! Modules are built from finished records first; license enrichment is a
//! second, best-effort pass over the built modules.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::checksum::ChecksumProvider;
use crate::decoder::{MetadataDecoder, MetadataTable, ResolvedMetadata};
use crate::license::{self, LicenseInfo, LicenseReader};
use crate::metadata::{Metadata, NOASSERTION};
use crate::module::{ContactType, Module, OtherLicense, SupplierContact};
use crate::source::{MetadataSource, Package};

static ORGANIZATION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(inc|incorporated|ltd|limited|llc|gmbh|corp|corporation|company|foundation|team|group|project|projects|community|authors|developers|contributors|maintainers|labs|organization|organisation|association|consortium|university|institute)\b",
    )
    .expect("organization name pattern is valid")
});

static ORGANIZATION_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^|[\s,<])(info|team|dev|devs|developers|admin|contact|support|hello|office|security|opensource|oss|maintainers|packages?|pypi|noreply|no-reply)@|@(googlegroups\.com|lists\.)",
    )
    .expect("organization email pattern is valid")
});

/// Whether the author fields describe an organization rather than a person.
pub fn is_author_an_organization(author: &str, author_email: &str) -> bool {
    ORGANIZATION_NAME.is_match(author)
        || ORGANIZATION_NAME.is_match(author_email)
        || ORGANIZATION_EMAIL.is_match(author_email)
}

/// Modules built by one projection, with the metadata they came from.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    /// Modules in the order the packages were given.
    pub modules: Vec<Module>,
    /// Lower-cased package name → metadata record.
    pub metadata: MetadataTable,
}

/// Builds modules from metadata using the license and checksum collaborators.
pub struct ModuleProjector<'a> {
    licenses: &'a dyn LicenseReader,
    checksums: &'a dyn ChecksumProvider,
}

impl<'a> ModuleProjector<'a> {
    pub fn new(licenses: &'a dyn LicenseReader, checksums: &'a dyn ChecksumProvider) -> Self {
        ModuleProjector {
            licenses,
            checksums,
        }
    }

    /// Resolve `packages` and project the results.
    pub async fn project<S: MetadataSource>(
        &self,
        decoder: &MetadataDecoder<S>,
        is_root: bool,
        packages: &[Package],
    ) -> Projection {
        let resolved = decoder.resolve_all(packages).await;
        self.project_resolved(is_root, resolved)
    }

    /// Project an already resolved batch.
    pub fn project_resolved(&self, is_root: bool, resolved: ResolvedMetadata) -> Projection {
        let mut by_module_name: HashMap<String, Arc<Metadata>> =
            HashMap::with_capacity(resolved.ordered.len());
        let mut modules = Vec::with_capacity(resolved.ordered.len());

        for metadata in &resolved.ordered {
            let module = self.build_module(is_root, metadata);
            by_module_name.insert(module.name.to_lowercase(), Arc::clone(metadata));
            modules.push(module);
        }

        for module in &mut modules {
            if let Some(metadata) = by_module_name.get(&module.name.to_lowercase()) {
                self.enrich_license(metadata, module);
            }
        }

        Projection {
            modules,
            metadata: resolved.table,
        }
    }

    /// Build a module from a finished record, without license data.
    pub fn build_module(&self, is_root: bool, metadata: &Metadata) -> Module {
        let resolved = metadata.is_resolved();

        let supplier = (resolved && !metadata.author_email.is_empty()).then(|| {
            let kind = if is_author_an_organization(&metadata.author, &metadata.author_email) {
                ContactType::Organization
            } else {
                ContactType::Person
            };
            SupplierContact {
                kind,
                name: metadata.author.clone(),
                email: metadata.author_email.clone(),
            }
        });

        let checksum = if resolved {
            self.checksums.checksum(
                &metadata.name,
                &metadata.package_json_url,
                &metadata.wheel_path,
            )
        } else {
            None
        };

        Module {
            name: metadata.name.clone(),
            version: metadata.version.clone(),
            path: metadata.project_url.clone(),
            local_path: metadata.local_path.clone(),
            package_url: metadata.package_url.clone(),
            checksum,
            package_home_page: metadata.home_page.clone(),
            package_comment: metadata.description.clone(),
            supplier,
            root: is_root,
            ..Module::default()
        }
    }

    /// Fill license fields from the package's dist-info directory.
    ///
    /// A read failure leaves the license fields empty.
    pub fn enrich_license(&self, metadata: &Metadata, module: &mut Module) {
        if !metadata.is_resolved() {
            return;
        }
        match self.licenses.read(&metadata.dist_info_path) {
            Ok(info) => apply_license(module, info),
            Err(e) => debug!(package = %module.name, "no license information: {e}"),
        }
    }
}

fn apply_license(module: &mut Module, info: LicenseInfo) {
    let reference = license::license_reference(&info.id);

    module.license_declared = reference.clone();
    module.license_concluded = reference.clone();
    module.copyright = license::extract_copyright(&info.extracted_text);
    module.comments_license = info.comments.clone();

    if reference.starts_with("LicenseRef-") {
        module.other_license.push(OtherLicense {
            id: reference,
            name: info.id,
            extracted_text: if info.extracted_text.is_empty() {
                NOASSERTION.to_string()
            } else {
                info.extracted_text
            },
            comments: info.comments,
        });
    }
}
