//! The SBOM-facing package representation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::checksum::Checksum;

/// Whether a supplier is an individual or an organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ContactType {
    #[default]
    Person,
    Organization,
}

/// Supplier of a package, taken from its author fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SupplierContact {
    #[serde(rename = "type")]
    pub kind: ContactType,
    pub name: String,
    pub email: String,
}

/// A license that is not on the SPDX list, carried with its text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OtherLicense {
    /// `LicenseRef-` identifier used in the license fields.
    pub id: String,
    /// License name as found.
    pub name: String,
    pub extracted_text: String,
    pub comments: String,
}

/// A resolved package as reported in the SBOM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Module {
    /// Package name.
    pub name: String,
    /// Installed version.
    pub version: String,
    /// Registry project page.
    pub path: String,
    /// Installed package directory.
    pub local_path: PathBuf,
    /// Package locator.
    pub package_url: String,
    /// Content checksum, when one could be computed.
    pub checksum: Option<Checksum>,
    /// Declared home page.
    pub package_home_page: String,
    /// Package summary.
    pub package_comment: String,
    /// Supplier, present only when an author email is known.
    pub supplier: Option<SupplierContact>,

    pub license_declared: String,
    pub license_concluded: String,
    pub comments_license: String,
    pub copyright: String,
    pub other_license: Vec<OtherLicense>,

    /// Whether this is the project's own package.
    pub root: bool,
    /// Direct dependencies by exact-cased name. Each entry is a detached
    /// snapshot; see [`Module::snapshot`].
    pub modules: BTreeMap<String, Module>,
}

impl Module {
    /// Field-for-field copy of this module with an empty dependency map.
    ///
    /// Dependency maps hold snapshots rather than shared nodes, so later
    /// changes to a module never show through copies embedded elsewhere.
    pub fn snapshot(&self) -> Module {
        Module {
            name: self.name.clone(),
            version: self.version.clone(),
            path: self.path.clone(),
            local_path: self.local_path.clone(),
            package_url: self.package_url.clone(),
            checksum: self.checksum.clone(),
            package_home_page: self.package_home_page.clone(),
            package_comment: self.package_comment.clone(),
            supplier: self.supplier.clone(),
            license_declared: self.license_declared.clone(),
            license_concluded: self.license_concluded.clone(),
            comments_license: self.comments_license.clone(),
            copyright: self.copyright.clone(),
            other_license: self.other_license.clone(),
            root: self.root,
            modules: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Module {
        let mut module = Module {
            name: "flask".to_string(),
            version: "3.0.0".to_string(),
            checksum: Some(Checksum::sha256(b"wheel")),
            supplier: Some(SupplierContact {
                kind: ContactType::Organization,
                name: "Pallets".to_string(),
                email: "contact@palletsprojects.com".to_string(),
            }),
            license_declared: "BSD-3-Clause".to_string(),
            ..Module::default()
        };
        module.modules.insert(
            "click".to_string(),
            Module {
                name: "click".to_string(),
                ..Module::default()
            },
        );
        module
    }

    #[test]
    fn snapshot_copies_fields_and_drops_dependencies() {
        let original = sample();
        let copy = original.snapshot();
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.checksum, original.checksum);
        assert_eq!(copy.supplier, original.supplier);
        assert_eq!(copy.license_declared, "BSD-3-Clause");
        assert!(copy.modules.is_empty());
    }

    #[test]
    fn snapshot_is_independent() {
        let mut original = sample();
        let copy = original.snapshot();
        original.license_declared = "MIT".to_string();
        assert_eq!(copy.license_declared, "BSD-3-Clause");
    }

    #[test]
    fn supplier_type_serializes_as_type() {
        let json = serde_json::to_value(SupplierContact {
            kind: ContactType::Person,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "Person");
    }
}
