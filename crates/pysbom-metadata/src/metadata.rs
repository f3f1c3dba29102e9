//! Per-package metadata records.
//!
//! A [`Metadata`] starts empty, is filled by a single fetch unit, and is
//! shared read-only once the batch that produced it has completed.

use std::path::PathBuf;

use serde::Serialize;

/// Value stored in every field of a record whose metadata was unavailable.
pub const NOASSERTION: &str = "NOASSERTION";

/// Outcome of resolving one package's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MetadataStatus {
    /// Fields were parsed from fetched metadata text.
    #[default]
    Resolved,
    /// Metadata was unavailable; every field except the name is `NOASSERTION`.
    Unasserted { reason: String },
}

/// Raw and derived descriptive fields for one installed package.
///
/// An empty string means the field was absent from the fetched text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Package name.
    pub name: String,
    /// Installed version.
    pub version: String,
    /// One-line summary.
    pub description: String,
    /// Declared home page.
    pub home_page: String,
    /// Author name(s).
    pub author: String,
    /// Author email address(es).
    pub author_email: String,
    /// License field as declared by the package.
    pub license: String,
    /// Installation directory (site-packages).
    pub location: String,
    /// Names of the packages this one requires, in declaration order.
    pub modules: Vec<String>,

    /// Registry project page.
    pub project_url: String,
    /// Package locator; the home page when one is declared.
    pub package_url: String,
    /// Registry JSON API endpoint for this release.
    pub package_json_url: String,
    /// `<location>/<name>-<version>.dist-info`.
    pub dist_info_path: PathBuf,
    /// `<location>/<name>`.
    pub local_path: PathBuf,
    /// License file under the dist-info directory.
    pub license_path: PathBuf,
    /// `METADATA` file under the dist-info directory.
    pub metadata_path: PathBuf,
    /// `WHEEL` file under the dist-info directory.
    pub wheel_path: PathBuf,

    /// How this record was produced.
    pub status: MetadataStatus,
}

impl Metadata {
    /// Build a record for a package whose metadata could not be fetched.
    pub fn unasserted(name: &str, reason: impl Into<String>) -> Self {
        let sentinel = || NOASSERTION.to_string();
        Metadata {
            name: name.to_string(),
            version: sentinel(),
            description: sentinel(),
            home_page: sentinel(),
            author: sentinel(),
            author_email: sentinel(),
            license: sentinel(),
            location: sentinel(),
            modules: Vec::new(),
            project_url: sentinel(),
            package_url: sentinel(),
            package_json_url: sentinel(),
            dist_info_path: PathBuf::from(NOASSERTION),
            local_path: PathBuf::from(NOASSERTION),
            license_path: PathBuf::from(NOASSERTION),
            metadata_path: PathBuf::from(NOASSERTION),
            wheel_path: PathBuf::from(NOASSERTION),
            status: MetadataStatus::Unasserted {
                reason: reason.into(),
            },
        }
    }

    /// Whether the record holds parsed values rather than sentinels.
    pub fn is_resolved(&self) -> bool {
        self.status == MetadataStatus::Resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unasserted_keeps_only_the_name() {
        let metadata = Metadata::unasserted("requests", "source offline");
        assert_eq!(metadata.name, "requests");
        assert_eq!(metadata.version, NOASSERTION);
        assert_eq!(metadata.author_email, NOASSERTION);
        assert_eq!(metadata.package_json_url, NOASSERTION);
        assert_eq!(metadata.wheel_path, PathBuf::from(NOASSERTION));
        assert!(metadata.modules.is_empty());
        assert!(!metadata.is_resolved());
    }

    #[test]
    fn unasserted_is_distinct_from_empty() {
        let empty = Metadata {
            name: "requests".to_string(),
            ..Metadata::default()
        };
        let unasserted = Metadata::unasserted("requests", "gone");
        assert!(empty.is_resolved());
        assert_ne!(empty.version, unasserted.version);
    }

    #[test]
    fn status_serializes_with_tag() {
        let status = MetadataStatus::Unasserted {
            reason: "timeout".to_string(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"status":"unasserted","reason":"timeout"}"#);
    }
}
