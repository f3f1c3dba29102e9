//! Canonical identifiers derived from a package's raw metadata.
//!
//! Everything here is a pure function of (name, version, location,
//! home page). No I/O is performed.

use std::path::{Path, PathBuf};

use crate::metadata::Metadata;

const PYPI_PROJECT_URL: &str = "pypi.org/project";
const PYPI_PACKAGE_URL: &str = "pypi.org/pypi";
const PYPI_JSON_URL: &str = "https://pypi.org/pypi";

const LICENSE_FILE: &str = "LICENSE";
const METADATA_FILE: &str = "METADATA";
const WHEEL_FILE: &str = "WHEEL";

/// Registry project page, e.g. `pypi.org/project/requests/2.31.0`.
pub fn project_url(name: &str, version: &str) -> String {
    format!("{PYPI_PROJECT_URL}/{name}/{version}")
}

/// Registry package locator, e.g. `pypi.org/pypi/requests/2.31.0`.
pub fn package_url(name: &str, version: &str) -> String {
    format!("{PYPI_PACKAGE_URL}/{name}/{version}")
}

/// Registry JSON API endpoint for a release.
pub fn package_json_url(name: &str, version: &str) -> String {
    format!("{PYPI_JSON_URL}/{name}/{version}/json")
}

/// Drop a leading `https://` or `http://` scheme.
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Installed metadata directory, e.g. `<location>/typing_extensions-4.9.0.dist-info`.
///
/// Installers normalize `-` to `_` in the directory name.
pub fn dist_info_path(location: &Path, name: &str, version: &str) -> PathBuf {
    let normalized = name.replace('-', "_");
    location.join(format!("{normalized}-{version}.dist-info"))
}

/// Package directory under the installation location.
pub fn local_path(location: &Path, name: &str) -> PathBuf {
    location.join(name)
}

pub fn license_path(dist_info: &Path) -> PathBuf {
    dist_info.join(LICENSE_FILE)
}

pub fn metadata_path(dist_info: &Path) -> PathBuf {
    dist_info.join(METADATA_FILE)
}

pub fn wheel_path(dist_info: &Path) -> PathBuf {
    dist_info.join(WHEEL_FILE)
}

/// Fill every derived field of a record whose raw fields are final.
pub fn derive_identifiers(metadata: &mut Metadata) {
    let name = metadata.name.as_str();
    let version = metadata.version.as_str();
    let location = Path::new(&metadata.location);

    metadata.project_url = project_url(name, version);
    metadata.package_url = if metadata.home_page.is_empty() {
        package_url(name, version)
    } else {
        strip_scheme(&metadata.home_page).to_string()
    };
    metadata.package_json_url = package_json_url(name, version);

    metadata.dist_info_path = dist_info_path(location, name, version);
    metadata.local_path = local_path(location, name);
    metadata.license_path = license_path(&metadata.dist_info_path);
    metadata.metadata_path = metadata_path(&metadata.dist_info_path);
    metadata.wheel_path = wheel_path(&metadata.dist_info_path);
}
