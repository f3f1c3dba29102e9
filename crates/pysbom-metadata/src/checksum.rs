//! Package checksums.
//!
//! Checksums are best-effort: a provider that cannot produce one returns
//! `None` and the module is reported without a checksum.

use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Digest algorithm of a [`Checksum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChecksumAlgorithm {
    #[serde(rename = "SHA256")]
    Sha256,
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumAlgorithm::Sha256 => write!(f, "SHA256"),
        }
    }
}

/// A content checksum (lowercase hex digest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    pub value: String,
}

impl Checksum {
    /// Compute the SHA-256 checksum of the given data.
    pub fn sha256(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Checksum {
            algorithm: ChecksumAlgorithm::Sha256,
            value: hex_encode(&hasher.finalize()),
        }
    }

    /// Verify that the given data matches this checksum.
    pub fn verify(&self, data: &[u8]) -> bool {
        match self.algorithm {
            ChecksumAlgorithm::Sha256 => Checksum::sha256(data) == *self,
        }
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.algorithm, self.value)
    }
}

/// Encode bytes as lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Source of package checksums.
pub trait ChecksumProvider: Send + Sync {
    /// Produce a checksum for the package, or `None` when unavailable.
    fn checksum(&self, name: &str, package_json_url: &str, wheel_path: &Path) -> Option<Checksum>;
}

/// Hashes the `WHEEL` file recorded in the package's dist-info directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelFileChecksum;

impl ChecksumProvider for WheelFileChecksum {
    fn checksum(&self, name: &str, _package_json_url: &str, wheel_path: &Path) -> Option<Checksum> {
        match std::fs::read(wheel_path) {
            Ok(data) => Some(Checksum::sha256(&data)),
            Err(e) => {
                debug!(package = name, path = %wheel_path.display(), "no wheel file to hash: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty() {
        let checksum = Checksum::sha256(b"");
        assert_eq!(
            checksum.value,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(checksum.algorithm, ChecksumAlgorithm::Sha256);
    }

    #[test]
    fn verify_detects_tampering() {
        let checksum = Checksum::sha256(b"Wheel-Version: 1.0");
        assert!(checksum.verify(b"Wheel-Version: 1.0"));
        assert!(!checksum.verify(b"Wheel-Version: 2.0"));
    }

    #[test]
    fn display_prefixes_algorithm() {
        let shown = Checksum::sha256(b"x").to_string();
        assert!(shown.starts_with("SHA256: "));
        assert_eq!(shown.len(), "SHA256: ".len() + 64);
    }

    #[test]
    fn wheel_file_is_hashed() {
        let dir = tempfile::tempdir().unwrap();
        let wheel = dir.path().join("WHEEL");
        std::fs::write(&wheel, "Wheel-Version: 1.0\nGenerator: bdist_wheel\n").unwrap();

        let checksum = WheelFileChecksum
            .checksum("pkg", "https://pypi.org/pypi/pkg/1.0/json", &wheel)
            .unwrap();
        assert!(checksum.verify(b"Wheel-Version: 1.0\nGenerator: bdist_wheel\n"));
    }

    #[test]
    fn missing_wheel_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let wheel = dir.path().join("absent").join("WHEEL");
        assert!(WheelFileChecksum.checksum("pkg", "", &wheel).is_none());
    }
}
