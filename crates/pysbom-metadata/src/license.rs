//! License discovery from an installed package's dist-info directory.
//!
//! The bundled reader looks for a license file (`LICENSE*`, `LICENCE*`,
//! `COPYING*`, or anything under `licenses/`), identifies well-known license
//! texts, and falls back to the license declared in `METADATA`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{MetadataError, Result};
use crate::metadata::NOASSERTION;
use crate::parser;

/// License data read for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseInfo {
    /// SPDX identifier when recognized, otherwise the declared license name.
    pub id: String,
    /// Full license text, if a license file was found.
    pub extracted_text: String,
    /// Free-form notes on where the license came from.
    pub comments: String,
}

/// Reads license information for an installed package.
pub trait LicenseReader: Send + Sync {
    fn read(&self, dist_info_path: &Path) -> Result<LicenseInfo>;
}

/// Well-known SPDX identifiers accepted as-is in license fields.
const SPDX_IDENTIFIERS: &[&str] = &[
    "0BSD",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "CC0-1.0",
    "EPL-2.0",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
    "HPND",
    "ISC",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "LGPL-3.0-only",
    "LGPL-3.0-or-later",
    "MIT",
    "MPL-2.0",
    "PSF-2.0",
    "Unlicense",
    "Zlib",
];

/// Distinctive phrases of license texts, checked in order.
const LICENSE_MARKERS: &[(&str, &str)] = &[
    ("Apache-2.0", "apache license version 2.0, january 2004"),
    ("MPL-2.0", "mozilla public license version 2.0"),
    ("LGPL-2.1-only", "gnu lesser general public license version 2.1"),
    ("LGPL-3.0-only", "gnu lesser general public license version 3"),
    ("AGPL-3.0-only", "gnu affero general public license version 3"),
    ("GPL-2.0-only", "gnu general public license version 2"),
    ("GPL-3.0-only", "gnu general public license version 3"),
    ("PSF-2.0", "python software foundation license version 2"),
    ("Unlicense", "this is free and unencumbered software released into the public domain"),
    ("ISC", "permission to use, copy, modify, and/or distribute this software for any purpose"),
    ("MIT", "permission is hereby granted, free of charge, to any person obtaining a copy"),
    ("BSD-3-Clause", "neither the name of"),
    ("BSD-2-Clause", "redistributions in binary form must reproduce the above copyright notice"),
];

const LICENSE_FILE_PREFIXES: &[&str] = &["license", "licence", "copying"];

// a marker alone is not enough: list items like "(c) You must retain" and
// template lines like "Copyright [yyyy]" carry no holder statement
static COPYRIGHT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*((?:copyright[ \t]*(?:\(c\)|©)|copyright[ \t]+\d{4}|©[ \t]*\d{4}|\(c\)[ \t]*\d{4}).*?)[ \t]*$",
    )
    .expect("copyright pattern is valid")
});

/// Canonical SPDX spelling of `id`, if it is a known identifier.
pub fn canonical_spdx(id: &str) -> Option<&'static str> {
    SPDX_IDENTIFIERS
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(id.trim()))
}

/// The value reported as declared/concluded license for `id`.
///
/// Known identifiers are returned canonically; anything else becomes a
/// `LicenseRef-` with characters outside `[A-Za-z0-9.-]` replaced.
pub fn license_reference(id: &str) -> String {
    let id = id.trim();
    if id.is_empty() || id == NOASSERTION {
        return NOASSERTION.to_string();
    }
    if let Some(spdx) = canonical_spdx(id) {
        return spdx.to_string();
    }
    let sanitized: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '-' })
        .collect();
    format!("LicenseRef-{sanitized}")
}

/// First copyright statement in a license text, or empty.
pub fn extract_copyright(text: &str) -> String {
    COPYRIGHT_LINE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Match a license text against well-known phrasings.
pub fn identify_license_text(text: &str) -> Option<&'static str> {
    let normalized = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    LICENSE_MARKERS
        .iter()
        .find(|(_, marker)| normalized.contains(marker))
        .map(|(id, _)| *id)
}

/// Reads `LICENSE`-style files and `METADATA` under a dist-info directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistInfoLicenseReader;

impl DistInfoLicenseReader {
    fn find_license_file(dist_info: &Path) -> Option<PathBuf> {
        let mut candidates = license_files_in(dist_info);
        candidates.extend(license_files_in(&dist_info.join("licenses")));
        candidates.into_iter().next()
    }

    /// License declared in the `METADATA` header block.
    fn declared_license(dist_info: &Path) -> Option<String> {
        let content = std::fs::read_to_string(crate::identifier::metadata_path(dist_info)).ok()?;
        // headers end at the first blank line; the long description follows
        let header: String = content
            .lines()
            .take_while(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let fields = parser::parse_fields(&header);
        ["license-expression", parser::keys::LICENSE]
            .iter()
            .filter_map(|key| fields.get(*key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty() && !value.eq_ignore_ascii_case("UNKNOWN"))
    }
}

impl LicenseReader for DistInfoLicenseReader {
    fn read(&self, dist_info_path: &Path) -> Result<LicenseInfo> {
        if !dist_info_path.is_dir() {
            return Err(MetadataError::LicenseUnavailable {
                path: dist_info_path.to_path_buf(),
                detail: "dist-info directory not found".to_string(),
            });
        }

        let (license_file, extracted_text) = match Self::find_license_file(dist_info_path) {
            Some(path) => match read_license_text(&path) {
                Ok(text) => (Some(path), text),
                Err(e) => {
                    debug!(path = %path.display(), "unreadable license file: {e}");
                    (None, String::new())
                }
            },
            None => (None, String::new()),
        };
        let declared = Self::declared_license(dist_info_path);

        let (id, comments) = match (identify_license_text(&extracted_text), declared, &license_file) {
            (Some(id), _, Some(path)) => (
                id.to_string(),
                format!("license identified from {}", file_name(path)),
            ),
            (_, Some(declared), _) => (declared, "license declared in METADATA".to_string()),
            (_, None, Some(path)) => (
                NOASSERTION.to_string(),
                format!("license text in {} was not recognized", file_name(path)),
            ),
            (_, None, None) => {
                return Err(MetadataError::LicenseUnavailable {
                    path: dist_info_path.to_path_buf(),
                    detail: "no license file or declared license".to_string(),
                })
            }
        };

        Ok(LicenseInfo {
            id,
            extracted_text,
            comments,
        })
    }
}

/// License files predating UTF-8 are often Latin-1; undecodable bytes are
/// replaced rather than failing the read.
fn read_license_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// License-looking files directly inside `dir`, sorted by name.
fn license_files_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let name = file_name(path).to_lowercase();
            LICENSE_FILE_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
        })
        .collect();
    files.sort();
    files
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIT_TEXT: &str = "MIT License\n\nCopyright (c) 2017 Jane Doe\n\nPermission is hereby granted, free of charge, to any person obtaining a copy\nof this software...";

    #[test]
    fn canonical_spdx_is_case_insensitive() {
        assert_eq!(canonical_spdx("mit"), Some("MIT"));
        assert_eq!(canonical_spdx("apache-2.0"), Some("Apache-2.0"));
        assert_eq!(canonical_spdx("Apache 2.0"), None);
        assert_eq!(canonical_spdx(" bsd-3-clause "), Some("BSD-3-Clause"));
    }

    #[test]
    fn license_reference_forms() {
        assert_eq!(license_reference("MIT"), "MIT");
        assert_eq!(license_reference("Apache 2.0"), "LicenseRef-Apache-2.0");
        assert_eq!(license_reference("Dual (BSD/GPL)"), "LicenseRef-Dual--BSD-GPL-");
        assert_eq!(license_reference(""), NOASSERTION);
        assert_eq!(license_reference(NOASSERTION), NOASSERTION);
    }

    #[test]
    fn identify_wrapped_text() {
        assert_eq!(identify_license_text(MIT_TEXT), Some("MIT"));
        let apache = "                Apache License\n          Version 2.0, January 2004\n";
        assert_eq!(identify_license_text(apache), Some("Apache-2.0"));
        assert_eq!(identify_license_text("All rights reserved."), None);
    }

    #[test]
    fn copyright_extraction() {
        assert_eq!(extract_copyright(MIT_TEXT), "Copyright (c) 2017 Jane Doe");
        assert_eq!(extract_copyright("  © 2020 Acme Corp  \n"), "© 2020 Acme Corp");
        assert_eq!(extract_copyright("no statement here"), "");
        assert_eq!(extract_copyright("Copyright 2001 Someone"), "Copyright 2001 Someone");
        assert_eq!(extract_copyright("(C) 1998 Old Corp"), "(C) 1998 Old Corp");
    }

    const APACHE_EXCERPT: &str = "
                                 Apache License
                           Version 2.0, January 2004
                        http://www.apache.org/licenses/

      \"Licensor\" shall mean the copyright owner or entity authorized by
      the copyright owner that is granting the License.

      (b) You must cause any modified files to carry prominent notices
          stating that You changed the files; and

      (c) You must retain, in the Source form of any Derivative Works
          that You distribute, all copyright, patent, trademark, and
          attribution notices from the Source form of the Work,

   APPENDIX: How to apply the Apache License to your work.

   Copyright [yyyy] [name of copyright owner]
";

    #[test]
    fn apache_body_has_no_copyright_holder() {
        assert_eq!(identify_license_text(APACHE_EXCERPT), Some("Apache-2.0"));
        assert_eq!(extract_copyright(APACHE_EXCERPT), "");
    }

    #[test]
    fn holder_line_found_before_apache_body() {
        let text = format!("Copyright 2019 The Foo Authors\n{APACHE_EXCERPT}");
        assert_eq!(extract_copyright(&text), "Copyright 2019 The Foo Authors");
    }

    #[test]
    fn latin1_license_file_still_reads_declaration() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("LICENSE"),
            b"Copyright \xa9 1999 J\xf6rg\nAll rights reserved.\n".as_slice(),
        )
        .unwrap();
        std::fs::write(dir.path().join("METADATA"), "Name: pkg\nLicense: BSD\n").unwrap();

        let info = DistInfoLicenseReader.read(dir.path()).unwrap();
        assert_eq!(info.id, "BSD");
        assert_eq!(info.comments, "license declared in METADATA");
        assert!(info.extracted_text.contains("All rights reserved."));
        assert!(info.extracted_text.contains('\u{FFFD}'));
    }

    #[test]
    fn read_license_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE.txt"), MIT_TEXT).unwrap();

        let info = DistInfoLicenseReader.read(dir.path()).unwrap();
        assert_eq!(info.id, "MIT");
        assert_eq!(info.extracted_text, MIT_TEXT);
        assert!(info.comments.contains("LICENSE.txt"));
    }

    #[test]
    fn read_license_from_licenses_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("licenses")).unwrap();
        std::fs::write(dir.path().join("licenses").join("LICENSE"), MIT_TEXT).unwrap();

        let info = DistInfoLicenseReader.read(dir.path()).unwrap();
        assert_eq!(info.id, "MIT");
    }

    #[test]
    fn falls_back_to_metadata_declaration() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("METADATA"),
            "Metadata-Version: 2.1\nName: pkg\nLicense: Apache 2.0\n\nLicense: ignored body text\n",
        )
        .unwrap();

        let info = DistInfoLicenseReader.read(dir.path()).unwrap();
        assert_eq!(info.id, "Apache 2.0");
        assert!(info.extracted_text.is_empty());
        assert_eq!(info.comments, "license declared in METADATA");
    }

    #[test]
    fn license_expression_preferred() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("METADATA"),
            "Name: pkg\nLicense: UNKNOWN\nLicense-Expression: MIT\n",
        )
        .unwrap();

        let info = DistInfoLicenseReader.read(dir.path()).unwrap();
        assert_eq!(info.id, "MIT");
    }

    #[test]
    fn unrecognized_text_without_declaration() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("COPYING"), "Custom terms.\nCopyright 2001 Someone").unwrap();

        let info = DistInfoLicenseReader.read(dir.path()).unwrap();
        assert_eq!(info.id, NOASSERTION);
        assert!(info.comments.contains("COPYING"));
    }

    #[test]
    fn nothing_found_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DistInfoLicenseReader.read(dir.path()).is_err());
        assert!(DistInfoLicenseReader
            .read(&dir.path().join("missing.dist-info"))
            .is_err());
    }
}
