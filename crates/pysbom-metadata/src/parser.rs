//! Parsing of `Key: Value` package metadata text.
//!
//! The text is the output of a metadata query such as `pip show <name>`:
//! one field per line, keys compared case-insensitively. Values may
//! themselves contain colons (URLs, timestamps, Windows paths), so every
//! segment after the key is rejoined onto the value.

use std::collections::HashMap;

use crate::metadata::Metadata;

/// Lower-cased field key → raw value.
pub type FieldMap = HashMap<String, String>;

/// Keys recognized by [`apply_fields`].
pub mod keys {
    pub const NAME: &str = "name";
    pub const VERSION: &str = "version";
    pub const SUMMARY: &str = "summary";
    pub const HOME_PAGE: &str = "home-page";
    pub const AUTHOR: &str = "author";
    pub const AUTHOR_EMAIL: &str = "author-email";
    pub const LICENSE: &str = "license";
    pub const LOCATION: &str = "location";
    pub const REQUIRES: &str = "requires";
}

/// Split metadata text into a field map.
///
/// Lines without a colon are skipped. When a key repeats, the last
/// occurrence wins.
pub fn parse_fields(raw: &str) -> FieldMap {
    let mut fields = FieldMap::with_capacity(10);

    for line in raw.lines() {
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() <= 1 {
            continue;
        }

        let mut value = parts[1].trim().to_string();
        for rest in &parts[2..] {
            value.push(':');
            value.push_str(rest);
        }

        fields.insert(parts[0].to_lowercase(), value);
    }

    fields
}

/// Copy the recognized fields onto a record. Unrecognized keys are ignored.
pub fn apply_fields(metadata: &mut Metadata, fields: &FieldMap) {
    let field = |key: &str| fields.get(key).cloned().unwrap_or_default();

    metadata.name = field(keys::NAME);
    metadata.version = field(keys::VERSION);
    metadata.description = field(keys::SUMMARY);
    metadata.home_page = field(keys::HOME_PAGE);
    metadata.author = field(keys::AUTHOR);
    metadata.author_email = field(keys::AUTHOR_EMAIL);
    metadata.license = field(keys::LICENSE);
    metadata.location = field(keys::LOCATION);
    metadata.modules = fields
        .get(keys::REQUIRES)
        .map(|requires| split_requires(requires))
        .unwrap_or_default();
}

/// Parse metadata text straight into a record with raw fields set.
pub fn parse_metadata(raw: &str) -> Metadata {
    let mut metadata = Metadata::default();
    apply_fields(&mut metadata, &parse_fields(raw));
    metadata
}

/// Split a comma-separated `Requires` value, preserving order.
fn split_requires(requires: &str) -> Vec<String> {
    requires
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
