//! Metadata resolution and dependency graph assembly for installed Python
//! packages.
//!
//! Given the packages installed in an environment, the engine fetches each
//! package's metadata text concurrently, parses it into records, derives
//! registry URLs and dist-info paths, projects the records into SBOM
//! modules, and links the modules into a name-keyed dependency graph.
//!
//! # Architecture
//!
//! - **Parser**: `Key: Value` metadata text → [`Metadata`]
//! - **Identifiers**: URLs and filesystem paths derived from a record
//! - **Decoder**: one fetch task per package, gathered behind a barrier
//! - **Projector**: records → [`Module`]s, with checksum and license data
//! - **Graph**: dependency maps, metadata merge, root deduplication
//!
//! Fetching, license reading and checksumming are collaborator traits
//! ([`MetadataSource`], [`LicenseReader`], [`ChecksumProvider`]) so the
//! engine runs the same against `pip` or an in-memory fixture.

pub mod checksum;
pub mod decoder;
pub mod error;
pub mod graph;
pub mod identifier;
pub mod inventory;
pub mod license;
pub mod metadata;
pub mod module;
pub mod parser;
pub mod projector;
pub mod source;
pub mod tree;

// Re-exports for convenience.
pub use checksum::{Checksum, ChecksumAlgorithm, ChecksumProvider, WheelFileChecksum};
pub use decoder::{DecoderOptions, MetadataDecoder, MetadataTable, ResolvedMetadata};
pub use error::{MetadataError, Result};
pub use graph::{dedupe_root, link, merge};
pub use inventory::Inventory;
pub use license::{DistInfoLicenseReader, LicenseInfo, LicenseReader};
pub use metadata::{Metadata, MetadataStatus, NOASSERTION};
pub use module::{ContactType, Module, OtherLicense, SupplierContact};
pub use parser::{parse_fields, parse_metadata};
pub use projector::{ModuleProjector, Projection};
pub use source::{parse_pip_list, MetadataSource, Package};
pub use tree::format_tree;
