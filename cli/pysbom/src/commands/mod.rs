//! CLI command implementations.

pub mod modules;
pub mod tree;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use pysbom_metadata::{
    DistInfoLicenseReader, Inventory, MetadataDecoder, Module, ModuleProjector, Package,
    WheelFileChecksum,
};

use crate::config::Settings;
use crate::pip::{self, PipCommand, PipSource};

/// Resolve the environment's packages into a linked module list.
pub async fn collect_modules(settings: &Settings) -> Result<Vec<Module>> {
    let pip = PipCommand::parse(&settings.pip)?;
    let packages = pip::list_installed(&pip, &settings.project_dir).await?;
    info!(packages = packages.len(), root = %settings.root, "listed installed packages");

    let source = PipSource::new(pip, settings.project_dir.clone());
    let decoder = MetadataDecoder::new(Arc::new(source)).with_options(settings.options.clone());
    let licenses = DistInfoLicenseReader;
    let checksums = WheelFileChecksum;
    let inventory = Inventory::new(decoder, ModuleProjector::new(&licenses, &checksums));

    let root = [Package::new(settings.root.clone())];
    inventory
        .list_modules_with_deps(&root, &packages)
        .await
        .with_context(|| format!("building the module graph for '{}'", settings.root))
}
