//! `pysbom tree`: print the dependency tree.

use anyhow::Result;

use crate::config::Settings;

/// Run `pysbom tree`.
pub async fn run(settings: &Settings) -> Result<()> {
    let modules = super::collect_modules(settings).await?;
    print!("{}", pysbom_metadata::format_tree(&modules)?);
    Ok(())
}
