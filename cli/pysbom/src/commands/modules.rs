//! `pysbom modules`: print the module list as JSON.

use anyhow::Result;

use crate::config::Settings;

/// Run `pysbom modules [--compact]`.
pub async fn run(settings: &Settings, compact: bool) -> Result<()> {
    let modules = super::collect_modules(settings).await?;
    let json = if compact {
        serde_json::to_string(&modules)?
    } else {
        serde_json::to_string_pretty(&modules)?
    };
    println!("{json}");
    Ok(())
}
