//! Print the build layout for the external build tool.

use anyhow::{Context, Result};

use pagekit_build::{derive_layout, RunMode};
use pagekit_manifest::Manifest;

use crate::config::Project;

/// Run the layout command.
pub fn run(project: &Project, page: Option<&str>, mode: &str) -> Result<()> {
    let json = render(project, page, mode)?;
    println!("{}", json);

    Ok(())
}

/// Derive the layout and serialize it as pretty JSON.
fn render(project: &Project, page: Option<&str>, mode: &str) -> Result<String> {
    let manifest = Manifest::load(project.manifest_path()).context("Failed to load pages")?;
    let mode = RunMode::parse(mode);

    let layout = derive_layout(&manifest, &project.layout_config(), page, &mode)?;

    serde_json::to_string_pretty(&layout).context("Failed to serialize layout")
}
