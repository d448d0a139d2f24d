//! Build every page in the manifest.

use anyhow::{Context, Result};

use pagekit_build::{BatchDriver, BuildVariant};
use pagekit_manifest::Manifest;

use crate::config::Project;

/// Run the build-all command.
pub async fn run(project: &Project, mode: Option<&str>, strict: bool) -> Result<()> {
    let manifest = Manifest::load(project.manifest_path()).context("Failed to load pages")?;

    if manifest.is_empty() {
        tracing::warn!(
            "No pages listed in {}, nothing to build",
            manifest.path().display()
        );
        return Ok(());
    }

    let variant = BuildVariant::from_arg(mode);
    tracing::info!("Building {} pages ({:?})", manifest.len(), variant);

    let driver = BatchDriver::new(project.build_command(), &project.root);
    let report = driver.run(manifest.pages(), variant).await;

    let failed: Vec<&str> = report.failed().map(|o| o.chunk.as_str()).collect();
    tracing::info!(
        "{} built, {} failed",
        report.succeeded().count(),
        failed.len()
    );

    if !failed.is_empty() {
        tracing::warn!("Failed pages: {}", failed.join(", "));
        if strict {
            anyhow::bail!("{} of {} pages failed to build", failed.len(), manifest.len());
        }
    }

    Ok(())
}
