//! Create a new page from the template.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use pagekit_scaffold::Scaffolder;

use crate::config::Project;

/// Run the new command.
///
/// Without `input`, a single `page:description` line is read from stdin.
pub async fn run(project: &Project, input: Option<String>) -> Result<()> {
    run_with_reader(project, input, BufReader::new(tokio::io::stdin())).await
}

async fn run_with_reader<R>(project: &Project, input: Option<String>, reader: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let scaffolder = Scaffolder::new(project.scaffold_config());

    let line = match input {
        Some(line) => line,
        None => {
            tracing::info!(
                "Enter the page to create as `page:description`, it will be created under {}",
                scaffolder.config().pages_dir.display()
            );
            tracing::info!("  single level   a:Page A");
            tracing::info!("  nested         a/b/c:Page ABC");

            let mut lines = reader.lines();
            match lines.next_line().await.context("Failed to read from stdin")? {
                Some(line) => line,
                None => {
                    tracing::warn!("No input received, nothing created");
                    return Ok(());
                }
            }
        }
    };

    let outcome = scaffolder.run(&line)?;

    tracing::info!(
        "Created page {} ({} files) at {}",
        outcome.request.chunk,
        outcome.files_copied,
        outcome.page_dir.display()
    );
    if outcome.manifest_updated && outcome.link_inserted {
        tracing::info!("Manifest and landing page updated");
    }

    Ok(())
}
