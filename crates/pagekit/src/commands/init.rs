//! Initialize pagekit in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Project;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing pagekit...");

    // Create default config
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    } else {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
    }

    let project = Project::load(config_path)?;
    let settings = &project.config.project;

    // Project state: `--yes` never replaces pages already recorded or linked.
    write_file(&project.manifest_path(), "[]\n", false)?;
    write_file(&project.root.join(&settings.landing_page), DEFAULT_LANDING, false)?;

    let template_dir = project.root.join(&settings.template_dir);
    fs::create_dir_all(&template_dir).context("Failed to create template directory")?;
    write_file(&template_dir.join("index.html"), DEFAULT_TEMPLATE_HTML, yes)?;
    write_file(&template_dir.join("main.ts"), DEFAULT_TEMPLATE_MAIN, yes)?;

    fs::create_dir_all(project.root.join(&settings.pages_dir))
        .context("Failed to create pages directory")?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'pagekit new' to create your first page.");

    Ok(())
}

/// Write `content` to `path` unless it exists and `overwrite` is off.
fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::debug!("Keeping existing {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# pagekit configuration

[project]
# Page manifest
manifest = "pages.json"

# One directory per page
pages_dir = "src/pages"

# Copied into every new page
template_dir = "scripts/template"

# Links to every page, for local development
landing_page = "index.html"

# Build output, one subdirectory per page
out_dir = "dist"

[build]
# Command run once per page by `pagekit build-all`.
# {script} is `script` (or `test_script` for `build-all test`), {page} the page id.
program = "npm"
args = ["run", "{script}", "--page={page}"]
script = "build"
test_script = "build:test"
"#;

const DEFAULT_LANDING: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Pages</title>
  </head>
  <body>
  </body>
</html>
"#;

const DEFAULT_TEMPLATE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title></title>
  </head>
  <body>
    <div id="app"></div>
    <script type="module" src="./main.ts"></script>
  </body>
</html>
"#;

const DEFAULT_TEMPLATE_MAIN: &str = r#"const app = document.querySelector<HTMLDivElement>('#app');

if (app) {
  app.textContent = 'New page';
}
"#;
