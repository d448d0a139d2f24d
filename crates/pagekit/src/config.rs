//! Project configuration (pagekit.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use pagekit_build::{BuildCommand, LayoutConfig};
use pagekit_scaffold::ScaffoldConfig;

/// Configuration file structure (pagekit.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    #[serde(default = "default_pages_dir")]
    pub pages_dir: PathBuf,
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    #[serde(default = "default_landing_page")]
    pub landing_page: PathBuf,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            pages_dir: default_pages_dir(),
            template_dir: default_template_dir(),
            landing_page: default_landing_page(),
            out_dir: default_out_dir(),
        }
    }
}

/// External build command run by `build-all`.
#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments; `{script}` and `{page}` are substituted per page
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default = "default_script")]
    pub script: String,
    #[serde(default = "default_test_script")]
    pub test_script: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            script: default_script(),
            test_script: default_test_script(),
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("pages.json")
}
fn default_pages_dir() -> PathBuf {
    PathBuf::from("src/pages")
}
fn default_template_dir() -> PathBuf {
    PathBuf::from("scripts/template")
}
fn default_landing_page() -> PathBuf {
    PathBuf::from("index.html")
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}
fn default_program() -> String {
    BuildCommand::default().program
}
fn default_args() -> Vec<String> {
    BuildCommand::default().args
}
fn default_script() -> String {
    BuildCommand::default().script
}
fn default_test_script() -> String {
    BuildCommand::default().test_script
}

/// A loaded configuration together with the project root it applies to.
#[derive(Debug)]
pub struct Project {
    /// Directory holding the config file; relative paths resolve against it
    pub root: PathBuf,
    pub config: ConfigFile,
}

impl Project {
    /// Load the project whose configuration lives at `config_path`.
    ///
    /// A missing file yields the defaults. A malformed file is an error.
    pub fn load(config_path: &Path) -> Result<Self> {
        let root = project_root(config_path)?;

        if !config_path.exists() {
            tracing::debug!(
                "No {} found, using default configuration",
                config_path.display()
            );
            return Ok(Self {
                root,
                config: ConfigFile::default(),
            });
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        tracing::debug!("Loaded config from {}", config_path.display());

        Ok(Self { root, config })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.project.manifest)
    }

    pub fn scaffold_config(&self) -> ScaffoldConfig {
        let project = &self.config.project;
        ScaffoldConfig {
            root: self.root.clone(),
            pages_dir: project.pages_dir.clone(),
            template_dir: project.template_dir.clone(),
            manifest: project.manifest.clone(),
            landing_page: project.landing_page.clone(),
        }
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            root: self.root.clone(),
            pages_dir: self.config.project.pages_dir.clone(),
            out_dir: self.config.project.out_dir.clone(),
        }
    }

    pub fn build_command(&self) -> BuildCommand {
        let build = &self.config.build;
        BuildCommand {
            program: build.program.clone(),
            args: build.args.clone(),
            script: build.script.clone(),
            test_script: build.test_script.clone(),
        }
    }
}

/// Absolute directory containing the config file.
fn project_root(config_path: &Path) -> Result<PathBuf> {
    let parent = config_path.parent().unwrap_or(Path::new(""));
    if parent.is_absolute() {
        return Ok(parent.to_path_buf());
    }

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    if parent.as_os_str().is_empty() {
        Ok(cwd)
    } else {
        Ok(cwd.join(parent))
    }
}
