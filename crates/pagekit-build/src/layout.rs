//! Build layout derivation.
//!
//! The external build tool is run either for one page or, in dev-all mode, for the
//! whole project. Its project root, entry points and output directory all depend on
//! which page was selected and how it was invoked.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use pagekit_manifest::Manifest;

/// How the build tool was invoked (the npm script name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Dev server for one page
    Dev,

    /// Dev server for every page
    DevAll,

    /// Production build of one page
    Build,

    /// Test build of one page
    BuildTest,

    /// Any other script, treated as single-page
    Other(String),
}

impl RunMode {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "dev" => RunMode::Dev,
            "dev-all" => RunMode::DevAll,
            "build" => RunMode::Build,
            "build:test" => RunMode::BuildTest,
            other => RunMode::Other(other.to_string()),
        }
    }

    pub fn is_build(&self) -> bool {
        match self {
            RunMode::Build | RunMode::BuildTest => true,
            RunMode::Other(name) => name.starts_with("build"),
            RunMode::Dev | RunMode::DevAll => false,
        }
    }

    /// What to run instead when every page is wanted.
    fn all_pages_hint(&self) -> &'static str {
        if self.is_build() {
            "to build every page run `build-all`"
        } else {
            "to serve every page run `dev-all`"
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Dev => f.write_str("dev"),
            RunMode::DevAll => f.write_str("dev-all"),
            RunMode::Build => f.write_str("build"),
            RunMode::BuildTest => f.write_str("build:test"),
            RunMode::Other(name) => f.write_str(name),
        }
    }
}

/// Page selection errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("No page selected for `{mode}`: pass `--page=<page dir>` ({})", .mode.all_pages_hint())]
    MissingPage { mode: RunMode },

    #[error("Page `{page}` does not exist, check the page directory ({})", .mode.all_pages_hint())]
    UnknownPage { page: String, mode: RunMode },
}

/// Project paths the layout is derived from.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Project root
    pub root: PathBuf,

    /// Pages directory, relative to the root
    pub pages_dir: PathBuf,

    /// Output directory, relative to the root
    pub out_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            pages_dir: PathBuf::from("src/pages"),
            out_dir: PathBuf::from("dist"),
        }
    }
}

/// Output file naming patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputNames {
    pub asset_file_names: String,
    pub chunk_file_names: String,
    pub entry_file_names: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            asset_file_names: "[ext]/[name]-[hash].[ext]".to_string(),
            chunk_file_names: "js/[name]-[hash].js".to_string(),
            entry_file_names: "js/[name]-[hash].js".to_string(),
        }
    }
}

/// Everything the build tool's configuration needs for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLayout {
    /// Run mode the layout was derived for
    pub mode: String,

    /// Selected page, if any
    pub page: Option<String>,

    /// Project root for the build tool
    pub root: PathBuf,

    /// Where environment files live; stays at the project root when `root` moves
    pub env_dir: PathBuf,

    /// Public base path
    pub base: String,

    /// Entry chunk name to entry document
    pub entries: BTreeMap<String, PathBuf>,

    pub out_dir: PathBuf,
    pub empty_out_dir: bool,

    /// Import aliases
    pub aliases: BTreeMap<String, PathBuf>,

    pub output: OutputNames,
}

/// Derive the build layout for `page` under `mode`.
///
/// Only dev-all without a page covers the whole project. Every other combination
/// needs a page that is listed in the manifest (compared case-insensitively).
pub fn derive_layout(
    manifest: &Manifest,
    config: &LayoutConfig,
    page: Option<&str>,
    mode: &RunMode,
) -> Result<BuildLayout, LayoutError> {
    let page = page.map(str::trim).filter(|p| !p.is_empty());
    let pages_dir = config.root.join(&config.pages_dir);

    let (root, entries, out_dir, page) = match page {
        None if *mode == RunMode::DevAll => {
            let entries: BTreeMap<_, _> = manifest
                .pages()
                .iter()
                .map(|p| (p.chunk.clone(), pages_dir.join(&p.chunk).join("index.html")))
                .collect();
            (config.root.clone(), entries, config.root.join(&config.out_dir), None)
        }
        None => return Err(LayoutError::MissingPage { mode: mode.clone() }),
        Some(page) => {
            let record = manifest
                .find_ignore_case(page)
                .ok_or_else(|| LayoutError::UnknownPage {
                    page: page.to_string(),
                    mode: mode.clone(),
                })?;
            let chunk = record.chunk.clone();

            if mode.is_build() {
                tracing::info!("Building {}", chunk);
            }

            let page_dir = pages_dir.join(&chunk);
            let mut entries = BTreeMap::new();
            entries.insert(chunk.clone(), page_dir.join("index.html"));
            let out_dir = config.root.join(&config.out_dir).join(&chunk);

            (page_dir, entries, out_dir, Some(chunk))
        }
    };

    let mut aliases = BTreeMap::new();
    aliases.insert("@".to_string(), config.root.join("src"));
    aliases.insert("@pages".to_string(), pages_dir);

    Ok(BuildLayout {
        mode: mode.to_string(),
        page,
        root,
        env_dir: config.root.clone(),
        base: "./".to_string(),
        entries,
        out_dir,
        empty_out_dir: true,
        aliases,
        output: OutputNames::default(),
    })
}
