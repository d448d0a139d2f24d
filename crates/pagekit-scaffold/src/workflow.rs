//! The scaffolding workflow.
//!
//! Runs validation, directory creation, template copy, manifest update and landing
//! page update in order. The first failing step stops the run; earlier steps are not
//! rolled back.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pagekit_manifest::{Manifest, ManifestError, PageRecord};

use crate::input::{parse_request, InputError, PageRequest};
use crate::landing::{LandingError, LandingPage, LinkInsertion};
use crate::template::{copy_template, CopyError};

/// Paths used by the scaffolder. Relative paths resolve against `root`.
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    /// Project root
    pub root: PathBuf,

    /// Directory holding one subdirectory per page
    pub pages_dir: PathBuf,

    /// Template copied into each new page
    pub template_dir: PathBuf,

    /// Manifest file
    pub manifest: PathBuf,

    /// Landing page that links to every page
    pub landing_page: PathBuf,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            pages_dir: PathBuf::from("src/pages"),
            template_dir: PathBuf::from("scripts/template"),
            manifest: PathBuf::from("pages.json"),
            landing_page: PathBuf::from("index.html"),
        }
    }
}

/// A step of the workflow, used to report where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldStep {
    Validating,
    CreatingDirectory,
    CopyingTemplate,
    UpdatingManifest,
    UpdatingLandingPage,
}

impl fmt::Display for ScaffoldStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaffoldStep::Validating => "validating input",
            ScaffoldStep::CreatingDirectory => "creating page directory",
            ScaffoldStep::CopyingTemplate => "copying template",
            ScaffoldStep::UpdatingManifest => "updating manifest",
            ScaffoldStep::UpdatingLandingPage => "updating landing page",
        };
        f.write_str(name)
    }
}

/// Errors that stop the workflow.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Template directory not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Page already exists: {}", .0.display())]
    PageExists(PathBuf),

    #[error("Page would be created inside the template directory: {}", .0.display())]
    PageInsideTemplate(PathBuf),

    #[error("Failed while {step}: {}: {source}", .path.display())]
    Io {
        step: ScaffoldStep,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed while copying template: {0}")]
    Copy(#[from] CopyError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("{}: {source}", .path.display())]
    Landing { path: PathBuf, source: LandingError },
}

impl ScaffoldError {
    /// The step that failed.
    pub fn step(&self) -> ScaffoldStep {
        match self {
            ScaffoldError::Input(_)
            | ScaffoldError::TemplateNotFound(_)
            | ScaffoldError::PageExists(_)
            | ScaffoldError::PageInsideTemplate(_) => ScaffoldStep::Validating,
            ScaffoldError::Io { step, .. } => *step,
            ScaffoldError::Copy(_) => ScaffoldStep::CopyingTemplate,
            ScaffoldError::Manifest(_) => ScaffoldStep::UpdatingManifest,
            ScaffoldError::Landing { .. } => ScaffoldStep::UpdatingLandingPage,
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    pub request: PageRequest,

    /// The new page directory
    pub page_dir: PathBuf,

    /// Number of template files copied
    pub files_copied: usize,

    /// Whether a manifest record was added
    pub manifest_updated: bool,

    /// Whether a landing page link was added
    pub link_inserted: bool,
}

/// Creates pages from operator input.
pub struct Scaffolder {
    config: ScaffoldConfig,
    landing: LandingPage,
}

impl Scaffolder {
    pub fn new(config: ScaffoldConfig) -> Self {
        Self {
            config,
            landing: LandingPage::new(),
        }
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Scaffold the page described by an `identifier:description` line.
    pub fn run(&self, line: &str) -> Result<ScaffoldOutcome, ScaffoldError> {
        let request = parse_request(line)?;
        let page_dir = self.page_dir(&request.chunk);
        let template_dir = self.resolve(&self.config.template_dir);

        if !template_dir.is_dir() {
            return Err(ScaffoldError::TemplateNotFound(template_dir));
        }
        if page_dir.exists() {
            return Err(ScaffoldError::PageExists(page_dir));
        }
        // Copying a tree into itself never terminates.
        if page_dir.starts_with(&template_dir) {
            return Err(ScaffoldError::PageInsideTemplate(page_dir));
        }

        tracing::info!(
            "Creating {} from template {}",
            page_dir.display(),
            template_dir.display()
        );
        fs::create_dir_all(&page_dir).map_err(|source| ScaffoldError::Io {
            step: ScaffoldStep::CreatingDirectory,
            path: page_dir.clone(),
            source,
        })?;

        let stats = copy_template(&template_dir, &page_dir)?;
        tracing::info!("Copied {} template files", stats.files);

        let manifest_updated = self.update_manifest(&request)?;
        let link_inserted = self.update_landing_page(&request)?;

        Ok(ScaffoldOutcome {
            request,
            page_dir,
            files_copied: stats.files,
            manifest_updated,
            link_inserted,
        })
    }

    /// Directory a page with this identifier lives in.
    pub fn page_dir(&self, chunk: &str) -> PathBuf {
        self.resolve(&self.config.pages_dir).join(chunk)
    }

    /// Href of a page's entry document, relative to the project root.
    pub fn page_href(&self, chunk: &str) -> String {
        let pages_dir = self
            .config
            .pages_dir
            .to_string_lossy()
            .replace('\\', "/");
        let pages_dir = pages_dir.trim_start_matches("./").trim_end_matches('/');

        format!("./{}/{}/index.html", pages_dir, chunk)
    }

    fn update_manifest(&self, request: &PageRequest) -> Result<bool, ScaffoldError> {
        let mut manifest = Manifest::load(self.resolve(&self.config.manifest))?;

        let added = manifest.insert(PageRecord::new(&request.chunk, &request.description));
        if added {
            manifest.save()?;
            tracing::info!("Added {} to {}", request.chunk, manifest.path().display());
        } else {
            tracing::warn!(
                "{} is already listed in {}, leaving it unchanged",
                request.chunk,
                manifest.path().display()
            );
        }

        Ok(added)
    }

    fn update_landing_page(&self, request: &PageRequest) -> Result<bool, ScaffoldError> {
        let path = self.resolve(&self.config.landing_page);
        let io_error = |source| ScaffoldError::Io {
            step: ScaffoldStep::UpdatingLandingPage,
            path: path.clone(),
            source,
        };

        let document = fs::read_to_string(&path).map_err(io_error)?;
        let href = self.page_href(&request.chunk);

        let insertion = self
            .landing
            .insert_link(&document, &href, &request.description)
            .map_err(|source| ScaffoldError::Landing {
                path: path.clone(),
                source,
            })?;

        match insertion {
            LinkInsertion::Inserted(updated) => {
                fs::write(&path, updated).map_err(io_error)?;
                tracing::info!("Linked {} from {}", href, path.display());
                Ok(true)
            }
            LinkInsertion::AlreadyPresent => {
                tracing::warn!("{} already links to {}", path.display(), href);
                Ok(false)
            }
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.config.root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    const LANDING: &str = "<html>\n<body>\n</body>\n</html>\n";

    fn project() -> (TempDir, Scaffolder) {
        let temp = tempdir().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("scripts/template/assets")).unwrap();
        fs::write(root.join("scripts/template/index.html"), "<div id=\"app\"></div>").unwrap();
        fs::write(root.join("scripts/template/main.ts"), "import './assets/app.css';").unwrap();
        fs::write(root.join("scripts/template/assets/app.css"), "body { margin: 0; }").unwrap();
        fs::write(root.join("pages.json"), "[]").unwrap();
        fs::write(root.join("index.html"), LANDING).unwrap();

        let scaffolder = Scaffolder::new(ScaffoldConfig {
            root: root.to_path_buf(),
            ..Default::default()
        });
        (temp, scaffolder)
    }

    fn tree(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut entries: Vec<_> = walkdir::WalkDir::new(dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.unwrap())
            .map(|e| {
                let contents = if e.file_type().is_file() {
                    fs::read(e.path()).unwrap()
                } else {
                    Vec::new()
                };
                (e.path().strip_prefix(dir).unwrap().to_path_buf(), contents)
            })
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn scaffolds_new_page() {
        let (temp, scaffolder) = project();
        let root = temp.path();

        let outcome = scaffolder.run("blog:My Blog").unwrap();

        assert_eq!(outcome.page_dir, root.join("src/pages/blog"));
        assert_eq!(outcome.files_copied, 3);
        assert!(outcome.manifest_updated);
        assert!(outcome.link_inserted);
        assert_eq!(
            tree(&root.join("src/pages/blog")),
            tree(&root.join("scripts/template"))
        );

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("pages.json")).unwrap()).unwrap();
        assert_eq!(
            manifest,
            serde_json::json!([{ "chunk": "blog", "chunkName": "My Blog" }])
        );

        let landing = fs::read_to_string(root.join("index.html")).unwrap();
        assert_eq!(
            landing.matches("<a href=\"./src/pages/blog/index.html\">My Blog</a>").count(),
            1
        );
    }

    #[test]
    fn scaffolds_nested_page() {
        let (temp, scaffolder) = project();

        scaffolder.run("a/b/c:Page ABC").unwrap();

        assert!(temp.path().join("src/pages/a/b/c/index.html").is_file());
        let landing = fs::read_to_string(temp.path().join("index.html")).unwrap();
        assert!(landing.contains("href=\"./src/pages/a/b/c/index.html\""));
    }

    #[test]
    fn rejects_input_without_separator() {
        let (temp, scaffolder) = project();
        let before = tree(temp.path());

        let err = scaffolder.run("blog").unwrap_err();

        assert!(matches!(err, ScaffoldError::Input(InputError::MissingSeparator(_))));
        assert_eq!(err.step(), ScaffoldStep::Validating);
        assert_eq!(tree(temp.path()), before);
    }

    #[test]
    fn rejects_existing_page_directory() {
        let (temp, scaffolder) = project();
        fs::create_dir_all(temp.path().join("src/pages/blog")).unwrap();
        let before = tree(temp.path());

        let err = scaffolder.run("blog:My Blog").unwrap_err();

        assert!(matches!(err, ScaffoldError::PageExists(_)));
        assert_eq!(tree(temp.path()), before);
    }

    #[test]
    fn errors_on_missing_template() {
        let (temp, scaffolder) = project();
        fs::remove_dir_all(temp.path().join("scripts/template")).unwrap();

        let err = scaffolder.run("blog:My Blog").unwrap_err();

        assert!(matches!(err, ScaffoldError::TemplateNotFound(_)));
        assert!(!temp.path().join("src/pages/blog").exists());
    }

    #[test]
    fn rejects_page_inside_template() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/pages/_template")).unwrap();
        fs::write(root.join("src/pages/_template/index.html"), "<div></div>").unwrap();
        fs::write(root.join("index.html"), LANDING).unwrap();
        let scaffolder = Scaffolder::new(ScaffoldConfig {
            root: root.to_path_buf(),
            template_dir: PathBuf::from("src/pages/_template"),
            ..Default::default()
        });
        let before = tree(root);

        let err = scaffolder.run("_template/x:X").unwrap_err();

        assert!(matches!(err, ScaffoldError::PageInsideTemplate(_)));
        assert_eq!(err.step(), ScaffoldStep::Validating);
        assert_eq!(tree(root), before);
    }

    #[test]
    fn keeps_manifest_and_landing_page_unique() {
        let (temp, scaffolder) = project();
        let root = temp.path();
        scaffolder.run("blog:My Blog").unwrap();

        // The directory was removed by hand but the page is still listed.
        fs::remove_dir_all(root.join("src/pages/blog")).unwrap();
        let outcome = scaffolder.run("blog:My Blog").unwrap();

        assert!(!outcome.manifest_updated);
        assert!(!outcome.link_inserted);
        let manifest = Manifest::load(root.join("pages.json")).unwrap();
        assert_eq!(manifest.len(), 1);
        let landing = fs::read_to_string(root.join("index.html")).unwrap();
        assert_eq!(landing.matches("./src/pages/blog/index.html").count(), 1);
    }

    #[test]
    fn creates_missing_manifest() {
        let (temp, scaffolder) = project();
        fs::remove_file(temp.path().join("pages.json")).unwrap();

        scaffolder.run("shop:").unwrap();

        let manifest = Manifest::load(temp.path().join("pages.json")).unwrap();
        assert_eq!(manifest.pages(), &[PageRecord::new("shop", "shop")]);
    }

    #[test]
    fn missing_body_tag_fails_after_manifest_update() {
        let (temp, scaffolder) = project();
        fs::write(temp.path().join("index.html"), "<html></html>").unwrap();

        let err = scaffolder.run("blog:My Blog").unwrap_err();

        assert_eq!(err.step(), ScaffoldStep::UpdatingLandingPage);
        assert!(matches!(
            err,
            ScaffoldError::Landing {
                source: LandingError::MissingBody,
                ..
            }
        ));
        // No rollback of completed steps.
        assert!(temp.path().join("src/pages/blog/index.html").exists());
        assert!(Manifest::load(temp.path().join("pages.json"))
            .unwrap()
            .contains("blog"));
    }

    #[test]
    fn invalid_manifest_stops_before_landing_page() {
        let (temp, scaffolder) = project();
        fs::write(temp.path().join("pages.json"), "{ not json").unwrap();

        let err = scaffolder.run("blog:My Blog").unwrap_err();

        assert_eq!(err.step(), ScaffoldStep::UpdatingManifest);
        assert_eq!(
            fs::read_to_string(temp.path().join("index.html")).unwrap(),
            LANDING
        );
    }

    #[test]
    fn builds_href_from_pages_dir() {
        let scaffolder = Scaffolder::new(ScaffoldConfig {
            pages_dir: PathBuf::from("./web/pages/"),
            ..Default::default()
        });

        assert_eq!(scaffolder.page_href("a/b"), "./web/pages/a/b/index.html");
    }
}
