//! Loading, updating and persisting the manifest file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::record::PageRecord;

/// Errors that can occur when reading or writing the manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(serde_json::Error),

    #[error("Failed to write manifest {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// An in-memory view of the manifest file.
///
/// Load it, mutate it, save it. Nothing is written until [`Manifest::save`].
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    pages: Vec<PageRecord>,
}

impl Manifest {
    /// Load the manifest at `path`.
    ///
    /// A missing file or one holding only whitespace is an empty manifest.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let path = path.into();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No manifest at {}, starting empty", path.display());
                return Ok(Self::empty(path));
            }
            Err(source) => return Err(ManifestError::Read { path, source }),
        };

        if content.trim().is_empty() {
            return Ok(Self::empty(path));
        }

        let pages: Vec<PageRecord> = serde_json::from_str(&content)
            .map_err(|source| ManifestError::Parse {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Loaded {} pages from {}", pages.len(), path.display());

        Ok(Self { path, pages })
    }

    /// An empty manifest that will be written to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pages: Vec::new(),
        }
    }

    /// Location of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pages in manifest order.
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether a page with exactly this identifier exists (case-sensitive).
    pub fn contains(&self, chunk: &str) -> bool {
        self.pages.iter().any(|page| page.chunk == chunk)
    }

    /// Find a page by identifier, ignoring ASCII and Unicode case.
    pub fn find_ignore_case(&self, chunk: &str) -> Option<&PageRecord> {
        let wanted = chunk.to_lowercase();
        self.pages
            .iter()
            .find(|page| page.chunk.to_lowercase() == wanted)
    }

    /// Append `record` unless its identifier is already present.
    ///
    /// Returns `true` if the record was added.
    pub fn insert(&mut self, record: PageRecord) -> bool {
        if self.contains(&record.chunk) {
            return false;
        }
        self.pages.push(record);
        true
    }

    /// Write the manifest as pretty-printed JSON.
    ///
    /// The content is written to a sibling temporary file first and renamed into
    /// place, so a failure never leaves a truncated manifest behind.
    pub fn save(&self) -> Result<(), ManifestError> {
        let mut json =
            serde_json::to_string_pretty(&self.pages).map_err(ManifestError::Serialize)?;
        json.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ManifestError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json).map_err(|source| ManifestError::Write {
            path: tmp_path.clone(),
            source,
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            ManifestError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        tracing::debug!("Wrote {} pages to {}", self.pages.len(), self.path.display());

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "pages.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty() {
        let temp = tempdir().unwrap();

        let manifest = Manifest::load(temp.path().join("pages.json")).unwrap();

        assert!(manifest.is_empty());
    }

    #[test]
    fn blank_file_is_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pages.json");
        fs::write(&path, "  \n\t").unwrap();

        let manifest = Manifest::load(&path).unwrap();

        assert!(manifest.is_empty());
    }

    #[test]
    fn errors_on_invalid_json() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pages.json");
        fs::write(&path, "[{\"chunk\": ").unwrap();

        let result = Manifest::load(&path);

        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn appends_new_page_and_keeps_existing_order() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pages.json");
        fs::write(
            &path,
            r#"[
  { "chunk": "home", "chunkName": "Home" },
  { "chunk": "news", "chunkName": "News", "hidden": true }
]"#,
        )
        .unwrap();

        let mut manifest = Manifest::load(&path).unwrap();
        let before = manifest.pages().to_vec();
        assert!(manifest.insert(PageRecord::new("blog", "My Blog")));
        manifest.save().unwrap();

        let reloaded = Manifest::load(&path).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(&reloaded.pages()[..2], &before[..]);
        assert_eq!(reloaded.pages()[2], PageRecord::new("blog", "My Blog"));
    }

    #[test]
    fn rewrite_keeps_existing_records_verbatim() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pages.json");
        fs::write(
            &path,
            r#"[{"chunk":"a","chunkName":null},{"chunk":"c","zone":"eu","area":"x"}]"#,
        )
        .unwrap();

        let mut manifest = Manifest::load(&path).unwrap();
        manifest.insert(PageRecord::new("b", "B"));
        manifest.save().unwrap();

        let written: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            serde_json::to_string(&written[0]).unwrap(),
            r#"{"chunk":"a","chunkName":null}"#
        );
        assert_eq!(
            serde_json::to_string(&written[1]).unwrap(),
            r#"{"chunk":"c","zone":"eu","area":"x"}"#
        );
        assert_eq!(written.len(), 3);
    }

    #[test]
    fn refuses_duplicate_identifier() {
        let temp = tempdir().unwrap();
        let mut manifest = Manifest::empty(temp.path().join("pages.json"));

        assert!(manifest.insert(PageRecord::new("blog", "Blog")));
        assert!(!manifest.insert(PageRecord::new("blog", "Another Blog")));
        assert!(manifest.insert(PageRecord::new("Blog", "Case differs")));

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.pages()[0].display_name(), "Blog");
    }

    #[test]
    fn writes_pretty_json() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pages.json");
        let mut manifest = Manifest::load(&path).unwrap();

        manifest.insert(PageRecord::new("blog", "My Blog"));
        manifest.save().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "[\n  {\n    \"chunk\": \"blog\",\n    \"chunkName\": \"My Blog\"\n  }\n]\n"
        );
        assert!(!temp.path().join("pages.json.tmp").exists());
    }

    #[test]
    fn finds_pages_ignoring_case() {
        let mut manifest = Manifest::empty("pages.json");
        manifest.insert(PageRecord::new("Admin/Users", "Users"));

        assert!(manifest.find_ignore_case("admin/users").is_some());
        assert!(!manifest.contains("admin/users"));
        assert!(manifest.find_ignore_case("admin").is_none());
    }
}
