//! Recursive template copying.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// What a template copy produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
}

/// Failure while mirroring the template tree.
#[derive(Debug, thiserror::Error)]
#[error("Failed to copy {}: {source}", .path.display())]
pub struct CopyError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Mirror `template_dir` into `target_dir`.
///
/// Subdirectories are created as needed and files are copied byte-for-byte.
/// `target_dir` itself must already exist.
pub fn copy_template(template_dir: &Path, target_dir: &Path) -> Result<CopyStats, CopyError> {
    let mut stats = CopyStats::default();

    for entry in WalkDir::new(template_dir)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CopyError {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| template_dir.to_path_buf()),
            source: e.into(),
        })?;

        let source = entry.path();
        let relative = source.strip_prefix(template_dir).unwrap_or(source);
        let target = target_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| CopyError {
                path: target.clone(),
                source,
            })?;
            stats.dirs += 1;
        } else {
            fs::copy(source, &target).map_err(|e| CopyError {
                path: source.to_path_buf(),
                source: e,
            })?;
            tracing::debug!("Copied {}", relative.display());
            stats.files += 1;
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mirrors_nested_tree() {
        let temp = tempdir().unwrap();
        let template = temp.path().join("template");
        let target = temp.path().join("out");

        fs::create_dir_all(template.join("components/icons")).unwrap();
        fs::create_dir_all(template.join("empty")).unwrap();
        fs::write(template.join("index.html"), "<div id=\"app\"></div>").unwrap();
        fs::write(template.join("components/icons/logo.svg"), [0u8, 159, 146, 150]).unwrap();
        fs::create_dir_all(&target).unwrap();

        let stats = copy_template(&template, &target).unwrap();

        assert_eq!(stats, CopyStats { files: 2, dirs: 3 });
        assert_eq!(
            fs::read(target.join("index.html")).unwrap(),
            fs::read(template.join("index.html")).unwrap()
        );
        assert_eq!(
            fs::read(target.join("components/icons/logo.svg")).unwrap(),
            vec![0u8, 159, 146, 150]
        );
        assert!(target.join("empty").is_dir());
    }

    #[test]
    fn errors_on_missing_template() {
        let temp = tempdir().unwrap();

        let result = copy_template(&temp.path().join("nope"), temp.path());

        assert!(result.is_err());
    }
}
