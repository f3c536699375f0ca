//! Local file persistence for uploaded documents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

/// Stores uploaded files under a configured root directory.
///
/// Stored names are prefixed with a random UUID so concurrent uploads of
/// the same filename never collide.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist file contents, returning the relative path it was stored at
    pub async fn save(&self, filename: &str, contents: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create upload directory {:?}", self.root))?;

        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_filename(filename));
        let path = self.root.join(&stored_name);

        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write uploaded file {:?}", path))?;

        Ok(path.to_string_lossy().into_owned())
    }

    /// Remove a previously stored file; missing files are not an error
    pub async fn remove(&self, stored_path: &str) -> Result<()> {
        match tokio::fs::remove_file(Path::new(stored_path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove file {:?}", stored_path)),
        }
    }
}

/// Keep only the final path component and drop separator characters
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    if base.is_empty() {
        "unnamed".to_string()
    } else {
        base.to_string()
    }
}
