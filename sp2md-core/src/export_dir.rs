//! The export directory: markdown files and downloaded assets, flat.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::document::ExportDocument;
use crate::error::ExportError;

#[derive(Debug, Clone)]
pub struct ExportDirectory {
    root: PathBuf,
}

impl ExportDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates the directory (and parents) if it does not exist yet.
    pub fn ensure(&self) -> Result<(), ExportError> {
        if self.root.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.root).map_err(|e| {
            error!(error = ?e, path = %self.root.display(), "Failed to create export directory");
            ExportError::filesystem(&self.root, e)
        })?;
        debug!(path = %self.root.display(), "Created export directory");
        Ok(())
    }

    /// Appends the document to `<root>/<filename>.md`, creating it if needed.
    ///
    /// Never truncates: a second post with the same filename, or a second run,
    /// adds to the end of the existing file.
    pub fn append_document(&self, doc: &ExportDocument) -> Result<PathBuf, ExportError> {
        self.ensure()?;
        let path = self.root.join(format!("{}.md", doc.filename));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                error!(error = ?e, path = %path.display(), "Failed to open markdown file");
                ExportError::filesystem(&path, e)
            })?;
        file.write_all(doc.content.as_bytes()).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to write markdown file");
            ExportError::filesystem(&path, e)
        })?;
        Ok(path)
    }

    /// Writes (or replaces) `<root>/<local_name>`.
    pub fn write_asset(&self, local_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        self.ensure()?;
        let path = self.root.join(local_name);
        fs::write(&path, bytes).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to write asset");
            ExportError::filesystem(&path, e)
        })?;
        Ok(path)
    }
}
