//! File writing.
//!
//! Writes an exported document and its extracted resource files to disk.

use std::path::{Path, PathBuf};

use super::converter::Conversion;

#[derive(thiserror::Error, Debug)]
#[error("failed to write {path}: {source}")]
pub struct WriteError {
    path: PathBuf,
    source: std::io::Error,
}

/// Writes conversions into an output directory.
///
/// The document lands at `<output_dir>/<unique_key><extension>`; resource
/// files keep their relative paths (e.g. `post_files/output_3_0.png`).
pub struct FilesWriter {
    output_dir: PathBuf,
}

impl FilesWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the document and its resources, returning the document path.
    pub async fn write(&self, conversion: &Conversion) -> Result<PathBuf, WriteError> {
        let resources = &conversion.resources;

        let document_path = self.output_dir.join(resources.output_file_name());
        write_file(&document_path, conversion.output.as_bytes()).await?;

        for (name, bytes) in &resources.outputs {
            write_file(&self.output_dir.join(name), bytes).await?;
        }

        Ok(document_path)
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let with_path = |source| WriteError {
        path: path.to_path_buf(),
        source,
    };

    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(with_path)?;
    }

    tokio::fs::write(path, contents).await.map_err(with_path)
}
