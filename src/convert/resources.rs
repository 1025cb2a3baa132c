//! Per-notebook resources threaded through the pipeline and exporter.

use std::collections::BTreeMap;
use std::path::Path;

/// Auxiliary state carried alongside a notebook during conversion.
///
/// Stages receive it by mutable reference; the exporter fills `outputs`
/// with files extracted from cell outputs (images), and the writer places
/// them next to the exported document.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    /// Base name for output files (the notebook's file stem)
    pub unique_key: String,

    /// Extension of the exported document, including the dot (e.g. `.md`)
    pub output_extension: String,

    /// Directory, relative to the output dir, that holds extracted files
    pub output_files_dir: String,

    /// Extracted files keyed by their path relative to the output dir
    pub outputs: BTreeMap<String, Vec<u8>>,
}

impl Resources {
    /// Create resources for a notebook with the given base name.
    pub fn new(unique_key: impl Into<String>) -> Self {
        let unique_key = unique_key.into();
        let output_files_dir = format!("{unique_key}_files");
        Self {
            unique_key,
            output_extension: String::new(),
            output_files_dir,
            outputs: BTreeMap::new(),
        }
    }

    /// Create resources for a notebook file, keyed by its file stem.
    pub fn for_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("notebook");
        Self::new(stem)
    }

    /// File name of the exported document (`<unique_key><extension>`).
    pub fn output_file_name(&self) -> String {
        format!("{}{}", self.unique_key, self.output_extension)
    }
}
