//! Pluggable export format system.
//!
//! This module provides a registry of exporters that serialize a processed
//! notebook to text. The default exporter is Markdown; the notebook exporter
//! writes the processed notebook back out as nbformat JSON.
//!
//! # Adding a New Exporter
//!
//! ```ignore
//! struct HtmlExporter;
//!
//! impl Exporter for HtmlExporter {
//!     fn name(&self) -> &'static str { "html" }
//!     fn extension(&self) -> &'static str { ".html" }
//!     fn export(&self, notebook: &Notebook, resources: &mut Resources) -> Result<String, ExportError> {
//!         // Render cells to HTML...
//!     }
//! }
//!
//! registry.register(HtmlExporter);
//! ```

use serde::Serialize;

use crate::convert::markdown::MarkdownExporter;
use crate::convert::{Notebook, Resources};

/// Error during export.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to serialize notebook: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode {mime} output of cell {cell}: {source}")]
    Image {
        mime: String,
        cell: usize,
        source: base64::DecodeError,
    },
}

/// A format a processed notebook can be exported to.
pub trait Exporter: Send + Sync {
    /// The name of this format, as used in `export_format` (e.g. "markdown").
    fn name(&self) -> &'static str;

    /// Extension of the exported file, including the dot.
    fn extension(&self) -> &'static str;

    /// Serialize the notebook.
    ///
    /// Files that belong next to the exported document (extracted images)
    /// are added to `resources.outputs`.
    fn export(&self, notebook: &Notebook, resources: &mut Resources)
    -> Result<String, ExportError>;
}

/// Notebook format implementation.
///
/// Writes the processed notebook as nbformat JSON with one-space indent,
/// the layout Jupyter itself uses.
pub struct NotebookExporter;

impl Exporter for NotebookExporter {
    fn name(&self) -> &'static str {
        "notebook"
    }

    fn extension(&self) -> &'static str {
        ".ipynb"
    }

    fn export(
        &self,
        notebook: &Notebook,
        _resources: &mut Resources,
    ) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        notebook.serialize(&mut serializer)?;

        // serde_json only emits valid UTF-8
        let mut json = String::from_utf8_lossy(&buf).into_owned();
        json.push('\n');
        Ok(json)
    }
}

/// Registry of available exporters.
pub struct ExporterRegistry {
    exporters: Vec<Box<dyn Exporter>>,
}

impl ExporterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            exporters: Vec::new(),
        }
    }

    /// Create a registry with the default exporters (Markdown and notebook).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownExporter);
        registry.register(NotebookExporter);
        registry
    }

    /// Register an exporter.
    pub fn register<E: Exporter + 'static>(&mut self, exporter: E) {
        self.exporters.push(Box::new(exporter));
    }

    /// Find the exporter with the given name.
    pub fn get(&self, name: &str) -> Option<&dyn Exporter> {
        self.exporters
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.as_ref())
    }

    /// Names of all registered exporters.
    pub fn names(&self) -> Vec<&'static str> {
        self.exporters.iter().map(|e| e.name()).collect()
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::convert::Cell;

    #[test]
    fn test_default_registry() {
        let registry = ExporterRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["markdown", "notebook"]);
        assert_eq!(registry.get("markdown").unwrap().extension(), ".md");
        assert!(registry.get("html").is_none());
    }

    #[test]
    fn test_notebook_export_round_trips() {
        let notebook = Notebook::new(
            vec![Cell::markdown("# Title"), Cell::code("x = 1")],
            Default::default(),
        );

        let json = NotebookExporter
            .export(&notebook, &mut Resources::new("nb"))
            .unwrap();
        assert!(json.starts_with("{\n \"cells\": ["));

        let reparsed = Notebook::from_json(&json).unwrap();
        assert_eq!(reparsed.cells.len(), 2);
        assert_eq!(reparsed.cells[1].source(), "x = 1");
    }
}
