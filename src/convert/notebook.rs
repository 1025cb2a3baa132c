//! Notebook document model.
//!
//! Follows the nbformat v4 JSON layout closely enough to round-trip the
//! fields the pipeline touches. Unknown metadata keys are kept so the
//! notebook exporter does not lose them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The only nbformat major version this crate reads.
pub const NBFORMAT_MAJOR: u64 = 4;

#[derive(thiserror::Error, Debug)]
pub enum NotebookError {
    #[error("failed to read notebook {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported nbformat version {0} (only v4 notebooks are supported)")]
    UnsupportedVersion(u64),
}

// =============================================================================
// Notebook
// =============================================================================

/// A notebook document: an ordered list of cells plus document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    /// Document-level metadata (kernelspec, language_info, blog, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub nbformat: u64,
    #[serde(default)]
    pub nbformat_minor: u64,
}

impl Notebook {
    /// Create a v4 notebook from cells and metadata.
    #[cfg(test)]
    pub fn new(cells: Vec<Cell>, metadata: Map<String, Value>) -> Self {
        Self {
            cells,
            metadata,
            nbformat: NBFORMAT_MAJOR,
            nbformat_minor: 5,
        }
    }

    /// Parse a notebook from its JSON text.
    ///
    /// The version is checked before the typed parse so that an old notebook
    /// reports its version instead of a confusing missing-field error.
    pub fn from_json(text: &str) -> Result<Self, NotebookError> {
        let value: Value = serde_json::from_str(text)?;

        let version = value.get("nbformat").and_then(Value::as_u64).unwrap_or(0);
        if version != NBFORMAT_MAJOR {
            return Err(NotebookError::UnsupportedVersion(version));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a notebook file.
    pub async fn load(path: &Path) -> Result<Self, NotebookError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| NotebookError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&text)
    }

    /// The programming language of the notebook's code cells, if recorded.
    ///
    /// Prefers `language_info.name` and falls back to `kernelspec.language`.
    pub fn language(&self) -> Option<&str> {
        let from_info = self
            .metadata
            .get("language_info")
            .and_then(|info| info.get("name"))
            .and_then(Value::as_str);

        from_info.or_else(|| {
            self.metadata
                .get("kernelspec")
                .and_then(|spec| spec.get("language"))
                .and_then(Value::as_str)
        })
    }
}

// =============================================================================
// Cells
// =============================================================================

/// A single notebook cell, tagged by `cell_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Code(CodeCell),
    Markdown(MarkdownCell),
    Raw(RawCell),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(deserialize_with = "multiline")]
    pub source: String,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub execution_count: Option<u32>,
    /// Set by the tag remover; exporters leave the input out.
    #[serde(skip)]
    pub hide_input: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkdownCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(deserialize_with = "multiline")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(deserialize_with = "multiline")]
    pub source: String,
}

impl Cell {
    /// Create a markdown cell with empty metadata.
    pub fn markdown(source: impl Into<String>) -> Self {
        Cell::Markdown(MarkdownCell {
            source: source.into(),
            ..Default::default()
        })
    }

    /// Create a code cell with no outputs.
    #[cfg(test)]
    pub fn code(source: impl Into<String>) -> Self {
        Cell::Code(CodeCell {
            source: source.into(),
            ..Default::default()
        })
    }

    /// The cell's source text.
    pub fn source(&self) -> &str {
        match self {
            Cell::Code(cell) => &cell.source,
            Cell::Markdown(cell) => &cell.source,
            Cell::Raw(cell) => &cell.source,
        }
    }

    /// The cell's metadata.
    pub fn metadata(&self) -> &Metadata {
        match self {
            Cell::Code(cell) => &cell.metadata,
            Cell::Markdown(cell) => &cell.metadata,
            Cell::Raw(cell) => &cell.metadata,
        }
    }

    /// Mutable access to the cell's metadata.
    #[cfg(test)]
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Cell::Code(cell) => &mut cell.metadata,
            Cell::Markdown(cell) => &mut cell.metadata,
            Cell::Raw(cell) => &mut cell.metadata,
        }
    }
}

/// Cell or output metadata: the tag list plus everything else, preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Returns true if any of `tags` is present on this metadata.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// A MIME type to payload mapping (`text/plain`, `image/png`, ...).
pub type MimeBundle = Map<String, Value>;

/// A stored code cell output, tagged by `output_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        name: String,
        #[serde(deserialize_with = "multiline")]
        text: String,
    },
    DisplayData {
        data: MimeBundle,
        #[serde(default)]
        metadata: Metadata,
    },
    ExecuteResult {
        #[serde(default)]
        execution_count: Option<u32>,
        data: MimeBundle,
        #[serde(default)]
        metadata: Metadata,
    },
    Error {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
}

impl Output {
    /// Output metadata, for the output types that carry it.
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Output::DisplayData { metadata, .. } | Output::ExecuteResult { metadata, .. } => {
                Some(metadata)
            }
            Output::Stream { .. } | Output::Error { .. } => None,
        }
    }
}

/// Text payload of a MIME bundle entry.
///
/// nbformat stores text payloads either as a string or as a list of lines.
pub fn bundle_text(bundle: &MimeBundle, mime: &str) -> Option<String> {
    match bundle.get(mime)? {
        Value::String(text) => Some(text.clone()),
        Value::Array(lines) => Some(lines.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

// =============================================================================
// Multiline strings
// =============================================================================

/// nbformat allows text fields as a single string or a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineString {
    Single(String),
    Lines(Vec<String>),
}

fn multiline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MultilineString::deserialize(deserializer)? {
        MultilineString::Single(text) => text,
        MultilineString::Lines(lines) => lines.concat(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
  "cells": [
    {
      "cell_type": "markdown",
      "id": "intro",
      "metadata": {"tags": ["lead"], "collapsed": false},
      "source": ["# Title\n", "\n", "Some text"]
    },
    {
      "cell_type": "code",
      "execution_count": 3,
      "metadata": {},
      "source": "print('hi')",
      "outputs": [
        {"output_type": "stream", "name": "stdout", "text": ["hi\n"]},
        {
          "output_type": "execute_result",
          "execution_count": 3,
          "data": {"text/plain": ["42"]},
          "metadata": {"tags": ["keep"]}
        }
      ]
    },
    {"cell_type": "raw", "metadata": {}, "source": "raw text"}
  ],
  "metadata": {
    "kernelspec": {"name": "python3", "language": "python"},
    "blog": {"title": "Hello"}
  },
  "nbformat": 4,
  "nbformat_minor": 5
}"##;

    #[test]
    fn test_parse_notebook() {
        let nb = Notebook::from_json(SAMPLE).unwrap();
        assert_eq!(nb.cells.len(), 3);
        assert_eq!(nb.nbformat_minor, 5);

        match &nb.cells[0] {
            Cell::Markdown(cell) => {
                assert_eq!(cell.id.as_deref(), Some("intro"));
                assert_eq!(cell.source, "# Title\n\nSome text");
                assert_eq!(cell.metadata.tags, vec!["lead".to_string()]);
                assert!(cell.metadata.extra.contains_key("collapsed"));
            }
            other => panic!("expected markdown cell, got {other:?}"),
        }

        match &nb.cells[1] {
            Cell::Code(cell) => {
                assert_eq!(cell.execution_count, Some(3));
                assert_eq!(cell.outputs.len(), 2);
                match &cell.outputs[0] {
                    Output::Stream { name, text } => {
                        assert_eq!(name, "stdout");
                        assert_eq!(text, "hi\n");
                    }
                    other => panic!("expected stream output, got {other:?}"),
                }
                let meta = cell.outputs[1].metadata().unwrap();
                assert_eq!(meta.tags, vec!["keep".to_string()]);
            }
            other => panic!("expected code cell, got {other:?}"),
        }

        assert!(matches!(nb.cells[2], Cell::Raw(_)));
        assert_eq!(nb.cells[2].source(), "raw text");
    }

    #[test]
    fn test_language_fallback_to_kernelspec() {
        let nb = Notebook::from_json(SAMPLE).unwrap();
        assert_eq!(nb.language(), Some("python"));
    }

    #[test]
    fn test_language_prefers_language_info() {
        let mut nb = Notebook::from_json(SAMPLE).unwrap();
        nb.metadata.insert(
            "language_info".to_string(),
            serde_json::json!({"name": "rust"}),
        );
        assert_eq!(nb.language(), Some("rust"));
    }

    #[test]
    fn test_rejects_old_nbformat() {
        let err = Notebook::from_json(r#"{"nbformat": 3, "worksheets": []}"#).unwrap_err();
        assert!(matches!(err, NotebookError::UnsupportedVersion(3)));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = Notebook::from_json("not json").unwrap_err();
        assert!(matches!(err, NotebookError::Json(_)));
    }

    #[test]
    fn test_serialize_keeps_cell_type_and_metadata() {
        let nb = Notebook::from_json(SAMPLE).unwrap();
        let value = serde_json::to_value(&nb).unwrap();
        assert_eq!(value["cells"][0]["cell_type"], "markdown");
        assert_eq!(value["cells"][0]["metadata"]["collapsed"], false);
        assert_eq!(value["cells"][1]["outputs"][0]["output_type"], "stream");
        assert_eq!(value["metadata"]["blog"]["title"], "Hello");
    }

    #[test]
    fn test_has_any_tag() {
        let meta = Metadata {
            tags: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        assert!(meta.has_any_tag(&["b".to_string()]));
        assert!(!meta.has_any_tag(&["c".to_string()]));
        assert!(!meta.has_any_tag(&[]));
    }

    #[test]
    fn test_bundle_text_joins_lines() {
        let mut bundle = MimeBundle::new();
        bundle.insert("text/plain".to_string(), serde_json::json!(["a\n", "b"]));
        assert_eq!(bundle_text(&bundle, "text/plain").as_deref(), Some("a\nb"));
        assert_eq!(bundle_text(&bundle, "text/html"), None);
    }
}
