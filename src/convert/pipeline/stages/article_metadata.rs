//! Article front matter stage.
//!
//! Turns the notebook's article metadata mapping into a YAML front matter
//! block and prepends it as the first cell of the document.

use serde_json::{Map, Value};

use crate::config::ArticleMetadataConfig;
use crate::convert::pipeline::{PipelineError, Stage};
use crate::convert::{Cell, Notebook, Resources};

/// Stage that prepends a front matter cell built from notebook metadata.
///
/// Runs once per notebook. Fails when the metadata entry is missing or is
/// not a mapping; existing cells are never modified.
pub struct ArticleMetadataStage {
    key: String,
}

impl ArticleMetadataStage {
    pub fn new(config: &ArticleMetadataConfig) -> Self {
        Self {
            key: config.key.clone(),
        }
    }
}

impl Stage for ArticleMetadataStage {
    fn name(&self) -> &'static str {
        "article_metadata"
    }

    fn process(
        &self,
        notebook: &mut Notebook,
        _resources: &mut Resources,
    ) -> Result<(), PipelineError> {
        let source = front_matter(&notebook.metadata, &self.key)?;
        notebook.cells.insert(0, Cell::markdown(source));
        Ok(())
    }
}

/// Render `metadata[key]` as a `---`-delimited YAML block.
///
/// Keys keep their order from the notebook file.
pub fn front_matter(metadata: &Map<String, Value>, key: &str) -> Result<String, PipelineError> {
    let value = metadata
        .get(key)
        .ok_or_else(|| PipelineError::MissingMetadata(key.to_string()))?;

    let mapping = value.as_object().ok_or_else(|| PipelineError::InvalidMetadata {
        key: key.to_string(),
        found: json_type_name(value),
    })?;

    let yaml = serde_yaml::to_string(mapping)?;
    Ok(["---", yaml.as_str(), "---"].join("\n"))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
