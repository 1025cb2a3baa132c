//! Cell magic stripping stage.
//!
//! Removes a cell magic such as `%%run_pytest` from code cells so that the
//! published article shows only the code under test.

use crate::config::RemoveMagicConfig;
use crate::convert::pipeline::{PipelineError, Stage};
use crate::convert::{Cell, Notebook, Resources};

/// Stage that strips a cell magic from code cells.
///
/// When a code cell's source contains the marker, the first two lines
/// (the magic line and the line after it) are dropped and the rest is
/// left-trimmed. Cells without the marker are left byte-identical.
pub struct RemoveMagicStage {
    marker: String,
}

impl RemoveMagicStage {
    pub fn new(config: &RemoveMagicConfig) -> Self {
        Self {
            marker: config.marker.clone(),
        }
    }
}

impl Stage for RemoveMagicStage {
    fn name(&self) -> &'static str {
        "remove_magic"
    }

    fn process(
        &self,
        notebook: &mut Notebook,
        resources: &mut Resources,
    ) -> Result<(), PipelineError> {
        for (index, cell) in notebook.cells.iter_mut().enumerate() {
            let Cell::Code(code) = cell else {
                continue;
            };

            if let Some(stripped) = strip_magic(&code.source, &self.marker) {
                if stripped.is_empty() {
                    tracing::warn!(
                        notebook = %resources.unique_key,
                        cell = index,
                        marker = %self.marker,
                        "cell magic has no content after it; cell source is now empty"
                    );
                }
                code.source = stripped;
            }
        }

        Ok(())
    }
}

/// Strip the magic line and the line after it from `source`.
///
/// Returns `None` when the marker does not occur in the source. A source
/// with fewer than three lines yields an empty string.
pub fn strip_magic(source: &str, marker: &str) -> Option<String> {
    if !source.contains(marker) {
        return None;
    }

    let rest = source.splitn(3, '\n').nth(2).unwrap_or("");
    Some(rest.trim_start().to_string())
}
