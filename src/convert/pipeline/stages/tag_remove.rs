//! Tag-based removal stage.
//!
//! Removes whole cells, cell inputs, all outputs of a cell, or single
//! outputs, depending on which configured tags they carry.

use crate::config::TagRemoveConfig;
use crate::convert::pipeline::{PipelineError, Stage};
use crate::convert::{Cell, Notebook, Resources};

/// Stage that removes notebook content flagged by tags.
///
/// - cells tagged with a remove-cell tag are deleted
/// - code cells tagged with a remove-all-outputs tag lose every output
/// - code cells tagged with a remove-input tag are exported without input
/// - outputs whose own metadata carries a remove-single-output tag are dropped
///
/// Missing tags are never an error.
pub struct TagRemoveStage {
    remove_cell_tags: Vec<String>,
    remove_all_outputs_tags: Vec<String>,
    remove_input_tags: Vec<String>,
    remove_single_output_tags: Vec<String>,
}

impl TagRemoveStage {
    pub fn new(config: &TagRemoveConfig) -> Self {
        Self {
            remove_cell_tags: config.remove_cell_tags.clone(),
            remove_all_outputs_tags: config.remove_all_outputs_tags.clone(),
            remove_input_tags: config.remove_input_tags.clone(),
            remove_single_output_tags: config.remove_single_output_tags.clone(),
        }
    }
}

impl Stage for TagRemoveStage {
    fn name(&self) -> &'static str {
        "tag_remove"
    }

    fn process(
        &self,
        notebook: &mut Notebook,
        _resources: &mut Resources,
    ) -> Result<(), PipelineError> {
        let before = notebook.cells.len();
        notebook
            .cells
            .retain(|cell| !cell.metadata().has_any_tag(&self.remove_cell_tags));
        let removed = before - notebook.cells.len();
        if removed > 0 {
            tracing::debug!(removed, "removed tagged cells");
        }

        for cell in &mut notebook.cells {
            let Cell::Code(code) = cell else {
                continue;
            };

            if code.metadata.has_any_tag(&self.remove_all_outputs_tags) {
                code.outputs.clear();
            } else if !self.remove_single_output_tags.is_empty() {
                code.outputs.retain(|output| {
                    !output
                        .metadata()
                        .is_some_and(|meta| meta.has_any_tag(&self.remove_single_output_tags))
                });
            }

            if code.metadata.has_any_tag(&self.remove_input_tags) {
                code.hide_input = true;
            }
        }

        Ok(())
    }
}
