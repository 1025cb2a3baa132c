//! Preprocessing pipeline for notebooks.
//!
//! The pipeline transforms a notebook through a fixed series of stages
//! before it is exported:
//! 1. Tag removal (drop tagged cells, inputs, and outputs)
//! 2. Magic stripping (remove the cell magic from code cells)
//! 3. Link-break fixing (rejoin broken link reference definitions)
//! 4. Article metadata (prepend the front matter cell)
//!
//! The order matters: content-dependent stages must not see removed cells,
//! and the front matter cell must not be touched by earlier text edits.

mod error;
mod stages;

pub use error::PipelineError;

use stages::{ArticleMetadataStage, FixLinkBreakStage, RemoveMagicStage, TagRemoveStage};

use crate::config::Config;
use crate::convert::{Notebook, Resources};

/// A stage in the notebook preprocessing pipeline.
///
/// Each stage is a transform over the notebook and its resources. Stages
/// hold only their own immutable settings, so the same pipeline can be run
/// over any number of notebooks.
pub trait Stage: Send + Sync {
    /// Unique name for this stage (used in logs).
    fn name(&self) -> &'static str;

    /// Process the notebook through this stage.
    ///
    /// The notebook is passed by mutable reference so stages can edit,
    /// insert, or remove cells in place.
    fn process(
        &self,
        notebook: &mut Notebook,
        resources: &mut Resources,
    ) -> Result<(), PipelineError>;
}

/// The notebook preprocessing pipeline.
///
/// Holds the enabled stages in their declared order.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Create the pipeline described by the configuration.
    ///
    /// Stages: tag_remove → remove_magic → fix_link_break → article_metadata,
    /// each included only when enabled.
    pub fn from_config(config: &Config) -> Self {
        let mut pipeline = Self::new();
        if config.tag_remove.enabled {
            pipeline.add_stage(TagRemoveStage::new(&config.tag_remove));
        }
        if config.remove_magic.enabled {
            pipeline.add_stage(RemoveMagicStage::new(&config.remove_magic));
        }
        if config.fix_link_break.enabled {
            pipeline.add_stage(FixLinkBreakStage);
        }
        if config.article_metadata.enabled {
            pipeline.add_stage(ArticleMetadataStage::new(&config.article_metadata));
        }
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run the pipeline on a notebook.
    ///
    /// Stops at the first failing stage; the notebook is then left partially
    /// processed and must not be exported.
    pub fn run(
        &self,
        notebook: &mut Notebook,
        resources: &mut Resources,
    ) -> Result<(), PipelineError> {
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), notebook = %resources.unique_key, "running stage");
            stage.process(notebook, resources)?;
        }

        Ok(())
    }

    /// Get the names of all stages in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
