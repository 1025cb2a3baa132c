use std::path::Path;

use crate::config::Config;

use super::export::{ExportError, Exporter, ExporterRegistry};
use super::notebook::{Notebook, NotebookError};
use super::pipeline::{Pipeline, PipelineError};
use super::resources::Resources;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Notebook(#[from] NotebookError),

    #[error("preprocessing failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("unknown export format '{name}' (available: {available})")]
    UnknownFormat { name: String, available: String },
}

/// The result of converting one notebook.
#[derive(Debug)]
pub struct Conversion {
    /// The exported document text
    pub output: String,
    /// Resources after export, including extracted files
    pub resources: Resources,
}

/// Converts notebooks with a fixed configuration.
///
/// The pipeline and exporter are resolved once on construction; the same
/// converter is then used for every notebook of a run.
pub struct Converter {
    config: Config,
    pipeline: Pipeline,
    exporters: ExporterRegistry,
}

impl Converter {
    pub fn new(config: Config) -> Result<Self, ConvertError> {
        let converter = Self {
            pipeline: Pipeline::from_config(&config),
            exporters: ExporterRegistry::with_defaults(),
            config,
        };

        // Fail on an unknown format before any notebook is read
        converter.exporter()?;

        tracing::debug!(
            stages = ?converter.pipeline.stage_names(),
            format = %converter.config.export_format,
            "converter ready"
        );
        Ok(converter)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read, preprocess, and export a notebook file.
    pub async fn convert_file(&self, path: &Path) -> Result<Conversion, ConvertError> {
        let notebook = Notebook::load(path).await?;
        tracing::info!(path = %path.display(), cells = notebook.cells.len(), "loaded notebook");

        self.convert(notebook, Resources::for_path(path))
    }

    /// Preprocess and export an in-memory notebook.
    ///
    /// Any stage failure aborts the conversion; nothing is exported.
    pub fn convert(
        &self,
        mut notebook: Notebook,
        mut resources: Resources,
    ) -> Result<Conversion, ConvertError> {
        let exporter = self.exporter()?;
        resources.output_extension = exporter.extension().to_string();

        self.pipeline.run(&mut notebook, &mut resources)?;
        let output = exporter.export(&notebook, &mut resources)?;

        Ok(Conversion { output, resources })
    }

    fn exporter(&self) -> Result<&dyn Exporter, ConvertError> {
        let name = &self.config.export_format;
        self.exporters
            .get(name)
            .ok_or_else(|| ConvertError::UnknownFormat {
                name: name.clone(),
                available: self.exporters.names().join(", "),
            })
    }
}
