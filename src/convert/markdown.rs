//! Markdown export.
//!
//! Serializes a processed notebook into a single markdown article: markdown
//! cells verbatim, code cells as fenced blocks, and stored outputs after
//! the code that produced them. Image outputs are extracted into the
//! resources and linked from the article.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::convert::export::{ExportError, Exporter};
use crate::convert::notebook::{MimeBundle, bundle_text};
use crate::convert::{Cell, Notebook, Output, Resources};
use crate::util::{indent, strip_ansi};

/// Indent for text outputs, which renders them as code blocks.
const OUTPUT_INDENT: &str = "    ";

/// MIME types a rich output is rendered as, in order of preference.
const DISPLAY_PRIORITY: &[&str] = &[
    "text/html",
    "text/markdown",
    "image/svg+xml",
    "text/latex",
    "image/png",
    "image/jpeg",
    "text/plain",
];

/// Markdown format implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extension(&self) -> &'static str {
        ".md"
    }

    fn export(
        &self,
        notebook: &Notebook,
        resources: &mut Resources,
    ) -> Result<String, ExportError> {
        let language = notebook.language().unwrap_or_default();
        let mut blocks: Vec<String> = Vec::new();

        for (cell_index, cell) in notebook.cells.iter().enumerate() {
            match cell {
                Cell::Markdown(_) | Cell::Raw(_) => push_block(&mut blocks, cell.source()),
                Cell::Code(code) => {
                    if !code.hide_input && !code.source.trim().is_empty() {
                        blocks.push(format!("```{language}\n{}\n```", code.source.trim_end()));
                    }

                    for (output_index, output) in code.outputs.iter().enumerate() {
                        if let Some(block) =
                            render_output(output, cell_index, output_index, resources)?
                        {
                            push_block(&mut blocks, &block);
                        }
                    }
                }
            }
        }

        let mut markdown = blocks.join("\n\n");
        markdown.push('\n');
        Ok(markdown)
    }
}

/// Add a block unless it is blank.
fn push_block(blocks: &mut Vec<String>, block: &str) {
    if !block.trim().is_empty() {
        blocks.push(block.to_string());
    }
}

fn render_output(
    output: &Output,
    cell_index: usize,
    output_index: usize,
    resources: &mut Resources,
) -> Result<Option<String>, ExportError> {
    match output {
        Output::Stream { text, .. } => Ok(Some(indent(text.trim_end(), OUTPUT_INDENT))),
        Output::DisplayData { data, .. } | Output::ExecuteResult { data, .. } => {
            render_data(data, cell_index, output_index, resources)
        }
        Output::Error { traceback, .. } => Ok(Some(indent(
            &strip_ansi(&traceback.join("\n")),
            OUTPUT_INDENT,
        ))),
    }
}

/// Render the preferred representation of a MIME bundle.
fn render_data(
    data: &MimeBundle,
    cell_index: usize,
    output_index: usize,
    resources: &mut Resources,
) -> Result<Option<String>, ExportError> {
    let Some(mime) = DISPLAY_PRIORITY.iter().copied().find(|m| data.contains_key(*m)) else {
        return Ok(None);
    };
    let text = bundle_text(data, mime).unwrap_or_default();

    let extension = match mime {
        "text/html" | "text/markdown" | "text/latex" => {
            return Ok(Some(text.trim_end().to_string()));
        }
        "text/plain" => return Ok(Some(indent(text.trim_end(), OUTPUT_INDENT))),
        "image/svg+xml" => "svg",
        "image/png" => "png",
        _ => "jpeg",
    };

    let bytes = if mime == "image/svg+xml" {
        text.into_bytes()
    } else {
        // nbformat may wrap base64 payloads across lines
        let payload: String = text.split_whitespace().collect();
        STANDARD
            .decode(payload)
            .map_err(|source| ExportError::Image {
                mime: mime.to_string(),
                cell: cell_index,
                source,
            })?
    };

    let file_name = format!(
        "{}/output_{cell_index}_{output_index}.{extension}",
        resources.output_files_dir
    );
    tracing::debug!(file = %file_name, bytes = bytes.len(), "extracted output");
    resources.outputs.insert(file_name.clone(), bytes);

    Ok(Some(format!("![{extension}]({file_name})")))
}
