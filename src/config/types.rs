//! Configuration type definitions.
//!
//! This module contains the data structures of the `nbpost.yaml` file.
//! These types are pure data - no I/O. Every field has a default, so an
//! empty or missing file yields the standard blog-article setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for a conversion run.
///
/// Built once before conversion starts and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the exporter to use (`markdown` or `notebook`)
    pub export_format: String,
    /// Where converted files are written (defaults to each notebook's directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub tag_remove: TagRemoveConfig,
    pub remove_magic: RemoveMagicConfig,
    pub fix_link_break: FixLinkBreakConfig,
    pub article_metadata: ArticleMetadataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_format: default_export_format(),
            output_dir: None,
            tag_remove: TagRemoveConfig::default(),
            remove_magic: RemoveMagicConfig::default(),
            fix_link_break: FixLinkBreakConfig::default(),
            article_metadata: ArticleMetadataConfig::default(),
        }
    }
}

fn default_export_format() -> String {
    "markdown".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Stage configuration
// =============================================================================

/// Tag-based removal of cells, inputs, and outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRemoveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cells carrying any of these tags are deleted
    #[serde(default = "default_remove_cell_tags")]
    pub remove_cell_tags: Vec<String>,
    /// Code cells carrying any of these tags lose all their outputs
    #[serde(default = "default_remove_all_outputs_tags")]
    pub remove_all_outputs_tags: Vec<String>,
    /// Code cells carrying any of these tags are exported without their input
    #[serde(default)]
    pub remove_input_tags: Vec<String>,
    /// Individual outputs whose own metadata carries any of these tags are dropped
    #[serde(default)]
    pub remove_single_output_tags: Vec<String>,
}

impl Default for TagRemoveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_cell_tags: default_remove_cell_tags(),
            remove_all_outputs_tags: default_remove_all_outputs_tags(),
            remove_input_tags: Vec::new(),
            remove_single_output_tags: Vec::new(),
        }
    }
}

fn default_remove_cell_tags() -> Vec<String> {
    vec!["remove_cell".to_string()]
}

fn default_remove_all_outputs_tags() -> Vec<String> {
    vec!["remove_output".to_string()]
}

/// Stripping of a cell magic and the line after it from code cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMagicConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_magic_marker")]
    pub marker: String,
}

impl Default for RemoveMagicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            marker: default_magic_marker(),
        }
    }
}

fn default_magic_marker() -> String {
    "%%run_pytest".to_string()
}

/// Joining of link reference definitions broken across lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixLinkBreakConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for FixLinkBreakConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Front matter built from a notebook metadata mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleMetadataConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Notebook metadata key holding the article metadata
    #[serde(default = "default_metadata_key")]
    pub key: String,
}

impl Default for ArticleMetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key: default_metadata_key(),
        }
    }
}

fn default_metadata_key() -> String {
    "blog".to_string()
}
