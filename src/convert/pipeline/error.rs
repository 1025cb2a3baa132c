//! Pipeline error types.

/// Errors that can occur during pipeline processing.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("notebook metadata has no '{0}' entry")]
    MissingMetadata(String),

    #[error("notebook metadata '{key}' must be a mapping, found {found}")]
    InvalidMetadata { key: String, found: &'static str },

    #[error("failed to serialize front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}
