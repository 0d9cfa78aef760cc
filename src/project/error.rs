use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Project description not found: {path}")]
    DescriptionNotFound { path: String },

    #[error("Failed to parse project description {path}: {source}")]
    DescriptionParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Source root directory not found: {path}")]
    SourceRootNotFound { path: String },
}
