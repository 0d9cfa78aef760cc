use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildParserError {
    #[error("Invalid {dialect} diagnostic pattern: {source}")]
    Pattern {
        dialect: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid progress pattern: {0}")]
    ProgressPattern(#[source] regex::Error),
}
