use mcp_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    /// The page does not have the expected shape, or a heading cannot be turned into a slug.
    #[error("structural extraction error: {0}")]
    Structure(String),

    /// The dataset file does not match the expected schema.
    #[error("dataset validation error: {0}")]
    Validation(String),
}
