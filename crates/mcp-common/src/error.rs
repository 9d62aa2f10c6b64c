/// Error types shared across MCP server crates.
///
/// These errors represent failures in infrastructure components (file I/O, JSON encoding,
/// transports) that are common to multiple MCP servers. Application-specific errors should be
/// defined in each server crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),
}
