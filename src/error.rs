use rmcp::ErrorData as McpError;
use thiserror::Error;

use crate::client::ApiError;

/// Error taxonomy surfaced by every tool and resource handler.
#[derive(Debug, Error)]
pub enum PorkbunError {
    #[error("server is running in read-only mode; restart with --get-muddy to enable write operations")]
    ReadOnly,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to {operation}: {source}")]
    Upstream {
        operation: String,
        #[source]
        source: ApiError,
    },
}

impl PorkbunError {
    /// Wraps an upstream client error with the attempted operation and target,
    /// for use with `map_err`.
    pub fn upstream(operation: impl Into<String>) -> impl FnOnce(ApiError) -> Self {
        let operation = operation.into();
        move |source| Self::Upstream { operation, source }
    }
}

impl From<PorkbunError> for McpError {
    fn from(err: PorkbunError) -> Self {
        let message = err.to_string();
        match err {
            PorkbunError::ReadOnly => {
                tracing::warn!("blocked write operation: {message}");
                McpError::invalid_request(message, None)
            }
            PorkbunError::NotFound(_) | PorkbunError::InvalidInput(_) => {
                McpError::invalid_params(message, None)
            }
            PorkbunError::Upstream { .. } => {
                tracing::warn!("upstream error: {message}");
                McpError::internal_error(message, None)
            }
        }
    }
}
