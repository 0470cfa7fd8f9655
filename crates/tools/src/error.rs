//! Tool layer error types.

use findata_market_data::MarketDataError;
use thiserror::Error;

/// Errors raised while registering or invoking tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Two operations share a name.
    #[error("Tool already registered: {0}")]
    Duplicate(String),

    /// Arguments are not a JSON object.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The call did not finish within the configured timeout.
    #[error("Tool {name} timed out after {seconds}s")]
    Timeout { name: String, seconds: u64 },

    /// The operation itself failed.
    #[error("{0}")]
    Failed(#[from] MarketDataError),
}

impl ToolError {
    /// Error code for programmatic handling in logs and responses.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::NotFound(_) => "TOOL_NOT_FOUND",
            ToolError::Duplicate(_) => "TOOL_DUPLICATE",
            ToolError::InvalidArguments(_) => "TOOL_INVALID_ARGUMENTS",
            ToolError::Timeout { .. } => "TOOL_TIMEOUT",
            ToolError::Failed(_) => "TOOL_EXECUTION_FAILED",
        }
    }
}
