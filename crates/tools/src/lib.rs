//! finData tool exposure layer.
//!
//! Turns the operations of the selected provider module into tools callable
//! over the Model Context Protocol:
//! - [`ToolRegistry`]: explicit registration of a module's operation table
//! - [`ToolDescriptor`]: name, schema and handler of one tool
//! - [`McpHandler`]: JSON-RPC dispatch used by every transport

pub mod error;
pub mod protocol;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use error::ToolError;
pub use protocol::{McpHandler, Response, RpcError};
pub use registry::{ToolDefinition, ToolDescriptor, ToolRegistry, DEFAULT_CALL_TIMEOUT};
