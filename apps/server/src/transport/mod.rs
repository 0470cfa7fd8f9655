//! Transports carrying MCP messages between a client and the [`McpHandler`].
//!
//! [`McpHandler`]: findata_tools::McpHandler

pub mod sse;
pub mod stdio;
