//! MCP (Model Context Protocol) server for azdo-tools.
//!
//! Exposes Azure DevOps changesets, builds, pipelines, git repositories and
//! pull requests as MCP tools over stdio.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use handlers::ToolHandler;
pub use protocol::{ToolCallResult, ToolDefinition};
pub use server::McpServer;
pub use tools::{ToolCategory, ToolRegistry, ToolSpec};
