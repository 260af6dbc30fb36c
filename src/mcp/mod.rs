//! MCP (Model Context Protocol) implementation.

pub mod format;
mod handlers;
pub mod resources;
pub mod server;
mod tools;

pub use resources::{ResourceRouter, ResourceUri};
pub use server::McpServer;
pub use tools::{Tool, ToolHandler, ToolRegistry};
