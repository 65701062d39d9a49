//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions or computations.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handler.rs` - The `ToolHandler` trait every tool implements
//! - `registry.rs` - Ordered tool registry, discovery and dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define the params struct and implement `ToolHandler`
//! 3. Export it in `definitions/mod.rs`
//! 4. Register it in `ToolRegistry::with_builtin_tools()`

pub mod definitions;
mod error;
pub mod handler;
mod registry;

pub use error::ToolError;
pub use handler::ToolHandler;
pub use registry::ToolRegistry;
