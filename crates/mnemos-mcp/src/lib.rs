//! Mnemos MCP Server Library
//!
//! Exposes the memory correction gateway and fact ingestion to agents over
//! the Model Context Protocol.

pub mod protocol;
pub mod server;
pub mod state;
pub mod tools;
