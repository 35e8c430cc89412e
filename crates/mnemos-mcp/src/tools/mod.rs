//! MCP Tools
//!
//! Each tool module exposes `schema()` for `tools/list` and `execute()` for
//! `tools/call`. Every tool is scoped by a required `owner_id`.

pub mod correction_intent;
pub mod delete_fact;
pub mod ingest_message;
pub mod search_facts;
pub mod update_fact;

use mnemos_core::MemoryError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode tool arguments, mapping failures to the tool error text
pub(crate) fn parse_args<T: DeserializeOwned>(args: Option<Value>) -> Result<T, String> {
    match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("Invalid arguments: {}", e)),
        None => Err("Missing arguments".to_string()),
    }
}

/// Log the full error and return only what is safe to show the user
pub(crate) fn user_error(tool: &str, err: MemoryError) -> String {
    warn!(tool, error = %err, "Tool call failed");
    err.user_message()
}
