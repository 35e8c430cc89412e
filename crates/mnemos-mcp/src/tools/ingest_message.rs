//! ingest_message Tool
//!
//! Runs a conversation message through fact extraction and conflict
//! detection, storing what it finds.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_args, user_error};
use crate::state::MemoryState;

/// Input schema for ingest_message tool
pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "owner_id": {
                "type": "string",
                "description": "The user who sent the message"
            },
            "text": {
                "type": "string",
                "description": "The message text to extract facts from"
            }
        },
        "required": ["owner_id", "text"]
    })
}

#[derive(Debug, Deserialize)]
struct IngestMessageArgs {
    owner_id: String,
    text: String,
}

pub async fn execute(state: &MemoryState, args: Option<Value>) -> Result<Value, String> {
    let args: IngestMessageArgs = parse_args(args)?;

    if args.owner_id.trim().is_empty() {
        return Err("owner_id is required".to_string());
    }

    let report = state
        .ingestor
        .ingest(&args.text, &args.owner_id)
        .map_err(|e| user_error("ingest_message", e))?;

    Ok(serde_json::json!({
        "factCount": report.facts.len(),
        "conflictCount": report.conflicts.len(),
        "facts": report.facts,
        "conflicts": report.conflicts,
        "ingestedAt": Utc::now().to_rfc3339(),
    }))
}
