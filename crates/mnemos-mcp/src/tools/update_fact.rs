//! update_fact Tool
//!
//! Explicit correction: store a new value for a subject and predicate,
//! replacing whatever was remembered before.

use serde::Deserialize;
use serde_json::Value;

use mnemos_core::UpdateFactRequest;

use super::{parse_args, user_error};
use crate::state::MemoryState;

/// Input schema for update_fact tool
pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "owner_id": {
                "type": "string",
                "description": "The user whose memory is being corrected"
            },
            "subject": {
                "type": "string",
                "description": "What the fact is about (e.g. 'dog', 'user')"
            },
            "predicate": {
                "type": "string",
                "description": "The relation (e.g. 'named', 'lives_in', 'favorite_color')"
            },
            "new_value": {
                "type": "string",
                "description": "The correct value"
            },
            "old_value": {
                "type": "string",
                "description": "The wrong value being replaced, if known"
            },
            "reason": {
                "type": "string",
                "description": "Why the fact is being corrected"
            }
        },
        "required": ["owner_id", "subject", "predicate", "new_value", "reason"]
    })
}

#[derive(Debug, Deserialize)]
struct UpdateFactArgs {
    owner_id: String,
    subject: String,
    predicate: String,
    new_value: String,
    old_value: Option<String>,
    reason: String,
}

pub async fn execute(state: &MemoryState, args: Option<Value>) -> Result<Value, String> {
    let args: UpdateFactArgs = parse_args(args)?;

    let request = UpdateFactRequest {
        subject: args.subject,
        predicate: args.predicate,
        new_value: args.new_value,
        old_value: args.old_value,
        reason: args.reason,
    };

    let outcome = state
        .gateway
        .update_fact(&args.owner_id, &request)
        .map_err(|e| user_error("update_fact", e))?;

    serde_json::to_value(outcome).map_err(|e| e.to_string())
}
