//! delete_fact Tool
//!
//! Forget facts about a subject. Scope narrows with the optional predicate and
//! value: value only, every value of a predicate, or the whole subject.

use serde::Deserialize;
use serde_json::Value;

use mnemos_core::DeleteFactRequest;

use super::{parse_args, user_error};
use crate::state::MemoryState;

/// Input schema for delete_fact tool
pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "owner_id": {
                "type": "string",
                "description": "The user whose memory is being edited"
            },
            "subject": {
                "type": "string",
                "description": "What the facts are about"
            },
            "predicate": {
                "type": "string",
                "description": "Only forget facts with this relation"
            },
            "value": {
                "type": "string",
                "description": "Only forget facts carrying this value"
            },
            "reason": {
                "type": "string",
                "description": "Why the facts are being forgotten"
            }
        },
        "required": ["owner_id", "subject", "reason"]
    })
}

#[derive(Debug, Deserialize)]
struct DeleteFactArgs {
    owner_id: String,
    subject: String,
    predicate: Option<String>,
    value: Option<String>,
    reason: String,
}

pub async fn execute(state: &MemoryState, args: Option<Value>) -> Result<Value, String> {
    let args: DeleteFactArgs = parse_args(args)?;

    let request = DeleteFactRequest {
        subject: args.subject,
        predicate: args.predicate,
        value: args.value,
        reason: args.reason,
    };

    let outcome = state
        .gateway
        .delete_fact(&args.owner_id, &request)
        .map_err(|e| user_error("delete_fact", e))?;

    serde_json::to_value(outcome).map_err(|e| e.to_string())
}
