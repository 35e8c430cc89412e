//! search_facts Tool

use serde::Deserialize;
use serde_json::Value;

use super::{parse_args, user_error};
use crate::state::MemoryState;

/// Input schema for search_facts tool
pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "owner_id": {
                "type": "string",
                "description": "The user whose memory is searched"
            },
            "subject": {
                "type": "string",
                "description": "What the facts are about"
            },
            "predicate": {
                "type": "string",
                "description": "Only return facts with this relation"
            }
        },
        "required": ["owner_id", "subject"]
    })
}

#[derive(Debug, Deserialize)]
struct SearchFactsArgs {
    owner_id: String,
    subject: String,
    predicate: Option<String>,
}

pub async fn execute(state: &MemoryState, args: Option<Value>) -> Result<Value, String> {
    let args: SearchFactsArgs = parse_args(args)?;

    let outcome = state
        .gateway
        .search_facts(&args.owner_id, &args.subject, args.predicate.as_deref())
        .map_err(|e| user_error("search_facts", e))?;

    serde_json::to_value(outcome).map_err(|e| e.to_string())
}
