//! detect_correction_intent Tool
//!
//! Tells the agent whether a user message asks to change or forget something,
//! so it can follow up with update_fact or delete_fact.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use mnemos_core::{CorrectionIntent, detect_correction_intent};

use super::parse_args;

/// Input schema for detect_correction_intent tool
pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "owner_id": {
                "type": "string",
                "description": "The user who sent the message"
            },
            "message": {
                "type": "string",
                "description": "The user message to classify"
            }
        },
        "required": ["owner_id", "message"]
    })
}

#[derive(Debug, Deserialize)]
struct CorrectionIntentArgs {
    owner_id: String,
    message: String,
}

pub async fn execute(args: Option<Value>) -> Result<Value, String> {
    let args: CorrectionIntentArgs = parse_args(args)?;

    let Some(found) = detect_correction_intent(&args.message) else {
        return Ok(serde_json::json!({ "isCorrection": false }));
    };
    debug!(owner_id = %args.owner_id, intent = %found.intent, "Correction intent detected");

    let suggested_tool = match found.intent {
        CorrectionIntent::Update => Some("update_fact"),
        CorrectionIntent::Delete => Some("delete_fact"),
        CorrectionIntent::Negation => None,
    };

    Ok(serde_json::json!({
        "isCorrection": true,
        "intent": found.intent,
        "matchedPattern": found.matched_pattern,
        "confidence": found.confidence,
        "suggestedTool": suggested_tool,
    }))
}
