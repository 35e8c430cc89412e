//! # MCP Protocol Tests
//!
//! A full client session over the stdio transport: handshake, tool listing,
//! then a correction conversation. Facts must land in the SQLite file.

use mnemos_core::FactStore;
use mnemos_e2e_tests::harness::TestDatabaseManager;
use mnemos_mcp::protocol::stdio::StdioTransport;
use mnemos_mcp::server::McpServer;
use mnemos_mcp::state::MemoryState;
use serde_json::{Value, json};

fn line(id: Option<i64>, method: &str, params: Value) -> String {
    let mut request = json!({ "jsonrpc": "2.0", "method": method, "params": params });
    if let Some(id) = id {
        request["id"] = json!(id);
    }
    format!("{}\n", request)
}

fn tool_call(id: i64, name: &str, arguments: Value) -> String {
    line(Some(id), "tools/call", json!({ "name": name, "arguments": arguments }))
}

async fn run_session(db: &TestDatabaseManager, input: String) -> Vec<Value> {
    let server = McpServer::new(MemoryState::new(db.fact_store()));
    let mut output = Vec::new();
    StdioTransport::new()
        .run_with(server, input.as_bytes(), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_full_correction_session() {
    let db = TestDatabaseManager::new_temp();

    let mut input = String::new();
    input += &line(Some(1), "initialize", json!({ "protocolVersion": "2025-03-26" }));
    input += &line(None, "notifications/initialized", json!({}));
    input += &line(Some(2), "tools/list", json!({}));
    input += &tool_call(
        3,
        "ingest_message",
        json!({ "owner_id": "u1", "text": "My dog is named Rex. I live in Boston." }),
    );
    input += &tool_call(
        4,
        "detect_correction_intent",
        json!({ "owner_id": "u1", "message": "Actually his name is Max" }),
    );
    input += &tool_call(
        5,
        "update_fact",
        json!({
            "owner_id": "u1",
            "subject": "dog",
            "predicate": "named",
            "new_value": "Max",
            "old_value": "Rex",
            "reason": "user said the name is Max"
        }),
    );
    input += &tool_call(
        6,
        "delete_fact",
        json!({
            "owner_id": "u1",
            "subject": "user",
            "predicate": "lives_in",
            "reason": "user asked to forget where they live"
        }),
    );
    input += &tool_call(7, "search_facts", json!({ "owner_id": "u1", "subject": "dog" }));

    let responses = run_session(&db, input).await;

    // the initialized notification produces no line
    assert_eq!(responses.len(), 7);
    let ids: Vec<i64> = responses.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);

    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "mnemos");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 5);

    let ingested = tool_payload(&responses[2]);
    assert_eq!(ingested["factCount"], 2);

    let intent = tool_payload(&responses[3]);
    assert_eq!(intent["intent"], "update");
    assert_eq!(intent["suggestedTool"], "update_fact");

    let updated = tool_payload(&responses[4]);
    assert_eq!(updated["success"], true);
    assert_eq!(updated["previousValue"], "Rex");

    let deleted = tool_payload(&responses[5]);
    assert_eq!(deleted["deletedCount"], 1);

    let found = tool_payload(&responses[6]);
    assert_eq!(found["count"], 1);
    assert_eq!(found["facts"][0]["object"], "Max");

    // persisted, not just held by the server
    let reopened = db.reopen();
    let facts = reopened.query("u1", None).unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].object, "Max");
}

#[tokio::test]
async fn test_tool_call_before_initialize_rejected() {
    let db = TestDatabaseManager::new_temp();
    let input = tool_call(1, "search_facts", json!({ "owner_id": "u1", "subject": "dog" }));

    let responses = run_session(&db, input).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["error"]["code"], -32003);
}

#[tokio::test]
async fn test_schemas_require_owner() {
    let db = TestDatabaseManager::new_temp();
    let mut input = line(Some(1), "initialize", json!({}));
    input += &line(Some(2), "tools/list", json!({}));

    let responses = run_session(&db, input).await;
    for tool in responses[1]["result"]["tools"].as_array().unwrap() {
        let required = tool["inputSchema"]["required"].as_array().unwrap();
        assert!(
            required.contains(&json!("owner_id")),
            "{} must require owner_id",
            tool["name"]
        );
    }
}

#[tokio::test]
async fn test_correction_schemas_over_the_wire() {
    let db = TestDatabaseManager::new_temp();
    let mut input = line(Some(1), "initialize", json!({}));
    input += &line(Some(2), "tools/list", json!({}));

    let responses = run_session(&db, input).await;
    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    let schema_of = |name: &str| {
        tools
            .iter()
            .find(|t| t["name"] == name)
            .map(|t| t["inputSchema"].clone())
            .unwrap()
    };

    let expected = [
        (
            "update_fact",
            vec!["new_value", "old_value", "owner_id", "predicate", "reason", "subject"],
            json!(["owner_id", "subject", "predicate", "new_value", "reason"]),
        ),
        (
            "delete_fact",
            vec!["owner_id", "predicate", "reason", "subject", "value"],
            json!(["owner_id", "subject", "reason"]),
        ),
        (
            "search_facts",
            vec!["owner_id", "predicate", "subject"],
            json!(["owner_id", "subject"]),
        ),
    ];

    for (name, properties, required) in expected {
        let schema = schema_of(name);
        let mut keys: Vec<&str> = schema["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, properties, "{} properties", name);
        for key in keys {
            assert_eq!(schema["properties"][key]["type"], "string", "{}.{}", name, key);
        }
        assert_eq!(schema["required"], required, "{} required", name);
    }
}
