//! MCP Server Core
//!
//! Routes JSON-RPC requests to the memory correction tools.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::protocol::messages::{
    CallToolRequest, CallToolResult, InitializeRequest, InitializeResult, ListToolsResult,
    ServerCapabilities, ServerInfo, ToolDescription,
};
use crate::protocol::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_VERSION};
use crate::state::MemoryState;
use crate::tools;

/// MCP Server implementation
pub struct McpServer {
    state: Arc<MemoryState>,
    initialized: bool,
}

impl McpServer {
    pub fn new(state: MemoryState) -> Self {
        Self {
            state: Arc::new(state),
            initialized: false,
        }
    }

    /// Handle an incoming JSON-RPC request; notifications get no response
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Handling request: {}", request.method);
        let is_notification = request.is_notification();

        if !self.initialized
            && request.method != "initialize"
            && request.method != "notifications/initialized"
        {
            warn!("Rejecting request '{}': server not initialized", request.method);
            if is_notification {
                return None;
            }
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::server_not_initialized(),
            ));
        }

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params).await,
            "notifications/initialized" => return None,
            "tools/list" => self.handle_tools_list().await,
            "tools/call" => self.handle_tools_call(request.params).await,
            "ping" => Ok(serde_json::json!({})),
            method => {
                warn!("Unknown method: {}", method);
                Err(JsonRpcError::method_not_found())
            }
        };

        if is_notification {
            return None;
        }

        Some(match result {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => JsonRpcResponse::error(request.id, error),
        })
    }

    async fn handle_initialize(
        &mut self,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, JsonRpcError> {
        let request: InitializeRequest = match params {
            Some(p) => serde_json::from_value(p)
                .map_err(|e| JsonRpcError::invalid_params(&e.to_string()))?,
            None => InitializeRequest::default(),
        };

        // Older clients reject a newer protocol version, so answer with theirs
        let negotiated_version = if request.protocol_version.as_str() < MCP_VERSION {
            info!(
                "Client requested older protocol version {}, using it",
                request.protocol_version
            );
            request.protocol_version.clone()
        } else {
            MCP_VERSION.to_string()
        };

        self.initialized = true;
        info!("MCP session initialized with protocol version {}", negotiated_version);

        let result = InitializeResult {
            protocol_version: negotiated_version,
            server_info: ServerInfo {
                name: "mnemos".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some({
                    let mut map = HashMap::new();
                    map.insert("listChanged".to_string(), serde_json::json!(false));
                    map
                }),
            },
            instructions: Some(
                "Mnemos remembers facts users state about themselves. When a user says a \
                 remembered fact is wrong, call update_fact with the corrected value. When they \
                 ask you to forget something, call delete_fact. Use search_facts to check what is \
                 stored before answering personal questions."
                    .to_string(),
            ),
        };

        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(&e.to_string()))
    }

    async fn handle_tools_list(&self) -> Result<serde_json::Value, JsonRpcError> {
        let tools = vec![
            // ================================================================
            // CORRECTIONS
            // ================================================================
            ToolDescription {
                name: "update_fact".to_string(),
                description: Some("Correct a remembered fact. Stores new_value for the subject and predicate, replacing the previous value. Pass old_value when the user names the wrong value.".to_string()),
                input_schema: tools::update_fact::schema(),
            },
            ToolDescription {
                name: "delete_fact".to_string(),
                description: Some("Forget facts about a subject. Narrow with predicate and/or value; with neither, every fact about the subject is forgotten.".to_string()),
                input_schema: tools::delete_fact::schema(),
            },
            ToolDescription {
                name: "search_facts".to_string(),
                description: Some("Look up what is remembered about a subject, optionally for one predicate.".to_string()),
                input_schema: tools::search_facts::schema(),
            },
            // ================================================================
            // INGESTION
            // ================================================================
            ToolDescription {
                name: "ingest_message".to_string(),
                description: Some("Extract facts from a user message and remember them. Reports any stored facts the message contradicted.".to_string()),
                input_schema: tools::ingest_message::schema(),
            },
            ToolDescription {
                name: "detect_correction_intent".to_string(),
                description: Some("Classify a user message as an update, delete or negation request, and suggest the tool to follow up with.".to_string()),
                input_schema: tools::correction_intent::schema(),
            },
        ];

        let result = ListToolsResult { tools };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(&e.to_string()))
    }

    async fn handle_tools_call(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, JsonRpcError> {
        let request: CallToolRequest = match params {
            Some(p) => serde_json::from_value(p)
                .map_err(|e| JsonRpcError::invalid_params(&e.to_string()))?,
            None => return Err(JsonRpcError::invalid_params("Missing tool call parameters")),
        };

        let state = &self.state;
        let result = match request.name.as_str() {
            "update_fact" => tools::update_fact::execute(state, request.arguments).await,
            "delete_fact" => tools::delete_fact::execute(state, request.arguments).await,
            "search_facts" => tools::search_facts::execute(state, request.arguments).await,
            "ingest_message" => tools::ingest_message::execute(state, request.arguments).await,
            "detect_correction_intent" => {
                tools::correction_intent::execute(request.arguments).await
            }
            name => {
                warn!("Unknown tool: {}", name);
                return Err(JsonRpcError::unknown_tool(name));
            }
        };

        let response = match result {
            Ok(content) => CallToolResult::json(&content),
            Err(message) => {
                debug!(tool = %request.name, "Tool returned error: {}", message);
                CallToolResult::error(&message)
            }
        };

        serde_json::to_value(response).map_err(|e| JsonRpcError::internal_error(&e.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
