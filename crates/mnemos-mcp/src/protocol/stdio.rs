//! stdio Transport for MCP
//!
//! Newline-delimited JSON-RPC over stdin/stdout. stdout carries protocol
//! traffic only; logs go to stderr.

use std::io::{self, BufRead, Write};
use tracing::{debug, error, warn};

use super::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::server::McpServer;

/// Written when a response cannot be serialized, so the client doesn't hang
const FALLBACK_ERROR: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// stdio Transport for MCP server
#[derive(Debug, Default)]
pub struct StdioTransport;

impl StdioTransport {
    pub fn new() -> Self {
        Self
    }

    /// Run the MCP server over the process's stdin and stdout
    pub async fn run(self, server: McpServer) -> Result<(), io::Error> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(server, stdin.lock(), stdout.lock()).await
    }

    /// Serve requests from `reader` until EOF, writing one response line per request
    pub async fn run_with<R: BufRead, W: Write>(
        self,
        mut server: McpServer,
        reader: R,
        mut writer: W,
    ) -> Result<(), io::Error> {
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {} bytes", line.len());

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => server.handle_request(request).await,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()))
                }
            };

            if let Some(response) = response {
                write_response(&mut writer, &response)?;
            }
        }

        Ok(())
    }
}

fn write_response<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), io::Error> {
    match serde_json::to_string(response) {
        Ok(response_json) => {
            debug!("Sending: {} bytes", response_json.len());
            writeln!(writer, "{}", response_json)?;
        }
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            writeln!(writer, "{}", FALLBACK_ERROR)?;
        }
    }
    writer.flush()
}
