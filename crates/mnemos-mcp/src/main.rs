//! Mnemos MCP Server
//!
//! Lets a tool-calling agent correct what Mnemos remembers about a user:
//! update a wrong fact, forget one, or look up what is stored. Messages can
//! also be fed through fact extraction directly.
//!
//! Speaks JSON-RPC over stdio. Logs go to stderr, filtered by `RUST_LOG`.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use mnemos_core::SqliteFactStore;
use mnemos_mcp::protocol::stdio::StdioTransport;
use mnemos_mcp::server::McpServer;
use mnemos_mcp::state::MemoryState;

/// Database file created inside `--data-dir`
const DB_FILE: &str = "mnemos.db";

#[derive(Debug, Parser)]
#[command(name = "mnemos-mcp", version, about = "Mnemos memory correction server (MCP over stdio)")]
struct Args {
    /// Custom data directory (defaults to the platform data directory)
    #[arg(long, env = "MNEMOS_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse before logging init so --help/--version print cleanly
    let args = Args::parse();

    // stdout is reserved for JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    info!("Mnemos MCP Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let db_path = args.data_dir.map(|dir| dir.join(DB_FILE));
    let store = SqliteFactStore::new(db_path).context("failed to open fact store")?;
    info!(path = %store.path().display(), "Fact store initialized");

    let server = McpServer::new(MemoryState::new(Arc::new(store)));

    info!("Starting MCP server on stdio...");
    StdioTransport::new()
        .run(server)
        .await
        .context("stdio transport failed")?;

    info!("Mnemos MCP Server shutting down");
    Ok(())
}
