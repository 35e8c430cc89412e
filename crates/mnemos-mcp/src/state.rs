//! Shared server state
//!
//! One fact store behind both the correction gateway and the ingestion
//! pipeline, so facts written by either path are visible to the other.

use std::sync::Arc;

use mnemos_core::{FactIngestor, FactStore, MemoryCorrectionGateway};

/// Services the MCP tools call into
pub struct MemoryState {
    pub gateway: MemoryCorrectionGateway,
    pub ingestor: FactIngestor,
}

impl MemoryState {
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self {
            gateway: MemoryCorrectionGateway::new(Arc::clone(&store)),
            ingestor: FactIngestor::new(store),
        }
    }
}
