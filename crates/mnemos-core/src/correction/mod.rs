//! Explicit memory corrections
//!
//! [`MemoryCorrectionGateway`] is the write path for corrections issued by an
//! agent; [`detect_correction_intent`] decides whether a raw user message should
//! be routed there at all.

mod gateway;
mod intent;

pub use gateway::{
    CORRECTION_CONFIDENCE, DeleteFactRequest, DeleteOutcome, DeleteScope, FactSearchOutcome,
    MemoryCorrectionGateway, UpdateFactRequest, UpdateOutcome,
};
pub use intent::{CorrectionIntent, CorrectionIntentMatch, detect_correction_intent};
