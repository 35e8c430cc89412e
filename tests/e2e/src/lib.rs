//! Mnemos end-to-end test support
//!
//! - `harness`: isolated SQLite fact stores in temporary directories
//! - `mocks`: an in-memory multi-space vector store and record factories

pub mod harness;
pub mod mocks;
