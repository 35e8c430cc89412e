//! Test doubles and data factories

mod fixtures;
mod vector_store;

pub use fixtures::TestDataFactory;
pub use vector_store::MockVectorStore;
