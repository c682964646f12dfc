//! Qdrant REST adapter

pub mod index;
pub mod protocol;

pub use index::QdrantIndex;
