//! Domain types for documents, queries, and responses

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ChunkSource, Document};
pub use query::QueryRequest;
pub use response::{Citation, QueryResponse, TopicSummary};
