//! enrollease: document-grounded Q&A over a fixed set of admissions PDFs
//!
//! A user picks one of several fixed documents (college information, admission
//! process, cutoffs, seat matrix, fee structure). The document is parsed,
//! chunked, embedded, and indexed; free-text questions are answered by
//! retrieving the most similar chunks and prompting an LLM that is constrained
//! to the retrieved context.

pub mod cache;
pub mod chat;
pub mod config;
pub mod corpus;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, ChunkSource, Document},
    query::QueryRequest,
    response::{Citation, QueryResponse},
};
