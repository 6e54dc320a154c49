//! Q&A server binary
//!
//! Run with: cargo run --bin enrollease-server

use std::path::PathBuf;

use enrollease::config::{AppConfig, LlmBackend};
use enrollease::server::QaServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env carries GROQ_API_KEY during development
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enrollease=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("ENROLLEASE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("enrollease.toml"));
    let config = AppConfig::load_or_default(&config_path)?;

    tracing::info!("Configuration loaded from {}", config_path.display());
    tracing::info!("  - Document dir: {}", config.corpus.document_dir.display());
    tracing::info!("  - Topics: {}", config.corpus.topics.len());
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Embedding model: {}", config.llm.ollama.embed_model);
    match config.llm.backend {
        LlmBackend::Groq => tracing::info!("  - LLM: groq ({})", config.llm.groq.model),
        LlmBackend::Ollama => {
            tracing::info!("  - LLM: ollama ({})", config.llm.ollama.generate_model)
        }
    }

    // Ollama serves embeddings regardless of the answer backend
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.ollama.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.ollama.base_url);
            tracing::warn!("Embeddings will fail until it is started:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!("  2. Pull the embedding model: ollama pull nomic-embed-text");
        }
    }

    let server = QaServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  GET  /api/topics          - List topics");
    println!("  POST /api/topics/:key/load - Build a topic index");
    println!("  POST /api/query           - Ask a question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
