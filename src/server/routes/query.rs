//! Query endpoint: retrieve-then-generate with citations

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::generation::{extract_and_link_citations, PromptBuilder};
use crate::server::state::AppState;
use crate::types::{
    query::QueryRequest,
    response::{Citation, QueryResponse},
};

/// POST /api/query - Answer a question from the selected topic's document
pub async fn query_topic(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();

    tracing::info!("Query on '{}': \"{}\"", request.topic, request.question);

    // Resolve the topic and make sure its index exists (builds on first use)
    let topic_index = state.registry().ensure_loaded(&request.topic).await?;

    let top_k = request.top_k.unwrap_or(state.config().retrieval.top_k);
    let threshold = request
        .similarity_threshold
        .unwrap_or(state.config().retrieval.similarity_threshold);

    // Cached answer for this (topic, question)?
    if let Some(cached) = state.cache().get(&request.topic, &request.question) {
        let mut response = QueryResponse::new(
            cached.answer,
            cached.citations,
            start.elapsed().as_millis() as u64,
        );
        response.from_cache = true;
        response.session_id = Some(state.sessions().record_turn(
            request.session_id,
            &request.topic,
            &request.question,
            &response.answer,
        ));
        return Ok(Json(response));
    }

    // Embed the question and retrieve the most similar chunks
    let query_embedding = state.embedder().embed(&request.question).await?;

    let mut search_results = topic_index.index.search(&query_embedding, top_k * 2)?;
    let retrieved = search_results.len();
    search_results.retain(|r| r.similarity >= threshold);
    search_results.truncate(top_k);

    if search_results.is_empty() {
        let mut response = QueryResponse::not_found(start.elapsed().as_millis() as u64);
        response.session_id = Some(state.sessions().record_turn(
            request.session_id,
            &request.topic,
            &request.question,
            &response.answer,
        ));
        return Ok(Json(response));
    }

    // Citations carry the snippets shown alongside the answer
    let mut citations: Vec<Citation> = search_results
        .iter()
        .map(|r| {
            let mut citation = Citation::from_chunk(&r.chunk, r.similarity);
            let terms: Vec<&str> = request.question.split_whitespace().collect();
            citation.highlight_terms(&terms);
            citation
        })
        .collect();

    let context = PromptBuilder::build_context(&search_results);

    let answer = state
        .llm()
        .generate_answer(&request.question, &context, &citations)
        .await?;

    let (clean_answer, linked_citations) = extract_and_link_citations(&answer, &mut citations);

    let processing_time_ms = start.elapsed().as_millis() as u64;

    let mut response = QueryResponse::new(
        clean_answer.clone(),
        linked_citations.clone(),
        processing_time_ms,
    );
    response.chunks_retrieved = retrieved;
    response.chunks_used = linked_citations.len();

    state.cache().put(
        &request.topic,
        &request.question,
        clean_answer.clone(),
        linked_citations,
    );

    response.session_id = Some(state.sessions().record_turn(
        request.session_id,
        &request.topic,
        &request.question,
        &clean_answer,
    ));

    if request.include_chunks {
        response.raw_chunks = Some(search_results.into_iter().map(|r| r.chunk).collect());
    }

    tracing::info!(
        "Query completed in {}ms, {} citations",
        processing_time_ms,
        response.citations.len()
    );

    Ok(Json(response))
}
