//! Tests for the HTTP-facing adapters (page fetch + remote embedder)
//! against a local mock server.

use httpmock::prelude::*;
use serde_json::json;
use url::Url;

use pagesift::{Embedder, HttpEmbedder, PageParser, PipelineError, ScraperPageParser};

#[tokio::test]
async fn parser_fetches_and_extracts_blocks() {
    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET).path("/home/offers");
            then.status(200).header("content-type", "text/html").body(
                r#"<html><body>
                  <section class="rich-copy">
                    <h3>Loans</h3>
                    <p>Flexible terms for everyone.</p>
                  </section>
                  <article class="accordion-container">
                    <h2 class="accordion-toggle">Is it free?</h2>
                    <div class="accordion-content">Yes, entirely.</div>
                  </article>
                </body></html>"#,
            );
        })
        .await;

    let parser = ScraperPageParser::new(reqwest::Client::new());
    let url = Url::parse(&server.url("/home/offers")).unwrap();
    let blocks = parser.extract_text_blocks(&url).await.unwrap();

    page.assert_async().await;
    assert_eq!(
        blocks,
        vec![
            "Loans\nFlexible terms for everyone.",
            "Q: Is it free?\nA: Yes, entirely."
        ]
    );
}

#[tokio::test]
async fn parser_surfaces_http_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        })
        .await;

    let parser = ScraperPageParser::new(reqwest::Client::new());
    let url = Url::parse(&server.url("/missing")).unwrap();
    let err = parser.extract_text_blocks(&url).await.unwrap_err();
    assert!(matches!(err, PipelineError::Fetch(_)));
}

#[tokio::test]
async fn http_embedder_returns_the_singleton_vector() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .json_body_partial(r#"{"model": "test-embed", "input": "hello"}"#);
            then.status(200)
                .json_body(json!({ "data": [ { "embedding": [0.1, 0.2, 0.3, 0.4] } ] }));
        })
        .await;

    let endpoint = Url::parse(&server.url("/embeddings")).unwrap();
    let embedder = HttpEmbedder::new(reqwest::Client::new(), endpoint, "test-embed", 4);

    let vector = embedder.embed("hello").await.unwrap();
    mock.assert_async().await;
    assert_eq!(vector, vec![0.1, 0.2, 0.3, 0.4]);
    assert_eq!(embedder.dimensions(), 4);
}

#[tokio::test]
async fn http_embedder_rejects_multi_row_batches() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(200).json_body(json!({
                "data": [
                    { "embedding": [0.1, 0.2] },
                    { "embedding": [0.3, 0.4] }
                ]
            }));
        })
        .await;

    let endpoint = Url::parse(&server.url("/embeddings")).unwrap();
    let embedder = HttpEmbedder::new(reqwest::Client::new(), endpoint, "test-embed", 2);

    let err = embedder.embed("hello").await.unwrap_err();
    assert!(matches!(err, PipelineError::EmbeddingShape(_)));
}

#[tokio::test]
async fn http_embedder_rejects_unexpected_dimensionality() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(200)
                .json_body(json!({ "data": [ { "embedding": [0.1, 0.2] } ] }));
        })
        .await;

    let endpoint = Url::parse(&server.url("/embeddings")).unwrap();
    let embedder = HttpEmbedder::new(reqwest::Client::new(), endpoint, "test-embed", 8);

    let err = embedder.embed("hello").await.unwrap_err();
    assert!(matches!(err, PipelineError::Embedding(_)));
}
