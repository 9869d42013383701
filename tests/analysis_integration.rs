use httpmock::prelude::*;
use property_scout::analysis::{AnalysisError, AnalysisSettings, GeminiAnalyzer, PropertyAnalyzer};
use property_scout::model::FoundationType;
use serde_json::{Value, json};

const MODEL: &str = "gemini-3-flash-preview";
const ENDPOINT: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";
const ADDRESS: &str = "123 Maple Ave, Springfield, IL";

fn analyzer(server: &MockServer) -> GeminiAnalyzer {
    GeminiAnalyzer::new(AnalysisSettings {
        base_url: server.base_url(),
        api_key: "test-key".to_string(),
        model: MODEL.to_string(),
    })
}

fn envelope(text: &str, chunks: Value) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "groundingMetadata": { "groundingChunks": chunks }
        }],
        "usageMetadata": { "promptTokenCount": 512, "candidatesTokenCount": 240 }
    })
}

#[tokio::test]
async fn test_grounded_analysis() {
    let server = MockServer::start_async().await;
    let reply = json!({
        "foundationType": "Slab",
        "yearBuilt": "1998",
        "sqFt": "1850",
        "beds": "3",
        "baths": "2",
        "estimatedValue": "$310,000",
        "floodZone": "X",
        "taxHistory": "2023: $4,210",
        "listingStatus": "Off Market",
        "layoutDescription": "Single-story ranch",
        "reasoning": "Slab on grade; check for settlement cracks."
    });
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(ENDPOINT)
                .header("x-goog-api-key", "test-key")
                .header("content-type", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(envelope(
                    &reply.to_string(),
                    json!([
                        { "web": { "uri": "https://county.example/parcel/42", "title": "County Records" } },
                        { "web": { "uri": "https://county.example/parcel/42", "title": "County Records (copy)" } },
                        { "web": { "uri": "https://listing.example/123" } },
                        { "retrievedContext": { "uri": "ignored" } }
                    ]),
                ));
        })
        .await;

    let result = analyzer(&server).analyze(ADDRESS).await.expect("analysis");

    mock.assert_async().await;
    assert_eq!(result.foundation_type, FoundationType::Slab);
    assert_eq!(result.year_built, "1998");
    assert_eq!(result.estimated_value, "$310,000");
    assert_eq!(result.listing_status, "Off Market");
    assert_eq!(
        result.map_link,
        "https://www.google.com/maps/search/?api=1&query=123%20Maple%20Ave%2C%20Springfield%2C%20IL"
    );

    let uris: Vec<&str> = result.grounding_sources.iter().map(|s| s.uri.as_str()).collect();
    assert_eq!(
        uris,
        ["https://county.example/parcel/42", "https://listing.example/123"]
    );
    assert_eq!(result.grounding_sources[0].title, "County Records");
    assert_eq!(result.grounding_sources[1].title, "");
}

#[tokio::test]
async fn test_partial_reply_gets_defaults() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(envelope(r#"{"foundationType":"Crawl Space","beds":4}"#, json!([])));
        })
        .await;

    let result = analyzer(&server).analyze(ADDRESS).await.expect("analysis");

    assert_eq!(result.foundation_type, FoundationType::CrawlSpace);
    assert_eq!(result.beds, "4");
    assert_eq!(result.tax_history, "Not available");
    assert_eq!(result.listing_status, "Unknown");
    assert_eq!(result.year_built, "");
    assert!(result.grounding_sources.is_empty());
}

#[tokio::test]
async fn test_unparseable_reply_text_is_not_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(envelope("I could not find that property.", json!([])));
        })
        .await;

    let result = analyzer(&server).analyze(ADDRESS).await.expect("analysis");

    assert_eq!(result.foundation_type, FoundationType::Unknown);
    assert_eq!(result.tax_history, "Not available");
    assert_eq!(result.reasoning, "");
}

#[tokio::test]
async fn test_provider_rejection_surfaces_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(403)
                .header("content-type", "application/json")
                .json_body(json!({
                    "error": { "code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED" }
                }));
        })
        .await;

    let err = analyzer(&server).analyze(ADDRESS).await.unwrap_err();

    match err {
        AnalysisError::Status { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("API key not valid."));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_envelope_is_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(200)
                .header("content-type", "application/json")
                .body("{ not json");
        })
        .await;

    let err = analyzer(&server).analyze(ADDRESS).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Decode(_)));
}

#[tokio::test]
async fn test_transport_failure_is_http_error() {
    let analyzer = GeminiAnalyzer::new(AnalysisSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: "test-key".to_string(),
        model: MODEL.to_string(),
    });

    let err = analyzer.analyze(ADDRESS).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Http(_)));
}
