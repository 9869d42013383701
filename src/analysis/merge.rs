//! Reply-to-report merging.
//!
//! Everything here is pure: the provider reply is parsed leniently and every
//! missing or blank field falls back to its own default instead of failing
//! the whole report.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::model::{AnalysisResult, FoundationType, GroundingSource};

/// Map search endpoint; the percent-encoded address is appended as `query`.
pub const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Default for a missing `taxHistory`.
pub const TAX_HISTORY_FALLBACK: &str = "Not available";

/// Default for a missing `listingStatus`.
pub const LISTING_STATUS_FALLBACK: &str = "Unknown";

/// Parse the model's reply text into a JSON object.
///
/// Absent text, invalid JSON and non-object JSON all yield an empty object.
#[must_use]
pub fn parse_reply(text: Option<&str>) -> Map<String, Value> {
    text.filter(|t| !t.trim().is_empty())
        .and_then(|t| serde_json::from_str::<Value>(t).ok())
        .and_then(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default()
}

/// Read a field as text. Blank strings, nulls and containers count as missing.
fn text_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Build a fully-defaulted report from the parsed reply.
#[must_use]
pub fn merge_result(
    raw: &Map<String, Value>,
    address: &str,
    grounding_sources: Vec<GroundingSource>,
) -> AnalysisResult {
    let field = |key: &str| text_field(raw, key).unwrap_or_default();

    AnalysisResult {
        foundation_type: text_field(raw, "foundationType")
            .map(FoundationType::from)
            .unwrap_or_default(),
        year_built: field("yearBuilt"),
        sq_ft: field("sqFt"),
        beds: field("beds"),
        baths: field("baths"),
        estimated_value: field("estimatedValue"),
        flood_zone: field("floodZone"),
        tax_history: text_field(raw, "taxHistory")
            .unwrap_or_else(|| TAX_HISTORY_FALLBACK.to_string()),
        listing_status: text_field(raw, "listingStatus")
            .unwrap_or_else(|| LISTING_STATUS_FALLBACK.to_string()),
        layout_description: field("layoutDescription"),
        reasoning: field("reasoning"),
        map_link: map_link(address),
        grounding_sources,
    }
}

/// Pull web citations out of the provider's grounding chunks.
///
/// Chunks without a `web` reference, or whose reference has no uri, are
/// dropped. A missing title becomes an empty string.
#[must_use]
pub fn extract_citations(chunks: &[Value]) -> Vec<GroundingSource> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.get("web")?;
            let uri = web.get("uri")?.as_str()?;
            let title = web.get("title").and_then(Value::as_str).unwrap_or_default();
            Some(GroundingSource {
                uri: uri.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}

/// Drop repeated uris, keeping the first occurrence and the original order.
#[must_use]
pub fn dedupe_sources(sources: Vec<GroundingSource>) -> Vec<GroundingSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(source.uri.clone()))
        .collect()
}

/// Deep link to a map search for the address.
#[must_use]
pub fn map_link(address: &str) -> String {
    format!("{MAP_SEARCH_URL}{}", urlencoding::encode(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(uri: &str, title: &str) -> GroundingSource {
        GroundingSource {
            uri: uri.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_parse_reply_fallbacks() {
        assert!(parse_reply(None).is_empty());
        assert!(parse_reply(Some("")).is_empty());
        assert!(parse_reply(Some("not json")).is_empty());
        assert!(parse_reply(Some("[1, 2]")).is_empty());
        assert_eq!(parse_reply(Some(r#"{"beds":"3"}"#))["beds"], "3");
    }

    #[test]
    fn test_empty_reply_gets_every_default() {
        let result = merge_result(&Map::new(), "1 Main St", vec![]);

        assert_eq!(result.foundation_type, FoundationType::Unknown);
        assert_eq!(result.year_built, "");
        assert_eq!(result.sq_ft, "");
        assert_eq!(result.beds, "");
        assert_eq!(result.baths, "");
        assert_eq!(result.estimated_value, "");
        assert_eq!(result.flood_zone, "");
        assert_eq!(result.tax_history, "Not available");
        assert_eq!(result.listing_status, "Unknown");
        assert_eq!(result.layout_description, "");
        assert_eq!(result.reasoning, "");
        assert!(result.grounding_sources.is_empty());
    }

    #[test]
    fn test_fields_are_defaulted_individually() {
        let raw = parse_reply(Some(
            r#"{
                "foundationType": "Crawl Space",
                "yearBuilt": 1962,
                "beds": "",
                "taxHistory": "",
                "listingStatus": "Sold",
                "reasoning": "Tight crawl access on the north side."
            }"#,
        ));
        let result = merge_result(&raw, "1 Main St", vec![]);

        assert_eq!(result.foundation_type, FoundationType::CrawlSpace);
        assert_eq!(result.year_built, "1962");
        assert_eq!(result.beds, "");
        assert_eq!(result.tax_history, "Not available");
        assert_eq!(result.listing_status, "Sold");
        assert_eq!(result.reasoning, "Tight crawl access on the north side.");
    }

    #[test]
    fn test_whitespace_only_fields_get_defaults() {
        let raw = parse_reply(Some(
            r#"{"taxHistory": "  ", "listingStatus": "\n", "floodZone": " ", "sqFt": " 1,850 "}"#,
        ));
        let result = merge_result(&raw, "1 Main St", vec![]);

        assert_eq!(result.tax_history, "Not available");
        assert_eq!(result.listing_status, "Unknown");
        assert_eq!(result.flood_zone, "");
        assert_eq!(result.sq_ft, " 1,850 ");
    }

    #[test]
    fn test_unrecognized_foundation_is_unknown() {
        let raw = parse_reply(Some(r#"{"foundationType": "Pier and Beam"}"#));
        assert_eq!(
            merge_result(&raw, "x", vec![]).foundation_type,
            FoundationType::Unknown
        );
    }

    #[test]
    fn test_extract_drops_chunks_without_web() {
        let chunks = vec![
            json!({"web": {"uri": "a", "title": "A"}}),
            json!({"web": {"uri": "a", "title": "A-dup"}}),
            json!({"retrievedContext": {"uri": "ignored"}}),
            json!({"web": {"title": "no uri"}}),
            json!({"web": {"uri": "b"}}),
        ];

        assert_eq!(
            extract_citations(&chunks),
            vec![source("a", "A"), source("a", "A-dup"), source("b", "")]
        );
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let deduped = dedupe_sources(vec![
            source("b", "B"),
            source("a", "A"),
            source("b", "B-dup"),
            source("c", "C"),
            source("a", "A-dup"),
        ]);

        assert_eq!(
            deduped,
            vec![source("b", "B"), source("a", "A"), source("c", "C")]
        );
    }

    #[test]
    fn test_map_link_encodes_address() {
        assert_eq!(
            map_link("123 Maple Ave, Springfield, IL"),
            "https://www.google.com/maps/search/?api=1&query=123%20Maple%20Ave%2C%20Springfield%2C%20IL"
        );
        assert_eq!(map_link("5 Oak & Pine #2"), map_link("5 Oak & Pine #2"));
        assert!(map_link("5 Oak & Pine #2").ends_with("5%20Oak%20%26%20Pine%20%232"));
    }
}
