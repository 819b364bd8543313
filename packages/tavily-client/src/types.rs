use serde::{Deserialize, Serialize};

/// Body for `POST /search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_depth: String,
    pub max_results: usize,
}

/// Response envelope for `POST /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
}

/// A single search result.
///
/// `content` is Tavily's extracted page text, not raw HTML.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResultItem {
    pub url: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_with_missing_optional_fields() {
        let raw = r#"{
            "results": [
                {"url": "https://a.com", "title": "A", "content": "text", "score": 0.9},
                {"url": "https://b.com"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].content.as_deref(), Some("text"));
        assert!(response.results[1].title.is_none());
    }

    #[test]
    fn empty_response_is_valid() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }
}
