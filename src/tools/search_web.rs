//! Web search tool
//!
//! Queries the DuckDuckGo Instant Answer API, which needs no API key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::core::{AgentError, ParamType, Result, ToolSchema};
use crate::tools::{string_arg, Tool, ToolArgs};

const INSTANT_ANSWER_URL: &str = "https://api.duckduckgo.com/";
const RELATED_TOPIC_LIMIT: usize = 3;

/// Subset of the Instant Answer payload we format
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstantAnswer {
    #[serde(default)]
    pub answer: Value,
    #[serde(default, rename = "Abstract")]
    pub summary: String,
    #[serde(default)]
    pub abstract_text: String,
    #[serde(default)]
    pub related_topics: Vec<Value>,
}

/// Tool for searching the web
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    client: Client,
    endpoint: String,
}

impl WebSearchTool {
    /// Create a search tool against the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(INSTANT_ANSWER_URL)
    }

    /// Create a search tool against a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn query_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
        )
        .map_err(|e| AgentError::tool(format!("Invalid search endpoint: {}", e)))
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an Instant Answer payload as text for the model
///
/// Only the first three related topics are considered; entries without text
/// are skipped but keep their position in the numbering.
pub fn format_results(query: &str, data: &InstantAnswer) -> String {
    let mut parts = vec![format!("Search results for '{}':\n", query)];

    if let Some(answer) = data.answer.as_str().filter(|a| !a.is_empty()) {
        parts.push(format!("Answer: {}", answer));
    }

    if !data.summary.is_empty() {
        parts.push(format!("Summary: {}", data.summary));
    }

    if !data.abstract_text.is_empty() && data.abstract_text != data.summary {
        parts.push(format!("Details: {}", data.abstract_text));
    }

    if !data.related_topics.is_empty() {
        parts.push("\nRelated information:".to_string());
        for (i, topic) in data.related_topics.iter().take(RELATED_TOPIC_LIMIT).enumerate() {
            if let Some(text) = topic
                .get("Text")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
            {
                parts.push(format!("{}. {}", i + 1, text));
            }
        }
    }

    if parts.len() > 1 {
        parts.join("\n\n")
    } else {
        format!("No results found for: {}", query)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "search_web",
            "Search the web for current information, news, or facts not in training data",
        )
        .required_param(
            "query",
            ParamType::String,
            "Search query - be specific and concise",
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let query = string_arg(args, "query")?;
        let url = self.query_url(query)?;

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::tool(format!("Search timed out for query: {}", query))
                } else {
                    AgentError::tool(format!("Search failed: {}", e))
                }
            })?;

        let response = response
            .error_for_status()
            .map_err(|e| AgentError::tool(format!("Search failed: {}", e)))?;

        // The API answers with a javascript content type, so decode by hand
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::tool(format!("Search failed: {}", e)))?;
        let data: InstantAnswer = serde_json::from_str(&body)
            .map_err(|_| AgentError::tool("Failed to parse search results"))?;

        Ok(format_results(query, &data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answer(value: Value) -> InstantAnswer {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_query_url_encodes_parameters() {
        let tool = WebSearchTool::new();
        let url = tool.query_url("rust & tokio").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "rust & tokio".to_string())));
        assert!(pairs.contains(&("format".to_string(), "json".to_string())));
    }

    #[test]
    fn test_format_full_payload() {
        let data = answer(json!({
            "Answer": "42",
            "Abstract": "Short summary",
            "AbstractText": "Longer text",
            "RelatedTopics": [
                {"Text": "one"},
                {"Name": "group", "Topics": []},
                {"Text": "two"},
                {"Text": "three"},
                {"Text": "four"}
            ]
        }));

        let text = format_results("meaning", &data);
        assert!(text.starts_with("Search results for 'meaning':\n\n\nAnswer: 42"));
        assert!(text.contains("Answer: 42"));
        assert!(text.contains("Summary: Short summary"));
        assert!(text.contains("Details: Longer text"));
        assert!(text.contains("\n\nRelated information:\n\n1. one\n\n3. two"));
        assert!(!text.contains("three"));
        assert!(!text.contains("four"));
    }

    #[test]
    fn test_duplicate_abstract_not_repeated() {
        let data = answer(json!({"Abstract": "Same", "AbstractText": "Same"}));
        let text = format_results("q", &data);
        assert!(text.contains("Summary: Same"));
        assert!(!text.contains("Details:"));
    }

    #[test]
    fn test_empty_payload() {
        let data = answer(json!({"Answer": "", "RelatedTopics": []}));
        assert_eq!(format_results("nothing", &data), "No results found for: nothing");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_search() {
        let tool = WebSearchTool::new();
        let args = json!({"query": "Rust programming language"})
            .as_object()
            .cloned()
            .unwrap();
        let text = tool.execute(&args).await.unwrap();
        assert!(!text.is_empty());
    }
}
