use crate::config::Settings;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PATH: &str = "/search";

/// Per-country query topics injected into the digest prompt as headlines.
pub const SEARCH_TOPICS: &[&str] = &[
    "US economy latest indicators",
    "China economy latest indicators",
    "Eurozone economy latest indicators",
    "Thailand economy latest indicators",
];

pub const SNIPPETS_PER_TOPIC: usize = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSnippet {
    pub title: String,
    pub snippet: String,
}

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchSnippet>>;
}

/// Generic HTTP JSON search endpoint: `GET {base}{path}?q=..&limit=..`,
/// optional `x-api-key`. Expected body: `{"results": [{"title", "snippet"}]}`.
#[derive(Debug, Clone)]
pub struct HttpJsonSearchProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
}

impl HttpJsonSearchProvider {
    /// Search is an optional gatherer: `None` when `SEARCH_BASE_URL` is unset.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        let Some(base_url) = settings.search_base_url.clone() else {
            return Ok(None);
        };
        let api_key = settings.search_api_key.clone();

        let timeout_secs = std::env::var("SEARCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let path = std::env::var("SEARCH_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build search http client")?;

        Ok(Some(Self {
            http,
            base_url,
            api_key,
            path,
        }))
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl SearchClient for HttpJsonSearchProvider {
    fn provider_name(&self) -> &'static str {
        "external_http_json"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchSnippet>> {
        let res = self
            .http
            .get(self.url())
            .headers(self.headers()?)
            .query(&[("q", query), ("limit", &limit.to_string())])
            .send()
            .await
            .context("search request failed")?;

        let status = res.status();
        let text = res.text().await.context("failed to read search response")?;
        if !status.is_success() {
            anyhow::bail!("search HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<SearchResponse>(&text)
            .with_context(|| format!("search response is not valid JSON: {text}"))?;
        Ok(parsed.results)
    }
}

/// One query per topic; a failed query degrades to no snippets for that
/// topic only and the batch continues.
pub async fn gather_snippets(
    client: &dyn SearchClient,
    topics: &[&str],
    per_topic: usize,
) -> Vec<SearchSnippet> {
    let mut out = Vec::new();
    for &topic in topics {
        match client.search(topic, per_topic).await {
            Ok(mut snippets) => out.append(&mut snippets),
            Err(err) => {
                tracing::warn!(topic, error = %err, "search query failed; continuing without it");
            }
        }
    }
    out
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchSnippet>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_expected_result_shape() {
        let v = json!({
            "results": [
                {"title": "Fed holds rates", "snippet": "The FOMC kept the target range unchanged."},
                {"title": "ธปท. คงดอกเบี้ย", "snippet": "กนง. มีมติคงอัตราดอกเบี้ยนโยบาย"}
            ]
        });

        let parsed: SearchResponse = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].title, "Fed holds rates");
        assert!(parsed.results[1].snippet.contains("ดอกเบี้ย"));
    }

    #[test]
    fn missing_results_key_is_empty() {
        let parsed: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.results.is_empty());
    }
}
