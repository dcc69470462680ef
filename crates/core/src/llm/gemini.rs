use crate::config::Settings;
use crate::llm::error::LlmApiError;
use crate::llm::{GenerateRequest, LlmClient, Provider};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const LIST_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_gemini_api_key()?.to_string();
        let base_url = settings
            .gemini_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    fn models_url(&self) -> String {
        format!(
            "{}/{API_VERSION}/models",
            self.base_url.trim_end_matches('/')
        )
    }

    /// `list_models` returns names like `models/gemini-1.5-flash`; accept both
    /// that form and a bare identifier.
    fn generate_url(&self, model: &str) -> String {
        let model_path = if model.contains('/') {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!(
            "{}/{API_VERSION}/{model_path}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }

    async fn read_body(&self, res: reqwest::Response, stage: &'static str) -> anyhow::Result<String> {
        let status = res.status();
        let text = res.text().await.context("failed to read response body")?;
        if !status.is_success() {
            return Err(LlmApiError {
                provider: Provider::Gemini,
                stage,
                detail: format!("status={status}"),
                raw_output: Some(text),
            }
            .into());
        }
        Ok(text)
    }

    fn response_text(res: &GenerateContentResponse) -> anyhow::Result<String> {
        let mut out = String::new();
        for candidate in &res.candidates {
            for part in &candidate.content.parts {
                if let Some(text) = &part.text {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
            }
        }

        if out.is_empty() {
            return Err(LlmApiError {
                provider: Provider::Gemini,
                stage: "decode",
                detail: "response contained no text parts".to_string(),
                raw_output: None,
            }
            .into());
        }
        Ok(out)
    }

    fn text_models(models: Vec<ModelInfo>) -> Vec<String> {
        let mut out = Vec::new();
        for m in models {
            if !m
                .supported_generation_methods
                .iter()
                .any(|method| method == "generateContent")
            {
                continue;
            }
            // Embedding families advertise generateContent on some accounts
            // but are useless for a text digest.
            if m.name.contains("embedding") {
                continue;
            }
            // Duplicates collapse to the first occurrence.
            if !out.contains(&m.name) {
                out.push(m.name);
            }
        }
        out
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn list_text_models(&self) -> anyhow::Result<Vec<String>> {
        let res = self
            .http
            .get(self.models_url())
            .query(&[("key", self.api_key.as_str())])
            .query(&[("pageSize", LIST_PAGE_SIZE)])
            .send()
            .await
            .context("model catalog request failed")?;

        let text = self.read_body(res, "catalog_http").await?;
        let parsed = serde_json::from_str::<ListModelsResponse>(&text)
            .with_context(|| format!("failed to decode model catalog response: {text}"))?;

        Ok(Self::text_models(parsed.models))
    }

    async fn generate_text(&self, model: &str, req: &GenerateRequest) -> anyhow::Result<String> {
        let tools = req.web_search.then(|| {
            vec![Tool {
                google_search: serde_json::json!({}),
            }]
        });

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(req.prompt.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: req.temperature,
            },
            tools,
        };

        let res = self
            .http
            .post(self.generate_url(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("generateContent request failed")?;

        let text = self.read_body(res, "http").await?;
        let parsed = serde_json::from_str::<GenerateContentResponse>(&text)
            .with_context(|| format!("failed to decode generateContent response: {text}"))?;

        Self::response_text(&parsed)
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,

    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    google_search: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Clone, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelInfo {
    name: String,

    #[serde(default, rename = "supportedGenerationMethods")]
    supported_generation_methods: Vec<String>,
}
