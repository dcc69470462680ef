pub mod error;
pub mod gemini;
pub mod resolve;

/// One generation call. The worker pins `temperature` to 0.0 so scheduled
/// runs stay deterministic; `web_search` asks the model to use its own
/// search tool while composing the answer.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub temperature: f32,
    pub web_search: bool,
}

impl GenerateRequest {
    pub fn deterministic(prompt: String) -> Self {
        Self {
            prompt,
            temperature: 0.0,
            web_search: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Provider {
    Gemini,
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Model identifiers the credential may use for free-form text
    /// generation, fetched fresh (never cached across runs).
    async fn list_text_models(&self) -> anyhow::Result<Vec<String>>;

    async fn generate_text(&self, model: &str, req: &GenerateRequest) -> anyhow::Result<String>;
}
