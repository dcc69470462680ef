pub mod digest;
pub mod llm;
pub mod market;
pub mod push;
pub mod search;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub gemini_base_url: Option<String>,
        pub line_channel_access_token: Option<String>,
        pub line_user_id: Option<String>,
        pub market_data_base_url: Option<String>,
        pub search_base_url: Option<String>,
        pub search_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
                gemini_base_url: std::env::var("GEMINI_BASE_URL").ok(),
                line_channel_access_token: std::env::var("LINE_CHANNEL_ACCESS_TOKEN").ok(),
                line_user_id: std::env::var("LINE_USER_ID").ok(),
                market_data_base_url: std::env::var("MARKET_DATA_BASE_URL").ok(),
                search_base_url: std::env::var("SEARCH_BASE_URL").ok(),
                search_api_key: std::env::var("SEARCH_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }

        pub fn require_line_channel_access_token(&self) -> anyhow::Result<&str> {
            self.line_channel_access_token
                .as_deref()
                .context("LINE_CHANNEL_ACCESS_TOKEN is required")
        }

        pub fn require_line_user_id(&self) -> anyhow::Result<&str> {
            self.line_user_id
                .as_deref()
                .context("LINE_USER_ID is required")
        }
    }
}
