use crate::config::Settings;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.line.me";
const PUSH_PATH: &str = "/v2/bot/message/push";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct LinePushClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl LinePushClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let access_token = settings.require_line_channel_access_token()?.to_string();
        let base_url =
            std::env::var("LINE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("LINE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build LINE http client")?;

        Ok(Self {
            http,
            access_token,
            base_url,
        })
    }

    fn push_url(&self) -> String {
        format!("{}{PUSH_PATH}", self.base_url.trim_end_matches('/'))
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.access_token))?,
        );
        Ok(headers)
    }

    /// One push message to one recipient. Returns the HTTP status on success
    /// so the caller can log it; non-success carries status + body. Dispatch
    /// failures are the caller's to log — they never change the exit code.
    pub async fn push_text(&self, to: &str, text: &str) -> Result<reqwest::StatusCode> {
        let body = PushRequest {
            to,
            messages: vec![PushMessage { kind: "text", text }],
        };

        let res = self
            .http
            .post(self.push_url())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .context("LINE push request failed")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("LINE push HTTP {status}: {body}");
        }
        Ok(status)
    }
}

#[derive(Debug, Clone, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<PushMessage<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct PushMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_documented_push_shape() {
        let req = PushRequest {
            to: "U1234567890abcdef",
            messages: vec![PushMessage {
                kind: "text",
                text: "hello",
            }],
        };

        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "to": "U1234567890abcdef",
                "messages": [{"type": "text", "text": "hello"}]
            })
        );
    }

    #[test]
    fn thai_text_survives_serialization() {
        let text = "📊 สรุปเศรษฐกิจโลก (ล่าสุด)";
        let req = PushRequest {
            to: "U1",
            messages: vec![PushMessage { kind: "text", text }],
        };

        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["messages"][0]["text"], text);
    }
}
