use crate::config::Settings;
use crate::market::PricePoint;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Yahoo rejects the default reqwest UA with 403.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct YahooChartClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .market_data_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build market data http client")?;

        Ok(Self { http, base_url })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{symbol}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Daily closes for `[from, until]`, oldest-first. Null closes
    /// (halted/partial sessions) are skipped.
    pub async fn fetch_daily_closes(
        &self,
        symbol: &str,
        from: NaiveDate,
        until: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>> {
        let period1 = from
            .and_hms_opt(0, 0, 0)
            .context("invalid start-of-day time")?
            .and_utc()
            .timestamp();
        let period2 = until.timestamp();

        let res = self
            .http
            .get(self.chart_url(symbol))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("chart request failed for {symbol}"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read chart response for {symbol}"))?;
        if !status.is_success() {
            anyhow::bail!("chart HTTP {status} for {symbol}: {text}");
        }

        let parsed = serde_json::from_str::<ChartResponse>(&text)
            .with_context(|| format!("chart response is not valid JSON for {symbol}: {text}"))?;

        points_from_chart(parsed, symbol)
    }
}

fn points_from_chart(parsed: ChartResponse, symbol: &str) -> Result<Vec<PricePoint>> {
    if let Some(err) = parsed.chart.error {
        anyhow::bail!("chart API error for {symbol}: {err}");
    }

    let result = parsed
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .with_context(|| format!("chart response has no result for {symbol}"))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut out = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.into_iter().zip(closes) {
        let Some(close) = close else { continue };
        let Some(at) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            continue;
        };
        out.push(PricePoint { at, close });
    }
    Ok(out)
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,

    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,

    indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Clone, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_chart_result_and_skips_null_closes() {
        let v = json!({
            "chart": {
                "result": [
                    {
                        "timestamp": [1704153600i64, 1704240000i64, 1704326400i64],
                        "indicators": {
                            "quote": [{"close": [100.0, null, 110.0]}]
                        }
                    }
                ],
                "error": null
            }
        });

        let parsed: ChartResponse = serde_json::from_value(v).unwrap();
        let points = points_from_chart(parsed, "^GSPC").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 100.0);
        assert_eq!(points[1].close, 110.0);
        assert!(points[0].at < points[1].at);
    }

    #[test]
    fn chart_error_body_is_rejected() {
        let v = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        });

        let parsed: ChartResponse = serde_json::from_value(v).unwrap();
        let err = points_from_chart(parsed, "NOPE").unwrap_err();
        assert!(err.to_string().contains("chart API error"));
    }

    #[test]
    fn missing_result_is_an_error() {
        let v = json!({"chart": {"result": [], "error": null}});
        let parsed: ChartResponse = serde_json::from_value(v).unwrap();
        assert!(points_from_chart(parsed, "^GSPC").is_err());
    }
}
