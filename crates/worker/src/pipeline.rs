use sarup_core::config::Settings;
use sarup_core::llm::resolve::{self, Resolved};
use sarup_core::llm::{GenerateRequest, LlmClient};
use sarup_core::market::{self, yahoo::YahooChartClient, IndexYtd, TRACKED_INDICES};
use sarup_core::search::{
    self, HttpJsonSearchProvider, SearchSnippet, SEARCH_TOPICS, SNIPPETS_PER_TOPIC,
};
use sarup_core::time::th_market;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelStrategy {
    /// Pick the first preferred model present in the live catalog.
    Catalog,
    /// Attempt generation against each preferred model until one succeeds.
    Probe,
}

/// YTD lines for the tracked indices. Everything here degrades: a broken
/// client or window still returns a full batch of sentinels rather than
/// aborting the digest.
pub async fn gather_markets(
    settings: &Settings,
    date: chrono::NaiveDate,
    now_utc: chrono::DateTime<chrono::Utc>,
) -> Vec<IndexYtd> {
    let client = match YahooChartClient::from_settings(settings) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error = %err, "market data client unavailable; digest proceeds without YTD data");
            return Vec::new();
        }
    };

    let from = match th_market::start_of_year(date) {
        Ok(from) => from,
        Err(err) => {
            tracing::warn!(error = %err, "could not derive YTD window; digest proceeds without YTD data");
            return Vec::new();
        }
    };

    market::fetch_ytd_batch(&client, TRACKED_INDICES, from, now_utc).await
}

/// Headline snippets, if a search endpoint is configured at all.
pub async fn gather_headlines(settings: &Settings) -> Vec<SearchSnippet> {
    match HttpJsonSearchProvider::from_settings(settings) {
        Ok(Some(provider)) => {
            search::gather_snippets(&provider, SEARCH_TOPICS, SNIPPETS_PER_TOPIC).await
        }
        Ok(None) => {
            tracing::info!("SEARCH_BASE_URL not set; skipping headline gatherer");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(error = %err, "search provider unavailable; skipping headline gatherer");
            Vec::new()
        }
    }
}

/// Generate the digest body. Fail-open: every resolution or generation
/// failure becomes a readable error string that is still dispatched, so the
/// recipient learns the run broke instead of hearing nothing.
pub async fn generate_body(
    llm: &dyn LlmClient,
    strategy: ModelStrategy,
    preferred: &[&str],
    prompt: String,
) -> String {
    match strategy {
        ModelStrategy::Catalog => {
            let mut req = GenerateRequest::deterministic(prompt);
            req.web_search = true;

            let resolved = match llm.list_text_models().await {
                Ok(catalog) => {
                    let resolved = resolve::resolve_by_catalog(preferred, &catalog);
                    if resolved.is_degraded() {
                        tracing::warn!(model = resolved.model(), "model catalog is empty; using default model");
                    }
                    resolved
                }
                Err(err) => {
                    // Service unreachable, not "nothing usable": log the cause
                    // before degrading to the same default.
                    tracing::warn!(error = %err, "model catalog unavailable; using default model");
                    Resolved::DefaultFallback {
                        model: resolve::DEFAULT_MODEL.to_string(),
                    }
                }
            };
            tracing::info!(model = resolved.model(), "selected model");

            match llm.generate_text(resolved.model(), &req).await {
                Ok(text) => text,
                Err(err) => format!("Generate Error: {err:#}"),
            }
        }
        ModelStrategy::Probe => {
            // Candidates span models without search-tool support, so the
            // probe request keeps the tool off.
            let req = GenerateRequest::deterministic(prompt);
            match resolve::generate_first_success(llm, preferred, &req).await {
                Ok(generated) => {
                    tracing::info!(model = %generated.model, "selected model");
                    generated.text
                }
                Err(err) => format!("Generate Error: {err:#}"),
            }
        }
    }
}
