use clap::Parser;
use sarup_core::digest;
use sarup_core::time::th_market;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod pipeline;

#[derive(Debug, Parser)]
#[command(name = "sarup_worker")]
struct Args {
    /// Digest date (YYYY-MM-DD). Defaults to today's Bangkok (ICT) date.
    #[arg(long)]
    date: Option<String>,

    /// Build the full message but skip the LINE dispatch.
    #[arg(long)]
    dry_run: bool,

    /// Skip the market-index YTD gatherer.
    #[arg(long)]
    skip_markets: bool,

    /// Skip the web-search headline gatherer.
    #[arg(long)]
    skip_search: bool,

    /// How to pick the generation model.
    #[arg(long, value_enum, default_value = "catalog")]
    model_strategy: pipeline::ModelStrategy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = sarup_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    // Configuration is the only fatal stage: check every required credential
    // before the first network call.
    settings.require_gemini_api_key()?;
    let line_user_id = settings.require_line_user_id()?.to_string();
    let line = sarup_core::push::line::LinePushClient::from_settings(&settings)?;
    let llm = sarup_core::llm::gemini::GeminiClient::from_settings(&settings)?;

    let now_utc = chrono::Utc::now();
    let date = th_market::run_date(args.date.as_deref(), now_utc)?;

    let markets = if args.skip_markets {
        Vec::new()
    } else {
        pipeline::gather_markets(&settings, date, now_utc).await
    };

    let snippets = if args.skip_search {
        Vec::new()
    } else {
        pipeline::gather_headlines(&settings).await
    };

    let prompt = digest::build_prompt(&th_market::long_date_label(date), &markets, &snippets);
    let body = pipeline::generate_body(
        &llm,
        args.model_strategy,
        sarup_core::llm::resolve::PREFERRED_MODELS,
        prompt,
    )
    .await;
    let message = digest::wrap_message(&body, &th_market::short_date_label(date));

    if args.dry_run {
        tracing::info!(%date, dry_run = true, %message, "dry-run: skipping LINE dispatch");
        return Ok(());
    }

    match line.push_text(&line_user_id, &message).await {
        Ok(status) => {
            tracing::info!(%date, %status, "digest dispatched");
        }
        Err(err) => {
            // Fail-open end to end: the dispatch error is reported, the
            // process still exits 0.
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(%date, error = %err, "LINE dispatch failed");
        }
    }

    Ok(())
}

fn init_sentry(settings: &sarup_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
