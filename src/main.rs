use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use glean::api::{AppState, create_router};
use glean::config::Config;
use glean::exa::ExaClient;
use glean::fetcher::ContentFetcher;
use glean::interest_search::InterestSearch;
use glean::notion::NotionClient;

#[derive(Debug, Parser)]
#[command(name = "glean", about = "Search the web from the context of a Notion page")]
struct Cli {
    /// Address to serve the page on; overrides GLEAN_BIND_ADDR.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(bind) = cli.bind.as_deref() {
        config = config.with_bind_addr(bind)?;
    }
    tracing::info!(?config, "configuration loaded");

    let notion = NotionClient::from_config(&config).context("failed to build notion client")?;
    let exa = ExaClient::from_config(&config).context("failed to build exa client")?;

    let state = AppState::new(
        ContentFetcher::new(Arc::new(notion)),
        InterestSearch::new(Arc::new(exa)),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("serving on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
