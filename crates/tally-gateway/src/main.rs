use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tally_cache::CacheStore;
use tracing::info;

mod app;
mod http;
mod token;
mod workflow;

#[derive(Parser)]
#[command(name = "tally-gateway", version, about = "Scheduler report validation dashboard")]
struct Cli {
    /// Config file path. Falls back to TALLY_CONFIG, then ~/.tally/tally.toml.
    #[arg(long)]
    config: Option<String>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_gateway=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config > TALLY_CONFIG env > ~/.tally/tally.toml
    let config_path = cli.config.or_else(|| std::env::var("TALLY_CONFIG").ok());
    let mut config =
        tally_core::config::TallyConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
            tracing::warn!("Config load failed ({}), using defaults", e);
            tally_core::config::TallyConfig::default()
        });
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if let Some(bind) = cli.bind {
        config.gateway.bind = bind;
    }

    std::fs::create_dir_all(&config.storage.data_dir)?;
    info!(dir = %config.storage.data_dir, "using data directory");

    let fetcher = tally_explorer::ExplorerClient::new(&config.explorer)?;

    // drop cache entries left over from previous days before serving
    let cache = tally_cache::FileCacheStore::new(config.storage.cache_file());
    cache.purge_expired(chrono::Utc::now().timestamp_millis());

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let state = Arc::new(app::AppState::new(
        config,
        Arc::new(fetcher),
        Arc::new(cache),
    ));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Tally gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
