use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::Mutex;

use movie_discovery::api::{self, MetadataApiState, MovieMetadataProvider};
use movie_discovery::cache::TtlCache;
use movie_discovery::cli::Cli;
use movie_discovery::config::Config;
use movie_discovery::favorites::{FavoritesStore, JsonFileStorage};
use movie_discovery::logging::init_logging;
use movie_discovery::metrics::AppMetrics;
use movie_discovery::services::tmdb::TmdbClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let mut config = Config::from_env().unwrap_or_else(|err| {
        tracing::error!("{}", err);
        std::process::exit(1);
    });
    config.apply_cli(&cli);

    let provider: Option<Arc<dyn MovieMetadataProvider + Send + Sync>> = match &config.tmdb_api_key
    {
        Some(api_key) => {
            let client = TmdbClient::new(
                config.tmdb_base_url.clone(),
                api_key.clone(),
                Duration::from_secs(config.upstream_timeout_secs),
            )
            .unwrap_or_else(|err| {
                tracing::error!("{}", err);
                std::process::exit(1);
            });
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!(
                "TMDB_API_KEY is not set; metadata endpoints will report a configuration error"
            );
            None
        }
    };

    let metrics = Arc::new(AppMetrics::new().unwrap_or_else(|err| {
        tracing::error!("Failed to build metrics registry: {}", err);
        std::process::exit(1);
    }));

    let metadata_state = Arc::new(MetadataApiState {
        provider,
        movie_cache: Arc::new(Mutex::new(TtlCache::new(Duration::from_secs(
            config.movie_cache_ttl_secs,
        )))),
        trending_cache: Arc::new(Mutex::new(TtlCache::new(Duration::from_secs(
            config.trending_cache_ttl_secs,
        )))),
        metrics: metrics.clone(),
    });

    let favorites = Arc::new(Mutex::new(FavoritesStore::load(Box::new(
        JsonFileStorage::new(config.favorites_dir.clone()),
    ))));

    let app = api::create_router(metadata_state, favorites, metrics);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|err| {
            tracing::error!("Failed to bind {}: {}", config.bind_addr, err);
            std::process::exit(1);
        });

    tracing::info!("Listening on {}", config.bind_addr);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }

    tracing::info!("Server stopped cleanly");
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received. Stopping server.");
}
