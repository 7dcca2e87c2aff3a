//! HTTP surface: router assembly, shared handler state, and helpers
//! common to the metadata endpoints.

pub mod favorites;
pub mod health;
pub mod movies;
pub mod trending;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::cache::TtlCache;
use crate::error::AppError;
use crate::favorites::FavoritesStore;
use crate::metrics::AppMetrics;
use crate::models::{Movie, TimeWindow, TrendingPage};
use crate::services::tmdb::TmdbClient;

/// Seam between the request handlers and the upstream metadata service.
/// Production wires in [`TmdbClient`]; tests wire in mocks.
#[async_trait]
pub trait MovieMetadataProvider {
    async fn movie_details(&self, id: u64) -> Result<Movie, AppError>;
    async fn trending(&self, window: TimeWindow) -> Result<TrendingPage, AppError>;
}

#[async_trait]
impl MovieMetadataProvider for TmdbClient {
    async fn movie_details(&self, id: u64) -> Result<Movie, AppError> {
        TmdbClient::movie_details(self, id).await
    }

    async fn trending(&self, window: TimeWindow) -> Result<TrendingPage, AppError> {
        TmdbClient::trending(self, window).await
    }
}

/// Shared state for the movie and trending routes.
///
/// `provider` is `None` when the upstream credential is missing; handlers
/// report `Misconfigured` before touching the cache or the network.
pub struct MetadataApiState {
    pub provider: Option<Arc<dyn MovieMetadataProvider + Send + Sync>>,
    pub movie_cache: Arc<Mutex<TtlCache<Movie>>>,
    pub trending_cache: Arc<Mutex<TtlCache<TrendingPage>>>,
    pub metrics: Arc<AppMetrics>,
}

pub type MetadataState = Arc<MetadataApiState>;
pub type FavoritesState = Arc<Mutex<FavoritesStore>>;

/// Assemble the complete application router.
pub fn create_router(
    metadata: MetadataState,
    favorites: FavoritesState,
    metrics: Arc<AppMetrics>,
) -> Router {
    let metadata_routes = Router::new()
        .route("/api/movies/:id", get(movies::movie_details))
        .route("/api/trending", get(trending::trending_list))
        .with_state(metadata);

    let favorites_routes = Router::new()
        .route("/api/favorites", get(favorites::list_favorites))
        .route("/api/favorites/:id", put(favorites::add_favorite))
        .route("/api/favorites/:id", delete(favorites::remove_favorite))
        .route("/api/favorites/:id/toggle", post(favorites::toggle_favorite))
        .with_state(favorites);

    let metrics_for_handler = metrics.clone();
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/metrics",
            get(move || {
                let m = metrics_for_handler.clone();
                async move {
                    match m.render() {
                        Ok(body) => Response::builder()
                            .status(StatusCode::OK)
                            .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
                            .body(Body::from(body))
                            .expect("metrics response should be valid"),
                        Err(err) => {
                            AppError::Internal(format!("failed to render metrics: {}", err))
                                .into_response()
                        }
                    }
                }
            }),
        )
        .merge(metadata_routes)
        .merge(favorites_routes)
        .layer(middleware::from_fn_with_state(metrics, track_http))
        .layer(CorsLayer::permissive())
}

/// Record per-request counters and latency for the Prometheus registry.
async fn track_http(
    State(metrics): State<Arc<AppMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    metrics
        .http_requests_total
        .with_label_values(&[method.as_str(), &path, response.status().as_str()])
        .inc();
    metrics
        .http_request_duration
        .observe(started.elapsed().as_secs_f64());

    response
}

/// Validate a raw path segment as a movie identifier.
///
/// The one validation policy applied everywhere: the segment must parse
/// as an integer and be strictly positive, otherwise the request is a
/// 400 with no upstream call.
pub fn parse_movie_id(raw: &str) -> Result<u64, AppError> {
    let id: i64 = raw.trim().parse().map_err(|_| {
        AppError::InvalidArgument(format!("movie id must be a number, got {:?}", raw))
    })?;
    if id <= 0 {
        return Err(AppError::InvalidArgument(format!(
            "movie id must be a positive integer, got {}",
            id
        )));
    }
    Ok(id as u64)
}

/// Serialize `payload` as JSON with a `Cache-Control` hint derived from
/// the resource's TTL.
pub(crate) fn json_cached<T: Serialize>(payload: &T, max_age_secs: u64) -> Result<Response, AppError> {
    let body = serde_json::to_vec(payload)
        .map_err(|err| AppError::Internal(format!("failed to serialize response: {}", err)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", max_age_secs),
        )
        .body(Body::from(body))
        .map_err(|err| AppError::Internal(format!("failed to build response: {}", err)))
}
