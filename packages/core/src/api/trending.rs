//! Trending list endpoint: `GET /api/trending?timeWindow=day|week`.

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::cache::trending_key;
use crate::error::AppError;
use crate::metrics::RESOURCE_TRENDING;
use crate::models::TimeWindow;

use super::{json_cached, MetadataState};

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(rename = "timeWindow")]
    pub time_window: Option<String>,
}

/// Serve the trending list from cache or fetch it from upstream.
///
/// An omitted selector defaults to `week`; an unrecognized one is
/// rejected rather than normalized.
pub async fn trending_list(
    State(state): State<MetadataState>,
    Query(params): Query<TrendingQuery>,
) -> Result<Response, AppError> {
    let window = match params.time_window.as_deref() {
        None => TimeWindow::default(),
        Some(raw) => TimeWindow::parse(raw).ok_or_else(|| {
            AppError::InvalidArgument(format!("unsupported timeWindow value: {}", raw))
        })?,
    };

    let provider = state.provider.as_ref().ok_or_else(|| {
        AppError::Misconfigured("TMDB API key is not configured. Set TMDB_API_KEY.".to_string())
    })?;

    let key = trending_key(window);
    let (cached, ttl_secs) = {
        let cache = state.trending_cache.lock().await;
        (cache.get_fresh(&key), cache.ttl().as_secs())
    };

    let page = match cached {
        Some(page) => {
            state
                .metrics
                .cache_hits_total
                .with_label_values(&[RESOURCE_TRENDING])
                .inc();
            page
        }
        None => {
            state
                .metrics
                .cache_misses_total
                .with_label_values(&[RESOURCE_TRENDING])
                .inc();
            state.metrics.upstream_requests_total.inc();

            let fresh = provider.trending(window).await.map_err(|err| {
                state.metrics.upstream_errors_total.inc();
                err
            })?;

            let mut cache = state.trending_cache.lock().await;
            cache.put(key, fresh.clone());
            fresh
        }
    };

    json_cached(&page, ttl_secs)
}
