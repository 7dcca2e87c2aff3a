//! Movie detail endpoint: `GET /api/movies/{id}`.

use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::cache::movie_key;
use crate::error::AppError;
use crate::metrics::RESOURCE_MOVIE;

use super::{json_cached, parse_movie_id, MetadataState};

/// Validate, then serve from cache or fetch from upstream.
///
/// Validation rejects before the cache or the network is touched, and a
/// missing credential rejects before any network attempt. An upstream
/// not-found never populates the cache.
pub async fn movie_details(
    State(state): State<MetadataState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_movie_id(&raw_id)?;

    let provider = state.provider.as_ref().ok_or_else(|| {
        AppError::Misconfigured("TMDB API key is not configured. Set TMDB_API_KEY.".to_string())
    })?;

    let key = movie_key(id);
    let (cached, ttl_secs) = {
        let cache = state.movie_cache.lock().await;
        (cache.get_fresh(&key), cache.ttl().as_secs())
    };

    let movie = match cached {
        Some(movie) => {
            state
                .metrics
                .cache_hits_total
                .with_label_values(&[RESOURCE_MOVIE])
                .inc();
            movie
        }
        None => {
            state
                .metrics
                .cache_misses_total
                .with_label_values(&[RESOURCE_MOVIE])
                .inc();
            state.metrics.upstream_requests_total.inc();

            let fresh = provider.movie_details(id).await.map_err(|err| {
                state.metrics.upstream_errors_total.inc();
                err
            })?;

            let mut cache = state.movie_cache.lock().await;
            cache.put(key, fresh.clone());
            fresh
        }
    };

    json_cached(&movie, ttl_secs)
}
