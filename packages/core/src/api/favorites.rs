//! Favorites endpoints: a server-side rendition of the client favorites
//! hook, backed by [`crate::favorites::FavoritesStore`].

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::AppError;

use super::{parse_movie_id, FavoritesState};

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: u64,
    pub favorite: bool,
}

/// `GET /api/favorites` — favorite ids in insertion order.
pub async fn list_favorites(State(store): State<FavoritesState>) -> Json<Vec<u64>> {
    Json(store.lock().await.list().to_vec())
}

/// `PUT /api/favorites/{id}` — add and return the updated list.
pub async fn add_favorite(
    State(store): State<FavoritesState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<u64>>, AppError> {
    let id = parse_movie_id(&raw_id)?;
    let mut store = store.lock().await;
    store.add(id);
    Ok(Json(store.list().to_vec()))
}

/// `DELETE /api/favorites/{id}` — remove and return the updated list.
pub async fn remove_favorite(
    State(store): State<FavoritesState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<u64>>, AppError> {
    let id = parse_movie_id(&raw_id)?;
    let mut store = store.lock().await;
    store.remove(id);
    Ok(Json(store.list().to_vec()))
}

/// `POST /api/favorites/{id}/toggle` — flip membership.
pub async fn toggle_favorite(
    State(store): State<FavoritesState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    let id = parse_movie_id(&raw_id)?;
    let favorite = store.lock().await.toggle(id);
    Ok(Json(ToggleResponse { id, favorite }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        routing::{delete, get, post, put},
        Router,
    };
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use crate::favorites::{FavoritesStore, InMemoryStorage, FAVORITES_KEY};

    use super::*;

    fn app() -> Router {
        app_seeded(None)
    }

    fn app_seeded(raw: Option<&str>) -> Router {
        let storage = match raw {
            Some(raw) => InMemoryStorage::new().seed(FAVORITES_KEY, raw),
            None => InMemoryStorage::new(),
        };
        let store = Arc::new(Mutex::new(FavoritesStore::load(Box::new(storage))));
        Router::new()
            .route("/api/favorites", get(list_favorites))
            .route("/api/favorites/:id", put(add_favorite))
            .route("/api/favorites/:id", delete(remove_favorite))
            .route("/api/favorites/:id/toggle", post(toggle_favorite))
            .with_state(store)
    }

    async fn send(app: &Router, method: Method, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn ids(response: axum::response::Response) -> Vec<u64> {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn list_starts_empty() {
        let app = app();
        let response = send(&app, Method::GET, "/api/favorites").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(ids(response).await.is_empty());
    }

    #[tokio::test]
    async fn add_then_list_preserves_order() {
        let app = app();
        send(&app, Method::PUT, "/api/favorites/3").await;
        send(&app, Method::PUT, "/api/favorites/1").await;
        let response = send(&app, Method::PUT, "/api/favorites/2").await;
        assert_eq!(ids(response).await, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn delete_removes_id() {
        let app = app_seeded(Some("[1,2,3]"));
        let response = send(&app, Method::DELETE, "/api/favorites/2").await;
        assert_eq!(ids(response).await, vec![1, 3]);
    }

    #[tokio::test]
    async fn toggle_reports_membership() {
        let app = app();

        let on = send(&app, Method::POST, "/api/favorites/7/toggle").await;
        let body = to_bytes(on.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["favorite"], true);
        assert_eq!(json["id"], 7);

        let off = send(&app, Method::POST, "/api/favorites/7/toggle").await;
        let body = to_bytes(off.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["favorite"], false);
    }

    #[tokio::test]
    async fn invalid_ids_are_rejected() {
        let app = app();
        for (method, uri) in [
            (Method::PUT, "/api/favorites/abc"),
            (Method::DELETE, "/api/favorites/-1"),
            (Method::POST, "/api/favorites/0/toggle"),
        ] {
            let response = send(&app, method, uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn corrupt_persisted_list_is_healed_before_serving() {
        let app = app_seeded(Some(r#"[1, -5, "x", 7]"#));
        let response = send(&app, Method::GET, "/api/favorites").await;
        assert_eq!(ids(response).await, vec![1, 7]);
    }
}
