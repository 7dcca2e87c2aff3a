//! Client for the upstream TMDB metadata service.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::models::{Movie, TimeWindow, TrendingPage};

#[derive(Clone)]
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl TmdbClient {
    /// Build a client with the given request timeout. A timed-out call
    /// surfaces as `UpstreamUnavailable`.
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Internal(format!("failed to build HTTP client: {}", err)))?;

        Ok(Self {
            base_url,
            api_key,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch full details for a single movie.
    pub async fn movie_details(&self, id: u64) -> Result<Movie, AppError> {
        let url = format!("{}/movie/{}", self.base_url, id);
        self.get(&url, || format!("movie with id {} not found", id))
            .await
    }

    /// Fetch one page of trending movies for the given time window.
    pub async fn trending(&self, window: TimeWindow) -> Result<TrendingPage, AppError> {
        let url = format!("{}/trending/movie/{}", self.base_url, window.as_str());
        self.get(&url, || format!("no trending list for window {}", window))
            .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        not_found: impl Fn() -> String,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| AppError::UpstreamUnavailable {
                status: None,
                message: if err.is_timeout() {
                    "TMDB request timed out".to_string()
                } else {
                    format!("TMDB request failed: {}", err)
                },
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(not_found()));
        }
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                message: format!("TMDB returned HTTP {}", status),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| AppError::UpstreamUnavailable {
                status: None,
                message: format!("failed to decode TMDB response: {}", err),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TmdbClient {
        TmdbClient::new(
            server.uri(),
            "test-key".to_string(),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn movie_details_parses_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/550"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 550,
                "title": "Fight Club",
                "vote_average": 8.4,
                "vote_count": 26280
            })))
            .mount(&server)
            .await;

        let movie = client_for(&server).movie_details(550).await.unwrap();
        assert_eq!(movie.id, 550);
        assert_eq!(movie.title, "Fight Club");
    }

    #[tokio::test]
    async fn movie_details_maps_upstream_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).movie_details(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn movie_details_maps_upstream_500_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/42"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).movie_details(42).await.unwrap_err();
        match err {
            AppError::UpstreamUnavailable { status, .. } => assert_eq!(status, Some(500)),
            other => panic!("expected UpstreamUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).movie_details(7).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::UpstreamUnavailable { status: None, .. }
        ));
    }

    #[tokio::test]
    async fn timeout_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": 1, "title": "Slow"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = TmdbClient::new(
            server.uri(),
            "test-key".to_string(),
            Duration::from_millis(50),
        )
        .unwrap();

        let err = client.movie_details(1).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::UpstreamUnavailable { status: None, .. }
        ));
    }

    #[tokio::test]
    async fn trending_hits_window_specific_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/movie/day"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 1,
                "results": [{"id": 9, "title": "Today", "vote_average": 7.2, "vote_count": 12}],
                "total_pages": 1,
                "total_results": 1
            })))
            .mount(&server)
            .await;

        let page = client_for(&server).trending(TimeWindow::Day).await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].title, "Today");
    }
}
