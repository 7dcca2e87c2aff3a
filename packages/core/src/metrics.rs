//! Prometheus metrics registry for the movie discovery API.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and pass it
//! to the handler state and the HTTP middleware.
//!
//! Exposed at `GET /metrics` in Prometheus text exposition format
//! (`text/plain; version=0.0.4`).

use prometheus::{Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry};

/// Label value for the movie-detail resource kind.
pub const RESOURCE_MOVIE: &str = "movie";
/// Label value for the trending-list resource kind.
pub const RESOURCE_TRENDING: &str = "trending";

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Responses served from the TTL cache, labelled by resource kind.
    pub cache_hits_total: CounterVec,
    /// Cache misses (absent or stale entry), labelled by resource kind.
    pub cache_misses_total: CounterVec,
    /// Requests issued to the upstream metadata service.
    pub upstream_requests_total: Counter,
    /// Upstream requests that ended in an error.
    pub upstream_errors_total: Counter,
    /// HTTP request count, labelled by method, path, and status code.
    pub http_requests_total: CounterVec,
    /// HTTP request latency histogram in seconds.
    pub http_request_duration: Histogram,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated (should not happen in practice).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cache_hits_total = CounterVec::new(
            Opts::new(
                "movie_discovery_cache_hits_total",
                "Responses served from the TTL cache",
            ),
            &["resource"],
        )?;

        let cache_misses_total = CounterVec::new(
            Opts::new(
                "movie_discovery_cache_misses_total",
                "Cache misses (absent or stale entry)",
            ),
            &["resource"],
        )?;

        let upstream_requests_total = Counter::with_opts(Opts::new(
            "movie_discovery_upstream_requests_total",
            "Requests issued to the upstream metadata service",
        ))?;

        let upstream_errors_total = Counter::with_opts(Opts::new(
            "movie_discovery_upstream_errors_total",
            "Upstream requests that ended in an error",
        ))?;

        let http_requests_total = CounterVec::new(
            Opts::new(
                "movie_discovery_http_requests_total",
                "HTTP requests by method, path, and status",
            ),
            &["method", "path", "status"],
        )?;

        let http_request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "movie_discovery_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;

        registry.register(Box::new(cache_hits_total.clone()))?;
        registry.register(Box::new(cache_misses_total.clone()))?;
        registry.register(Box::new(upstream_requests_total.clone()))?;
        registry.register(Box::new(upstream_errors_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;

        Ok(Self {
            cache_hits_total,
            cache_misses_total,
            upstream_requests_total,
            upstream_errors_total,
            http_requests_total,
            http_request_duration,
            registry,
        })
    }

    /// Render all metrics as Prometheus text format (for the `/metrics` endpoint).
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_metrics_register_without_error() {
        let metrics = AppMetrics::new();
        assert!(metrics.is_ok(), "AppMetrics::new() failed: {:?}", metrics.err());
    }

    #[test]
    fn render_contains_metric_names_after_increment() {
        let metrics = AppMetrics::new().unwrap();
        metrics
            .cache_hits_total
            .with_label_values(&[RESOURCE_MOVIE])
            .inc();
        metrics
            .cache_misses_total
            .with_label_values(&[RESOURCE_TRENDING])
            .inc();
        metrics.upstream_requests_total.inc();

        let output = metrics.render().unwrap();
        assert!(output.contains("movie_discovery_cache_hits_total"));
        assert!(output.contains("movie_discovery_cache_misses_total"));
        assert!(output.contains("movie_discovery_upstream_requests_total"));
    }

    #[test]
    fn cache_counters_track_resource_labels_independently() {
        let metrics = AppMetrics::new().unwrap();
        metrics
            .cache_hits_total
            .with_label_values(&[RESOURCE_MOVIE])
            .inc_by(3.0);
        metrics
            .cache_hits_total
            .with_label_values(&[RESOURCE_TRENDING])
            .inc();

        let movie_hits = metrics
            .cache_hits_total
            .with_label_values(&[RESOURCE_MOVIE])
            .get();
        let trending_hits = metrics
            .cache_hits_total
            .with_label_values(&[RESOURCE_TRENDING])
            .get();
        assert!((movie_hits - 3.0).abs() < f64::EPSILON);
        assert!((trending_hits - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn http_requests_counter_vec_labels_work() {
        let metrics = AppMetrics::new().unwrap();
        metrics
            .http_requests_total
            .with_label_values(&["GET", "/api/trending", "200"])
            .inc();
        let val = metrics
            .http_requests_total
            .with_label_values(&["GET", "/api/trending", "200"])
            .get();
        assert!((val - 1.0).abs() < f64::EPSILON);
    }
}
