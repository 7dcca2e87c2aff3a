use std::env;
use std::path::PathBuf;

use crate::cli::Cli;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MOVIE_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_TRENDING_CACHE_TTL_SECS: u64 = 1800;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FAVORITES_DIR: &str = "./data";

#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream credential. Optional at startup: without it the service
    /// still boots, but every metadata request fails `Misconfigured`
    /// before any network attempt.
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub bind_addr: String,
    pub movie_cache_ttl_secs: u64,
    pub trending_cache_ttl_secs: u64,
    pub upstream_timeout_secs: u64,
    pub favorites_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source so tests do not need to
    /// mutate process-wide environment state.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let tmdb_api_key = var("TMDB_API_KEY").filter(|key| !key.is_empty());

        let tmdb_base_url =
            var("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let movie_cache_ttl_secs =
            parse_secs(&var, "MOVIE_CACHE_TTL_SECS", DEFAULT_MOVIE_CACHE_TTL_SECS)?;
        let trending_cache_ttl_secs = parse_secs(
            &var,
            "TRENDING_CACHE_TTL_SECS",
            DEFAULT_TRENDING_CACHE_TTL_SECS,
        )?;
        let upstream_timeout_secs =
            parse_secs(&var, "UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS)?;

        let favorites_dir = var("FAVORITES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FAVORITES_DIR));

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url,
            bind_addr,
            movie_cache_ttl_secs,
            trending_cache_ttl_secs,
            upstream_timeout_secs,
            favorites_dir,
        })
    }

    /// CLI flags take precedence over environment variables.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(bind) = &cli.bind {
            self.bind_addr = bind.clone();
        }
        if let Some(base_url) = &cli.tmdb_base_url {
            self.tmdb_base_url = base_url.clone();
        }
        if let Some(ttl) = cli.movie_ttl_secs {
            self.movie_cache_ttl_secs = ttl;
        }
        if let Some(ttl) = cli.trending_ttl_secs {
            self.trending_cache_ttl_secs = ttl;
        }
        if let Some(dir) = &cli.favorites_dir {
            self.favorites_dir = dir.clone();
        }
    }
}

fn parse_secs(
    var: impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<u64, String> {
    match var(name) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("{} must be a non-negative number of seconds", name)),
        None => Ok(default),
    }
}
