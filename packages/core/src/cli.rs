use std::path::PathBuf;

use clap::Parser;

/// Movie discovery API CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "movie-discovery",
    version,
    about = "Trending movies and movie details, proxied from TMDB with a TTL cache"
)]
pub struct Cli {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long)]
    pub bind: Option<String>,

    /// TMDB API base URL
    #[arg(long)]
    pub tmdb_base_url: Option<String>,

    /// Movie detail cache TTL in seconds
    #[arg(long)]
    pub movie_ttl_secs: Option<u64>,

    /// Trending list cache TTL in seconds
    #[arg(long)]
    pub trending_ttl_secs: Option<u64>,

    /// Directory where the favorites list is persisted
    #[arg(long)]
    pub favorites_dir: Option<PathBuf>,
}
