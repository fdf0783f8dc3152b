use serde::Deserialize;

use crate::services::genre_affinity::AffinityConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Jikan REST API base URL
    #[serde(default = "default_jikan_api_url")]
    pub jikan_api_url: String,

    /// User-Agent header sent with every upstream request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Fraction of the most frequent genre's count a genre needs to qualify
    #[serde(default = "default_genre_threshold_ratio")]
    pub genre_threshold_ratio: f64,

    /// Lower bound on the qualifying count
    #[serde(default = "default_genre_min_count")]
    pub genre_min_count: usize,
}

fn default_jikan_api_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_user_agent() -> String {
    format!("anime-recommender/{}", env!("CARGO_PKG_VERSION"))
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_genre_threshold_ratio() -> f64 {
    0.6
}

fn default_genre_min_count() -> usize {
    1
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects tuning values that would make every or no genre qualify
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.genre_threshold_ratio > 0.0 && self.genre_threshold_ratio <= 1.0) {
            anyhow::bail!(
                "GENRE_THRESHOLD_RATIO must be in (0, 1], got {}",
                self.genre_threshold_ratio
            );
        }
        if self.genre_min_count == 0 {
            anyhow::bail!("GENRE_MIN_COUNT must be at least 1");
        }
        Ok(())
    }

    pub fn affinity(&self) -> AffinityConfig {
        AffinityConfig {
            threshold_ratio: self.genre_threshold_ratio,
            min_count: self.genre_min_count,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
