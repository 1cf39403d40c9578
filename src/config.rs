use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file holding the movie catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// JSON file holding the similarity table, one row per catalog entry
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Feature vectorizer from the offline pipeline. Only checked for presence.
    #[serde(default)]
    pub vectorizer_path: Option<String>,

    /// Image host prefix prepended to poster paths
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Poster returned when a movie has no poster path
    #[serde(default = "default_placeholder_poster_url")]
    pub placeholder_poster_url: String,

    /// Number of recommendations when the request does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Largest count a request may ask for
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,

    /// Origins allowed by CORS, comma separated
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_catalog_path() -> String {
    "data/movies.json".to_string()
}

fn default_similarity_path() -> String {
    "data/similarity.json".to_string()
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_placeholder_poster_url() -> String {
    "https://via.placeholder.com/500x750?text=No+Image".to_string()
}

fn default_top_n() -> usize {
    6
}

fn default_max_top_n() -> usize {
    100
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
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

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_n > self.max_top_n {
            anyhow::bail!(
                "DEFAULT_TOP_N ({}) exceeds MAX_TOP_N ({})",
                self.default_top_n,
                self.max_top_n
            );
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
