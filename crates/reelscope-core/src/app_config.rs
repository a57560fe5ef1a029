use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub apify_api_token: String,
    pub apify_base_url: String,
    /// Actor id in `owner/name` form.
    pub apify_actor: String,
    /// Upper bound on records requested per profile.
    pub results_per_page: u32,
    /// Report generation is skipped when absent.
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub cache_dir: PathBuf,
    pub cache_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("apify_api_token", &"[redacted]")
            .field("apify_base_url", &self.apify_base_url)
            .field("apify_actor", &self.apify_actor)
            .field("results_per_page", &self.results_per_page)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}
