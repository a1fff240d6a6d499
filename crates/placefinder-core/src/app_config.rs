use std::net::SocketAddr;

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
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    pub api_keys: Vec<String>,
    pub llm_api_key: Option<String>,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_max_retries: u32,
    pub llm_base_delay_ms: u64,
    pub llm_timeout_ms: u64,
    pub geocode_api_key: Option<String>,
    pub geocode_url: String,
    pub geocode_timeout_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("cors_origins", &self.cors_origins)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_api_url", &self.llm_api_url)
            .field("llm_model", &self.llm_model)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_base_delay_ms", &self.llm_base_delay_ms)
            .field("llm_timeout_ms", &self.llm_timeout_ms)
            .field(
                "geocode_api_key",
                &self.geocode_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocode_url", &self.geocode_url)
            .field("geocode_timeout_ms", &self.geocode_timeout_ms)
            .finish()
    }
}
