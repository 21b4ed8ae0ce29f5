use std::env;

/// Portal configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// Base URL of the hosted document store (without `/rest/v1`).
    pub remote_url: String,
    /// API key for the hosted document store.
    pub remote_api_key: String,
    /// Table holding the single newsletter row.
    pub remote_table: String,
    /// Fixed logical identity of the newsletter row.
    pub document_id: String,
    /// Directory for the on-device document mirror.
    pub cache_dir: String,
    /// Argon2 PHC hash gating the admin editor.
    pub admin_password_hash: String,
    /// Change-feed poll interval in seconds.
    pub poll_interval_secs: u64,
    /// Widget roster recompute interval in seconds.
    pub widget_tick_secs: u64,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl PortalConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3040".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            remote_url: env::var("REMOTE_URL")?,
            remote_api_key: env::var("REMOTE_API_KEY")?,
            remote_table: env::var("REMOTE_TABLE").unwrap_or_else(|_| "newsletter".to_string()),
            document_id: env::var("DOCUMENT_ID").unwrap_or_else(|_| "main".to_string()),
            cache_dir: env::var("CACHE_DIR").unwrap_or_else(|_| ".gazette-cache".to_string()),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH")?,
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("POLL_INTERVAL_SECS must be a valid u64"),
            widget_tick_secs: env::var("WIDGET_TICK_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("WIDGET_TICK_SECS must be a valid u64"),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
