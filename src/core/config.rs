use secrecy::{ExposeSecret, Secret};
use std::env;

/// Default clock-skew tolerance the exchange applies to signed requests,
/// in milliseconds.
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

/// Process-wide client configuration: credentials, environment selection
/// and signed-request defaults. Read-only after construction and safe to
/// share across concurrent calls.
#[derive(Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub testnet: bool,
    pub base_url: Option<String>,
    pub recv_window_ms: u64,
}

// Credentials never appear in debug output.
impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("testnet", &self.testnet)
            .field("base_url", &self.base_url)
            .field("recv_window_ms", &self.recv_window_ms)
            .finish()
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials.
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet: false,
            base_url: None,
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_KEY` (e.g., `BINANCE_API_KEY`)
    /// - `{PREFIX}_SECRET_KEY` (e.g., `BINANCE_SECRET_KEY`)
    /// - `{PREFIX}_TESTNET` (optional, defaults to false)
    /// - `{PREFIX}_BASE_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let api_key_var = format!("{}_API_KEY", prefix.to_uppercase());
        let secret_key_var = format!("{}_SECRET_KEY", prefix.to_uppercase());
        let testnet_var = format!("{}_TESTNET", prefix.to_uppercase());
        let base_url_var = format!("{}_BASE_URL", prefix.to_uppercase());

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;
        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let testnet = env::var(&testnet_var)
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);
        let base_url = env::var(&base_url_var).ok();

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet,
            base_url,
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
        })
    }

    /// Configuration without credentials, for public endpoints only.
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Whether this configuration can serve signed operations.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.has_api_key() && !self.secret_key.expose_secret().is_empty()
    }

    /// Whether this configuration can attach the API-key header.
    /// Key-only operations (user-stream lifecycle) need no secret.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Set testnet mode.
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Set a custom base URL, overriding environment selection.
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the default `recvWindow` attached to signed requests.
    #[must_use]
    pub const fn recv_window_ms(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    /// Get API key (use carefully - exposes secret).
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret).
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
