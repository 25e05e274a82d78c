use thiserror::Error;

/// Network-level failure: the exchange never produced a business response.
///
/// Kept separate from [`ExchangeError::Api`] so callers can distinguish
/// "the request may or may not have reached the exchange" from "the
/// exchange rejected it". The core never retries either kind.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request deadline exceeded")]
    Timeout,

    #[error("request cancelled by caller")]
    Cancelled,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(String),
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Missing or malformed input, caught before any network call.
    #[error("invalid parameters: {0}")]
    Validation(String),

    /// Signing or credential misconfiguration.
    #[error("authentication error: {0}")]
    Auth(String),

    /// No response received; see [`TransportError`] for the kind.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The exchange rejected the request with its documented error
    /// envelope. Codes may indicate permanent business rejection
    /// (insufficient balance, filter failure), so these are never retried.
    #[error("api error: {code} - {message}")]
    Api { code: i64, message: String },

    /// Response body did not match the expected shape. The raw body is
    /// kept verbatim for diagnostics.
    #[error("decoding error: {message}")]
    Decode { message: String, body: String },

    #[error("configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    /// Translate a transport-layer failure from reqwest into the error
    /// taxonomy without losing the failure kind.
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(TransportError::Timeout)
        } else if err.is_connect() {
            Self::Transport(TransportError::Connect(err.to_string()))
        } else {
            Self::Transport(TransportError::Network(err.to_string()))
        }
    }
}
