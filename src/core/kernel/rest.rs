use crate::core::errors::{ExchangeError, TransportError};
use crate::core::kernel::request::{Encoding, Request, SecurityType};
use crate::core::kernel::signer::{Clock, Signer, SystemClock};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{instrument, trace};

/// Raw HTTP outcome handed to the response decoder: status plus body
/// text, nothing interpreted yet.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Transport interface the service façades dispatch through.
///
/// A single entry point keeps the per-call state machine linear:
/// build → sign (if required) → dispatch, terminal on first failure.
/// Implementations perform no retries; duplicating a withdraw because a
/// response was lost is worse than surfacing the transport error.
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn execute(&self, request: Request) -> Result<RawResponse, ExchangeError>;
}

/// Configuration for the REST dispatcher.
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL the endpoint paths resolve against.
    pub base_url: String,
    /// Exchange name for logging and tracing.
    pub exchange_name: String,
    /// Default request timeout in seconds.
    pub timeout_seconds: u64,
    /// `recvWindow` attached to signed requests unless overridden per call.
    pub recv_window_ms: Option<u64>,
    /// User agent string to include in requests.
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            recv_window_ms: None,
            user_agent: "spotx/0.1".to_string(),
        }
    }

    /// Set the default request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the default `recvWindow` for signed requests.
    #[must_use]
    pub const fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = Some(recv_window_ms);
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for [`ReqwestRest`] instances.
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
    clock: Arc<dyn Clock>,
}

impl RestClientBuilder {
    #[must_use]
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the signer for authenticated requests.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Override the timestamp source. Production code keeps the default
    /// [`SystemClock`]; tests inject a fixed clock to make signatures
    /// reproducible.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::Config(crate::core::config::ConfigError::InvalidConfiguration(
                    format!("failed to build HTTP client: {e}"),
                ))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
            clock: self.clock,
        })
    }
}

/// [`RestClient`] implementation over a pooled reqwest client.
///
/// Read-only after construction; connection reuse and limits are the
/// underlying pool's concern.
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Produce the final encoded parameter payload for a request.
    ///
    /// For signed requests this appends `recvWindow` (when configured),
    /// `timestamp`, and finally `signature`; the returned string is sent
    /// verbatim so the signature covers exactly the bytes on the wire.
    fn finalize_payload(&self, request: &Request) -> Result<String, ExchangeError> {
        if request.security != SecurityType::Signed {
            return Ok(request.params.encode());
        }

        let signer = self.signer.as_ref().ok_or_else(|| {
            ExchangeError::Auth("signed request requires credentials, none configured".to_string())
        })?;

        let mut params = request.params.clone();
        if let Some(recv_window) = request.recv_window.or(self.config.recv_window_ms) {
            params.set("recvWindow", recv_window);
        }
        params.set("timestamp", self.clock.now_millis());

        let payload = params.encode();
        let signature = signer.sign(&payload)?;
        Ok(format!("{payload}&signature={signature}"))
    }

    #[instrument(
        skip(self, request),
        fields(
            exchange = %self.config.exchange_name,
            method = %request.method,
            endpoint = %request.endpoint,
        )
    )]
    async fn dispatch(&self, request: Request) -> Result<RawResponse, ExchangeError> {
        let payload = self.finalize_payload(&request)?;

        let url = if request.encoding == Encoding::Query && !payload.is_empty() {
            format!("{}?{}", self.build_url(&request.endpoint), payload)
        } else {
            self.build_url(&request.endpoint)
        };

        let mut builder = self.client.request(request.method.clone(), &url);

        if request.security != SecurityType::None {
            let signer = self.signer.as_ref().ok_or_else(|| {
                ExchangeError::Auth(
                    "authenticated request requires credentials, none configured".to_string(),
                )
            })?;
            let (name, value) = signer.key_header();
            builder = builder.header(name, value);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if request.encoding == Encoding::Form && !payload.is_empty() {
            builder = builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(payload);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let send = async {
            let response = builder
                .send()
                .await
                .map_err(|e| ExchangeError::from_reqwest(&e))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ExchangeError::from_reqwest(&e))?;

            trace!(status = %status, "response received");
            Ok(RawResponse { status, body })
        };

        // Cancellation wins the race; reqwest drops the in-flight request
        // and returns its connection to the pool.
        match request.cancellation {
            Some(token) => tokio::select! {
                () = token.cancelled() => Err(ExchangeError::Transport(TransportError::Cancelled)),
                result = send => result,
            },
            None => send.await,
        }
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    async fn execute(&self, request: Request) -> Result<RawResponse, ExchangeError> {
        self.dispatch(request).await
    }
}
