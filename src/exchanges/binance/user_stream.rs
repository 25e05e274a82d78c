use crate::core::errors::ExchangeError;
use crate::core::kernel::{codec, RequestBuilder, RequestOption, RestClient, SecurityType};
use crate::exchanges::binance::client::BinanceClient;
use crate::exchanges::binance::types::ListenKeyResponse;
use reqwest::Method;
use tracing::instrument;

const USER_STREAM_ENDPOINT: &str = "/api/v3/userDataStream";

/// Opens a user-data-stream session.
///
/// The returned listen key identifies a server-side push session. Its
/// lifecycle is the consumer's responsibility: keep it alive via
/// [`KeepaliveUserStreamService`] before the server-side expiry window
/// and close it on shutdown. This client does not manage that schedule.
pub struct StartUserStreamService<'a, R: RestClient> {
    client: &'a BinanceClient<R>,
}

impl<'a, R: RestClient> StartUserStreamService<'a, R> {
    pub(crate) fn new(client: &'a BinanceClient<R>) -> Self {
        Self { client }
    }

    /// Send the request and return the listen key.
    #[instrument(skip_all, fields(exchange = "binance", endpoint = USER_STREAM_ENDPOINT))]
    pub async fn send(self, opts: &[RequestOption]) -> Result<String, ExchangeError> {
        let request = RequestBuilder::new(Method::POST, USER_STREAM_ENDPOINT, SecurityType::ApiKey)
            .apply(opts)
            .build()?;

        let raw = self.client.rest().execute(request).await?;
        let response: ListenKeyResponse = codec::decode(&raw)?;
        Ok(response.listen_key)
    }
}

/// Extends the validity window of a listen key.
pub struct KeepaliveUserStreamService<'a, R: RestClient> {
    client: &'a BinanceClient<R>,
    listen_key: Option<String>,
}

impl<'a, R: RestClient> KeepaliveUserStreamService<'a, R> {
    pub(crate) fn new(client: &'a BinanceClient<R>) -> Self {
        Self {
            client,
            listen_key: None,
        }
    }

    /// Set the listen key to refresh (mandatory).
    #[must_use]
    pub fn listen_key(mut self, listen_key: impl Into<String>) -> Self {
        self.listen_key = Some(listen_key.into());
        self
    }

    /// Send the request.
    #[instrument(skip_all, fields(exchange = "binance", endpoint = USER_STREAM_ENDPOINT))]
    pub async fn send(self, opts: &[RequestOption]) -> Result<(), ExchangeError> {
        let request = RequestBuilder::new(Method::PUT, USER_STREAM_ENDPOINT, SecurityType::ApiKey)
            .form_encoded()
            .opt_param("listenKey", self.listen_key)
            .require(&["listenKey"])
            .apply(opts)
            .build()?;

        let raw = self.client.rest().execute(request).await?;
        codec::decode_unit(&raw)
    }
}

/// Closes a user-data-stream session.
pub struct CloseUserStreamService<'a, R: RestClient> {
    client: &'a BinanceClient<R>,
    listen_key: Option<String>,
}

impl<'a, R: RestClient> CloseUserStreamService<'a, R> {
    pub(crate) fn new(client: &'a BinanceClient<R>) -> Self {
        Self {
            client,
            listen_key: None,
        }
    }

    /// Set the listen key to close (mandatory).
    #[must_use]
    pub fn listen_key(mut self, listen_key: impl Into<String>) -> Self {
        self.listen_key = Some(listen_key.into());
        self
    }

    /// Send the request.
    #[instrument(skip_all, fields(exchange = "binance", endpoint = USER_STREAM_ENDPOINT))]
    pub async fn send(self, opts: &[RequestOption]) -> Result<(), ExchangeError> {
        let request =
            RequestBuilder::new(Method::DELETE, USER_STREAM_ENDPOINT, SecurityType::ApiKey)
                .form_encoded()
                .opt_param("listenKey", self.listen_key)
                .require(&["listenKey"])
                .apply(opts)
                .build()?;

        let raw = self.client.rest().execute(request).await?;
        codec::decode_unit(&raw)
    }
}
