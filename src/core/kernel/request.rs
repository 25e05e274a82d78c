use crate::core::errors::ExchangeError;
use crate::core::kernel::params::{ParamValue, Params};
use reqwest::Method;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Authentication requirement of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityType {
    /// Public endpoint, no credentials attached.
    None,
    /// API-key header only, no signature.
    ApiKey,
    /// API-key header plus HMAC signature over the encoded parameters.
    Signed,
}

/// Where the encoded parameter payload travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Appended to the URL as the query string.
    Query,
    /// Sent as an `application/x-www-form-urlencoded` body.
    Form,
}

/// Per-call edits applied to a request before dispatch, in order.
///
/// The Go-style variadic options pattern maps to an ordered slice of
/// these, interpreted by [`RequestBuilder::apply`].
#[derive(Debug, Clone)]
pub enum RequestOption {
    /// Attach or override an outgoing header.
    Header(String, String),
    /// Override the `recvWindow` attached to this signed request.
    RecvWindow(u64),
    /// Per-call deadline for the network exchange.
    Timeout(Duration),
    /// Cooperative cancellation for the in-flight call.
    Cancellation(CancellationToken),
}

/// Immutable request descriptor, ready for the dispatcher.
///
/// Produced only by [`RequestBuilder::build`]; nothing mutates it
/// afterwards, so for signed requests the encoded parameter bytes the
/// signature will cover are already final.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub endpoint: String,
    pub security: SecurityType,
    pub encoding: Encoding,
    pub params: Params,
    pub headers: Vec<(String, String)>,
    pub recv_window: Option<u64>,
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

/// Accumulates an operation's method, path, security type and parameters,
/// validates required fields, and freezes the result into a [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    endpoint: String,
    security: SecurityType,
    encoding: Encoding,
    params: Params,
    required: Vec<&'static str>,
    headers: Vec<(String, String)>,
    recv_window: Option<u64>,
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl RequestBuilder {
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<String>, security: SecurityType) -> Self {
        // GETs and DELETEs carry parameters in the query string; mutating
        // verbs default to it as well because the exchange accepts signed
        // payloads in the query for every verb. Form encoding is opt-in.
        Self {
            method,
            endpoint: endpoint.into(),
            security,
            encoding: Encoding::Query,
            params: Params::new(),
            required: Vec::new(),
            headers: Vec::new(),
            recv_window: None,
            timeout: None,
            cancellation: None,
        }
    }

    /// Switch the parameter payload into the request body.
    #[must_use]
    pub fn form_encoded(mut self) -> Self {
        self.encoding = Encoding::Form;
        self
    }

    /// Set a parameter. Last write for a given key wins.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.set(name, value);
        self
    }

    /// Set a parameter only when the caller provided one.
    #[must_use]
    pub fn opt_param<V: Into<ParamValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(name, v),
            None => self,
        }
    }

    /// Declare the fields the exchange rejects the operation without.
    /// Checked at [`build`](Self::build) so a structurally incomplete
    /// request fails before it can reach the network.
    #[must_use]
    pub fn require(mut self, fields: &[&'static str]) -> Self {
        self.required.extend_from_slice(fields);
        self
    }

    /// Apply per-call options in order.
    #[must_use]
    pub fn apply(mut self, opts: &[RequestOption]) -> Self {
        for opt in opts {
            match opt {
                RequestOption::Header(name, value) => {
                    self.headers.push((name.clone(), value.clone()));
                }
                RequestOption::RecvWindow(ms) => self.recv_window = Some(*ms),
                RequestOption::Timeout(timeout) => self.timeout = Some(*timeout),
                RequestOption::Cancellation(token) => self.cancellation = Some(token.clone()),
            }
        }
        self
    }

    /// Validate required fields and freeze the descriptor.
    pub fn build(self) -> Result<Request, ExchangeError> {
        for field in &self.required {
            if !self.params.contains(field) {
                return Err(ExchangeError::Validation(format!(
                    "missing required parameter: {field}"
                )));
            }
        }

        Ok(Request {
            method: self.method,
            endpoint: self.endpoint,
            security: self.security,
            encoding: self.encoding,
            params: self.params,
            headers: self.headers,
            recv_window: self.recv_window,
            timeout: self.timeout,
            cancellation: self.cancellation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_missing_required_field() {
        let result = RequestBuilder::new(
            Method::POST,
            "/sapi/v1/capital/withdraw/apply",
            SecurityType::Signed,
        )
        .param("coin", "BTC")
        .param("address", "bc1qaddr")
        .require(&["coin", "address", "amount"])
        .build();

        match result {
            Err(ExchangeError::Validation(msg)) => {
                assert!(msg.contains("amount"), "unexpected message: {msg}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn build_passes_when_required_fields_present() {
        let request = RequestBuilder::new(Method::GET, "/api/v3/time", SecurityType::None)
            .param("symbol", "BTCUSDT")
            .require(&["symbol"])
            .build()
            .unwrap();

        assert_eq!(request.endpoint, "/api/v3/time");
        assert_eq!(request.params.encode(), "symbol=BTCUSDT");
    }

    #[test]
    fn options_apply_in_order() {
        let opts = vec![
            RequestOption::RecvWindow(1000),
            RequestOption::Header("X-Trace".to_string(), "abc".to_string()),
            RequestOption::RecvWindow(9000),
            RequestOption::Timeout(Duration::from_secs(3)),
        ];

        let request = RequestBuilder::new(Method::GET, "/api/v3/account", SecurityType::Signed)
            .apply(&opts)
            .build()
            .unwrap();

        // Later edits win over earlier ones.
        assert_eq!(request.recv_window, Some(9000));
        assert_eq!(request.timeout, Some(Duration::from_secs(3)));
        assert_eq!(
            request.headers,
            vec![("X-Trace".to_string(), "abc".to_string())]
        );
    }

    #[test]
    fn opt_param_skips_unset_values() {
        let request = RequestBuilder::new(Method::GET, "/x", SecurityType::None)
            .opt_param("limit", Some(10u32))
            .opt_param("offset", None::<u32>)
            .build()
            .unwrap();

        assert_eq!(request.params.encode(), "limit=10");
    }
}
