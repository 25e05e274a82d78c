use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::RawResponse;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The exchange's documented business-error envelope, returned with a
/// non-2xx status: `{"code": -1013, "msg": "Filter failure"}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    code: i64,
    msg: String,
}

/// Decode a raw response into the operation's typed shape.
///
/// Failure statuses are checked for the error envelope first so exchange
/// rejections surface as [`ExchangeError::Api`] with the native code. A
/// success body that does not match `T` becomes a decoding error carrying
/// the body verbatim; unknown extra fields are tolerated for forward
/// compatibility with API additions.
pub fn decode<T: DeserializeOwned>(raw: &RawResponse) -> Result<T, ExchangeError> {
    check_status(raw)?;

    serde_json::from_str(&raw.body).map_err(|e| ExchangeError::Decode {
        message: format!("failed to parse response: {e}"),
        body: raw.body.clone(),
    })
}

/// Decode a response whose success payload carries no information
/// (the exchange answers `{}` to keepalive and close).
pub fn decode_unit(raw: &RawResponse) -> Result<(), ExchangeError> {
    check_status(raw)
}

fn check_status(raw: &RawResponse) -> Result<(), ExchangeError> {
    if raw.status.is_success() {
        return Ok(());
    }

    match serde_json::from_str::<ErrorEnvelope>(&raw.body) {
        Ok(envelope) => Err(ExchangeError::Api {
            code: envelope.code,
            message: envelope.msg,
        }),
        // Gateway errors and the like answer without the envelope; keep
        // the HTTP status as the code and the body as the message.
        Err(_) => Err(ExchangeError::Api {
            code: i64::from(raw.status.as_u16()),
            message: raw.body.clone(),
        }),
    }
}
