use crate::core::errors::ExchangeError;
use crate::core::kernel::Signer;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Binance authentication: `X-MBX-APIKEY` header on key-bearing requests
/// and a lowercase-hex HMAC-SHA256 signature over the encoded parameter
/// payload on signed ones.
///
/// The exact header name and hash function are part of the exchange's
/// versioned API contract; the integration tests pin them against
/// recorded request shapes.
pub struct BinanceSigner {
    api_key: String,
    secret_key: Secret<String>,
}

impl BinanceSigner {
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
        }
    }
}

impl Signer for BinanceSigner {
    fn key_header(&self) -> (&str, &str) {
        ("X-MBX-APIKEY", &self.api_key)
    }

    fn sign(&self, payload: &str) -> Result<String, ExchangeError> {
        let secret = self.secret_key.expose_secret();
        // Key-only configurations can serve key-header requests but must
        // not produce a signature from an empty secret.
        if secret.is_empty() {
            return Err(ExchangeError::Auth(
                "signed request requires a secret key, none configured".to_string(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ExchangeError::Auth(format!("failed to create HMAC: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}
