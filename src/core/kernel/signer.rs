use crate::core::errors::ExchangeError;
use std::time::{SystemTime, UNIX_EPOCH};

/// Request authentication interface.
///
/// The kernel stays exchange-agnostic: it knows *when* a request needs a
/// key header or a signature, while implementations supply the header
/// name and the signature algorithm. Signing is a pure function of the
/// encoded payload and the configured secret, so a fixed [`Clock`] makes
/// the whole signed request deterministic under test.
pub trait Signer: Send + Sync {
    /// Header attached to every key-bearing request, as `(name, value)`.
    fn key_header(&self) -> (&str, &str);

    /// Compute the signature over the exact encoded payload bytes.
    fn sign(&self, payload: &str) -> Result<String, ExchangeError>;
}

/// Source of the `timestamp` parameter on signed requests.
pub trait Clock: Send + Sync {
    /// Current time as epoch milliseconds.
    fn now_millis(&self) -> u64;
}

/// Wall-clock implementation used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Fixed clock for deterministic signature tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}
