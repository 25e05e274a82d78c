//! Transport kernel: the exchange-agnostic request pipeline.
//!
//! Every call moves through the same linear pass:
//!
//! 1. [`params`] encodes an ordered parameter mapping into deterministic
//!    `application/x-www-form-urlencoded` bytes.
//! 2. [`request`] freezes method, path, security type and parameters into
//!    an immutable [`Request`] descriptor, applying per-call
//!    [`RequestOption`] edits and rejecting missing mandatory fields
//!    before anything touches the network.
//! 3. [`signer`] defines the pluggable authentication seam; the concrete
//!    HMAC implementation lives with the exchange, not here.
//! 4. [`rest`] resolves the base URL, signs when required, performs the
//!    HTTP exchange and maps transport failures; no retries, ever.
//! 5. [`codec`] turns the raw status/body into a typed value or the
//!    exchange's structured error.
//!
//! The kernel contains no exchange-specific business logic and no shared
//! mutable state; a built client is read-only and safe to share across
//! concurrent calls.

pub mod codec;
pub mod params;
pub mod request;
pub mod rest;
pub mod signer;

pub use params::{ParamValue, Params};
pub use request::{Encoding, Request, RequestBuilder, RequestOption, SecurityType};
pub use rest::{RawResponse, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{Clock, FixedClock, Signer, SystemClock};
