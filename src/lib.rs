pub mod core;
pub mod exchanges;

pub use core::config::ExchangeConfig;
pub use core::errors::{ExchangeError, TransportError};
pub use exchanges::binance::{build_client, BinanceClient};
