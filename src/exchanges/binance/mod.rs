pub mod builder;
pub mod client;
pub mod signer;
pub mod types;
pub mod user_stream;
pub mod wallet;

pub use builder::build_client;
pub use client::BinanceClient;
pub use signer::BinanceSigner;
pub use types::{ListenKeyResponse, WithdrawReceipt, WithdrawRecord};
