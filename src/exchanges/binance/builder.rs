use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::binance::client::BinanceClient;
use crate::exchanges::binance::signer::BinanceSigner;
use std::sync::Arc;

const MAINNET_URL: &str = "https://api.binance.com";
const TESTNET_URL: &str = "https://testnet.binance.vision";

/// Create a Binance spot client from process configuration.
///
/// Resolves the base URL (testnet flag, then explicit override, then
/// mainnet) and attaches the signer whenever an API key is present: the
/// key header alone serves key-only operations, and signed ones
/// additionally need the secret. Without any key only public endpoints
/// will succeed.
pub fn build_client(config: &ExchangeConfig) -> Result<BinanceClient<ReqwestRest>, ExchangeError> {
    let base_url = if config.testnet {
        TESTNET_URL.to_string()
    } else {
        config
            .base_url
            .clone()
            .unwrap_or_else(|| MAINNET_URL.to_string())
    };

    let rest_config = RestClientConfig::new(base_url, "binance".to_string())
        .with_timeout(30)
        .with_recv_window(config.recv_window_ms);

    let mut rest_builder = RestClientBuilder::new(rest_config);
    if config.has_api_key() {
        let signer = Arc::new(BinanceSigner::new(
            config.api_key().to_string(),
            config.secret_key().to_string(),
        ));
        rest_builder = rest_builder.with_signer(signer);
    }

    Ok(BinanceClient::new(rest_builder.build()?))
}
