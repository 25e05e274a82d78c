use crate::core::errors::ExchangeError;
use crate::core::kernel::{codec, RequestBuilder, RequestOption, RestClient, SecurityType};
use crate::exchanges::binance::client::BinanceClient;
use crate::exchanges::binance::types::{WithdrawReceipt, WithdrawRecord};
use reqwest::Method;
use rust_decimal::Decimal;
use tracing::instrument;

/// Submits a withdraw request.
///
/// `coin`, `address` and `amount` are mandatory; the exchange rejects the
/// operation without them, so [`send`](Self::send) fails locally with a
/// validation error before any network call. Setters follow the owned
/// builder shape: unset optionals never reach the wire.
pub struct CreateWithdrawService<'a, R: RestClient> {
    client: &'a BinanceClient<R>,
    coin: Option<String>,
    withdraw_order_id: Option<String>,
    network: Option<String>,
    address: Option<String>,
    address_tag: Option<String>,
    amount: Option<Decimal>,
    transaction_fee_flag: Option<bool>,
    name: Option<String>,
}

impl<'a, R: RestClient> CreateWithdrawService<'a, R> {
    pub(crate) fn new(client: &'a BinanceClient<R>) -> Self {
        Self {
            client,
            coin: None,
            withdraw_order_id: None,
            network: None,
            address: None,
            address_tag: None,
            amount: None,
            transaction_fee_flag: None,
            name: None,
        }
    }

    /// Set the coin to withdraw (mandatory).
    #[must_use]
    pub fn coin(mut self, coin: impl Into<String>) -> Self {
        self.coin = Some(coin.into());
        self
    }

    /// Set a client-side id for the withdraw.
    #[must_use]
    pub fn withdraw_order_id(mut self, id: impl Into<String>) -> Self {
        self.withdraw_order_id = Some(id.into());
        self
    }

    /// Set the transfer network (e.g. `BTC`, `BSC`).
    #[must_use]
    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Set the destination address (mandatory).
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the secondary address identifier (memo/tag).
    #[must_use]
    pub fn address_tag(mut self, tag: impl Into<String>) -> Self {
        self.address_tag = Some(tag.into());
        self
    }

    /// Set the withdraw amount (mandatory). The decimal is rendered
    /// exactly as given; precision is never reformatted.
    #[must_use]
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// When true, the transaction fee is deducted from the remaining
    /// balance instead of the withdrawn amount.
    #[must_use]
    pub fn transaction_fee_flag(mut self, flag: bool) -> Self {
        self.transaction_fee_flag = Some(flag);
        self
    }

    /// Set a description for the destination address.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Send the request.
    #[instrument(skip_all, fields(exchange = "binance", endpoint = "/sapi/v1/capital/withdraw/apply"))]
    pub async fn send(self, opts: &[RequestOption]) -> Result<WithdrawReceipt, ExchangeError> {
        let request = RequestBuilder::new(
            Method::POST,
            "/sapi/v1/capital/withdraw/apply",
            SecurityType::Signed,
        )
        .opt_param("coin", self.coin)
        .opt_param("address", self.address)
        .opt_param("amount", self.amount)
        .opt_param("withdrawOrderId", self.withdraw_order_id)
        .opt_param("network", self.network)
        .opt_param("addressTag", self.address_tag)
        .opt_param("transactionFeeFlag", self.transaction_fee_flag)
        .opt_param("name", self.name)
        .require(&["coin", "address", "amount"])
        .apply(opts)
        .build()?;

        let raw = self.client.rest().execute(request).await?;
        codec::decode(&raw)
    }
}

/// Fetches withdraw history, optionally filtered.
///
/// `start_time`/`end_time` must be supplied together and span at most 90
/// days; the exchange enforces the span, the pairing is checked locally.
pub struct ListWithdrawsService<'a, R: RestClient> {
    client: &'a BinanceClient<R>,
    coin: Option<String>,
    withdraw_order_id: Option<String>,
    status: Option<i32>,
    start_time: Option<i64>,
    end_time: Option<i64>,
    offset: Option<i32>,
    limit: Option<i32>,
}

impl<'a, R: RestClient> ListWithdrawsService<'a, R> {
    pub(crate) fn new(client: &'a BinanceClient<R>) -> Self {
        Self {
            client,
            coin: None,
            withdraw_order_id: None,
            status: None,
            start_time: None,
            end_time: None,
            offset: None,
            limit: None,
        }
    }

    /// Filter by coin.
    #[must_use]
    pub fn coin(mut self, coin: impl Into<String>) -> Self {
        self.coin = Some(coin.into());
        self
    }

    /// Filter by client-side withdraw id.
    #[must_use]
    pub fn withdraw_order_id(mut self, id: impl Into<String>) -> Self {
        self.withdraw_order_id = Some(id.into());
        self
    }

    /// Filter by withdraw status.
    #[must_use]
    pub fn status(mut self, status: i32) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter from this epoch-millisecond time (requires `end_time`).
    #[must_use]
    pub fn start_time(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Filter up to this epoch-millisecond time (requires `start_time`).
    #[must_use]
    pub fn end_time(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Skip this many records.
    #[must_use]
    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Cap the number of records returned.
    #[must_use]
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Send the request.
    #[instrument(skip_all, fields(exchange = "binance", endpoint = "/sapi/v1/capital/withdraw/history"))]
    pub async fn send(self, opts: &[RequestOption]) -> Result<Vec<WithdrawRecord>, ExchangeError> {
        if self.start_time.is_some() != self.end_time.is_some() {
            return Err(ExchangeError::Validation(
                "startTime and endTime must be supplied together".to_string(),
            ));
        }

        let request = RequestBuilder::new(
            Method::GET,
            "/sapi/v1/capital/withdraw/history",
            SecurityType::Signed,
        )
        .opt_param("coin", self.coin)
        .opt_param("withdrawOrderId", self.withdraw_order_id)
        .opt_param("status", self.status)
        .opt_param("startTime", self.start_time)
        .opt_param("endTime", self.end_time)
        .opt_param("offset", self.offset)
        .opt_param("limit", self.limit)
        .apply(opts)
        .build()?;

        let raw = self.client.rest().execute(request).await?;
        codec::decode(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::{RawResponse, Request, RestClient};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transport stub: counts calls, records the last request, answers
    /// with a canned body.
    struct StubRest {
        calls: AtomicUsize,
        last_request: Mutex<Option<Request>>,
        status: StatusCode,
        body: String,
    }

    impl StubRest {
        fn ok(body: &str) -> Self {
            Self::with_status(StatusCode::OK, body)
        }

        fn with_status(status: StatusCode, body: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                status,
                body: body.to_string(),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last(&self) -> Request {
            self.last_request.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl RestClient for StubRest {
        async fn execute(&self, request: Request) -> Result<RawResponse, ExchangeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            Ok(RawResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn client(rest: StubRest) -> BinanceClient<StubRest> {
        BinanceClient::new(rest)
    }

    #[tokio::test]
    async fn withdraw_without_amount_never_reaches_the_network() {
        let client = client(StubRest::ok("{}"));

        let result = client
            .create_withdraw()
            .coin("BTC")
            .address("bc1qaddr")
            .send(&[])
            .await;

        match result {
            Err(ExchangeError::Validation(msg)) => assert!(msg.contains("amount")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(client.rest().call_count(), 0);
    }

    #[tokio::test]
    async fn withdraw_sends_mandatory_and_optional_params_in_order() {
        let client = client(StubRest::ok(r#"{"id":"7213fea8"}"#));

        let receipt = client
            .create_withdraw()
            .coin("BTC")
            .address("bc1qaddr")
            .amount(Decimal::from_str("0.0500").unwrap())
            .network("BTC")
            .transaction_fee_flag(true)
            .send(&[])
            .await
            .unwrap();

        assert_eq!(receipt.id, "7213fea8");
        let request = client.rest().last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.security, SecurityType::Signed);
        assert_eq!(
            request.params.encode(),
            "coin=BTC&address=bc1qaddr&amount=0.0500&network=BTC&transactionFeeFlag=true"
        );
    }

    #[tokio::test]
    async fn withdraw_surfaces_exchange_rejection() {
        let client = client(StubRest::with_status(
            StatusCode::BAD_REQUEST,
            r#"{"code":-1013,"msg":"Filter failure"}"#,
        ));

        let result = client
            .create_withdraw()
            .coin("BTC")
            .address("bc1qaddr")
            .amount(Decimal::from_str("0.00000001").unwrap())
            .send(&[])
            .await;

        match result {
            Err(ExchangeError::Api { code, message }) => {
                assert_eq!(code, -1013);
                assert_eq!(message, "Filter failure");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_withdraws_decodes_every_record() {
        let body = r#"[
            {
                "address": "0x94df8b352de7f46f64b01d3666bf6e936e44ce60",
                "amount": "8.91000000",
                "applyTime": "2019-10-12 11:12:02",
                "coin": "USDT",
                "id": "b6ae22b3aa844210a7041aee7589627c",
                "withdrawOrderId": "WITHDRAWtest123",
                "network": "ETH",
                "transferType": 0,
                "status": 6,
                "transactionFee": "0.004",
                "confirmNo": 3,
                "info": "",
                "txId": "0xb5ef8c13b968a406cc62a93a8bd80f9e9a906ef1b3fcf20a2e48573c17659268"
            },
            {
                "address": "1FZdVHtiBqMrWdjPyRPULCUceZPJ2WLCsB",
                "amount": "0.00150000",
                "applyTime": "2019-09-24 12:43:45",
                "coin": "BTC",
                "id": "156ec387f49b41df8724fa744fa82719",
                "network": "BTC",
                "transferType": 0,
                "status": 6,
                "transactionFee": "0.004",
                "confirmNo": 2,
                "info": "",
                "txId": "60fd9007ebe22048b10958c1a56b28c8dfbf1fca7b7f7affbbda0a07e26530ca"
            }
        ]"#;
        let client = client(StubRest::ok(body));

        let records = client
            .list_withdraws()
            .coin("USDT")
            .limit(100)
            .send(&[])
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].coin, "USDT");
        assert_eq!(records[0].amount, "8.91000000");
        assert_eq!(records[0].withdraw_order_id, "WITHDRAWtest123");
        assert_eq!(records[1].coin, "BTC");
        // withdrawOrderId is absent for the second record.
        assert_eq!(records[1].withdraw_order_id, "");

        let request = client.rest().last();
        assert_eq!(request.params.encode(), "coin=USDT&limit=100");
    }

    #[tokio::test]
    async fn list_withdraws_tolerates_pending_records() {
        // A withdraw still awaiting approval has no txId yet, and an
        // internal transfer carries no network; absent keys decode to
        // their zero values instead of failing the whole history.
        let body = r#"[
            {
                "address": "1FZdVHtiBqMrWdjPyRPULCUceZPJ2WLCsB",
                "amount": "0.00150000",
                "applyTime": "2024-05-01 08:10:15",
                "coin": "BTC",
                "id": "3f1697a2c8f64061b7b1a0b9d046cd6e",
                "transferType": 0,
                "status": 0,
                "transactionFee": "0.0005",
                "confirmNo": 0,
                "info": ""
            }
        ]"#;
        let client = client(StubRest::ok(body));

        let records = client.list_withdraws().send(&[]).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, 0);
        assert_eq!(records[0].tx_id, "");
        assert_eq!(records[0].network, "");
        assert_eq!(records[0].withdraw_order_id, "");
    }

    #[tokio::test]
    async fn list_withdraws_rejects_unpaired_time_range() {
        let client = client(StubRest::ok("[]"));

        let result = client.list_withdraws().start_time(1_700_000_000_000).send(&[]).await;

        assert!(matches!(result, Err(ExchangeError::Validation(_))));
        assert_eq!(client.rest().call_count(), 0);
    }
}
