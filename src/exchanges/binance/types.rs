use serde::Deserialize;

/// Confirmation returned by a successful withdraw submission.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawReceipt {
    /// Exchange-assigned withdraw id.
    pub id: String,
}

/// A single entry from the withdraw history.
///
/// Every field defaults when absent: the exchange omits keys that do not
/// apply yet (a withdraw awaiting approval has no `txId`, an internal
/// transfer has no `network`), and one such record must not fail the
/// whole history decode.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawRecord {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub amount: String,
    #[serde(rename = "applyTime", default)]
    pub apply_time: String,
    #[serde(default)]
    pub coin: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "withdrawOrderId", default)]
    pub withdraw_order_id: String,
    #[serde(default)]
    pub network: String,
    #[serde(rename = "transferType", default)]
    pub transfer_type: i32,
    #[serde(default)]
    pub status: i32,
    #[serde(rename = "transactionFee", default)]
    pub transaction_fee: String,
    #[serde(rename = "confirmNo", default)]
    pub confirm_no: i32,
    #[serde(default)]
    pub info: String,
    #[serde(rename = "txId", default)]
    pub tx_id: String,
}

/// Response from opening a user-data-stream session.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenKeyResponse {
    #[serde(rename = "listenKey")]
    pub listen_key: String,
}
