use crate::core::kernel::RestClient;
use crate::exchanges::binance::user_stream::{
    CloseUserStreamService, KeepaliveUserStreamService, StartUserStreamService,
};
use crate::exchanges::binance::wallet::{CreateWithdrawService, ListWithdrawsService};

/// Typed Binance spot client: one service constructor per operation.
///
/// Generic over the transport so service logic can be exercised against
/// a stub [`RestClient`] in tests. The client holds no per-call state;
/// concurrent calls share nothing but the underlying connection pool.
pub struct BinanceClient<R: RestClient> {
    rest: R,
}

impl<R: RestClient> BinanceClient<R> {
    pub fn new(rest: R) -> Self {
        Self { rest }
    }

    pub(crate) fn rest(&self) -> &R {
        &self.rest
    }

    /// Submit a withdraw request.
    pub fn create_withdraw(&self) -> CreateWithdrawService<'_, R> {
        CreateWithdrawService::new(self)
    }

    /// Fetch withdraw history.
    pub fn list_withdraws(&self) -> ListWithdrawsService<'_, R> {
        ListWithdrawsService::new(self)
    }

    /// Open a user-data-stream session and obtain its listen key.
    pub fn start_user_stream(&self) -> StartUserStreamService<'_, R> {
        StartUserStreamService::new(self)
    }

    /// Extend the validity window of an existing listen key.
    pub fn keepalive_user_stream(&self) -> KeepaliveUserStreamService<'_, R> {
        KeepaliveUserStreamService::new(self)
    }

    /// Close a user-data-stream session.
    pub fn close_user_stream(&self) -> CloseUserStreamService<'_, R> {
        CloseUserStreamService::new(self)
    }
}
