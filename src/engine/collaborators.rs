use async_trait::async_trait;
use ethers::types::{Address, U256};

use crate::error::RemoteError;
use crate::models::{
    NearTicks, NearestPrices, RangeOrderData, RangeOrderPayload, TransactionKind,
    TransactionMetadata, TxHandle,
};

/// Facade over the remote order-management library.
///
/// This crate never touches the library's encoding or signing internals; it
/// consumes exactly this surface. The signer flag is a precondition gate for
/// the state-changing paths.
#[async_trait]
pub trait RangeOrderFacade: Send + Sync {
    fn has_signer(&self) -> bool;

    async fn get_nearest_price(&self, pool: Address, rate: U256)
        -> Result<NearestPrices, RemoteError>;

    async fn get_near_ticks(&self, pool: Address, rate: U256) -> Result<NearTicks, RemoteError>;

    /// Obtain the canonical order identifier (and any service-side fields)
    /// for a submission before it is broadcast.
    async fn encode_range_order_submission(
        &self,
        pool: Address,
        zero_for_one: bool,
        tick_threshold: i32,
        amount_in: U256,
        receiver: Address,
        max_fee_amount: U256,
    ) -> Result<RangeOrderData, RemoteError>;

    /// Broadcast a submission with `value` attached. `Ok(None)` means the
    /// service reported success but returned no transaction handle.
    async fn set_range_order(
        &self,
        payload: &RangeOrderPayload,
        value: U256,
    ) -> Result<Option<TxHandle>, RemoteError>;

    async fn cancel_range_order(
        &self,
        order_id: U256,
        payload: &RangeOrderPayload,
        start_time: u64,
    ) -> Result<Option<TxHandle>, RemoteError>;
}

/// On-demand read of a pool's current price tick.
#[async_trait]
pub trait TickSource: Send + Sync {
    async fn current_tick(&self, pool: Address) -> Result<i32, RemoteError>;
}

/// Fire-and-forget recording of a pending transaction. Ownership of the
/// order record transfers to the sink.
pub trait TransactionSink: Send + Sync {
    fn add_transaction(&self, tx: &TxHandle, metadata: TransactionMetadata);
}

/// Default sink that only logs; hosts substitute their own persistence.
pub struct LoggingSink;

impl TransactionSink for LoggingSink {
    fn add_transaction(&self, tx: &TxHandle, metadata: TransactionMetadata) {
        let kind = match metadata.kind {
            TransactionKind::Submission => "submission",
            TransactionKind::Cancellation => "cancellation",
        };
        log::info!(
            "pending {} tx {}: {} (order {})",
            kind,
            tx.hash_lowercase(),
            metadata.summary,
            metadata.order.id
        );
    }
}
