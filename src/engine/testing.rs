//! Mock collaborators for unit and integration tests.

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::engine::collaborators::{RangeOrderFacade, TickSource, TransactionSink};
use crate::error::RemoteError;
use crate::models::{
    NearTicks, NearestPrices, RangeOrderData, RangeOrderPayload, RangeOrderStatus,
    TransactionMetadata, TxHandle,
};

/// Invocation log shared across all facade calls, so tests can assert that
/// precondition failures never reached a collaborator.
#[derive(Default)]
pub struct CallLog {
    price_lookups: AtomicUsize,
    tick_lookups: AtomicUsize,
    encodes: AtomicUsize,
    submissions: AtomicUsize,
    cancellations: AtomicUsize,
    last_rate: Mutex<Option<U256>>,
    last_value: Mutex<Option<U256>>,
    last_payload: Mutex<Option<RangeOrderPayload>>,
    last_cancellation: Mutex<Option<(U256, RangeOrderPayload, u64)>>,
}

impl CallLog {
    pub fn price_lookups(&self) -> usize {
        self.price_lookups.load(Ordering::SeqCst)
    }
    pub fn tick_lookups(&self) -> usize {
        self.tick_lookups.load(Ordering::SeqCst)
    }
    pub fn encodes(&self) -> usize {
        self.encodes.load(Ordering::SeqCst)
    }
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
    pub fn cancellations(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }
    pub fn total(&self) -> usize {
        self.price_lookups()
            + self.tick_lookups()
            + self.encodes()
            + self.submissions()
            + self.cancellations()
    }
    pub fn last_rate(&self) -> Option<U256> {
        *self.last_rate.lock().unwrap()
    }
    pub fn last_value(&self) -> Option<U256> {
        *self.last_value.lock().unwrap()
    }
    pub fn last_payload(&self) -> Option<RangeOrderPayload> {
        self.last_payload.lock().unwrap().clone()
    }
    pub fn last_cancellation(&self) -> Option<(U256, RangeOrderPayload, u64)> {
        self.last_cancellation.lock().unwrap().clone()
    }
}

/// Configurable in-memory stand-in for the order-library facade.
pub struct MockFacade {
    pub calls: CallLog,
    signer: bool,
    fail: bool,
    nearest_prices: Option<NearestPrices>,
    near_ticks: Option<NearTicks>,
    tx: Option<TxHandle>,
    encoded_id: U256,
    encoded_start_time: Option<u64>,
}

impl MockFacade {
    pub fn new() -> Self {
        Self {
            calls: CallLog::default(),
            signer: true,
            fail: false,
            nearest_prices: None,
            near_ticks: None,
            tx: Some(TxHandle {
                hash: H256::from([0xAB; 32]),
            }),
            encoded_id: U256::one(),
            encoded_start_time: None,
        }
    }

    pub fn without_signer(mut self) -> Self {
        self.signer = false;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_nearest_prices(mut self, prices: NearestPrices) -> Self {
        self.nearest_prices = Some(prices);
        self
    }

    pub fn with_near_ticks(mut self, ticks: NearTicks) -> Self {
        self.near_ticks = Some(ticks);
        self
    }

    /// Simulate a service that reports success without a transaction handle.
    pub fn with_no_tx(mut self) -> Self {
        self.tx = None;
        self
    }

    pub fn with_encoded_id(mut self, id: U256) -> Self {
        self.encoded_id = id;
        self
    }

    pub fn with_encoded_start_time(mut self, start_time: u64) -> Self {
        self.encoded_start_time = Some(start_time);
        self
    }

    fn check_failure(&self) -> Result<(), RemoteError> {
        if self.fail {
            Err("mock remote failure".into())
        } else {
            Ok(())
        }
    }
}

impl Default for MockFacade {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RangeOrderFacade for MockFacade {
    fn has_signer(&self) -> bool {
        self.signer
    }

    async fn get_nearest_price(
        &self,
        _pool: Address,
        rate: U256,
    ) -> Result<NearestPrices, RemoteError> {
        self.check_failure()?;
        self.calls.price_lookups.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_rate.lock().unwrap() = Some(rate);
        self.nearest_prices
            .ok_or_else(|| "no nearest prices configured".into())
    }

    async fn get_near_ticks(&self, _pool: Address, rate: U256) -> Result<NearTicks, RemoteError> {
        self.check_failure()?;
        self.calls.tick_lookups.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_rate.lock().unwrap() = Some(rate);
        self.near_ticks
            .ok_or_else(|| "no near ticks configured".into())
    }

    async fn encode_range_order_submission(
        &self,
        pool: Address,
        zero_for_one: bool,
        tick_threshold: i32,
        amount_in: U256,
        receiver: Address,
        _max_fee_amount: U256,
    ) -> Result<RangeOrderData, RemoteError> {
        self.check_failure()?;
        self.calls.encodes.fetch_add(1, Ordering::SeqCst);
        Ok(RangeOrderData {
            id: self.encoded_id,
            pool: Some(pool),
            zero_for_one,
            tick_threshold: Some(tick_threshold),
            amount_in: Some(amount_in),
            receiver: Some(receiver),
            start_time: self.encoded_start_time,
            submitted_tx_hash: None,
            status: RangeOrderStatus::Submitted,
            updated_at: None,
            fee_token: None,
        })
    }

    async fn set_range_order(
        &self,
        payload: &RangeOrderPayload,
        value: U256,
    ) -> Result<Option<TxHandle>, RemoteError> {
        self.check_failure()?;
        self.calls.submissions.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_value.lock().unwrap() = Some(value);
        *self.calls.last_payload.lock().unwrap() = Some(payload.clone());
        Ok(self.tx)
    }

    async fn cancel_range_order(
        &self,
        order_id: U256,
        payload: &RangeOrderPayload,
        start_time: u64,
    ) -> Result<Option<TxHandle>, RemoteError> {
        self.check_failure()?;
        self.calls.cancellations.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_cancellation.lock().unwrap() =
            Some((order_id, payload.clone(), start_time));
        Ok(self.tx)
    }
}

/// Tick source returning a fixed tick, an error, or running a hook first
/// (used to simulate a dependency change landing mid-read).
pub struct MockTickSource {
    tick: Result<i32, String>,
    reads: AtomicUsize,
    hook: Option<Box<dyn Fn() + Send + Sync>>,
}

impl MockTickSource {
    pub fn with_tick(tick: i32) -> Self {
        Self {
            tick: Ok(tick),
            reads: AtomicUsize::new(0),
            hook: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            tick: Err(message.to_string()),
            reads: AtomicUsize::new(0),
            hook: None,
        }
    }

    pub fn with_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TickSource for MockTickSource {
    async fn current_tick(&self, _pool: Address) -> Result<i32, RemoteError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = &self.hook {
            hook();
        }
        match &self.tick {
            Ok(tick) => Ok(*tick),
            Err(message) => Err(message.clone().into()),
        }
    }
}

/// Sink that records every hand-off for inspection.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<(TxHandle, TransactionMetadata)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(TxHandle, TransactionMetadata)> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionSink for RecordingSink {
    fn add_transaction(&self, tx: &TxHandle, metadata: TransactionMetadata) {
        self.records.lock().unwrap().push((*tx, metadata));
    }
}
