use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

/// User-editable fields of the order intent form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Input,
    Output,
    Price,
}

/// How the entered price is oriented relative to the trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rate {
    Mul,
    Div,
}

impl Default for Rate {
    fn default() -> Self {
        Rate::Mul
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeOrderStatus {
    Submitted,
    Cancelled,
    Executed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Submission,
    Cancellation,
}

/// A resolved token: on-chain address plus decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub decimals: u32,
}

impl TokenInfo {
    pub fn new(address: Address, decimals: u32) -> Self {
        Self { address, decimals }
    }
}

/// Tick-aligned price bounds for a proposed range order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub lower_tick: i32,
    pub lower_price: U256,
    pub upper_tick: i32,
    pub upper_price: U256,
}

/// Transient enablement flags, recomputed on every tick read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEnablement {
    pub upper_enabled: bool,
    pub lower_enabled: bool,
}

impl RangeEnablement {
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Complete fee-inclusive order payload. Built fresh per submission or
/// cancellation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOrderPayload {
    pub pool: Address,
    pub zero_for_one: bool,
    pub tick_threshold: i32,
    pub amount_in: U256,
    pub receiver: Address,
    pub max_fee_amount: U256,
}

/// Denormalized record of a submitted order. Handed to the transaction
/// notification sink once; this crate never reads it back.
///
/// The optional fields mirror what the remote order service may omit, and
/// cancellation validates each one it needs with its own named condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOrderData {
    pub id: U256,
    pub pool: Option<Address>,
    pub zero_for_one: bool,
    pub tick_threshold: Option<i32>,
    pub amount_in: Option<U256>,
    pub receiver: Option<Address>,
    pub start_time: Option<u64>,
    pub submitted_tx_hash: Option<String>,
    pub status: RangeOrderStatus,
    pub updated_at: Option<String>,
    pub fee_token: Option<Address>,
}

/// Nearest valid prices around a requested rate, as reported by the
/// order-library resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearestPrices {
    pub upper_price: U256,
    pub lower_price: U256,
}

/// Nearest valid tick boundaries around a requested rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearTicks {
    pub upper: i32,
    pub lower: i32,
}

/// Handle to a broadcast transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle {
    pub hash: H256,
}

impl TxHandle {
    /// Lower-cased 0x-prefixed hash, as stamped onto order records.
    pub fn hash_lowercase(&self) -> String {
        format!("{:#x}", self.hash)
    }
}

/// Metadata accompanying a pending transaction handed to the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionMetadata {
    pub summary: String,
    pub kind: TransactionKind,
    pub order: RangeOrderData,
}
