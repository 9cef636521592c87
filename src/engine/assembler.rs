use std::sync::Arc;

use chrono::Utc;
use ethers::types::{Address, U256};

use crate::config::ChainSettings;
use crate::engine::collaborators::{RangeOrderFacade, TransactionSink};
use crate::error::OrderError;
use crate::models::{
    RangeOrderData, RangeOrderPayload, RangeOrderStatus, TransactionKind, TransactionMetadata,
    TxHandle,
};

/// Everything the assembler needs from the host session. Any missing piece
/// fails the operation with its own named condition before a collaborator is
/// touched.
#[derive(Clone)]
pub struct OrderContext {
    pub facade: Option<Arc<dyn RangeOrderFacade>>,
    pub chain_id: Option<u64>,
    pub pool: Option<Address>,
    pub account: Option<Address>,
    pub input_token: Option<Address>,
}

/// Builds fee-inclusive order payloads and drives submission/cancellation
/// through the order-library facade.
///
/// Chain-indexed fee and wrapped-native tables are injected at construction;
/// there is no ambient global lookup.
pub struct OrderAssembler {
    settings: ChainSettings,
}

impl OrderAssembler {
    pub fn new(settings: ChainSettings) -> Self {
        Self { settings }
    }

    /// Submit a new range order for `amount_in` of the input token.
    ///
    /// When the input token is the chain's wrapped-native currency, the
    /// attached value carries both principal and fee; otherwise only the fee
    /// is attached and the principal moves via token allowance.
    pub async fn submit_order(
        &self,
        ctx: OrderContext,
        zero_for_one: bool,
        tick_threshold: i32,
        amount_in: U256,
        sink: &dyn TransactionSink,
    ) -> Result<TxHandle, OrderError> {
        let facade = ctx.facade.ok_or(OrderError::NoLibrary)?;
        let chain_id = ctx.chain_id.ok_or(OrderError::NoChainId)?;
        if !facade.has_signer() {
            return Err(OrderError::NoSigner);
        }
        let pool = ctx.pool.ok_or(OrderError::NoPool)?;
        let account = ctx.account.ok_or(OrderError::NoAccount)?;

        let max_fee_amount = self
            .settings
            .max_fee_amount(chain_id)
            .ok_or(OrderError::NoFeeConfig(chain_id))?;
        let wrapped_native = self.settings.wrapped_native(chain_id);

        let order = facade
            .encode_range_order_submission(
                pool,
                zero_for_one,
                tick_threshold,
                amount_in,
                account,
                max_fee_amount,
            )
            .await?;

        let payload = RangeOrderPayload {
            pool,
            zero_for_one,
            tick_threshold,
            amount_in,
            receiver: account,
            max_fee_amount,
        };

        let pays_in_native = match (ctx.input_token, wrapped_native) {
            (Some(input), Some(native)) => input == native,
            _ => false,
        };
        let value = if pays_in_native {
            max_fee_amount + amount_in
        } else {
            max_fee_amount
        };

        log::debug!(
            "submitting range order on pool {:?}: amount_in={}, value={}, native={}",
            pool,
            amount_in,
            value,
            pays_in_native
        );

        let tx = facade
            .set_range_order(&payload, value)
            .await?
            .ok_or(OrderError::NoTransaction)?;

        let now = Utc::now().timestamp();
        let record = RangeOrderData {
            submitted_tx_hash: Some(tx.hash_lowercase()),
            status: RangeOrderStatus::Submitted,
            updated_at: Some(now.to_string()),
            fee_token: wrapped_native,
            // Mirrors the attached-value branching above.
            amount_in: Some(value),
            ..order
        };

        sink.add_transaction(
            &tx,
            TransactionMetadata {
                summary: "Order submission".to_string(),
                kind: TransactionKind::Submission,
                order: record,
            },
        );

        Ok(tx)
    }

    /// Cancel a previously submitted order. The payload is rebuilt from the
    /// order's own recorded fields, not from current UI state; only the
    /// direction flag and the receiving account come from the session.
    pub async fn cancel_order(
        &self,
        ctx: OrderContext,
        order: &RangeOrderData,
        zero_for_one: bool,
    ) -> Result<TxHandle, OrderError> {
        log::debug!("cancelling range order {}", order.id);

        let facade = ctx.facade.ok_or(OrderError::NoLibrary)?;
        let chain_id = ctx.chain_id.ok_or(OrderError::NoChainId)?;
        if !facade.has_signer() {
            return Err(OrderError::NoSigner);
        }
        let pool = order.pool.ok_or(OrderError::NoPool)?;
        let account = ctx.account.ok_or(OrderError::NoAccount)?;
        let amount_in = order.amount_in.ok_or(OrderError::NoAmountIn)?;
        let tick_threshold = order.tick_threshold.ok_or(OrderError::NoTickThreshold)?;

        let max_fee_amount = self
            .settings
            .max_fee_amount(chain_id)
            .ok_or(OrderError::NoFeeConfig(chain_id))?;

        let payload = RangeOrderPayload {
            pool,
            zero_for_one,
            tick_threshold,
            amount_in,
            receiver: account,
            max_fee_amount,
        };

        let tx = facade
            .cancel_range_order(order.id, &payload, order.start_time.unwrap_or(0))
            .await?
            .ok_or(OrderError::NoTransaction)?;

        Ok(tx)
    }
}
