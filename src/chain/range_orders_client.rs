use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;
use ethers::types::{Address, U256};
use std::sync::Arc;

use crate::engine::collaborators::RangeOrderFacade;
use crate::error::RemoteError;
use crate::models::{
    NearTicks, NearestPrices, RangeOrderData, RangeOrderPayload, RangeOrderStatus, TxHandle,
};

abigen!(
    RangeOrderResolver,
    r#"[
      {
        "type": "function",
        "name": "getNearestPrice",
        "stateMutability": "view",
        "inputs": [
          {"name": "pool", "type": "address"},
          {"name": "rate", "type": "uint256"}
        ],
        "outputs": [
          {"name": "upperPrice", "type": "uint256"},
          {"name": "lowerPrice", "type": "uint256"}
        ]
      },
      {
        "type": "function",
        "name": "getNearTicks",
        "stateMutability": "view",
        "inputs": [
          {"name": "pool", "type": "address"},
          {"name": "rate", "type": "uint256"}
        ],
        "outputs": [
          {"name": "upper", "type": "int24"},
          {"name": "lower", "type": "int24"}
        ]
      },
      {
        "type": "function",
        "name": "encodeRangeOrderSubmission",
        "stateMutability": "view",
        "inputs": [
          {"name": "pool", "type": "address"},
          {"name": "zeroForOne", "type": "bool"},
          {"name": "tickThreshold", "type": "int24"},
          {"name": "amountIn", "type": "uint256"},
          {"name": "receiver", "type": "address"},
          {"name": "maxFeeAmount", "type": "uint256"}
        ],
        "outputs": [
          {"name": "id", "type": "uint256"},
          {"name": "startTime", "type": "uint256"}
        ]
      }
    ]"#
);

abigen!(
    RangeOrderManager,
    r#"[
      {
        "type": "function",
        "name": "setRangeOrder",
        "stateMutability": "payable",
        "inputs": [
          {"name": "pool", "type": "address"},
          {"name": "zeroForOne", "type": "bool"},
          {"name": "tickThreshold", "type": "int24"},
          {"name": "amountIn", "type": "uint256"},
          {"name": "receiver", "type": "address"},
          {"name": "maxFeeAmount", "type": "uint256"}
        ],
        "outputs": []
      },
      {
        "type": "function",
        "name": "cancelRangeOrder",
        "stateMutability": "nonpayable",
        "inputs": [
          {"name": "orderId", "type": "uint256"},
          {"name": "pool", "type": "address"},
          {"name": "zeroForOne", "type": "bool"},
          {"name": "tickThreshold", "type": "int24"},
          {"name": "amountIn", "type": "uint256"},
          {"name": "receiver", "type": "address"},
          {"name": "maxFeeAmount", "type": "uint256"},
          {"name": "startTime", "type": "uint256"}
        ],
        "outputs": []
      }
    ]"#
);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Ethers-backed implementation of the order-library facade.
///
/// View calls (nearest price/ticks, submission encoding) go through the
/// resolver contract on the plain provider; state-changing calls require a
/// signer to be attached.
pub struct RangeOrdersClient {
    provider: Arc<Provider<Http>>,
    signer: Option<Arc<SignerClient>>,
    resolver: Address,
    manager: Address,
}

impl RangeOrdersClient {
    pub fn new(provider: Arc<Provider<Http>>, resolver: Address, manager: Address) -> Self {
        Self {
            provider,
            signer: None,
            resolver,
            manager,
        }
    }

    pub fn with_signer(mut self, wallet: LocalWallet) -> Self {
        let client = SignerMiddleware::new((*self.provider).clone(), wallet);
        self.signer = Some(Arc::new(client));
        self
    }

    fn signing_client(&self) -> Result<Arc<SignerClient>, RemoteError> {
        self.signer
            .clone()
            .ok_or_else(|| "no signer attached to range orders client".into())
    }
}

#[async_trait]
impl RangeOrderFacade for RangeOrdersClient {
    fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    async fn get_nearest_price(
        &self,
        pool: Address,
        rate: U256,
    ) -> Result<NearestPrices, RemoteError> {
        let resolver = RangeOrderResolver::new(self.resolver, self.provider.clone());
        let (upper_price, lower_price) = resolver.get_nearest_price(pool, rate).call().await?;
        Ok(NearestPrices {
            upper_price,
            lower_price,
        })
    }

    async fn get_near_ticks(&self, pool: Address, rate: U256) -> Result<NearTicks, RemoteError> {
        let resolver = RangeOrderResolver::new(self.resolver, self.provider.clone());
        let (upper, lower) = resolver.get_near_ticks(pool, rate).call().await?;
        Ok(NearTicks { upper, lower })
    }

    async fn encode_range_order_submission(
        &self,
        pool: Address,
        zero_for_one: bool,
        tick_threshold: i32,
        amount_in: U256,
        receiver: Address,
        max_fee_amount: U256,
    ) -> Result<RangeOrderData, RemoteError> {
        let resolver = RangeOrderResolver::new(self.resolver, self.provider.clone());
        let (id, start_time) = resolver
            .encode_range_order_submission(
                pool,
                zero_for_one,
                tick_threshold,
                amount_in,
                receiver,
                max_fee_amount,
            )
            .call()
            .await?;

        Ok(RangeOrderData {
            id,
            pool: Some(pool),
            zero_for_one,
            tick_threshold: Some(tick_threshold),
            amount_in: Some(amount_in),
            receiver: Some(receiver),
            start_time: Some(start_time.as_u64()),
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
        let client = self.signing_client()?;
        let manager = RangeOrderManager::new(self.manager, client);
        let call = manager
            .set_range_order(
                payload.pool,
                payload.zero_for_one,
                payload.tick_threshold,
                payload.amount_in,
                payload.receiver,
                payload.max_fee_amount,
            )
            .value(value);

        let pending = call.send().await?;
        let hash = pending.tx_hash();
        log::info!("range order submission broadcast: {:#x}", hash);
        Ok(Some(TxHandle { hash }))
    }

    async fn cancel_range_order(
        &self,
        order_id: U256,
        payload: &RangeOrderPayload,
        start_time: u64,
    ) -> Result<Option<TxHandle>, RemoteError> {
        let client = self.signing_client()?;
        let manager = RangeOrderManager::new(self.manager, client);
        let call = manager.cancel_range_order(
            order_id,
            payload.pool,
            payload.zero_for_one,
            payload.tick_threshold,
            payload.amount_in,
            payload.receiver,
            payload.max_fee_amount,
            U256::from(start_time),
        );

        let pending = call.send().await?;
        let hash = pending.tx_hash();
        log::info!("range order cancellation broadcast: {:#x}", hash);
        Ok(Some(TxHandle { hash }))
    }
}
