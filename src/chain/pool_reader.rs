use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::providers::{Http, Provider};
use ethers::types::Address;
use std::sync::Arc;

use crate::engine::collaborators::TickSource;
use crate::error::RemoteError;

abigen!(
    UniswapV3Pool,
    r#"[
      {
        "type": "function",
        "name": "slot0",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [
          {"name": "sqrtPriceX96", "type": "uint160"},
          {"name": "tick", "type": "int24"},
          {"name": "observationIndex", "type": "uint16"},
          {"name": "observationCardinality", "type": "uint16"},
          {"name": "observationCardinalityNext", "type": "uint16"},
          {"name": "feeProtocol", "type": "uint8"},
          {"name": "unlocked", "type": "bool"}
        ]
      }
    ]"#
);

/// Reads the current price tick straight from the pool contract.
pub struct PoolTickReader {
    provider: Arc<Provider<Http>>,
}

impl PoolTickReader {
    pub fn new(provider: Arc<Provider<Http>>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TickSource for PoolTickReader {
    async fn current_tick(&self, pool: Address) -> Result<i32, RemoteError> {
        let contract = UniswapV3Pool::new(pool, self.provider.clone());
        let (_sqrt_price_x96, tick, _, _, _, _, _) = contract.slot_0().call().await?;
        log::debug!("slot0 read for pool {:?}: tick {}", pool, tick);
        Ok(tick)
    }
}
