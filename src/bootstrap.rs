use std::str::FromStr;
use std::sync::Arc;

use ethers::types::Address;

use crate::chain::pool_locator::{parse_init_code_hash, FeeAmount};
use crate::chain::pool_reader::PoolTickReader;
use crate::chain::providers;
use crate::chain::range_orders_client::RangeOrdersClient;
use crate::config::Config;
use crate::engine::assembler::OrderAssembler;
use crate::engine::collaborators::LoggingSink;
use crate::engine::coordinator::RangeOrderCoordinator;

/// Wired application state: provider, order-library client, and the
/// lifecycle coordinator.
///
/// The client carries no signer at this point; once a wallet connects, the
/// host attaches it via `RangeOrdersClient::with_signer` and hands the
/// result to `coordinator.set_session` together with chain id and account.
pub struct AppState {
    pub provider: Arc<ethers::providers::Provider<ethers::providers::Http>>,
    pub range_orders_client: Arc<RangeOrdersClient>,
    pub coordinator: RangeOrderCoordinator,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let provider = providers::create_provider(&config.rpc_url)?;

        let factory = Address::from_str(&config.factory_address)?;
        let init_code_hash = parse_init_code_hash(&config.pool_init_code_hash)
            .map_err(|e| e as Box<dyn std::error::Error>)?;
        let resolver = Address::from_str(&config.range_order_resolver)?;
        let manager = Address::from_str(&config.range_order_manager)?;

        let range_orders_client = Arc::new(RangeOrdersClient::new(
            provider.clone(),
            resolver,
            manager,
        ));

        let coordinator = RangeOrderCoordinator::new(
            factory,
            init_code_hash,
            FeeAmount::Low,
            OrderAssembler::new(config.chain_settings()?),
            Arc::new(PoolTickReader::new(provider.clone())),
            Arc::new(LoggingSink),
        );

        Ok(AppState {
            provider,
            range_orders_client,
            coordinator,
        })
    }
}
