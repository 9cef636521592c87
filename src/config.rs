use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use ethers::types::{Address, U256};

/// Canonical Uniswap v3 factory on mainnet.
pub const DEFAULT_FACTORY_ADDRESS: &str = "0x1F98431c8aD98523631AE4a59f267346ea31F984";
/// Init code hash of the v3 pool contract, used for CREATE2 derivation.
pub const DEFAULT_POOL_INIT_CODE_HASH: &str =
    "0xe34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54";

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub chain_id: u64,

    // Pool derivation
    pub factory_address: String,
    pub pool_init_code_hash: String,

    // Order service contracts
    pub range_order_resolver: String,
    pub range_order_manager: String,

    // Fee accounting
    pub wrapped_native_address: String,
    pub max_fee_amount: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load configuration files (secrets first, then public config)
        dotenv::from_filename("secrets.env").ok();
        dotenv::from_filename("addresses.env").ok();
        dotenv::dotenv().ok();

        Ok(Config {
            rpc_url: env::var("RPC_URL").map_err(|_| "RPC_URL must be set")?,
            chain_id: env::var("CHAIN_ID")
                .map_err(|_| "CHAIN_ID must be set")?
                .parse()
                .map_err(|_| "CHAIN_ID must be a number")?,

            factory_address: env::var("UNISWAP_V3_FACTORY")
                .unwrap_or_else(|_| DEFAULT_FACTORY_ADDRESS.to_string()),
            pool_init_code_hash: env::var("POOL_INIT_CODE_HASH")
                .unwrap_or_else(|_| DEFAULT_POOL_INIT_CODE_HASH.to_string()),

            range_order_resolver: env::var("RANGE_ORDER_RESOLVER")
                .map_err(|_| "RANGE_ORDER_RESOLVER must be set")?,
            range_order_manager: env::var("RANGE_ORDER_MANAGER")
                .map_err(|_| "RANGE_ORDER_MANAGER must be set")?,

            wrapped_native_address: env::var("WRAPPED_NATIVE_ADDRESS")
                .map_err(|_| "WRAPPED_NATIVE_ADDRESS must be set")?,
            max_fee_amount: env::var("MAX_FEE_AMOUNT")
                .map_err(|_| "MAX_FEE_AMOUNT must be set")?,
        })
    }

    /// Settings table for the configured chain, ready to inject into the
    /// order assembler.
    pub fn chain_settings(&self) -> Result<ChainSettings, Box<dyn std::error::Error>> {
        let max_fee = U256::from_dec_str(&self.max_fee_amount)
            .map_err(|_| "MAX_FEE_AMOUNT must be a decimal integer")?;
        let wrapped_native = Address::from_str(&self.wrapped_native_address)?;
        Ok(ChainSettings::new().with_chain(self.chain_id, max_fee, wrapped_native))
    }
}

/// Per-chain fee and wrapped-native tables, injected explicitly rather than
/// looked up through ambient globals.
#[derive(Debug, Clone, Default)]
pub struct ChainSettings {
    max_fee_amounts: HashMap<u64, U256>,
    wrapped_native: HashMap<u64, Address>,
}

impl ChainSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(mut self, chain_id: u64, max_fee_amount: U256, wrapped_native: Address) -> Self {
        self.max_fee_amounts.insert(chain_id, max_fee_amount);
        self.wrapped_native.insert(chain_id, wrapped_native);
        self
    }

    pub fn max_fee_amount(&self, chain_id: u64) -> Option<U256> {
        self.max_fee_amounts.get(&chain_id).copied()
    }

    pub fn wrapped_native(&self, chain_id: u64) -> Option<Address> {
        self.wrapped_native.get(&chain_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_settings_lookup() {
        let weth = Address::from([0xC0; 20]);
        let settings = ChainSettings::new().with_chain(1, U256::from(10u64), weth);

        assert_eq!(settings.max_fee_amount(1), Some(U256::from(10u64)));
        assert_eq!(settings.wrapped_native(1), Some(weth));
        assert_eq!(settings.max_fee_amount(137), None);
        assert_eq!(settings.wrapped_native(137), None);
    }

    #[test]
    fn test_chain_settings_multiple_chains() {
        let settings = ChainSettings::new()
            .with_chain(1, U256::from(10u64), Address::from([0x01; 20]))
            .with_chain(137, U256::from(2_000u64), Address::from([0x02; 20]));

        assert_eq!(settings.max_fee_amount(1), Some(U256::from(10u64)));
        assert_eq!(settings.max_fee_amount(137), Some(U256::from(2_000u64)));
        assert_ne!(settings.wrapped_native(1), settings.wrapped_native(137));
    }

    #[test]
    fn test_default_constants_parse() {
        assert!(Address::from_str(DEFAULT_FACTORY_ADDRESS).is_ok());
        let stripped = DEFAULT_POOL_INIT_CODE_HASH.trim_start_matches("0x");
        assert_eq!(hex::decode(stripped).unwrap().len(), 32);
    }
}
