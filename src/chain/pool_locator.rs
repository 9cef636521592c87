use ethers::abi::{self, Token};
use ethers::types::{Address, U256};
use ethers::utils::{get_create2_address_from_hash, keccak256};

use crate::error::RemoteError;

/// Uniswap v3 fee tiers, in hundredths of a bip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeAmount {
    Lowest,
    Low,
    Medium,
    High,
}

impl FeeAmount {
    pub fn as_u32(self) -> u32 {
        match self {
            FeeAmount::Lowest => 100,
            FeeAmount::Low => 500,
            FeeAmount::Medium => 3000,
            FeeAmount::High => 10000,
        }
    }
}

/// Deterministically compute a v3 pool address from an unordered token pair
/// and a fee tier.
///
/// Tokens are sorted into the canonical on-chain order (lower address first)
/// before hashing, so the result does not depend on which token the caller
/// treats as input vs. output. Pure function, no chain access.
pub fn compute_pool_address(
    factory: Address,
    token_a: Address,
    token_b: Address,
    fee: FeeAmount,
    init_code_hash: [u8; 32],
) -> Address {
    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };

    let salt = keccak256(abi::encode(&[
        Token::Address(token0),
        Token::Address(token1),
        Token::Uint(U256::from(fee.as_u32())),
    ]));

    get_create2_address_from_hash(factory, salt, init_code_hash)
}

/// Parse a 32-byte init code hash from its hex form (0x-prefix optional).
pub fn parse_init_code_hash(raw: &str) -> Result<[u8; 32], RemoteError> {
    let bytes = hex::decode(raw.trim_start_matches("0x"))?;
    let hash: [u8; 32] = bytes
        .try_into()
        .map_err(|_| "init code hash must be exactly 32 bytes")?;
    Ok(hash)
}
