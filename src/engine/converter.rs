use ethers::types::Address;
use rust_decimal::Decimal;

use crate::engine::collaborators::RangeOrderFacade;
use crate::engine::price::{invert, parse_rate, to_significant};
use crate::error::RemoteError;
use crate::models::PriceRange;

/// Convert a user-entered price into tick-aligned range bounds.
///
/// The entered price is in "output per input" terms; when selling token1 it
/// is inverted to the protocol-native rate first. The normalized rate is
/// rendered at the *input* token's significant-digit precision but scaled at
/// the *output* token's decimal precision before the resolver lookups. That
/// asymmetry is intentional and must not be unified.
///
/// Returns `Ok(None)` (no update) unless all four of upper/lower price and
/// upper/lower tick come back present and non-zero; partial results are
/// never published.
pub async fn compute_range_bounds(
    facade: &dyn RangeOrderFacade,
    pool: Address,
    entered_price: Decimal,
    zero_for_one: bool,
    input_decimals: u32,
    output_decimals: u32,
) -> Result<Option<PriceRange>, RemoteError> {
    let native_rate = if zero_for_one {
        entered_price
    } else {
        match invert(entered_price) {
            Some(inverted) => inverted,
            None => return Ok(None),
        }
    };

    let rendered = to_significant(native_rate, input_decimals);
    let parsed_rate = parse_rate(&rendered, output_decimals)?;

    let prices = facade.get_nearest_price(pool, parsed_rate).await?;
    let ticks = facade.get_near_ticks(pool, parsed_rate).await?;

    log::debug!(
        "range lookup for pool {:?} at rate {}: prices=({}, {}), ticks=({}, {})",
        pool,
        parsed_rate,
        prices.upper_price,
        prices.lower_price,
        ticks.upper,
        ticks.lower
    );

    // A zero price or tick is treated as unset by the resolver.
    let complete = !prices.upper_price.is_zero()
        && !prices.lower_price.is_zero()
        && ticks.upper != 0
        && ticks.lower != 0;
    if !complete {
        return Ok(None);
    }

    Ok(Some(PriceRange {
        lower_tick: ticks.lower,
        lower_price: prices.lower_price,
        upper_tick: ticks.upper,
        upper_price: prices.upper_price,
    }))
}
