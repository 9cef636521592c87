use crate::models::RangeEnablement;

/// Decide whether each bound of a proposed range is currently crossable.
///
/// The rule is direction-dependent and asymmetric:
/// - selling token0 (zeroForOne): a bound is enabled while the current tick
///   is at or below it;
/// - selling token1: a bound is enabled while the current tick is at or
///   above it.
///
/// `None` for the tick means no pool is resolvable (or the read failed), in
/// which case everything is disabled. Recomputation is event-driven: callers
/// invoke this when the token pair or pool changes, never from a polling
/// loop, and accept staleness in between.
pub fn evaluate_range_enablement(
    current_tick: Option<i32>,
    zero_for_one: bool,
    upper_tick: i32,
    lower_tick: i32,
) -> RangeEnablement {
    let tick = match current_tick {
        Some(tick) => tick,
        None => return RangeEnablement::disabled(),
    };

    if zero_for_one {
        RangeEnablement {
            upper_enabled: tick <= upper_tick,
            lower_enabled: tick <= lower_tick,
        }
    } else {
        RangeEnablement {
            upper_enabled: tick >= upper_tick,
            lower_enabled: tick >= lower_tick,
        }
    }
}
