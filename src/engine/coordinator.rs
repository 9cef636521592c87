use std::sync::Arc;

use ethers::types::{Address, U256};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::chain::pool_locator::{compute_pool_address, FeeAmount};
use crate::engine::assembler::{OrderAssembler, OrderContext};
use crate::engine::collaborators::{RangeOrderFacade, TickSource, TransactionSink};
use crate::engine::converter::compute_range_bounds;
use crate::engine::eligibility::evaluate_range_enablement;
use crate::engine::price::{invert, is_positive_price, to_significant};
use crate::error::{OrderError, RemoteError};
use crate::models::{
    Field, PriceRange, RangeEnablement, RangeOrderData, Rate, TokenInfo, TxHandle,
};

/// Shared order-intent state, read and written by this coordinator and
/// observed by the UI layer.
///
/// `epoch` increases on every dependency change (currency selection, token
/// switch); async computations capture it before suspending and publish only
/// if it is still current, so a superseded result is discarded instead of
/// clobbering a newer one.
#[derive(Debug, Clone, Default)]
pub struct OrderIntentState {
    pub input_token: Option<TokenInfo>,
    pub output_token: Option<TokenInfo>,
    pub typed_input: String,
    pub typed_output: String,
    pub price_value: String,
    pub rate_type: Rate,
    pub zero_for_one: bool,
    pub range: PriceRange,
    pub range_upper_enabled: bool,
    pub range_lower_enabled: bool,
    pub epoch: u64,
}

/// Session-scoped dependencies and derived values. The facade, chain id and
/// account appear once a wallet is connected; the pool is derived from the
/// selected token pair; the tick threshold is picked on the range selector.
struct SessionState {
    facade: Option<Arc<dyn RangeOrderFacade>>,
    chain_id: Option<u64>,
    account: Option<Address>,
    pool: Option<Address>,
    tick_threshold: i32,
}

/// Coordinates the range-order lifecycle: forwards user edits into shared
/// state, derives the pool from the token pair, refreshes range eligibility
/// from the live tick, converts entered prices into tick bounds, and drives
/// submission/cancellation through the order assembler.
///
/// Single logical operation at a time; every remote call is a suspension
/// point with no caller-side timeout or retry.
pub struct RangeOrderCoordinator {
    state: Arc<RwLock<OrderIntentState>>,
    session: RwLock<SessionState>,
    tick_source: Arc<dyn TickSource>,
    sink: Arc<dyn TransactionSink>,
    assembler: OrderAssembler,
    factory: Address,
    init_code_hash: [u8; 32],
    fee_tier: FeeAmount,
}

impl RangeOrderCoordinator {
    pub fn new(
        factory: Address,
        init_code_hash: [u8; 32],
        fee_tier: FeeAmount,
        assembler: OrderAssembler,
        tick_source: Arc<dyn TickSource>,
        sink: Arc<dyn TransactionSink>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(OrderIntentState::default())),
            session: RwLock::new(SessionState {
                facade: None,
                chain_id: None,
                account: None,
                pool: None,
                tick_threshold: 0,
            }),
            tick_source,
            sink,
            assembler,
            factory,
            init_code_hash,
            fee_tier,
        }
    }

    /// Handle to the shared state, for the UI layer to observe.
    pub fn state(&self) -> Arc<RwLock<OrderIntentState>> {
        self.state.clone()
    }

    /// Attach (or detach) wallet-derived session dependencies.
    pub async fn set_session(
        &self,
        chain_id: Option<u64>,
        account: Option<Address>,
        facade: Option<Arc<dyn RangeOrderFacade>>,
    ) {
        let mut session = self.session.write().await;
        session.chain_id = chain_id;
        session.account = account;
        session.facade = facade;
    }

    pub async fn pool(&self) -> Option<Address> {
        self.session.read().await.pool
    }

    pub async fn tick_threshold(&self) -> i32 {
        self.session.read().await.tick_threshold
    }

    pub async fn enablement(&self) -> RangeEnablement {
        let state = self.state.read().await;
        RangeEnablement {
            upper_enabled: state.range_upper_enabled,
            lower_enabled: state.range_lower_enabled,
        }
    }

    /// Forward a field edit into shared state.
    pub async fn handle_input(&self, field: Field, value: String) {
        let mut state = self.state.write().await;
        match field {
            Field::Input => state.typed_input = value,
            Field::Output => state.typed_output = value,
            Field::Price => state.price_value = value,
        }
    }

    /// Select the input or output token. Triggers pool re-derivation and an
    /// eligibility refresh.
    pub async fn handle_currency_selection(
        &self,
        field: Field,
        token: TokenInfo,
    ) -> Result<(), RemoteError> {
        {
            let mut state = self.state.write().await;
            match field {
                Field::Input => state.input_token = Some(token),
                Field::Output => state.output_token = Some(token),
                Field::Price => return Ok(()),
            }
            state.epoch += 1;
        }
        self.on_pair_changed().await
    }

    /// Swap input and output tokens, flipping the trade direction.
    pub async fn handle_switch_tokens(&self) -> Result<(), RemoteError> {
        {
            let mut state = self.state.write().await;
            let state = &mut *state;
            std::mem::swap(&mut state.input_token, &mut state.output_token);
            std::mem::swap(&mut state.typed_input, &mut state.typed_output);
            state.zero_for_one = !state.zero_for_one;
            state.epoch += 1;
        }
        self.on_pair_changed().await
    }

    /// Flip the rate orientation, rewriting the displayed price at six
    /// significant digits.
    pub async fn handle_rate_type(&self, rate_type: Rate, price: Option<Decimal>) {
        let mut state = self.state.write().await;
        match rate_type {
            Rate::Mul => {
                if let Some(p) = price {
                    if let Some(inverted) = invert(p) {
                        state.price_value = to_significant(inverted, 6);
                    }
                }
                state.rate_type = Rate::Div;
            }
            Rate::Div => {
                if let Some(p) = price {
                    state.price_value = to_significant(p, 6);
                }
                state.rate_type = Rate::Mul;
            }
        }
    }

    /// Pick the execution tick from the range selector. A zero tick is
    /// treated as unset and ignored.
    pub async fn handle_range_selection(&self, tick: i32) {
        if tick != 0 {
            self.session.write().await.tick_threshold = tick;
        }
    }

    /// Re-derive the pool from the selected pair and refresh eligibility.
    /// With either token unresolved there is no pool and everything is
    /// disabled.
    async fn on_pair_changed(&self) -> Result<(), RemoteError> {
        let tokens = {
            let state = self.state.read().await;
            state.input_token.zip(state.output_token)
        };

        let pool = tokens.map(|(input, output)| {
            compute_pool_address(
                self.factory,
                input.address,
                output.address,
                self.fee_tier,
                self.init_code_hash,
            )
        });

        {
            let mut session = self.session.write().await;
            session.pool = pool;
        }
        if let Some(pool) = pool {
            log::debug!("token pair resolved to pool {:?}", pool);
        }

        self.refresh_eligibility().await
    }

    /// Read the pool's current tick and publish fresh enablement flags.
    ///
    /// The state epoch captured before the read guards publication: if a
    /// dependency changed while the read was in flight, the stale result is
    /// dropped. A failed read disables both bounds and surfaces the error.
    pub async fn refresh_eligibility(&self) -> Result<(), RemoteError> {
        let (epoch, zero_for_one, upper_tick, lower_tick) = {
            let state = self.state.read().await;
            (
                state.epoch,
                state.zero_for_one,
                state.range.upper_tick,
                state.range.lower_tick,
            )
        };
        let pool = self.session.read().await.pool;

        let (enablement, failure) = match pool {
            None => (RangeEnablement::disabled(), None),
            Some(pool) => match self.tick_source.current_tick(pool).await {
                Ok(tick) => (
                    evaluate_range_enablement(Some(tick), zero_for_one, upper_tick, lower_tick),
                    None,
                ),
                Err(err) => {
                    log::warn!("tick read failed for pool {:?}: {}", pool, err);
                    (RangeEnablement::disabled(), Some(err))
                }
            },
        };

        {
            let mut state = self.state.write().await;
            if state.epoch == epoch {
                state.range_upper_enabled = enablement.upper_enabled;
                state.range_lower_enabled = enablement.lower_enabled;
            } else {
                log::debug!("discarding superseded eligibility refresh");
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Convert an explicitly updated price into tick-aligned range bounds
    /// and publish them.
    ///
    /// Only reacts to the price field with a positive entered value. A
    /// missing library, chain id or signer is a hard failure; a missing pool
    /// or unusable price silently produces no update, as does a partial
    /// resolver result.
    pub async fn update_range(
        &self,
        field: Field,
        price: Decimal,
    ) -> Result<Option<PriceRange>, OrderError> {
        {
            let state = self.state.read().await;
            if field != Field::Price || !is_positive_price(&state.price_value) {
                return Ok(None);
            }
        }

        let (facade, pool) = {
            let session = self.session.read().await;
            let facade = session.facade.clone().ok_or(OrderError::NoLibrary)?;
            session.chain_id.ok_or(OrderError::NoChainId)?;
            if !facade.has_signer() {
                return Err(OrderError::NoSigner);
            }
            match session.pool {
                Some(pool) => (facade, pool),
                None => return Ok(None),
            }
        };

        let (input_token, output_token, zero_for_one) = {
            let state = self.state.read().await;
            (state.input_token, state.output_token, state.zero_for_one)
        };
        let (input_token, output_token) = match input_token.zip(output_token) {
            Some(pair) => pair,
            None => return Ok(None),
        };

        let range = compute_range_bounds(
            facade.as_ref(),
            pool,
            price,
            zero_for_one,
            input_token.decimals,
            output_token.decimals,
        )
        .await?;

        if let Some(range) = &range {
            let mut state = self.state.write().await;
            state.range = range.clone();
            log::debug!(
                "range updated: ticks [{}, {}]",
                range.lower_tick,
                range.upper_tick
            );
        }

        Ok(range)
    }

    /// Assemble and submit a range order for `amount_in` of the input token.
    pub async fn submit_order(&self, amount_in: U256) -> Result<TxHandle, OrderError> {
        let (ctx, tick_threshold) = self.order_context().await;
        let zero_for_one = self.state.read().await.zero_for_one;
        self.assembler
            .submit_order(
                ctx,
                zero_for_one,
                tick_threshold,
                amount_in,
                self.sink.as_ref(),
            )
            .await
    }

    /// Cancel a previously submitted order using its own recorded fields.
    pub async fn cancel_order(&self, order: &RangeOrderData) -> Result<TxHandle, OrderError> {
        let (ctx, _) = self.order_context().await;
        let zero_for_one = self.state.read().await.zero_for_one;
        self.assembler.cancel_order(ctx, order, zero_for_one).await
    }

    async fn order_context(&self) -> (OrderContext, i32) {
        let session = self.session.read().await;
        let input_token = self.state.read().await.input_token.map(|t| t.address);
        (
            OrderContext {
                facade: session.facade.clone(),
                chain_id: session.chain_id,
                pool: session.pool,
                account: session.account,
                input_token,
            },
            session.tick_threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainSettings;
    use crate::engine::testing::{MockFacade, MockTickSource, RecordingSink};
    use crate::models::{NearTicks, NearestPrices};
    use std::str::FromStr;

    const CHAIN_ID: u64 = 1;

    fn native() -> Address {
        Address::from([0xEE; 20])
    }

    fn coordinator(tick_source: Arc<dyn TickSource>) -> RangeOrderCoordinator {
        let settings = ChainSettings::new().with_chain(CHAIN_ID, U256::from(10u64), native());
        RangeOrderCoordinator::new(
            Address::from([0xFA; 20]),
            [0x11; 32],
            FeeAmount::Low,
            OrderAssembler::new(settings),
            tick_source,
            Arc::new(RecordingSink::new()),
        )
    }

    async fn select_pair(coordinator: &RangeOrderCoordinator) {
        coordinator
            .handle_currency_selection(Field::Input, TokenInfo::new(Address::from([0x01; 20]), 18))
            .await
            .unwrap();
        coordinator
            .handle_currency_selection(Field::Output, TokenInfo::new(Address::from([0x02; 20]), 6))
            .await
            .unwrap();
    }

    async fn seed_range(coordinator: &RangeOrderCoordinator, upper: i32, lower: i32) {
        let mut state = coordinator.state.write().await;
        state.range.upper_tick = upper;
        state.range.lower_tick = lower;
    }

    #[tokio::test]
    async fn test_input_edits_land_in_state() {
        let c = coordinator(Arc::new(MockTickSource::with_tick(0)));
        c.handle_input(Field::Input, "1.5".to_string()).await;
        c.handle_input(Field::Price, "2000".to_string()).await;

        let state = c.state.read().await;
        assert_eq!(state.typed_input, "1.5");
        assert_eq!(state.price_value, "2000");
        assert_eq!(state.typed_output, "");
    }

    #[tokio::test]
    async fn test_no_pool_until_both_tokens_resolved() {
        let tick_source = Arc::new(MockTickSource::with_tick(100));
        let c = coordinator(tick_source.clone());

        c.handle_currency_selection(Field::Input, TokenInfo::new(Address::from([0x01; 20]), 18))
            .await
            .unwrap();
        assert_eq!(c.pool().await, None);
        // No pool, no tick read, flags stay disabled.
        assert_eq!(tick_source.reads(), 0);
        assert_eq!(c.enablement().await, RangeEnablement::disabled());

        c.handle_currency_selection(Field::Output, TokenInfo::new(Address::from([0x02; 20]), 6))
            .await
            .unwrap();
        assert!(c.pool().await.is_some());
        assert_eq!(tick_source.reads(), 1);
    }

    #[tokio::test]
    async fn test_eligibility_zero_for_one_scenario() {
        // direction=true, tick=100, upper=150, lower=80
        let c = coordinator(Arc::new(MockTickSource::with_tick(100)));
        {
            let mut state = c.state.write().await;
            state.zero_for_one = true;
        }
        seed_range(&c, 150, 80).await;
        select_pair(&c).await;

        let e = c.enablement().await;
        assert!(e.upper_enabled);
        assert!(!e.lower_enabled);
    }

    #[tokio::test]
    async fn test_eligibility_one_for_zero_scenario() {
        // direction=false, tick=100, upper=90, lower=120
        let c = coordinator(Arc::new(MockTickSource::with_tick(100)));
        seed_range(&c, 90, 120).await;
        select_pair(&c).await;

        let e = c.enablement().await;
        assert!(e.upper_enabled);
        assert!(!e.lower_enabled);
    }

    #[tokio::test]
    async fn test_failed_tick_read_disables_and_surfaces_error() {
        let c = coordinator(Arc::new(MockTickSource::failing("rpc unreachable")));
        seed_range(&c, 150, 80).await;

        c.handle_currency_selection(Field::Input, TokenInfo::new(Address::from([0x01; 20]), 18))
            .await
            .unwrap();
        let result = c
            .handle_currency_selection(Field::Output, TokenInfo::new(Address::from([0x02; 20]), 6))
            .await;

        assert!(result.is_err());
        assert_eq!(c.enablement().await, RangeEnablement::disabled());
    }

    #[tokio::test]
    async fn test_superseded_refresh_is_discarded() {
        // The tick source bumps the state epoch mid-read, simulating a
        // dependency change landing while the read is in flight.
        let c = Arc::new(coordinator(Arc::new(MockTickSource::with_tick(100))));
        seed_range(&c, 50, 80).await;
        select_pair(&c).await;

        // Flags now published for tick=100 (both bounds enabled).
        let before = c.enablement().await;
        assert!(before.upper_enabled && before.lower_enabled);

        let state = c.state();
        let interfering = Arc::new(MockTickSource::with_tick(-500).with_hook({
            let state = state.clone();
            move || {
                // No writer holds the state lock across the tick read, so
                // the uncontended try_write always succeeds.
                state.try_write().unwrap().epoch += 1;
            }
        }));
        let c2 = RangeOrderCoordinator {
            state: c.state(),
            session: RwLock::new(SessionState {
                facade: None,
                chain_id: None,
                account: None,
                pool: Some(Address::from([0x99; 20])),
                tick_threshold: 0,
            }),
            tick_source: interfering,
            sink: Arc::new(RecordingSink::new()),
            assembler: OrderAssembler::new(ChainSettings::new()),
            factory: Address::from([0xFA; 20]),
            init_code_hash: [0x11; 32],
            fee_tier: FeeAmount::Low,
        };

        c2.refresh_eligibility().await.unwrap();

        // tick=-500 would have flipped both flags off; the stale result
        // must have been discarded instead.
        let after = c.enablement().await;
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_switch_tokens_flips_direction_and_swaps_pair() {
        let c = coordinator(Arc::new(MockTickSource::with_tick(0)));
        select_pair(&c).await;
        c.handle_input(Field::Input, "5".to_string()).await;

        let pool_before = c.pool().await;
        c.handle_switch_tokens().await.unwrap();

        let state = c.state.read().await;
        assert_eq!(state.input_token.unwrap().decimals, 6);
        assert_eq!(state.output_token.unwrap().decimals, 18);
        assert_eq!(state.typed_output, "5");
        assert!(state.zero_for_one);
        drop(state);

        // Same unordered pair, same pool.
        assert_eq!(c.pool().await, pool_before);
    }

    #[tokio::test]
    async fn test_rate_type_flip_rewrites_price_at_six_digits() {
        let c = coordinator(Arc::new(MockTickSource::with_tick(0)));
        let price = Decimal::from_str("4").unwrap();

        c.handle_rate_type(Rate::Mul, Some(price)).await;
        {
            let state = c.state.read().await;
            assert_eq!(state.price_value, "0.25");
            assert_eq!(state.rate_type, Rate::Div);
        }

        let price = Decimal::from_str("1234.56789").unwrap();
        c.handle_rate_type(Rate::Div, Some(price)).await;
        {
            let state = c.state.read().await;
            assert_eq!(state.price_value, "1234.57");
            assert_eq!(state.rate_type, Rate::Mul);
        }
    }

    #[tokio::test]
    async fn test_range_selection_ignores_zero_tick() {
        let c = coordinator(Arc::new(MockTickSource::with_tick(0)));
        c.handle_range_selection(120).await;
        assert_eq!(c.tick_threshold().await, 120);

        c.handle_range_selection(0).await;
        assert_eq!(c.tick_threshold().await, 120);
    }

    #[tokio::test]
    async fn test_update_range_ignores_non_price_fields() {
        let c = coordinator(Arc::new(MockTickSource::with_tick(0)));
        c.handle_input(Field::Price, "2000".to_string()).await;
        let price = Decimal::from_str("2000").unwrap();

        let result = c.update_range(Field::Input, price).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_range_requires_library_and_signer() {
        let c = coordinator(Arc::new(MockTickSource::with_tick(0)));
        c.handle_input(Field::Price, "2000".to_string()).await;
        let price = Decimal::from_str("2000").unwrap();

        let err = c.update_range(Field::Price, price).await.unwrap_err();
        assert!(matches!(err, OrderError::NoLibrary));

        let unsigned: Arc<dyn RangeOrderFacade> = Arc::new(MockFacade::new().without_signer());
        c.set_session(Some(CHAIN_ID), None, Some(unsigned)).await;
        let err = c.update_range(Field::Price, price).await.unwrap_err();
        assert!(matches!(err, OrderError::NoSigner));
    }

    #[tokio::test]
    async fn test_update_range_without_pool_is_silent() {
        let c = coordinator(Arc::new(MockTickSource::with_tick(0)));
        c.handle_input(Field::Price, "2000".to_string()).await;
        let facade: Arc<dyn RangeOrderFacade> = Arc::new(MockFacade::new());
        c.set_session(Some(CHAIN_ID), None, Some(facade)).await;

        let price = Decimal::from_str("2000").unwrap();
        let result = c.update_range(Field::Price, price).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_range_publishes_bounds() {
        let c = coordinator(Arc::new(MockTickSource::with_tick(100)));
        select_pair(&c).await;
        c.handle_input(Field::Price, "2000".to_string()).await;

        let facade = Arc::new(
            MockFacade::new()
                .with_nearest_prices(NearestPrices {
                    upper_price: U256::from(2_100u64),
                    lower_price: U256::from(1_900u64),
                })
                .with_near_ticks(NearTicks {
                    upper: 150,
                    lower: 80,
                }),
        );
        c.set_session(
            Some(CHAIN_ID),
            None,
            Some(facade.clone() as Arc<dyn RangeOrderFacade>),
        )
        .await;

        let price = Decimal::from_str("2000").unwrap();
        let range = c
            .update_range(Field::Price, price)
            .await
            .unwrap()
            .expect("range should publish");
        assert_eq!(range.upper_tick, 150);

        let state = c.state.read().await;
        assert_eq!(state.range.upper_tick, 150);
        assert_eq!(state.range.lower_tick, 80);
    }
}
