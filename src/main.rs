use range_order_engine::bootstrap::AppState;
use range_order_engine::config::Config;
use range_order_engine::engine::collaborators::RangeOrderFacade;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::from_env().expect("Failed to load configuration");

    let app_state = AppState::new(&config).expect("Failed to initialize application state");

    log::info!(
        "range order engine ready on chain {} (resolver {}, manager {})",
        config.chain_id,
        config.range_order_resolver,
        config.range_order_manager
    );
    log::info!(
        "signer attached: {}",
        app_state.range_orders_client.has_signer()
    );
}
