pub mod pool_locator;
pub mod pool_reader;
pub mod providers;
pub mod range_orders_client;
