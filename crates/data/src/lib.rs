pub mod feed;
pub mod gateway;

pub use feed::{FeedState, MarketDataFeed};
pub use gateway::{GatewayConfig, MarketGateway};
