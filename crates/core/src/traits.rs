use crate::models::MarketData;
use crate::response::ApiResponse;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Gateway Errors
// ---------------------------------------------------------------------------

/// Errors that can occur inside a gateway operation.
///
/// These never cross the gateway boundary as errors: each one is flattened
/// into the `Err` variant of [`ApiResponse`] using its `Display` text, which
/// is the exact message the consumer sees.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("No token IDs provided")]
    NoTokenIds,
    #[error("TRADING_API_KEY or TRADING_API_SECRET environment variables not set.")]
    MissingCredentials,
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
}

impl<T> From<GatewayError> for ApiResponse<T> {
    fn from(err: GatewayError) -> Self {
        ApiResponse::err(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Market Data Source Trait
// ---------------------------------------------------------------------------

/// A read-only source of token price quotes.
///
/// The feed layer consumes this trait rather than a concrete HTTP gateway, so
/// state-machine behavior can be tested against a canned source.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch current USD quotes for the given token identifiers.
    async fn fetch_market_data(&self, token_ids: &[String]) -> ApiResponse<MarketData>;

    /// Produce the built-in preview quotes. Never fails.
    async fn demo_market_data(&self) -> MarketData;
}
