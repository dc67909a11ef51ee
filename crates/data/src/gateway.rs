use async_trait::async_trait;
use botswarm_core::{
    AccountBalance, ApiResponse, GatewayError, MarketData, MarketDataSource, TokenQuote,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Public quote endpoint (CoinGecko).
pub const DEFAULT_PUBLIC_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// Private exchange endpoint. No real backend is wired up; balance calls
/// against it only succeed in tests with a simulated peer.
pub const DEFAULT_PRIVATE_API_BASE: &str = "https://api.my-exchange.com/v1";

/// Configuration for the market data gateway.
///
/// Credentials live here instead of being read ambiently per call, so the
/// missing-credentials path is testable without touching the process
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the public price endpoint.
    pub public_api_base: String,
    /// Base URL of the private account endpoint.
    pub private_api_base: String,
    /// API key for the private endpoint.
    pub api_key: Option<String>,
    /// API secret for the private endpoint. Sent as-is in the signature
    /// header; a production integration would sign the request instead.
    pub api_secret: Option<String>,
    /// Simulated latency of the demo quote path, in milliseconds.
    pub demo_latency_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            public_api_base: DEFAULT_PUBLIC_API_BASE.to_string(),
            private_api_base: DEFAULT_PRIVATE_API_BASE.to_string(),
            api_key: None,
            api_secret: None,
            demo_latency_ms: 1000,
        }
    }
}

impl GatewayConfig {
    /// Default endpoints with credentials taken from the `TRADING_API_KEY`
    /// and `TRADING_API_SECRET` environment variables, if set.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("TRADING_API_KEY").ok().filter(|v| !v.is_empty()),
            api_secret: std::env::var("TRADING_API_SECRET")
                .ok()
                .filter(|v| !v.is_empty()),
            ..Self::default()
        }
    }
}

/// Stateless gateway issuing outbound reads against the quote and account
/// endpoints.
///
/// Every operation resolves to an [`ApiResponse`]; no failure escapes as an
/// error. One `reqwest::Client` is shared across calls for connection reuse.
pub struct MarketGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl MarketGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Fetch current USD quotes for the given token identifiers.
    ///
    /// An empty identifier list fails fast without touching the network.
    pub async fn fetch_market_data(&self, token_ids: &[String]) -> ApiResponse<MarketData> {
        if token_ids.is_empty() {
            warn!("fetch_market_data called with no token ids");
            return GatewayError::NoTokenIds.into();
        }

        let ids = token_ids.join(",");
        let url = format!("{}/simple/price", self.config.public_api_base);
        info!(ids = %ids, "Fetching market data");

        let request = self
            .http
            .get(&url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", "usd")]);

        match self.get_json::<MarketData>(request).await {
            Ok(data) => {
                debug!(tokens = data.len(), "Fetched price data");
                ApiResponse::ok(data)
            }
            Err(err) => {
                error!(url = %url, error = %err, "Market data request failed");
                err.into()
            }
        }
    }

    /// Fetch the account balance from the private, authenticated endpoint.
    ///
    /// Fails closed when either credential is missing from the config; a
    /// request is never sent with partial credentials.
    pub async fn account_balance(&self) -> ApiResponse<AccountBalance> {
        let (api_key, api_secret) = match (&self.config.api_key, &self.config.api_secret) {
            (Some(key), Some(secret)) => (key, secret),
            _ => {
                error!("account balance requested without credentials configured");
                return GatewayError::MissingCredentials.into();
            }
        };

        let url = format!("{}/account/balance", self.config.private_api_base);
        info!("Fetching private account balance");

        let request = self
            .http
            .get(&url)
            .header("X-API-KEY", api_key)
            .header("X-API-SIGNATURE", api_secret)
            .header("Content-Type", "application/json");

        match self.get_json::<AccountBalance>(request).await {
            Ok(data) => {
                info!(currencies = data.len(), "Fetched account balance");
                ApiResponse::ok(data)
            }
            Err(err) => {
                error!(error = %err, "Account balance request failed");
                err.into()
            }
        }
    }

    /// Built-in preview quotes for consumers with no token list configured.
    ///
    /// Waits a fixed simulated latency, then returns a hardcoded three-token
    /// envelope. Never fails.
    pub async fn demo_market_data(&self) -> MarketData {
        tokio::time::sleep(Duration::from_millis(self.config.demo_latency_ms)).await;

        let mut data = MarketData::new();
        data.insert("bitcoin".to_string(), TokenQuote::usd(45250.30));
        data.insert("ethereum".to_string(), TokenQuote::usd(2850.75));
        data.insert("solana".to_string(), TokenQuote::usd(98.42));
        data
    }

    /// Send a request and decode a JSON body, normalizing transport failures
    /// and non-success statuses into [`GatewayError`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }
}

#[async_trait]
impl MarketDataSource for MarketGateway {
    async fn fetch_market_data(&self, token_ids: &[String]) -> ApiResponse<MarketData> {
        MarketGateway::fetch_market_data(self, token_ids).await
    }

    async fn demo_market_data(&self) -> MarketData {
        MarketGateway::demo_market_data(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP/1.1 response on an ephemeral port and
    /// return the base URL to point the gateway at.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = stream.read(&mut request).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    fn gateway_at(base: &str) -> MarketGateway {
        MarketGateway::new(GatewayConfig {
            public_api_base: base.to_string(),
            private_api_base: base.to_string(),
            ..GatewayConfig::default()
        })
    }

    #[tokio::test]
    async fn empty_token_list_fails_fast() {
        // Unroutable base: any accidental network call would surface as a
        // transport error, not the validation message.
        let gateway = gateway_at("http://127.0.0.1:1");
        let response = gateway.fetch_market_data(&[]).await;
        assert_eq!(response.error_message(), Some("No token IDs provided"));
    }

    #[tokio::test]
    async fn successful_fetch_parses_quote_envelope() {
        let base = serve_once(http_response(
            "200 OK",
            r#"{"bitcoin": {"usd": 45000.0}, "ethereum": {"usd": 3000.0}}"#,
        ))
        .await;
        let gateway = gateway_at(&base);

        let response = gateway
            .fetch_market_data(&["bitcoin".to_string(), "ethereum".to_string()])
            .await;

        let data = response.into_result().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data["bitcoin"].usd, 45000.0);
        assert_eq!(data["ethereum"].usd, 3000.0);
    }

    #[tokio::test]
    async fn non_ok_status_maps_to_http_error_message() {
        let base = serve_once(http_response("404 Not Found", "{}")).await;
        let gateway = gateway_at(&base);

        let response = gateway.fetch_market_data(&["bitcoin".to_string()]).await;

        assert_eq!(response.error_message(), Some("HTTP error! status: 404"));
    }

    #[tokio::test]
    async fn connection_failure_maps_to_transport_message() {
        // Bind a listener to reserve a port, then drop it so the connection
        // is refused.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let gateway = gateway_at(&base);
        let response = gateway.fetch_market_data(&["bitcoin".to_string()]).await;

        assert!(!response.is_success());
        let message = response.error_message().unwrap();
        assert!(!message.is_empty());
        assert!(!message.starts_with("HTTP error"));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_transport_message() {
        let base = serve_once(http_response("200 OK", "not json")).await;
        let gateway = gateway_at(&base);

        let response = gateway.fetch_market_data(&["bitcoin".to_string()]).await;

        assert!(!response.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn demo_data_has_exactly_the_preview_tokens() {
        let gateway = MarketGateway::new(GatewayConfig::default());
        let data = gateway.demo_market_data().await;

        let mut tokens: Vec<&str> = data.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        assert_eq!(tokens, ["bitcoin", "ethereum", "solana"]);
        for quote in data.values() {
            assert!(quote.usd > 0.0);
        }
    }

    #[tokio::test]
    async fn balance_fails_closed_without_credentials() {
        let configs = [
            GatewayConfig::default(),
            GatewayConfig {
                api_key: Some("key".to_string()),
                ..GatewayConfig::default()
            },
            GatewayConfig {
                api_secret: Some("secret".to_string()),
                ..GatewayConfig::default()
            },
        ];

        for config in configs {
            let gateway = MarketGateway::new(config);
            let response = gateway.account_balance().await;
            let message = response.error_message().unwrap();
            assert!(message.contains("environment variables not set"));
        }
    }

    #[tokio::test]
    async fn balance_parses_currency_envelope_when_credentialed() {
        let base = serve_once(http_response(
            "200 OK",
            r#"{"BTC": {"available": 0.5, "locked": 0.1}, "USDT": {"available": 1200.0, "locked": 0.0, "total": 1200.0}}"#,
        ))
        .await;

        let gateway = MarketGateway::new(GatewayConfig {
            private_api_base: base,
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            ..GatewayConfig::default()
        });

        let balances = gateway.account_balance().await.into_result().unwrap();
        assert_eq!(balances["BTC"].available, 0.5);
        assert_eq!(balances["USDT"].total, Some(1200.0));
    }
}
