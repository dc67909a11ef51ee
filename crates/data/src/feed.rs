use botswarm_core::{MarketData, MarketDataSource};
use tracing::debug;

// ---------------------------------------------------------------------------
// Feed State
// ---------------------------------------------------------------------------

/// Lifecycle state of one feed instance.
///
/// The projection consumers read is `{data, loading, error}`: while a fetch
/// is in flight the previous data stays visible (no flicker back to empty on
/// a refetch), but any previous error is cleared eagerly.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedState {
    /// A fetch is in flight; `prior` carries the last loaded data, if any.
    Loading { prior: Option<MarketData> },
    /// The last fetch succeeded.
    Loaded { data: MarketData },
    /// The last fetch failed; previous data is dropped.
    Failed { error: String },
}

impl FeedState {
    pub fn loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn data(&self) -> Option<&MarketData> {
        match self {
            Self::Loading { prior } => prior.as_ref(),
            Self::Loaded { data } => Some(data),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Market Data Feed
// ---------------------------------------------------------------------------

/// Per-consumer state holder driving a [`MarketDataSource`].
///
/// Each instance owns its state exclusively; instances share nothing and a
/// dropped feed simply discards whatever it held. `refetch` is the single
/// mutation entry point: every call enters `Loading` once and assigns exactly
/// one terminal state, so `loading` flips back to `false` exactly once per
/// fetch on every path.
///
/// Overlapping refetches are not coalesced; `&mut self` serializes calls on
/// one instance, so two fetches can never be in flight at once on the same
/// feed.
pub struct MarketDataFeed<S> {
    source: S,
    token_ids: Option<Vec<String>>,
    state: FeedState,
}

impl<S: MarketDataSource> MarketDataFeed<S> {
    /// A feed that has not fetched yet: loading, no data, no error.
    pub fn new(source: S, token_ids: Option<Vec<String>>) -> Self {
        Self {
            source,
            token_ids,
            state: FeedState::Loading { prior: None },
        }
    }

    /// Construct and run the initial fetch.
    pub async fn load(source: S, token_ids: Option<Vec<String>>) -> Self {
        let mut feed = Self::new(source, token_ids);
        feed.refetch().await;
        feed
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn data(&self) -> Option<&MarketData> {
        self.state.data()
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// Run one fetch cycle and settle into `Loaded` or `Failed`.
    ///
    /// With a non-empty token list the source is queried for live quotes and
    /// an `Err` envelope becomes `Failed`; with no token list the demo path
    /// is taken, which cannot fail.
    pub async fn refetch(&mut self) {
        self.state = FeedState::Loading {
            prior: self.state.data().cloned(),
        };

        self.state = match self.token_ids.as_deref() {
            Some(ids) if !ids.is_empty() => {
                match self.source.fetch_market_data(ids).await.into_result() {
                    Ok(data) => FeedState::Loaded { data },
                    Err(error) => {
                        debug!(error = %error, "Feed fetch failed");
                        FeedState::Failed { error }
                    }
                }
            }
            _ => FeedState::Loaded {
                data: self.source.demo_market_data().await,
            },
        };
    }

    /// Replace the requested token set and fetch again.
    pub async fn set_token_ids(&mut self, token_ids: Option<Vec<String>>) {
        self.token_ids = token_ids;
        self.refetch().await;
    }
}
