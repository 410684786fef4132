//! The rate schedule store: a cached snapshot plus a time-based refresh
//! policy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use calc_core::{RateSchedule, RateStep};
use tokio::sync::RwLock;

use crate::error::FeedError;
use crate::parse;

/// Default time between refreshes of the remote source.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Default bound on a single fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Default)]
struct ProviderState {
    schedule: Arc<RateSchedule>,
    last_fetch: Option<Instant>,
}

/// Owns the current [`RateSchedule`] snapshot and refreshes it from the
/// configured source when stale.
///
/// The provider is the single source of truth for rate data: other
/// components read snapshots from it and never cache rate data themselves.
/// A refresh runs under the state write lock, so at most one fetch is in
/// flight at a time and concurrent callers await its result.
#[derive(Debug)]
pub struct RatesProvider {
    source_url: Option<String>,
    refresh_interval: Duration,
    client: reqwest::Client,
    state: RwLock<ProviderState>,
}

impl RatesProvider {
    /// Creates a provider for the given source URL.
    ///
    /// `None` means no source is configured: the provider then serves a
    /// fixed empty schedule without touching the network.
    pub fn new(source_url: Option<String>) -> Result<Self, FeedError> {
        Self::with_timeouts(source_url, DEFAULT_REFRESH_INTERVAL, DEFAULT_FETCH_TIMEOUT)
    }

    /// Creates a provider with an explicit refresh interval and fetch
    /// timeout.
    pub fn with_timeouts(
        source_url: Option<String>,
        refresh_interval: Duration,
        fetch_timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(fetch_timeout).build()?;
        Ok(Self {
            source_url,
            refresh_interval,
            client,
            state: RwLock::new(ProviderState::default()),
        })
    }

    /// Whether a remote source is configured.
    pub fn is_configured(&self) -> bool {
        self.source_url.is_some()
    }

    /// Returns the current schedule, refreshing it first when stale.
    ///
    /// Idempotent within the refresh window: repeated calls return the same
    /// snapshot without network I/O. On a successful refresh the freshly
    /// parsed schedule replaces the cache atomically and the fetch time is
    /// stamped; a failed fetch or parse leaves both untouched and propagates
    /// the error, so the next stale call retries.
    pub async fn refresh_if_stale(&self) -> Result<Arc<RateSchedule>, FeedError> {
        {
            let state = self.state.read().await;
            if Self::is_fresh(&state, self.refresh_interval) {
                return Ok(state.schedule.clone());
            }
        }

        let mut state = self.state.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if Self::is_fresh(&state, self.refresh_interval) {
            return Ok(state.schedule.clone());
        }

        let Some(url) = &self.source_url else {
            // Documented safe default: no source means an empty schedule.
            // Stamping the fetch time keeps the staleness timer from
            // retrying on every call.
            state.schedule = Arc::new(RateSchedule::new());
            state.last_fetch = Some(Instant::now());
            return Ok(state.schedule.clone());
        };

        let text = self.fetch(url).await?;
        let schedule = Arc::new(RateSchedule::from_steps(parse::parse_steps(&text)?));
        tracing::info!(steps = schedule.len(), "Rates schedule refreshed");

        state.schedule = schedule.clone();
        state.last_fetch = Some(Instant::now());
        Ok(schedule)
    }

    /// Installs `steps` as the current schedule and stamps the fetch time,
    /// short-circuiting the next staleness check.
    ///
    /// Manual override for tests and preloaded fallback tables.
    pub async fn set_schedule(&self, steps: Vec<RateStep>) {
        let mut state = self.state.write().await;
        state.schedule = Arc::new(RateSchedule::from_steps(steps));
        state.last_fetch = Some(Instant::now());
    }

    fn is_fresh(state: &ProviderState, refresh_interval: Duration) -> bool {
        state
            .last_fetch
            .is_some_and(|at| at.elapsed() <= refresh_interval)
    }

    async fn fetch(&self, url: &str) -> Result<String, FeedError> {
        tracing::debug!(url, "Fetching rates source");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { status });
        }
        Ok(response.text().await?)
    }
}
