//! Application state: the aggregate board, the session orchestrator and the
//! cancellation flag shared between them.
//!
//! The board starts out holding the fallback record for every platform. The
//! orchestrator's callback is the board's own updater, so a successful
//! normalizer replaces exactly one slot.

use tracing::{info, instrument};

use crate::client::UpstreamClient;
use crate::config::Settings;
use crate::error::FetchError;
use crate::orchestrator::{Orchestrator, RefreshReport, StatsBoard};
use crate::retry::CancelFlag;

pub struct AppState {
    pub board: StatsBoard,
    pub orchestrator: Orchestrator,
    pub cancel: CancelFlag,
}

impl AppState {
    /// Build state from resolved settings: seed the board, build the upstream client.
    #[instrument(level = "info", skip_all, fields(base_url = %settings.base_url))]
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        let board = StatsBoard::from_fallbacks(&settings.fallbacks);
        let cancel = CancelFlag::new();
        let client = UpstreamClient::new(&settings.base_url, settings.timeout, settings.retry)?;

        info!(
            target: "portfolio_stats",
            base_url = %client.base_url,
            max_attempts = settings.retry.max_attempts,
            delay_ms = settings.retry.delay_ms,
            backoff_multiplier = settings.retry.backoff_multiplier,
            "Upstream client ready"
        );

        let orchestrator = Orchestrator::new(client, settings.fallbacks, board.updater(), cancel.clone());
        Ok(Self { board, orchestrator, cancel })
    }

    /// Refresh every platform once. Later calls are no-ops.
    pub async fn refresh_once(&self) -> Option<RefreshReport> {
        self.orchestrator.run_once().await
    }

    /// Abandon any in-flight refresh; no callback fires afterwards.
    pub fn shutdown(&self) {
        info!(target: "portfolio_stats", "Cancelling in-flight refresh");
        self.cancel.cancel();
    }
}
