use std::sync::Arc;

use tracing::warn;

use crate::api::payload::{IncidentsPayload, LineupsPayload, StatisticsPayload};
use crate::api::ApiSource;
use crate::error::FetchError;

/// Raw detail payloads for one match, fetched in lineup/incident/statistics
/// order.
#[derive(Debug, Default)]
pub struct MatchPayloads {
    pub lineups: LineupsPayload,
    pub incidents: IncidentsPayload,
    pub statistics: StatisticsPayload,
}

/// Fetches the three per-match detail endpoints.
pub struct MatchDetailFetcher {
    api: Arc<dyn ApiSource>,
}

impl MatchDetailFetcher {
    pub fn new(api: Arc<dyn ApiSource>) -> Self {
        Self { api }
    }

    /// Fetch lineups, incidents and statistics for one match.
    ///
    /// A lineup failure aborts the match: without the player list there is
    /// nothing to attribute cards or statistics to. Incident and statistics
    /// failures degrade to empty payloads so the match still yields its
    /// player rows.
    pub async fn fetch(&self, match_id: i64) -> std::result::Result<MatchPayloads, FetchError> {
        let lineups = self.api.lineups(match_id).await?;

        let incidents = match self.api.incidents(match_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!(match_id, error = %e, "incidents fetch failed, defaulting to none");
                IncidentsPayload::default()
            }
        };

        let statistics = match self.api.statistics(match_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!(match_id, error = %e, "statistics fetch failed, defaulting to none");
                StatisticsPayload::default()
            }
        };

        Ok(MatchPayloads {
            lineups,
            incidents,
            statistics,
        })
    }
}
