use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::payload::{
    EventsPayload, IncidentsPayload, LineupsPayload, PerformanceGraphPayload, StandingsPayload,
    StatisticsPayload, TeamSeasonPayload,
};
use crate::config::ApiConfig;
use crate::error::{FetchError, Result};

/// The external sports-data API, one method per consumed endpoint.
///
/// Every call returns an explicit `Result` so callers choose the recovery:
/// default the value, skip the match, or keep the round going. Stub
/// implementations back the orchestrator tests.
#[async_trait]
pub trait ApiSource: Send + Sync {
    async fn round_events(
        &self,
        tournament_id: i64,
        season_id: i64,
        round_number: u32,
    ) -> std::result::Result<EventsPayload, FetchError>;

    async fn lineups(&self, match_id: i64) -> std::result::Result<LineupsPayload, FetchError>;

    async fn incidents(&self, match_id: i64) -> std::result::Result<IncidentsPayload, FetchError>;

    async fn statistics(&self, match_id: i64)
        -> std::result::Result<StatisticsPayload, FetchError>;

    async fn team_season_stats(
        &self,
        team_id: i64,
        tournament_id: i64,
        season_id: i64,
    ) -> std::result::Result<TeamSeasonPayload, FetchError>;

    async fn standings(
        &self,
        tournament_id: i64,
        season_id: i64,
    ) -> std::result::Result<StandingsPayload, FetchError>;

    async fn performance_graph(
        &self,
        team_id: i64,
        tournament_id: i64,
        season_id: i64,
    ) -> std::result::Result<PerformanceGraphPayload, FetchError>;
}

/// HTTP client for the SofaScore-shaped API.
///
/// Owns one `reqwest::Client` for the lifetime of a run; dropped when the
/// round run ends.
pub struct SofaClient {
    client: reqwest::Client,
    base_url: String,
}

impl SofaClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> std::result::Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                endpoint: endpoint.to_string(),
            });
        }

        response.json::<T>().await.map_err(|source| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ApiSource for SofaClient {
    async fn round_events(
        &self,
        tournament_id: i64,
        season_id: i64,
        round_number: u32,
    ) -> std::result::Result<EventsPayload, FetchError> {
        self.get_json(&format!(
            "/unique-tournament/{tournament_id}/season/{season_id}/events/round/{round_number}"
        ))
        .await
    }

    async fn lineups(&self, match_id: i64) -> std::result::Result<LineupsPayload, FetchError> {
        self.get_json(&format!("/event/{match_id}/lineups")).await
    }

    async fn incidents(&self, match_id: i64) -> std::result::Result<IncidentsPayload, FetchError> {
        self.get_json(&format!("/event/{match_id}/incidents")).await
    }

    async fn statistics(
        &self,
        match_id: i64,
    ) -> std::result::Result<StatisticsPayload, FetchError> {
        self.get_json(&format!("/event/{match_id}/statistics")).await
    }

    async fn team_season_stats(
        &self,
        team_id: i64,
        tournament_id: i64,
        season_id: i64,
    ) -> std::result::Result<TeamSeasonPayload, FetchError> {
        self.get_json(&format!(
            "/team/{team_id}/unique-tournament/{tournament_id}/season/{season_id}/statistics/overall"
        ))
        .await
    }

    async fn standings(
        &self,
        tournament_id: i64,
        season_id: i64,
    ) -> std::result::Result<StandingsPayload, FetchError> {
        self.get_json(&format!(
            "/unique-tournament/{tournament_id}/season/{season_id}/standings/total"
        ))
        .await
    }

    async fn performance_graph(
        &self,
        team_id: i64,
        tournament_id: i64,
        season_id: i64,
    ) -> std::result::Result<PerformanceGraphPayload, FetchError> {
        self.get_json(&format!(
            "/unique-tournament/{tournament_id}/season/{season_id}/team/{team_id}/team-performance-graph-data"
        ))
        .await
    }
}
