//! End-to-end round processing against a stub API and in-memory store.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use matchday::api::payload::{
    Event, EventsPayload, IncidentsPayload, LineupEntry, LineupsPayload, PerformanceGraphPayload,
    PlayerRef, PlayerStatistics, Score, StandingsPayload, StatisticsPayload, TeamLineup,
    TeamRef, TeamSeasonPayload,
};
use matchday::api::ApiSource;
use matchday::config::PacingConfig;
use matchday::domain::{
    CardIncident, MatchRecord, PlayerMatchStat, TeamMatchStat, TeamPositionSnapshot,
    TeamSeasonSnapshot,
};
use matchday::error::{FetchError, Result};
use matchday::orchestrator::RoundOrchestrator;
use matchday::persistence::FactStore;

#[derive(Default)]
struct MemoryState {
    matches: Vec<MatchRecord>,
    players: Vec<PlayerMatchStat>,
    team_stats: Vec<TeamMatchStat>,
    cards: Vec<CardIncident>,
    season_snapshots: Vec<TeamSeasonSnapshot>,
    positions: Vec<TeamPositionSnapshot>,
}

#[derive(Default)]
struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[async_trait]
impl FactStore for MemoryStore {
    async fn insert_matches(&self, rows: &[MatchRecord]) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.matches.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn insert_player_stats(&self, rows: &[PlayerMatchStat]) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.players.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn insert_team_match_stats(&self, rows: &[TeamMatchStat]) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.team_stats.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn insert_cards(&self, rows: &[CardIncident]) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.cards.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn insert_team_season_snapshots(&self, rows: &[TeamSeasonSnapshot]) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.season_snapshots.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn insert_team_positions(&self, rows: &[TeamPositionSnapshot]) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.positions.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn distinct_teams(
        &self,
        tournament_id: i64,
        season_id: i64,
    ) -> Result<Vec<(i64, String)>> {
        let state = self.state.lock().unwrap();
        let mut seen = HashSet::new();
        let mut teams = Vec::new();
        for m in state
            .matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id && m.season_id == season_id)
        {
            if seen.insert(m.home_team_id) {
                teams.push((m.home_team_id, m.home_team_name.clone()));
            }
            if seen.insert(m.away_team_id) {
                teams.push((m.away_team_id, m.away_team_name.clone()));
            }
        }
        Ok(teams)
    }

    async fn table_counts(&self) -> Result<Vec<(String, i64)>> {
        let state = self.state.lock().unwrap();
        Ok(vec![
            ("matches".to_string(), state.matches.len() as i64),
            ("player_stats".to_string(), state.players.len() as i64),
        ])
    }
}

/// Two-match round with configurable per-match lineup failures and an
/// optional standings outage.
#[derive(Default)]
struct StubApi {
    fail_lineups: HashSet<i64>,
    fail_standings: bool,
}

fn stub_event(match_id: i64, home_id: i64, away_id: i64) -> Event {
    Event {
        id: match_id,
        home_team: Some(TeamRef {
            id: home_id,
            name: format!("Team {home_id}"),
        }),
        away_team: Some(TeamRef {
            id: away_id,
            name: format!("Team {away_id}"),
        }),
        home_score: Score { current: Some(1) },
        away_score: Score { current: Some(0) },
        status: Default::default(),
        venue: None,
        start_timestamp: Some(1_700_000_000),
    }
}

fn lineup_entry(player_id: i64) -> LineupEntry {
    LineupEntry {
        player: Some(PlayerRef {
            id: Some(player_id),
            name: Some(format!("Player {player_id}")),
            ..Default::default()
        }),
        team_id: None,
        statistics: Some(PlayerStatistics {
            minutes_played: 90,
            total_pass: 40,
            accurate_pass: 30,
            ..Default::default()
        }),
    }
}

#[async_trait]
impl ApiSource for StubApi {
    async fn round_events(
        &self,
        _tournament_id: i64,
        _season_id: i64,
        _round_number: u32,
    ) -> std::result::Result<EventsPayload, FetchError> {
        Ok(EventsPayload {
            events: vec![stub_event(100, 10, 20), stub_event(101, 30, 40)],
        })
    }

    async fn lineups(&self, match_id: i64) -> std::result::Result<LineupsPayload, FetchError> {
        if self.fail_lineups.contains(&match_id) {
            return Err(FetchError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                endpoint: format!("/event/{match_id}/lineups"),
            });
        }
        Ok(LineupsPayload {
            home: Some(TeamLineup {
                players: vec![lineup_entry(match_id * 10 + 1)],
            }),
            away: Some(TeamLineup {
                players: vec![lineup_entry(match_id * 10 + 2)],
            }),
        })
    }

    async fn incidents(
        &self,
        _match_id: i64,
    ) -> std::result::Result<IncidentsPayload, FetchError> {
        Ok(IncidentsPayload::default())
    }

    async fn statistics(
        &self,
        _match_id: i64,
    ) -> std::result::Result<StatisticsPayload, FetchError> {
        Ok(StatisticsPayload::default())
    }

    async fn team_season_stats(
        &self,
        _team_id: i64,
        _tournament_id: i64,
        _season_id: i64,
    ) -> std::result::Result<TeamSeasonPayload, FetchError> {
        Ok(TeamSeasonPayload::default())
    }

    async fn standings(
        &self,
        tournament_id: i64,
        season_id: i64,
    ) -> std::result::Result<StandingsPayload, FetchError> {
        if self.fail_standings {
            return Err(FetchError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                endpoint: format!(
                    "/unique-tournament/{tournament_id}/season/{season_id}/standings/total"
                ),
            });
        }
        Ok(StandingsPayload::default())
    }

    async fn performance_graph(
        &self,
        _team_id: i64,
        _tournament_id: i64,
        _season_id: i64,
    ) -> std::result::Result<PerformanceGraphPayload, FetchError> {
        Ok(PerformanceGraphPayload::default())
    }
}

fn no_delay() -> PacingConfig {
    PacingConfig {
        match_delay_ms: 0,
        team_delay_ms: 0,
    }
}

fn orchestrator(api: StubApi) -> (RoundOrchestrator, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let orch = RoundOrchestrator::new(
        Arc::new(api),
        store.clone() as Arc<dyn FactStore>,
        &no_delay(),
    );
    (orch, store)
}

#[tokio::test]
async fn failed_match_is_skipped_and_round_continues() {
    let api = StubApi {
        fail_lineups: [100].into_iter().collect(),
        ..Default::default()
    };
    let (orch, store) = orchestrator(api);

    let summary = orch.process_round(203, 77142, 5).await.unwrap();

    assert_eq!(summary.matches_fetched, 2);
    assert_eq!(summary.matches_processed, 1);
    assert_eq!(summary.matches_failed, 1);

    let state = store.state.lock().unwrap();
    // Both matches persist from the round list; only the healthy one yields
    // detail rows.
    assert_eq!(state.matches.len(), 2);
    assert_eq!(state.players.len(), 2);
    assert!(state.players.iter().all(|p| p.match_id == 101));
}

#[tokio::test]
async fn rerunning_a_round_appends_duplicate_rows() {
    let (orch, store) = orchestrator(StubApi::default());

    orch.process_round(203, 77142, 5).await.unwrap();
    orch.process_round(203, 77142, 5).await.unwrap();

    let state = store.state.lock().unwrap();
    assert_eq!(state.matches.len(), 4);
    assert_eq!(state.players.len(), 8);
    assert_eq!(state.team_stats.len(), 8);
}

#[tokio::test]
async fn lineup_side_attributes_players_to_teams() {
    let (orch, store) = orchestrator(StubApi::default());

    orch.process_round(203, 77142, 5).await.unwrap();

    let state = store.state.lock().unwrap();
    let home_player = state.players.iter().find(|p| p.player_id == 1001).unwrap();
    let away_player = state.players.iter().find(|p| p.player_id == 1002).unwrap();
    assert_eq!(home_player.team_id, 10);
    assert_eq!(away_player.team_id, 20);
    assert_eq!(home_player.pass_accuracy, 75.0);
}

#[tokio::test]
async fn standings_outage_does_not_fail_a_persisted_round() {
    let api = StubApi {
        fail_standings: true,
        ..Default::default()
    };
    let (orch, store) = orchestrator(api);

    let summary = orch.process_round(203, 77142, 5).await.unwrap();

    // Facts land and the round reports success; only the position cache is
    // left stale.
    assert_eq!(summary.matches_processed, 2);
    assert_eq!(summary.matches_failed, 0);

    let state = store.state.lock().unwrap();
    assert_eq!(state.matches.len(), 2);
    assert_eq!(state.players.len(), 4);
    assert_eq!(state.season_snapshots.len(), 4);
    assert!(state.positions.is_empty());
}

#[tokio::test]
async fn season_cache_refresh_covers_every_stored_team() {
    let (orch, store) = orchestrator(StubApi::default());

    orch.process_round(203, 77142, 5).await.unwrap();

    let state = store.state.lock().unwrap();
    // Four distinct teams across two matches, one snapshot each.
    assert_eq!(state.season_snapshots.len(), 4);
    // Stub standings carry no "total" table; position cache stays empty.
    assert!(state.positions.is_empty());
}
