mod postgres;

pub use postgres::PgFactStore;

use async_trait::async_trait;

use crate::domain::{
    CardIncident, MatchRecord, PlayerMatchStat, TeamMatchStat, TeamPositionSnapshot,
    TeamSeasonSnapshot,
};
use crate::error::Result;

/// The analytical store behind the pipeline.
///
/// All inserts are plain appends: re-running a round duplicates its rows and
/// readers deduplicate on their side. Batch methods return the number of rows
/// written; an empty batch is a no-op, not an error.
#[async_trait]
pub trait FactStore: Send + Sync {
    async fn insert_matches(&self, rows: &[MatchRecord]) -> Result<u64>;

    async fn insert_player_stats(&self, rows: &[PlayerMatchStat]) -> Result<u64>;

    async fn insert_team_match_stats(&self, rows: &[TeamMatchStat]) -> Result<u64>;

    async fn insert_cards(&self, rows: &[CardIncident]) -> Result<u64>;

    async fn insert_team_season_snapshots(&self, rows: &[TeamSeasonSnapshot]) -> Result<u64>;

    async fn insert_team_positions(&self, rows: &[TeamPositionSnapshot]) -> Result<u64>;

    /// Distinct (team_id, team_name) pairs seen in stored matches for one
    /// season, both home and away sides.
    async fn distinct_teams(&self, tournament_id: i64, season_id: i64)
        -> Result<Vec<(i64, String)>>;

    /// Row count per pipeline table, for the before/after state report.
    async fn table_counts(&self) -> Result<Vec<(String, i64)>>;
}
