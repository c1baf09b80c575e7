//! Season-level cache recomputation.
//!
//! After a round is persisted, two derived tables are refreshed for every
//! team in the season: a season-to-date statistics snapshot and a standings
//! snapshot enriched with recent form and position trend. Both are appended,
//! never updated in place.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::payload::{GraphPoint, PerformanceGraphPayload, StandingRow, TeamSeasonPayload};
use crate::api::ApiSource;
use crate::domain::{TeamPositionSnapshot, TeamSeasonSnapshot, Trend};
use crate::error::Result;
use crate::persistence::FactStore;

pub struct CacheUpdater {
    api: Arc<dyn ApiSource>,
    store: Arc<dyn FactStore>,
    team_delay: Duration,
}

impl CacheUpdater {
    pub fn new(api: Arc<dyn ApiSource>, store: Arc<dyn FactStore>, team_delay: Duration) -> Self {
        Self {
            api,
            store,
            team_delay,
        }
    }

    /// Refresh the season statistics snapshot for every team seen in stored
    /// matches. Teams whose season endpoint fails are skipped, not fatal.
    pub async fn update_team_stats_cache(
        &self,
        tournament_id: i64,
        season_id: i64,
    ) -> Result<u64> {
        let teams = self.store.distinct_teams(tournament_id, season_id).await?;
        info!(count = teams.len(), "refreshing team season stats cache");

        let mut snapshots = Vec::with_capacity(teams.len());
        for (team_id, team_name) in &teams {
            tokio::time::sleep(self.team_delay).await;

            match self
                .api
                .team_season_stats(*team_id, tournament_id, season_id)
                .await
            {
                Ok(payload) => {
                    snapshots.push(season_snapshot(&payload, *team_id, tournament_id, season_id));
                }
                Err(e) => {
                    warn!(team_id, team = %team_name, error = %e, "season stats fetch failed, skipping team");
                }
            }
        }

        self.store.insert_team_season_snapshots(&snapshots).await
    }

    /// Refresh the standings snapshot, with form and trend derived from each
    /// team's performance graph. A failed graph fetch degrades that team to
    /// an empty form and a stable trend.
    pub async fn update_team_positions_cache(
        &self,
        tournament_id: i64,
        season_id: i64,
    ) -> Result<u64> {
        let standings = match self.api.standings(tournament_id, season_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!(tournament_id, season_id, error = %e, "standings fetch failed, skipping position refresh");
                return Ok(0);
            }
        };
        let Some(table) = standings.standings.iter().find(|t| t.kind == "total") else {
            warn!(tournament_id, season_id, "no total standings table in payload");
            return Ok(0);
        };

        let mut snapshots = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let Some(team) = row.team.as_ref() else {
                continue;
            };

            tokio::time::sleep(self.team_delay).await;

            let graph = match self
                .api
                .performance_graph(team.id, tournament_id, season_id)
                .await
            {
                Ok(p) => p,
                Err(e) => {
                    warn!(team_id = team.id, error = %e, "performance graph fetch failed, degrading");
                    PerformanceGraphPayload::default()
                }
            };

            snapshots.push(TeamPositionSnapshot {
                team_id: team.id,
                tournament_id,
                season_id,
                position: row.position,
                points: row.points,
                goal_difference: goal_difference(row),
                matches_played: row.matches,
                wins: row.wins,
                draws: row.draws,
                losses: row.losses,
                goals_for: row.scores_for.unwrap_or(0),
                goals_against: row.scores_against.unwrap_or(0),
                form: recent_form(&graph.graph_data, team.id),
                trend: position_trend(&graph.graph_data),
                last_updated_round: last_updated_round(&graph.graph_data),
            });
        }

        self.store.insert_team_positions(&snapshots).await
    }
}

fn season_snapshot(
    payload: &TeamSeasonPayload,
    team_id: i64,
    tournament_id: i64,
    season_id: i64,
) -> TeamSeasonSnapshot {
    let stats = payload.statistics.clone().unwrap_or_default();
    let matches = stats.matches;

    TeamSeasonSnapshot {
        team_id,
        tournament_id,
        season_id,
        matches_played: matches,
        goals_scored: stats.goals_scored,
        goals_conceded: stats.goals_conceded,
        avg_possession: round2(stats.average_ball_possession),
        avg_shots: per_match(stats.shots, matches),
        avg_shots_on_target: per_match(stats.shots_on_target, matches),
        avg_xg: per_match(stats.expected_goals, matches),
        avg_corners: per_match(stats.corners, matches),
        avg_fouls: per_match(stats.fouls, matches),
        avg_yellow_cards: per_match(stats.yellow_cards, matches),
        big_chances: stats.big_chances,
        big_chances_missed: stats.big_chances_missed,
        goals_inside_box: stats.goals_inside_box,
        goals_outside_box: stats.goals_outside_box,
        headed_goals: stats.headed_goals,
        pass_accuracy: round2(stats.accurate_passes_percentage),
        fast_breaks: stats.fast_breaks,
    }
}

/// Season total divided by matches played; zero matches means zero, never a
/// division error.
fn per_match(total: f64, matches: i64) -> f64 {
    if matches <= 0 {
        return 0.0;
    }
    round2(total / matches as f64)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Direction of the league position over the last two graph points.
///
/// A lower position number is better, so a decrease reads as `Up`. Fewer
/// than two points (season start, failed fetch) is `Stable`.
pub fn position_trend(points: &[GraphPoint]) -> Trend {
    let recent: Vec<i64> = points
        .iter()
        .rev()
        .filter_map(|p| p.position)
        .take(2)
        .collect();

    match recent.as_slice() {
        [latest, previous] if latest < previous => Trend::Up,
        [latest, previous] if latest > previous => Trend::Down,
        _ => Trend::Stable,
    }
}

/// Last 5 results as a `W`/`D`/`L` string, oldest first.
///
/// Graph events missing either score (postponed, in progress) contribute
/// nothing to the form.
pub fn recent_form(points: &[GraphPoint], team_id: i64) -> String {
    let mut results = Vec::new();

    for point in points {
        for event in &point.events {
            let is_home = match (&event.home_team, &event.away_team) {
                (Some(home), _) if home.id == team_id => true,
                (_, Some(away)) if away.id == team_id => false,
                _ => continue,
            };
            let (Some(home_score), Some(away_score)) = (
                event.home_score.as_ref().and_then(|s| s.current),
                event.away_score.as_ref().and_then(|s| s.current),
            ) else {
                continue;
            };

            let (own, other) = if is_home {
                (home_score, away_score)
            } else {
                (away_score, home_score)
            };
            results.push(if own > other {
                'W'
            } else if own < other {
                'L'
            } else {
                'D'
            });
        }
    }

    let start = results.len().saturating_sub(5);
    results[start..].iter().collect()
}

/// Goal difference from raw standings scores, falling back to the
/// pre-formatted "+N"/"-N" string when either raw score is missing.
pub fn goal_difference(row: &StandingRow) -> i64 {
    match (row.scores_for, row.scores_against) {
        (Some(scored), Some(conceded)) => scored - conceded,
        _ => row
            .score_diff_formatted
            .as_deref()
            .and_then(|s| s.trim().trim_start_matches('+').parse::<i64>().ok())
            .unwrap_or(0),
    }
}

/// Week of the most recent graph point, 0 when the graph is empty.
pub fn last_updated_round(points: &[GraphPoint]) -> i64 {
    points.last().and_then(|p| p.week).unwrap_or(0)
}
