use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;
use crate::domain::{
    CardIncident, MatchRecord, PlayerMatchStat, TeamMatchStat, TeamPositionSnapshot,
    TeamSeasonSnapshot,
};
use crate::error::Result;
use crate::persistence::FactStore;

const TABLES: &[&str] = &[
    "matches",
    "player_stats",
    "team_match_stats",
    "cards",
    "team_stats_cache",
    "team_positions_cache",
];

/// Postgres-backed store. Tables are expected to exist; this crate never
/// issues DDL.
pub struct PgFactStore {
    pool: PgPool,
}

impl PgFactStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Drop records that fail their own sanity check, keeping the rest of the
/// batch alive.
fn retain_valid<'a, T, F>(rows: &'a [T], validate: F, what: &str) -> Vec<&'a T>
where
    F: Fn(&T) -> std::result::Result<(), String>,
{
    rows.iter()
        .filter(|row| match validate(row) {
            Ok(()) => true,
            Err(reason) => {
                warn!(what, %reason, "skipping invalid row");
                false
            }
        })
        .collect()
}

#[async_trait]
impl FactStore for PgFactStore {
    async fn insert_matches(&self, rows: &[MatchRecord]) -> Result<u64> {
        let rows = retain_valid(rows, MatchRecord::validate, "match");
        if rows.is_empty() {
            return Ok(0);
        }

        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            r#"
            INSERT INTO matches (
                match_id,
                tournament_id,
                season_id,
                round_number,
                match_date,
                home_team_id,
                home_team_name,
                away_team_id,
                away_team_name,
                home_score,
                away_score,
                status,
                venue,
                start_timestamp
            )
            "#,
        );

        qb.push_values(rows.iter(), |mut b, row| {
            b.push_bind(row.match_id)
                .push_bind(row.tournament_id)
                .push_bind(row.season_id)
                .push_bind(row.round_number as i32)
                .push_bind(row.match_date)
                .push_bind(row.home_team_id)
                .push_bind(&row.home_team_name)
                .push_bind(row.away_team_id)
                .push_bind(&row.away_team_name)
                .push_bind(row.home_score)
                .push_bind(row.away_score)
                .push_bind(&row.status)
                .push_bind(&row.venue)
                .push_bind(row.start_timestamp);
        });

        let result = qb.build().execute(&self.pool).await?;
        debug!(rows = result.rows_affected(), "inserted match batch");
        Ok(result.rows_affected())
    }

    async fn insert_player_stats(&self, rows: &[PlayerMatchStat]) -> Result<u64> {
        let rows = retain_valid(rows, PlayerMatchStat::validate, "player_stat");
        if rows.is_empty() {
            return Ok(0);
        }

        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            r#"
            INSERT INTO player_stats (
                match_id,
                team_id,
                player_id,
                player_name,
                short_name,
                position,
                jersey_number,
                minutes_played,
                rating,
                goals,
                goal_assist,
                total_shot,
                on_target_shot,
                off_target_shot,
                blocked_scoring_attempt,
                total_pass,
                accurate_pass,
                pass_accuracy,
                key_pass,
                total_long_balls,
                accurate_long_balls,
                successful_dribbles,
                dribble_success,
                total_tackle,
                interception_won,
                total_clearance,
                outfielder_block,
                challenge_lost,
                duel_won,
                duel_lost,
                aerial_won,
                duel_success,
                touches,
                possession_lost_ctrl,
                was_fouled,
                fouls,
                yellow_cards,
                red_cards,
                saves,
                punches,
                good_high_claim,
                saved_shots_from_inside_box
            )
            "#,
        );

        qb.push_values(rows.iter(), |mut b, row| {
            b.push_bind(row.match_id)
                .push_bind(row.team_id)
                .push_bind(row.player_id)
                .push_bind(&row.player_name)
                .push_bind(&row.short_name)
                .push_bind(&row.position)
                .push_bind(row.jersey_number)
                .push_bind(row.minutes_played)
                .push_bind(row.rating)
                .push_bind(row.goals)
                .push_bind(row.goal_assist)
                .push_bind(row.total_shot)
                .push_bind(row.on_target_shot)
                .push_bind(row.off_target_shot)
                .push_bind(row.blocked_scoring_attempt)
                .push_bind(row.total_pass)
                .push_bind(row.accurate_pass)
                .push_bind(row.pass_accuracy)
                .push_bind(row.key_pass)
                .push_bind(row.total_long_balls)
                .push_bind(row.accurate_long_balls)
                .push_bind(row.successful_dribbles)
                .push_bind(row.dribble_success)
                .push_bind(row.total_tackle)
                .push_bind(row.interception_won)
                .push_bind(row.total_clearance)
                .push_bind(row.outfielder_block)
                .push_bind(row.challenge_lost)
                .push_bind(row.duel_won)
                .push_bind(row.duel_lost)
                .push_bind(row.aerial_won)
                .push_bind(row.duel_success)
                .push_bind(row.touches)
                .push_bind(row.possession_lost_ctrl)
                .push_bind(row.was_fouled)
                .push_bind(row.fouls)
                .push_bind(row.yellow_cards)
                .push_bind(row.red_cards)
                .push_bind(row.saves)
                .push_bind(row.punches)
                .push_bind(row.good_high_claim)
                .push_bind(row.saved_shots_from_inside_box);
        });

        let result = qb.build().execute(&self.pool).await?;
        debug!(rows = result.rows_affected(), "inserted player stat batch");
        Ok(result.rows_affected())
    }

    async fn insert_team_match_stats(&self, rows: &[TeamMatchStat]) -> Result<u64> {
        let rows = retain_valid(rows, TeamMatchStat::validate, "team_stat");
        if rows.is_empty() {
            return Ok(0);
        }

        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            r#"
            INSERT INTO team_match_stats (
                match_id,
                team_id,
                team_name,
                is_home,
                ball_possession,
                expected_goals,
                total_shots,
                shots_on_target,
                shots_off_target,
                blocked_shots,
                corners,
                free_kicks,
                fouls,
                yellow_cards,
                big_chances,
                big_chances_scored,
                big_chances_missed,
                shots_inside_box,
                shots_outside_box,
                touches_in_penalty_area,
                total_passes,
                accurate_passes,
                pass_accuracy,
                total_crosses,
                accurate_crosses,
                total_long_balls,
                accurate_long_balls,
                tackles,
                tackles_won_percent,
                interceptions,
                recoveries,
                clearances,
                errors_lead_to_shot,
                errors_lead_to_goal,
                duel_won_percent,
                dispossessed,
                ground_duels_percentage,
                aerial_duels_percentage,
                dribbles_percentage
            )
            "#,
        );

        qb.push_values(rows.iter(), |mut b, row| {
            b.push_bind(row.match_id)
                .push_bind(row.team_id)
                .push_bind(&row.team_name)
                .push_bind(row.is_home)
                .push_bind(row.ball_possession)
                .push_bind(row.expected_goals)
                .push_bind(row.total_shots)
                .push_bind(row.shots_on_target)
                .push_bind(row.shots_off_target)
                .push_bind(row.blocked_shots)
                .push_bind(row.corners)
                .push_bind(row.free_kicks)
                .push_bind(row.fouls)
                .push_bind(row.yellow_cards)
                .push_bind(row.big_chances)
                .push_bind(row.big_chances_scored)
                .push_bind(row.big_chances_missed)
                .push_bind(row.shots_inside_box)
                .push_bind(row.shots_outside_box)
                .push_bind(row.touches_in_penalty_area)
                .push_bind(row.total_passes)
                .push_bind(row.accurate_passes)
                .push_bind(row.pass_accuracy)
                .push_bind(row.total_crosses)
                .push_bind(row.accurate_crosses)
                .push_bind(row.total_long_balls)
                .push_bind(row.accurate_long_balls)
                .push_bind(row.tackles)
                .push_bind(row.tackles_won_percent)
                .push_bind(row.interceptions)
                .push_bind(row.recoveries)
                .push_bind(row.clearances)
                .push_bind(row.errors_lead_to_shot)
                .push_bind(row.errors_lead_to_goal)
                .push_bind(row.duel_won_percent)
                .push_bind(row.dispossessed)
                .push_bind(row.ground_duels_percentage)
                .push_bind(row.aerial_duels_percentage)
                .push_bind(row.dribbles_percentage);
        });

        let result = qb.build().execute(&self.pool).await?;
        debug!(rows = result.rows_affected(), "inserted team stat batch");
        Ok(result.rows_affected())
    }

    async fn insert_cards(&self, rows: &[CardIncident]) -> Result<u64> {
        let rows = retain_valid(rows, CardIncident::validate, "card");
        if rows.is_empty() {
            return Ok(0);
        }

        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            r#"
            INSERT INTO cards (
                match_id,
                player_id,
                player_name,
                team_is_home,
                card_type,
                reason,
                time,
                added_time
            )
            "#,
        );

        qb.push_values(rows.iter(), |mut b, row| {
            b.push_bind(row.match_id)
                .push_bind(row.player_id)
                .push_bind(&row.player_name)
                .push_bind(row.team_is_home)
                .push_bind(row.kind.as_str())
                .push_bind(&row.reason)
                .push_bind(row.time as i32)
                .push_bind(row.added_time as i32);
        });

        let result = qb.build().execute(&self.pool).await?;
        debug!(rows = result.rows_affected(), "inserted card batch");
        Ok(result.rows_affected())
    }

    async fn insert_team_season_snapshots(&self, rows: &[TeamSeasonSnapshot]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            r#"
            INSERT INTO team_stats_cache (
                team_id,
                tournament_id,
                season_id,
                matches_played,
                goals_scored,
                goals_conceded,
                avg_possession,
                avg_shots,
                avg_shots_on_target,
                avg_xg,
                avg_corners,
                avg_fouls,
                avg_yellow_cards,
                big_chances,
                big_chances_missed,
                goals_inside_box,
                goals_outside_box,
                headed_goals,
                pass_accuracy,
                fast_breaks
            )
            "#,
        );

        qb.push_values(rows.iter(), |mut b, row| {
            b.push_bind(row.team_id)
                .push_bind(row.tournament_id)
                .push_bind(row.season_id)
                .push_bind(row.matches_played)
                .push_bind(row.goals_scored)
                .push_bind(row.goals_conceded)
                .push_bind(row.avg_possession)
                .push_bind(row.avg_shots)
                .push_bind(row.avg_shots_on_target)
                .push_bind(row.avg_xg)
                .push_bind(row.avg_corners)
                .push_bind(row.avg_fouls)
                .push_bind(row.avg_yellow_cards)
                .push_bind(row.big_chances)
                .push_bind(row.big_chances_missed)
                .push_bind(row.goals_inside_box)
                .push_bind(row.goals_outside_box)
                .push_bind(row.headed_goals)
                .push_bind(row.pass_accuracy)
                .push_bind(row.fast_breaks);
        });

        let result = qb.build().execute(&self.pool).await?;
        debug!(rows = result.rows_affected(), "inserted season cache batch");
        Ok(result.rows_affected())
    }

    async fn insert_team_positions(&self, rows: &[TeamPositionSnapshot]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            r#"
            INSERT INTO team_positions_cache (
                team_id,
                tournament_id,
                season_id,
                position,
                points,
                goal_difference,
                matches_played,
                wins,
                draws,
                losses,
                goals_for,
                goals_against,
                form,
                trend,
                last_updated_round
            )
            "#,
        );

        qb.push_values(rows.iter(), |mut b, row| {
            b.push_bind(row.team_id)
                .push_bind(row.tournament_id)
                .push_bind(row.season_id)
                .push_bind(row.position)
                .push_bind(row.points)
                .push_bind(row.goal_difference)
                .push_bind(row.matches_played)
                .push_bind(row.wins)
                .push_bind(row.draws)
                .push_bind(row.losses)
                .push_bind(row.goals_for)
                .push_bind(row.goals_against)
                .push_bind(&row.form)
                .push_bind(row.trend.as_str())
                .push_bind(row.last_updated_round);
        });

        let result = qb.build().execute(&self.pool).await?;
        debug!(rows = result.rows_affected(), "inserted position cache batch");
        Ok(result.rows_affected())
    }

    async fn distinct_teams(
        &self,
        tournament_id: i64,
        season_id: i64,
    ) -> Result<Vec<(i64, String)>> {
        let teams = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT DISTINCT team_id, team_name FROM (
                SELECT home_team_id AS team_id, home_team_name AS team_name
                FROM matches
                WHERE tournament_id = $1 AND season_id = $2
                UNION ALL
                SELECT away_team_id AS team_id, away_team_name AS team_name
                FROM matches
                WHERE tournament_id = $1 AND season_id = $2
            ) sides
            ORDER BY team_id
            "#,
        )
        .bind(tournament_id)
        .bind(season_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn table_counts(&self) -> Result<Vec<(String, i64)>> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&self.pool)
                .await?;
            counts.push((table.to_string(), count));
        }
        Ok(counts)
    }
}
