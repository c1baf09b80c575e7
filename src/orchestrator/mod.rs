//! Round-level sequencing: fetch, normalize, persist, refresh caches.
//!
//! Each match is its own failure domain. A match whose detail fetch fails is
//! logged and skipped; the round keeps going and the cache refresh still
//! runs over whatever was persisted.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::api::ApiSource;
use crate::cache::CacheUpdater;
use crate::collector::{MatchDetailFetcher, RoundMatchFetcher};
use crate::config::PacingConfig;
use crate::domain::{CardIncident, MatchRecord, PlayerMatchStat, TeamMatchStat};
use crate::error::Result;
use crate::normalize::{extract_player_stats, fold_team_stats, IncidentMerger};
use crate::persistence::FactStore;

/// Outcome of one round run, for the final log line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub round_number: u32,
    pub matches_fetched: usize,
    pub matches_processed: usize,
    pub matches_failed: usize,
    pub player_rows: u64,
    pub card_rows: u64,
    pub team_stat_rows: u64,
}

pub struct RoundOrchestrator {
    store: Arc<dyn FactStore>,
    rounds: RoundMatchFetcher,
    details: MatchDetailFetcher,
    caches: CacheUpdater,
    match_delay: Duration,
}

impl RoundOrchestrator {
    pub fn new(api: Arc<dyn ApiSource>, store: Arc<dyn FactStore>, pacing: &PacingConfig) -> Self {
        Self {
            rounds: RoundMatchFetcher::new(api.clone()),
            details: MatchDetailFetcher::new(api.clone()),
            caches: CacheUpdater::new(
                api,
                store.clone(),
                Duration::from_millis(pacing.team_delay_ms),
            ),
            store,
            match_delay: Duration::from_millis(pacing.match_delay_ms),
        }
    }

    /// Collect one round end to end: match list, per-match details, then the
    /// season cache refresh.
    ///
    /// An empty match list ends the run early; it covers both an unscheduled
    /// round and a failed round fetch.
    pub async fn process_round(
        &self,
        tournament_id: i64,
        season_id: i64,
        round_number: u32,
    ) -> Result<RoundSummary> {
        let mut summary = RoundSummary {
            round_number,
            ..Default::default()
        };

        let matches = self
            .rounds
            .fetch(tournament_id, season_id, round_number)
            .await;
        summary.matches_fetched = matches.len();
        if matches.is_empty() {
            info!(round_number, "no matches for round, nothing to collect");
            return Ok(summary);
        }

        self.store.insert_matches(&matches).await?;
        info!(round_number, count = matches.len(), "persisted round match list");

        for record in &matches {
            tokio::time::sleep(self.match_delay).await;

            match self.process_match(record).await {
                Ok((players, cards, team_stats)) => {
                    summary.matches_processed += 1;
                    summary.player_rows += players;
                    summary.card_rows += cards;
                    summary.team_stat_rows += team_stats;
                }
                Err(e) => {
                    summary.matches_failed += 1;
                    error!(match_id = record.match_id, error = %e, "match processing failed, continuing round");
                }
            }
        }

        // Facts are already persisted; a cache refresh failure must not turn
        // the round into an error.
        if let Err(e) = self.refresh_caches(tournament_id, season_id).await {
            error!(round_number, error = %e, "cache refresh failed after round persist");
        }

        info!(
            round_number,
            processed = summary.matches_processed,
            failed = summary.matches_failed,
            players = summary.player_rows,
            cards = summary.card_rows,
            "round collection finished"
        );
        Ok(summary)
    }

    /// Collect match lists only for a range of rounds, no per-match detail.
    pub async fn backfill_rounds(
        &self,
        tournament_id: i64,
        season_id: i64,
        from_round: u32,
        to_round: u32,
    ) -> Result<u64> {
        let mut total = 0u64;
        let mut rounds_with_matches = 0u32;
        for round_number in from_round..=to_round {
            tokio::time::sleep(self.match_delay).await;

            let matches = self
                .rounds
                .fetch(tournament_id, season_id, round_number)
                .await;
            if matches.is_empty() {
                warn!(round_number, "empty round during backfill, skipping");
                continue;
            }
            total += self.store.insert_matches(&matches).await?;
            rounds_with_matches += 1;
            info!(round_number, count = matches.len(), "backfilled round");
        }
        info!(rounds_with_matches, matches = total, "backfill summary");
        Ok(total)
    }

    /// Recompute the season caches without touching match data.
    pub async fn refresh_caches(&self, tournament_id: i64, season_id: i64) -> Result<()> {
        let season_rows = self
            .caches
            .update_team_stats_cache(tournament_id, season_id)
            .await?;
        let position_rows = self
            .caches
            .update_team_positions_cache(tournament_id, season_id)
            .await?;
        info!(season_rows, position_rows, "season caches refreshed");
        Ok(())
    }

    /// Fetch, normalize and persist one match's details. Returns the
    /// (player, card, team stat) row counts.
    async fn process_match(&self, record: &MatchRecord) -> Result<(u64, u64, u64)> {
        let payloads = self.details.fetch(record.match_id).await?;

        let (players, cards, team_stats) = normalize_match(record, &payloads);

        let player_count = self.store.insert_player_stats(&players).await?;
        let card_count = self.store.insert_cards(&cards).await?;
        let team_count = self.store.insert_team_match_stats(&team_stats).await?;

        Ok((player_count, card_count, team_count))
    }
}

/// Pure normalization step for one match's payloads.
fn normalize_match(
    record: &MatchRecord,
    payloads: &crate::collector::MatchPayloads,
) -> (Vec<PlayerMatchStat>, Vec<CardIncident>, Vec<TeamMatchStat>) {
    let mut players = Vec::new();
    let sides = [
        (payloads.lineups.home.as_ref(), record.home_team_id),
        (payloads.lineups.away.as_ref(), record.away_team_id),
    ];
    for (lineup, side_team_id) in sides {
        let Some(lineup) = lineup else { continue };
        for entry in &lineup.players {
            // Older payloads omit teamId on the entry; the lineup side is
            // authoritative then.
            let mut entry = entry.clone();
            entry.team_id = entry.team_id.or(Some(side_team_id));
            if let Some(stat) = extract_player_stats(&entry, record.match_id) {
                players.push(stat);
            }
        }
    }

    let cards = IncidentMerger::normalize(&payloads.incidents, record.match_id);
    IncidentMerger::merge(&mut players, &cards);

    let (home, away) = fold_team_stats(
        &payloads.statistics,
        record.match_id,
        (record.home_team_id, &record.home_team_name),
        (record.away_team_id, &record.away_team_name),
    );

    (players, cards, vec![home, away])
}
