use tracing::debug;

use crate::api::payload::LineupEntry;
use crate::domain::PlayerMatchStat;
use crate::normalize::safe_pct;

/// Build a normalized per-player record from one lineup entry.
///
/// Returns `None` when the entry has no resolvable player id or team id;
/// such entries cannot be attributed and are skipped by the caller.
pub fn extract_player_stats(entry: &LineupEntry, match_id: i64) -> Option<PlayerMatchStat> {
    let player = entry.player.as_ref()?;
    let player_id = player.id.filter(|id| *id > 0)?;
    let team_id = entry.team_id.filter(|id| *id > 0)?;

    let stats = entry.statistics.clone().unwrap_or_default();

    // Source total and the component sum can disagree; keep the higher and
    // flag the discrepancy for logging only.
    let mut off_target = stats.off_target_shot;
    if off_target == 0 && stats.total_shot > 0 {
        off_target =
            (stats.total_shot - stats.on_target_shot - stats.blocked_scoring_attempt).max(0);
    }
    let component_sum = stats.on_target_shot + off_target + stats.blocked_scoring_attempt;
    let total_shot = stats.total_shot.max(component_sum);
    if stats.total_shot != component_sum {
        debug!(
            player_id,
            match_id,
            reported = stats.total_shot,
            component_sum,
            "shot total disagrees with component sum, keeping the higher"
        );
    }

    let accurate_pass = stats.accurate_pass.min(stats.total_pass);
    let total_duels = stats.duel_won + stats.duel_lost;
    let total_dribbles = stats.successful_dribbles + stats.unsuccessful_dribbles;

    Some(PlayerMatchStat {
        match_id,
        team_id,
        player_id,
        player_name: player.name.clone().unwrap_or_default(),
        short_name: player.short_name.clone().unwrap_or_default(),
        position: player.position.clone().unwrap_or_default(),
        jersey_number: player.jersey(),
        minutes_played: stats.minutes_played,
        rating: stats.rating,

        goals: stats.goals,
        goal_assist: stats.goal_assist,

        total_shot,
        on_target_shot: stats.on_target_shot,
        off_target_shot: off_target,
        blocked_scoring_attempt: stats.blocked_scoring_attempt,

        total_pass: stats.total_pass,
        accurate_pass,
        pass_accuracy: safe_pct(accurate_pass, stats.total_pass),
        key_pass: stats.key_pass,
        total_long_balls: stats.total_long_balls,
        accurate_long_balls: stats.accurate_long_balls,

        successful_dribbles: stats.successful_dribbles,
        dribble_success: safe_pct(stats.successful_dribbles, total_dribbles),

        total_tackle: stats.total_tackle,
        interception_won: stats.interception_won,
        total_clearance: stats.total_clearance,
        outfielder_block: stats.outfielder_block,
        challenge_lost: stats.challenge_lost,

        duel_won: stats.duel_won,
        duel_lost: stats.duel_lost,
        aerial_won: stats.aerial_won,
        duel_success: safe_pct(stats.duel_won, total_duels),

        touches: stats.touches,
        possession_lost_ctrl: stats.possession_lost_ctrl,
        was_fouled: stats.was_fouled,
        fouls: stats.fouls,

        // Provisional; the incident merger is the authority.
        yellow_cards: stats.yellow_cards,
        red_cards: stats.red_cards,

        saves: stats.saves,
        punches: stats.punches,
        good_high_claim: stats.good_high_claim,
        saved_shots_from_inside_box: stats.saved_shots_from_inside_box,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::payload::{PlayerRef, PlayerStatistics};

    fn entry(stats: PlayerStatistics) -> LineupEntry {
        LineupEntry {
            player: Some(PlayerRef {
                id: Some(42),
                name: Some("Test Player".to_string()),
                short_name: Some("T. Player".to_string()),
                position: Some("M".to_string()),
                jersey_number: None,
            }),
            team_id: Some(7),
            statistics: Some(stats),
        }
    }

    #[test]
    fn pass_accuracy_is_zero_when_no_passes() {
        let record = extract_player_stats(
            &entry(PlayerStatistics {
                total_pass: 0,
                accurate_pass: 0,
                ..Default::default()
            }),
            100,
        )
        .unwrap();

        assert_eq!(record.pass_accuracy, 0.0);
        assert!(record.pass_accuracy.is_finite());
    }

    #[test]
    fn pass_accuracy_computed_and_bounded() {
        let record = extract_player_stats(
            &entry(PlayerStatistics {
                total_pass: 30,
                accurate_pass: 25,
                ..Default::default()
            }),
            100,
        )
        .unwrap();

        assert_eq!(record.pass_accuracy, 83.33);
        assert!(record.pass_accuracy >= 0.0 && record.pass_accuracy <= 100.0);
    }

    #[test]
    fn accurate_pass_never_exceeds_total() {
        let record = extract_player_stats(
            &entry(PlayerStatistics {
                total_pass: 10,
                accurate_pass: 12,
                ..Default::default()
            }),
            100,
        )
        .unwrap();

        assert_eq!(record.accurate_pass, 10);
        assert_eq!(record.pass_accuracy, 100.0);
    }

    #[test]
    fn off_target_derived_when_source_omits_it() {
        let record = extract_player_stats(
            &entry(PlayerStatistics {
                total_shot: 5,
                on_target_shot: 2,
                blocked_scoring_attempt: 1,
                off_target_shot: 0,
                ..Default::default()
            }),
            100,
        )
        .unwrap();

        assert_eq!(record.off_target_shot, 2);
    }

    #[test]
    fn off_target_derivation_clamped_at_zero() {
        // Components exceed the reported total: subtraction would go negative.
        let record = extract_player_stats(
            &entry(PlayerStatistics {
                total_shot: 2,
                on_target_shot: 2,
                blocked_scoring_attempt: 1,
                off_target_shot: 0,
                ..Default::default()
            }),
            100,
        )
        .unwrap();

        assert!(record.off_target_shot >= 0);
        assert_eq!(record.off_target_shot, 0);
    }

    #[test]
    fn disagreeing_shot_total_keeps_the_higher_value() {
        // Reported 3 but components sum to 5.
        let record = extract_player_stats(
            &entry(PlayerStatistics {
                total_shot: 3,
                on_target_shot: 2,
                off_target_shot: 2,
                blocked_scoring_attempt: 1,
                ..Default::default()
            }),
            100,
        )
        .unwrap();

        assert_eq!(record.total_shot, 5);
    }

    #[test]
    fn zero_reported_total_keeps_component_sum() {
        let record = extract_player_stats(
            &entry(PlayerStatistics {
                total_shot: 0,
                on_target_shot: 2,
                off_target_shot: 1,
                blocked_scoring_attempt: 1,
                ..Default::default()
            }),
            100,
        )
        .unwrap();

        assert_eq!(record.total_shot, 4);
        assert_eq!(record.off_target_shot, 1);
    }

    #[test]
    fn duel_and_dribble_success_safe_divide() {
        let record = extract_player_stats(
            &entry(PlayerStatistics {
                duel_won: 3,
                duel_lost: 1,
                successful_dribbles: 0,
                unsuccessful_dribbles: 0,
                ..Default::default()
            }),
            100,
        )
        .unwrap();

        assert_eq!(record.duel_success, 75.0);
        assert_eq!(record.dribble_success, 0.0);
    }

    #[test]
    fn entry_without_player_id_is_skipped() {
        let mut e = entry(PlayerStatistics::default());
        e.player.as_mut().unwrap().id = None;
        assert!(extract_player_stats(&e, 100).is_none());
    }

    #[test]
    fn entry_without_team_id_is_skipped() {
        let mut e = entry(PlayerStatistics::default());
        e.team_id = None;
        assert!(extract_player_stats(&e, 100).is_none());
    }
}
