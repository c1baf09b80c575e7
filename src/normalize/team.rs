use crate::api::payload::{coerce_f64, StatisticsPayload};
use crate::domain::TeamMatchStat;
use crate::normalize::safe_pct;

/// Setter applying one coerced statistic value to the wide team record
type Apply = fn(&mut TeamMatchStat, f64);

/// Allow-list of known statistic keys.
///
/// Unknown keys are silently ignored so API additions cannot corrupt the
/// schema. Floats are kept for percentages and xG, everything else truncates
/// to an integer count.
const TEAM_STAT_KEYS: &[(&str, Apply)] = &[
    ("ballPossession", |s, v| s.ball_possession = v),
    ("expectedGoals", |s, v| s.expected_goals = v),
    ("totalShotsOnGoal", |s, v| s.total_shots = v as i64),
    ("shotsOnGoal", |s, v| s.shots_on_target = v as i64),
    ("shotsOffGoal", |s, v| s.shots_off_target = v as i64),
    ("blockedScoringAttempt", |s, v| s.blocked_shots = v as i64),
    ("cornerKicks", |s, v| s.corners = v as i64),
    ("freeKicks", |s, v| s.free_kicks = v as i64),
    ("fouls", |s, v| s.fouls = v as i64),
    ("yellowCards", |s, v| s.yellow_cards = v as i64),
    ("bigChanceCreated", |s, v| s.big_chances = v as i64),
    ("bigChanceScored", |s, v| s.big_chances_scored = v as i64),
    ("bigChanceMissed", |s, v| s.big_chances_missed = v as i64),
    ("totalShotsInsideBox", |s, v| s.shots_inside_box = v as i64),
    ("totalShotsOutsideBox", |s, v| s.shots_outside_box = v as i64),
    ("touchesInOppBox", |s, v| s.touches_in_penalty_area = v as i64),
    ("passes", |s, v| s.total_passes = v as i64),
    ("accuratePasses", |s, v| s.accurate_passes = v as i64),
    ("totalCross", |s, v| s.total_crosses = v as i64),
    ("accurateCross", |s, v| s.accurate_crosses = v as i64),
    ("totalLongBalls", |s, v| s.total_long_balls = v as i64),
    ("accurateLongBalls", |s, v| s.accurate_long_balls = v as i64),
    ("totalTackle", |s, v| s.tackles = v as i64),
    ("wonTacklePercent", |s, v| s.tackles_won_percent = v),
    ("interceptionWon", |s, v| s.interceptions = v as i64),
    ("ballRecovery", |s, v| s.recoveries = v as i64),
    ("totalClearance", |s, v| s.clearances = v as i64),
    ("errorsLeadToShot", |s, v| s.errors_lead_to_shot = v as i64),
    ("errorsLeadToGoal", |s, v| s.errors_lead_to_goal = v as i64),
    ("duelWonPercent", |s, v| s.duel_won_percent = v),
    ("dispossessed", |s, v| s.dispossessed = v as i64),
    ("groundDuelsPercentage", |s, v| s.ground_duels_percentage = v),
    ("aerialDuelsPercentage", |s, v| s.aerial_duels_percentage = v),
    ("dribblesPercentage", |s, v| s.dribbles_percentage = v),
];

/// Fold the match statistics payload into one wide record per team.
///
/// Only `ALL`-period groups contribute; partial periods are ignored. Every
/// group is iterated and merged, so a later group only overwrites an earlier
/// value when it supplies a non-default one. Team pass accuracy is recomputed
/// from the accumulated totals at the end regardless of any source field.
pub fn fold_team_stats(
    payload: &StatisticsPayload,
    match_id: i64,
    home_team: (i64, &str),
    away_team: (i64, &str),
) -> (TeamMatchStat, TeamMatchStat) {
    let mut home = TeamMatchStat::new(match_id, home_team.0, home_team.1, true);
    let mut away = TeamMatchStat::new(match_id, away_team.0, away_team.1, false);

    for period in payload.statistics.iter().filter(|p| p.period == "ALL") {
        for group in &period.groups {
            for item in &group.statistics_items {
                let Some(&(_, apply)) =
                    TEAM_STAT_KEYS.iter().find(|(key, _)| *key == item.key)
                else {
                    continue;
                };

                if let Some(v) = item.home_value.as_ref().and_then(coerce_f64) {
                    if v != 0.0 {
                        apply(&mut home, v);
                    }
                }
                if let Some(v) = item.away_value.as_ref().and_then(coerce_f64) {
                    if v != 0.0 {
                        apply(&mut away, v);
                    }
                }
            }
        }
    }

    home.pass_accuracy = safe_pct(home.accurate_passes, home.total_passes);
    away.pass_accuracy = safe_pct(away.accurate_passes, away.total_passes);

    (home, away)
}
