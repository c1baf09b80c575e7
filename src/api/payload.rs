//! Serde models for the sports-data API payloads.
//!
//! Every field the pipeline consumes is optional or defaulted here; the
//! consuming side decides the fallback. The API adds and drops fields between
//! versions, so nothing in this module should fail deserialization over an
//! unexpected shape.

use serde::Deserialize;
use serde_json::Value;

/// Best-effort numeric extraction from a JSON value.
///
/// The API serves numbers, numeric strings, and percent-suffixed strings
/// ("55%") for the same logical keys depending on endpoint version.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    }
}

pub fn coerce_i64(value: &Value) -> Option<i64> {
    coerce_f64(value).map(|v| v as i64)
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Score {
    pub current: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchStatus {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
}

/// `/unique-tournament/{t}/season/{s}/events/round/{r}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsPayload {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub home_team: Option<TeamRef>,
    pub away_team: Option<TeamRef>,
    #[serde(default)]
    pub home_score: Score,
    #[serde(default)]
    pub away_score: Score,
    #[serde(default)]
    pub status: MatchStatus,
    pub venue: Option<Venue>,
    pub start_timestamp: Option<i64>,
}

/// `/event/{id}/lineups`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineupsPayload {
    pub home: Option<TeamLineup>,
    pub away: Option<TeamLineup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamLineup {
    #[serde(default)]
    pub players: Vec<LineupEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupEntry {
    pub player: Option<PlayerRef>,
    pub team_id: Option<i64>,
    pub statistics: Option<PlayerStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub position: Option<String>,
    /// Served as a string by current API versions, as a number by older ones
    pub jersey_number: Option<Value>,
}

impl PlayerRef {
    pub fn jersey(&self) -> i64 {
        self.jersey_number
            .as_ref()
            .and_then(coerce_i64)
            .unwrap_or(0)
    }
}

/// Raw per-player statistics block from the lineup payload.
///
/// Field set mirrors the persisted player record; everything defaults to
/// zero so a sparse payload (bench player, abandoned match) still decodes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStatistics {
    pub minutes_played: i64,
    pub rating: f64,
    pub goals: i64,
    pub goal_assist: i64,
    pub total_shot: i64,
    pub on_target_shot: i64,
    pub off_target_shot: i64,
    pub blocked_scoring_attempt: i64,
    pub total_pass: i64,
    pub accurate_pass: i64,
    pub key_pass: i64,
    pub total_long_balls: i64,
    pub accurate_long_balls: i64,
    pub successful_dribbles: i64,
    pub unsuccessful_dribbles: i64,
    pub total_tackle: i64,
    pub interception_won: i64,
    pub total_clearance: i64,
    pub outfielder_block: i64,
    pub challenge_lost: i64,
    pub duel_won: i64,
    pub duel_lost: i64,
    pub aerial_won: i64,
    pub touches: i64,
    pub possession_lost_ctrl: i64,
    pub was_fouled: i64,
    pub fouls: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub saves: i64,
    pub punches: i64,
    pub good_high_claim: i64,
    #[serde(rename = "savedShotsFromInsideTheBox")]
    pub saved_shots_from_inside_box: i64,
}

/// `/event/{id}/incidents`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentsPayload {
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub incident_type: Option<String>,
    /// Card color for card incidents: "yellow", "red", "yellowRed"
    pub incident_class: Option<String>,
    pub player: Option<PlayerRef>,
    pub is_home: Option<bool>,
    pub reason: Option<String>,
    /// Minute; occasionally a string or missing entirely
    pub time: Option<Value>,
    pub added_time: Option<Value>,
}

/// `/event/{id}/statistics`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatisticsPayload {
    #[serde(default)]
    pub statistics: Vec<StatPeriod>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatPeriod {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub groups: Vec<StatGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatGroup {
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub statistics_items: Vec<StatItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatItem {
    #[serde(default)]
    pub key: String,
    pub home_value: Option<Value>,
    pub away_value: Option<Value>,
}

/// `/team/{id}/unique-tournament/{t}/season/{s}/statistics/overall`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamSeasonPayload {
    pub statistics: Option<TeamSeasonStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamSeasonStatistics {
    pub matches: i64,
    pub goals_scored: i64,
    pub goals_conceded: i64,
    pub average_ball_possession: f64,
    pub shots: f64,
    pub shots_on_target: f64,
    pub expected_goals: f64,
    pub corners: f64,
    pub fouls: f64,
    pub yellow_cards: f64,
    pub big_chances: i64,
    pub big_chances_missed: i64,
    #[serde(rename = "goalsFromInsideTheBox")]
    pub goals_inside_box: i64,
    #[serde(rename = "goalsFromOutsideTheBox")]
    pub goals_outside_box: i64,
    pub headed_goals: i64,
    pub accurate_passes_percentage: f64,
    pub fast_breaks: i64,
}

/// `/unique-tournament/{t}/season/{s}/standings/total`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandingsPayload {
    #[serde(default)]
    pub standings: Vec<StandingTable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandingTable {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub rows: Vec<StandingRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub team: Option<TeamRef>,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub matches: i64,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub draws: i64,
    #[serde(default)]
    pub losses: i64,
    pub scores_for: Option<i64>,
    pub scores_against: Option<i64>,
    /// Pre-formatted "+N"/"-N" string; only a fallback for goal difference
    pub score_diff_formatted: Option<String>,
}

/// `/unique-tournament/{t}/season/{s}/team/{id}/team-performance-graph-data`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceGraphPayload {
    #[serde(default)]
    pub graph_data: Vec<GraphPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphPoint {
    pub position: Option<i64>,
    pub week: Option<i64>,
    #[serde(default)]
    pub events: Vec<GraphEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEvent {
    pub home_team: Option<TeamRef>,
    pub away_team: Option<TeamRef>,
    pub home_score: Option<Score>,
    pub away_score: Option<Score>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_handles_numbers_strings_and_percent() {
        assert_eq!(coerce_f64(&serde_json::json!(55.5)), Some(55.5));
        assert_eq!(coerce_f64(&serde_json::json!("42")), Some(42.0));
        assert_eq!(coerce_f64(&serde_json::json!("55%")), Some(55.0));
        assert_eq!(coerce_f64(&serde_json::json!(null)), None);
        assert_eq!(coerce_f64(&serde_json::json!([1, 2])), None);
        assert_eq!(coerce_i64(&serde_json::json!("7")), Some(7));
    }

    #[test]
    fn sparse_event_decodes_with_defaults() {
        let raw = serde_json::json!({
            "id": 12345,
            "homeTeam": {"id": 1, "name": "Home FC"},
            "awayTeam": {"id": 2, "name": "Away FC"},
            "startTimestamp": 1700000000
        });
        let event: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(event.id, 12345);
        assert_eq!(event.home_score.current, None);
        assert!(event.venue.is_none());
        assert!(event.status.description.is_none());
    }

    #[test]
    fn player_statistics_default_missing_fields_to_zero() {
        let raw = serde_json::json!({"totalPass": 30, "accuratePass": 25, "rating": 7.1});
        let stats: PlayerStatistics = serde_json::from_value(raw).unwrap();
        assert_eq!(stats.total_pass, 30);
        assert_eq!(stats.accurate_pass, 25);
        assert_eq!(stats.total_shot, 0);
        assert!((stats.rating - 7.1).abs() < f64::EPSILON);
    }

    #[test]
    fn jersey_number_accepts_string_or_number() {
        let as_string: PlayerRef =
            serde_json::from_value(serde_json::json!({"id": 1, "jerseyNumber": "10"})).unwrap();
        let as_number: PlayerRef =
            serde_json::from_value(serde_json::json!({"id": 1, "jerseyNumber": 10})).unwrap();
        assert_eq!(as_string.jersey(), 10);
        assert_eq!(as_number.jersey(), 10);
    }
}
