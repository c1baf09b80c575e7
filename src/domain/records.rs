use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel used when the API reports no venue for a match
pub const UNKNOWN_VENUE: &str = "unknown";

/// One scheduled or played match within a round.
///
/// Created once per round fetch and never mutated in place; re-fetching the
/// same round re-inserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: i64,
    pub tournament_id: i64,
    pub season_id: i64,
    pub round_number: u32,
    pub match_date: NaiveDate,
    pub home_team_id: i64,
    pub home_team_name: String,
    pub away_team_id: i64,
    pub away_team_name: String,
    pub home_score: i64,
    pub away_score: i64,
    pub status: String,
    pub venue: String,
    pub start_timestamp: DateTime<Utc>,
}

impl MatchRecord {
    /// Sanity check applied just before serialization into a batch
    pub fn validate(&self) -> Result<(), String> {
        if self.match_id <= 0 {
            return Err(format!("non-positive match_id {}", self.match_id));
        }
        if self.home_team_id <= 0 || self.away_team_id <= 0 {
            return Err(format!("non-positive team id on match {}", self.match_id));
        }
        Ok(())
    }
}

/// Per-player statistics for one match, identified by (match, team, player).
///
/// `yellow_cards`/`red_cards` are provisional until the incident merger
/// overwrites them from the incident feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchStat {
    pub match_id: i64,
    pub team_id: i64,
    pub player_id: i64,
    pub player_name: String,
    pub short_name: String,
    pub position: String,
    pub jersey_number: i64,
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
    pub pass_accuracy: f64,
    pub key_pass: i64,
    pub total_long_balls: i64,
    pub accurate_long_balls: i64,

    pub successful_dribbles: i64,
    pub dribble_success: f64,

    pub total_tackle: i64,
    pub interception_won: i64,
    pub total_clearance: i64,
    pub outfielder_block: i64,
    pub challenge_lost: i64,

    pub duel_won: i64,
    pub duel_lost: i64,
    pub aerial_won: i64,
    pub duel_success: f64,

    pub touches: i64,
    pub possession_lost_ctrl: i64,
    pub was_fouled: i64,
    pub fouls: i64,

    pub yellow_cards: i64,
    pub red_cards: i64,

    pub saves: i64,
    pub punches: i64,
    pub good_high_claim: i64,
    pub saved_shots_from_inside_box: i64,
}

impl PlayerMatchStat {
    pub fn validate(&self) -> Result<(), String> {
        if self.match_id <= 0 {
            return Err(format!("non-positive match_id {}", self.match_id));
        }
        if self.player_id <= 0 {
            return Err(format!(
                "non-positive player_id {} on match {}",
                self.player_id, self.match_id
            ));
        }
        if self.accurate_pass > self.total_pass {
            return Err(format!(
                "accurate_pass {} > total_pass {} for player {}",
                self.accurate_pass, self.total_pass, self.player_id
            ));
        }
        Ok(())
    }
}

/// Card color as reported by the incident feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Yellow,
    Red,
    /// Second yellow leading to a red; counted as a red
    YellowRed,
}

impl CardKind {
    pub fn from_incident_class(class: &str) -> Option<Self> {
        match class {
            "yellow" => Some(CardKind::Yellow),
            "red" => Some(CardKind::Red),
            "yellowRed" => Some(CardKind::YellowRed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Yellow => "yellow",
            CardKind::Red => "red",
            CardKind::YellowRed => "yellowRed",
        }
    }

    /// Whether this card counts toward the red tally
    pub fn is_red(&self) -> bool {
        matches!(self, CardKind::Red | CardKind::YellowRed)
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A card shown to a player during a match.
///
/// Incidents without a resolvable player id (coaching staff) never become
/// `CardIncident`s; they are dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardIncident {
    pub match_id: i64,
    pub player_id: i64,
    pub player_name: String,
    pub team_is_home: bool,
    pub kind: CardKind,
    pub reason: String,
    /// In-match minute, clamped to the persisted u16 column width
    pub time: u16,
    pub added_time: u16,
}

impl CardIncident {
    pub fn validate(&self) -> Result<(), String> {
        if self.match_id <= 0 {
            return Err(format!("non-positive match_id {}", self.match_id));
        }
        if self.player_id <= 0 {
            return Err(format!("non-positive player_id {}", self.player_id));
        }
        Ok(())
    }
}

/// Per-team wide statistics for one match, folded from every `ALL`-period
/// statistic group. Unset metrics stay at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchStat {
    pub match_id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub is_home: bool,

    pub ball_possession: f64,
    pub expected_goals: f64,
    pub total_shots: i64,
    pub shots_on_target: i64,
    pub shots_off_target: i64,
    pub blocked_shots: i64,
    pub corners: i64,
    pub free_kicks: i64,
    pub fouls: i64,
    pub yellow_cards: i64,

    pub big_chances: i64,
    pub big_chances_scored: i64,
    pub big_chances_missed: i64,
    pub shots_inside_box: i64,
    pub shots_outside_box: i64,
    pub touches_in_penalty_area: i64,

    pub total_passes: i64,
    pub accurate_passes: i64,
    /// Always recomputed locally from the accumulated totals, never trusted
    /// from a single source field
    pub pass_accuracy: f64,
    pub total_crosses: i64,
    pub accurate_crosses: i64,
    pub total_long_balls: i64,
    pub accurate_long_balls: i64,

    pub tackles: i64,
    pub tackles_won_percent: f64,
    pub interceptions: i64,
    pub recoveries: i64,
    pub clearances: i64,
    pub errors_lead_to_shot: i64,
    pub errors_lead_to_goal: i64,

    pub duel_won_percent: f64,
    pub dispossessed: i64,
    pub ground_duels_percentage: f64,
    pub aerial_duels_percentage: f64,
    pub dribbles_percentage: f64,
}

impl TeamMatchStat {
    pub fn new(match_id: i64, team_id: i64, team_name: &str, is_home: bool) -> Self {
        Self {
            match_id,
            team_id,
            team_name: team_name.to_string(),
            is_home,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.match_id <= 0 {
            return Err(format!("non-positive match_id {}", self.match_id));
        }
        if self.team_id <= 0 {
            return Err(format!(
                "non-positive team_id {} on match {}",
                self.team_id, self.match_id
            ));
        }
        Ok(())
    }
}
