use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of a team's season-to-date statistics.
///
/// Appended on every cache refresh; readers take the most recent row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamSeasonSnapshot {
    pub team_id: i64,
    pub tournament_id: i64,
    pub season_id: i64,
    pub matches_played: i64,
    pub goals_scored: i64,
    pub goals_conceded: i64,
    pub avg_possession: f64,
    pub avg_shots: f64,
    pub avg_shots_on_target: f64,
    pub avg_xg: f64,
    pub avg_corners: f64,
    pub avg_fouls: f64,
    pub avg_yellow_cards: f64,
    pub big_chances: i64,
    pub big_chances_missed: i64,
    pub goals_inside_box: i64,
    pub goals_outside_box: i64,
    pub headed_goals: i64,
    pub pass_accuracy: f64,
    pub fast_breaks: i64,
}

/// Coarse direction of a team's league position over its last two
/// performance-graph entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Standings snapshot for one team, plus derived form and trend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPositionSnapshot {
    pub team_id: i64,
    pub tournament_id: i64,
    pub season_id: i64,
    pub position: i64,
    pub points: i64,
    pub goal_difference: i64,
    pub matches_played: i64,
    pub wins: i64,
    pub draws: i64,
    pub losses: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    /// Last 5 results as a `W`/`D`/`L` string, most recent last
    pub form: String,
    pub trend: Trend,
    pub last_updated_round: i64,
}
