use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::payload::Event;
use crate::api::ApiSource;
use crate::domain::{MatchRecord, UNKNOWN_VENUE};

/// Fetches the list of matches for one (tournament, season, round).
pub struct RoundMatchFetcher {
    api: Arc<dyn ApiSource>,
}

impl RoundMatchFetcher {
    pub fn new(api: Arc<dyn ApiSource>) -> Self {
        Self { api }
    }

    /// Fetch the round's matches with nested optionals defaulted.
    ///
    /// Returns an empty list both when the round has no events (the expected
    /// terminal condition for an unscheduled round) and when the fetch itself
    /// fails; the failure is logged but callers cannot tell the two apart.
    pub async fn fetch(
        &self,
        tournament_id: i64,
        season_id: i64,
        round_number: u32,
    ) -> Vec<MatchRecord> {
        let payload = match self
            .api
            .round_events(tournament_id, season_id, round_number)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                warn!(
                    tournament_id,
                    season_id, round_number, error = %e,
                    "round events fetch failed, treating as empty round"
                );
                return Vec::new();
            }
        };

        let matches: Vec<MatchRecord> = payload
            .events
            .iter()
            .filter_map(|event| extract_match(event, tournament_id, season_id, round_number))
            .collect();

        debug!(
            round_number,
            count = matches.len(),
            "fetched round match list"
        );
        matches
    }
}

fn extract_match(
    event: &Event,
    tournament_id: i64,
    season_id: i64,
    round_number: u32,
) -> Option<MatchRecord> {
    let (Some(home), Some(away)) = (event.home_team.as_ref(), event.away_team.as_ref()) else {
        warn!(match_id = event.id, "event missing a team side, skipping");
        return None;
    };
    let Some(start) = event
        .start_timestamp
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    else {
        warn!(match_id = event.id, "event missing start timestamp, skipping");
        return None;
    };

    Some(MatchRecord {
        match_id: event.id,
        tournament_id,
        season_id,
        round_number,
        match_date: start.date_naive(),
        home_team_id: home.id,
        home_team_name: home.name.clone(),
        away_team_id: away.id,
        away_team_name: away.name.clone(),
        home_score: event.home_score.current.unwrap_or(0),
        away_score: event.away_score.current.unwrap_or(0),
        status: event.status.description.clone().unwrap_or_default(),
        venue: event
            .venue
            .as_ref()
            .and_then(|v| v.name.clone())
            .unwrap_or_else(|| UNKNOWN_VENUE.to_string()),
        start_timestamp: start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::payload::{Score, TeamRef, Venue};

    fn event(id: i64) -> Event {
        Event {
            id,
            home_team: Some(TeamRef {
                id: 10,
                name: "Home FC".to_string(),
            }),
            away_team: Some(TeamRef {
                id: 20,
                name: "Away FC".to_string(),
            }),
            home_score: Score::default(),
            away_score: Score::default(),
            status: Default::default(),
            venue: None,
            start_timestamp: Some(1_700_000_000),
        }
    }

    #[test]
    fn missing_score_defaults_to_zero() {
        let record = extract_match(&event(1), 203, 77142, 5).unwrap();
        assert_eq!(record.home_score, 0);
        assert_eq!(record.away_score, 0);
    }

    #[test]
    fn missing_venue_defaults_to_sentinel() {
        let record = extract_match(&event(1), 203, 77142, 5).unwrap();
        assert_eq!(record.venue, UNKNOWN_VENUE);
    }

    #[test]
    fn present_venue_and_score_are_kept() {
        let mut e = event(1);
        e.venue = Some(Venue {
            name: Some("Big Arena".to_string()),
        });
        e.home_score = Score { current: Some(2) };
        e.away_score = Score { current: Some(1) };

        let record = extract_match(&e, 203, 77142, 5).unwrap();
        assert_eq!(record.venue, "Big Arena");
        assert_eq!(record.home_score, 2);
        assert_eq!(record.away_score, 1);
    }

    #[test]
    fn event_without_teams_is_skipped() {
        let mut e = event(1);
        e.home_team = None;
        assert!(extract_match(&e, 203, 77142, 5).is_none());
    }

    #[test]
    fn event_without_timestamp_is_skipped() {
        let mut e = event(1);
        e.start_timestamp = None;
        assert!(extract_match(&e, 203, 77142, 5).is_none());
    }
}
