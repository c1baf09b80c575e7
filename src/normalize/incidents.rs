use std::collections::HashMap;

use tracing::debug;

use crate::api::payload::{coerce_i64, IncidentsPayload};
use crate::domain::{CardIncident, CardKind, PlayerMatchStat};

/// Folds card incidents into the per-player records.
///
/// The incident feed is the authority on cards; whatever the lineup payload
/// reported is overwritten during the merge.
pub struct IncidentMerger;

impl IncidentMerger {
    /// Extract card incidents for one match.
    ///
    /// Non-card incidents are skipped. Incidents without a resolvable player
    /// id belong to bench staff and are dropped, not attributed.
    pub fn normalize(payload: &IncidentsPayload, match_id: i64) -> Vec<CardIncident> {
        let mut cards = Vec::new();

        for incident in &payload.incidents {
            if incident.incident_type.as_deref() != Some("card") {
                continue;
            }

            let Some(kind) = incident
                .incident_class
                .as_deref()
                .and_then(CardKind::from_incident_class)
            else {
                continue;
            };

            let Some(player_id) = incident
                .player
                .as_ref()
                .and_then(|p| p.id)
                .filter(|id| *id > 0)
            else {
                debug!(match_id, "dropping card without player id (staff)");
                continue;
            };

            cards.push(CardIncident {
                match_id,
                player_id,
                player_name: incident
                    .player
                    .as_ref()
                    .and_then(|p| p.name.clone())
                    .unwrap_or_default(),
                team_is_home: incident.is_home.unwrap_or(false),
                kind,
                reason: incident.reason.clone().unwrap_or_default(),
                time: clamp_time(incident.time.as_ref()),
                added_time: clamp_time(incident.added_time.as_ref()),
            });
        }

        cards
    }

    /// Set yellow/red counts on every player record from the card tally.
    ///
    /// Players with no associated incident get 0; a `yellowRed` counts as a
    /// red.
    pub fn merge(players: &mut [PlayerMatchStat], cards: &[CardIncident]) {
        let mut tally: HashMap<i64, (i64, i64)> = HashMap::new();
        for card in cards {
            let entry = tally.entry(card.player_id).or_default();
            match card.kind {
                CardKind::Yellow => entry.0 += 1,
                CardKind::Red | CardKind::YellowRed => entry.1 += 1,
            }
        }

        for player in players.iter_mut() {
            let (yellow, red) = tally.get(&player.player_id).copied().unwrap_or((0, 0));
            player.yellow_cards = yellow;
            player.red_cards = red;
        }
    }
}

/// Clamp an incident time into the persisted u16 column width, coercing
/// non-numeric values best-effort and defaulting to 0.
fn clamp_time(value: Option<&serde_json::Value>) -> u16 {
    value
        .and_then(coerce_i64)
        .map(|t| t.clamp(0, u16::MAX as i64) as u16)
        .unwrap_or(0)
}
