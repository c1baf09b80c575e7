mod cache;
mod records;

pub use cache::{TeamPositionSnapshot, TeamSeasonSnapshot, Trend};
pub use records::{
    CardIncident, CardKind, MatchRecord, PlayerMatchStat, TeamMatchStat, UNKNOWN_VENUE,
};
