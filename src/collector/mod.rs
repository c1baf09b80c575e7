mod detail;
mod rounds;

pub use detail::{MatchDetailFetcher, MatchPayloads};
pub use rounds::RoundMatchFetcher;
