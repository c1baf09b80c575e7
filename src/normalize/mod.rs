//! Conversion of raw API payload fragments into canonical records.

mod incidents;
mod player;
mod team;

pub use incidents::IncidentMerger;
pub use player::extract_player_stats;
pub use team::fold_team_stats;

/// Percentage via safe division: a zero or negative denominator yields 0,
/// never NaN or infinity. Rounded to two decimal places.
pub(crate) fn safe_pct(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    let pct = numerator as f64 / denominator as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_pct_zero_denominator_is_zero() {
        assert_eq!(safe_pct(5, 0), 0.0);
        assert_eq!(safe_pct(0, 0), 0.0);
        assert_eq!(safe_pct(3, -1), 0.0);
    }

    #[test]
    fn safe_pct_rounds_to_two_decimals() {
        assert_eq!(safe_pct(1, 3), 33.33);
        assert_eq!(safe_pct(2, 3), 66.67);
        assert_eq!(safe_pct(25, 30), 83.33);
    }

    #[test]
    fn safe_pct_stays_in_range() {
        assert_eq!(safe_pct(10, 10), 100.0);
        assert_eq!(safe_pct(0, 10), 0.0);
    }
}
