//! Partial-match scoring against past draws

use crate::types::{Combination, Draw, MatchTally, MatchTier};

/// Tally how many past draws share 4, 5 or 6 numbers with `combination`.
///
/// Draws sharing three or fewer numbers are not counted.
pub fn score(combination: &Combination, draws: &[Draw]) -> MatchTally {
    draws
        .iter()
        .filter_map(|draw| MatchTier::from_hits(combination.shared_with(draw)))
        .fold(MatchTally::default(), MatchTally::with_hit)
}

/// Score each combination in order
pub fn score_all(combinations: &[Combination], draws: &[Draw]) -> Vec<(Combination, MatchTally)> {
    combinations
        .iter()
        .map(|c| (*c, score(c, draws)))
        .collect()
}
