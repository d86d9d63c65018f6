//! Per-number occurrence counts

use std::collections::BTreeMap;

use crate::types::{Combination, Draw, FrequencyTable, NUMBERS_PER_DRAW};

/// Count how often each number appears across `draws`.
///
/// Only observed numbers get an entry. The fold is commutative, so draw
/// order never changes the table.
pub fn compute(draws: &[Draw]) -> FrequencyTable {
    let counts = draws
        .iter()
        .flat_map(|draw| draw.numbers().iter().copied())
        .fold(BTreeMap::new(), |mut acc, number| {
            *acc.entry(number).or_insert(0u32) += 1;
            acc
        });
    FrequencyTable::from_counts(counts)
}

/// The `k` most frequent numbers, ascending.
///
/// Ties on count go to the lower number. When fewer than `k` numbers were
/// observed, every observed number is returned.
pub fn top_k(table: &FrequencyTable, k: usize) -> Vec<u8> {
    let mut ranked: Vec<(u8, u32)> = table.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut top: Vec<u8> = ranked.into_iter().take(k).map(|(n, _)| n).collect();
    top.sort_unstable();
    top
}

/// Combination built from the six most frequent numbers
pub fn most_frequent_combination(table: &FrequencyTable) -> Option<Combination> {
    let top = top_k(table, NUMBERS_PER_DRAW);
    Combination::new(&top).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(numbers: [u8; 6]) -> Draw {
        Draw::new(&numbers).unwrap()
    }

    #[test]
    fn test_empty_draws() {
        let table = compute(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert!(top_k(&table, 6).is_empty());
        assert!(most_frequent_combination(&table).is_none());
    }

    #[test]
    fn test_counts_sum_to_six_per_draw() {
        let draws = vec![
            draw([1, 2, 3, 4, 5, 6]),
            draw([1, 2, 3, 7, 8, 9]),
            draw([10, 20, 30, 40, 50, 60]),
        ];
        let table = compute(&draws);
        assert_eq!(table.total(), 18);
        assert_eq!(table.get(1), 2);
        assert_eq!(table.get(60), 1);
        assert_eq!(table.get(59), 0);
    }

    #[test]
    fn test_order_independent_and_idempotent() {
        let mut draws = vec![
            draw([5, 10, 15, 20, 25, 30]),
            draw([1, 5, 9, 13, 17, 21]),
            draw([2, 4, 5, 8, 10, 12]),
        ];
        let forward = compute(&draws);
        assert_eq!(forward, compute(&draws));

        draws.reverse();
        assert_eq!(forward, compute(&draws));
    }

    #[test]
    fn test_top_k_breaks_ties_by_lower_number() {
        let draws = vec![
            draw([1, 2, 3, 4, 5, 6]),
            draw([1, 2, 3, 4, 50, 60]),
            draw([7, 8, 9, 10, 50, 60]),
        ];
        let table = compute(&draws);
        // 1..=4, 50 and 60 appear twice; every other number once
        assert_eq!(top_k(&table, 6), vec![1, 2, 3, 4, 50, 60]);
        assert_eq!(top_k(&table, 3), vec![1, 2, 3]);
        // Next best after the six doubles is the lowest single: 5
        assert_eq!(top_k(&table, 7), vec![1, 2, 3, 4, 5, 50, 60]);
    }

    #[test]
    fn test_top_k_with_too_few_numbers() {
        let table = compute(&[draw([1, 2, 3, 4, 5, 6])]);
        assert_eq!(top_k(&table, 10), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_most_frequent_combination() {
        let draws = vec![
            draw([11, 22, 33, 44, 55, 6]),
            draw([11, 22, 33, 44, 55, 7]),
            draw([1, 2, 3, 4, 5, 7]),
        ];
        let combination = most_frequent_combination(&compute(&draws)).unwrap();
        assert_eq!(combination.numbers(), &[7, 11, 22, 33, 44, 55]);
    }
}
