//! Constrained random combination generator
//!
//! Bounded rejection sampling: fill the required numbers, top up with a
//! shuffled pool, keep the first candidate passing the sum and parity
//! filters. Giving up after the attempt bound returns `None`, which callers
//! treat as "no combination found" rather than as a failure. A feasible
//! combination can be missed under tight constraints.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::{
    Combination, Constraints, GenerationConfig, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_DRAW,
};

/// Random combination generator with its own RNG
pub struct CombinationGenerator {
    rng: StdRng,
    max_attempts: usize,
}

impl CombinationGenerator {
    /// Create a generator with default configuration
    pub fn new() -> Self {
        Self::with_config(GenerationConfig::default())
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: GenerationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            max_attempts: config.max_attempts,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Generate one combination satisfying `constraints`, if one turns up
    pub fn generate(&mut self, constraints: &Constraints) -> Option<Combination> {
        if let Some(reason) = constraints.precondition_violation() {
            tracing::debug!(reason = %reason, "Constraints infeasible before sampling");
            return None;
        }

        let pool: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER)
            .filter(|n| !constraints.excluded.contains(n))
            .collect();

        for attempt in 1..=self.max_attempts {
            let mut candidate: Vec<u8> = constraints.required.iter().copied().collect();

            let mut rest: Vec<u8> = pool
                .iter()
                .copied()
                .filter(|n| !constraints.required.contains(n))
                .collect();
            rest.shuffle(&mut self.rng);

            let missing = NUMBERS_PER_DRAW - candidate.len();
            candidate.extend(rest.into_iter().take(missing));

            if candidate.len() != NUMBERS_PER_DRAW {
                continue;
            }

            let sum: u32 = candidate.iter().map(|&n| n as u32).sum();
            let evens = candidate.iter().filter(|&&n| n % 2 == 0).count();

            if (constraints.sum_min..=constraints.sum_max).contains(&sum)
                && evens == constraints.even_count
            {
                tracing::debug!(attempt = %attempt, sum = %sum, "Combination generated");
                return Combination::new(&candidate).ok();
            }
        }

        tracing::debug!(attempts = %self.max_attempts, "No combination satisfied the constraints");
        None
    }
}

impl Default for CombinationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate with a fresh entropy-seeded generator
pub fn generate(constraints: &Constraints) -> Option<Combination> {
    CombinationGenerator::new().generate(constraints)
}
