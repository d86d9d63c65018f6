//! Core types and structures for sena-forge

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::error::{Result, SenaForgeError};

/// Lowest number on the ticket
pub const MIN_NUMBER: u8 = 1;

/// Highest number on the ticket
pub const MAX_NUMBER: u8 = 60;

/// Numbers drawn per contest and marked per play
pub const NUMBERS_PER_DRAW: usize = 6;

/// Public Mega-Sena results endpoint
pub const DEFAULT_ENDPOINT: &str = "https://loteriascaixa-api.herokuapp.com/api/mega-sena";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Draws analyzed when the caller does not say otherwise
pub const DEFAULT_DRAW_COUNT: usize = 30;

/// Attempt bound for the rejection sampler
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Check that `numbers` holds exactly six distinct values in range.
pub fn validate_numbers(numbers: &[u8]) -> Result<()> {
    if numbers.len() != NUMBERS_PER_DRAW {
        return Err(SenaForgeError::validation(format!(
            "expected {} numbers, got {}",
            NUMBERS_PER_DRAW,
            numbers.len()
        )));
    }
    for &n in numbers {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
            return Err(SenaForgeError::validation(format!(
                "number {} out of range ({}-{})",
                n, MIN_NUMBER, MAX_NUMBER
            )));
        }
    }
    let unique: BTreeSet<u8> = numbers.iter().copied().collect();
    if unique.len() != numbers.len() {
        return Err(SenaForgeError::validation(format!(
            "duplicate numbers in {:?}",
            numbers
        )));
    }
    Ok(())
}

fn sorted_array(numbers: &[u8]) -> [u8; NUMBERS_PER_DRAW] {
    let mut arr = [0u8; NUMBERS_PER_DRAW];
    arr.copy_from_slice(numbers);
    arr.sort_unstable();
    arr
}

/// One historical result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DrawRecord")]
pub struct Draw {
    /// Contest number, when the source reports it
    pub contest: Option<u32>,
    pub date: Option<NaiveDate>,
    numbers: [u8; NUMBERS_PER_DRAW],
}

impl Draw {
    /// Build a draw from six distinct numbers in any order
    pub fn new(numbers: &[u8]) -> Result<Self> {
        validate_numbers(numbers)?;
        Ok(Self {
            contest: None,
            date: None,
            numbers: sorted_array(numbers),
        })
    }

    pub fn with_contest(mut self, contest: u32) -> Self {
        self.contest = Some(contest);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Drawn numbers, ascending
    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }
}

/// Serialized shape of a `Draw`; validated on the way in
#[derive(Debug, Deserialize)]
pub struct DrawRecord {
    #[serde(default)]
    pub contest: Option<u32>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub numbers: Vec<u8>,
}

impl TryFrom<DrawRecord> for Draw {
    type Error = SenaForgeError;

    fn try_from(record: DrawRecord) -> Result<Self> {
        let mut draw = Draw::new(&record.numbers)?;
        draw.contest = record.contest;
        draw.date = record.date;
        Ok(draw)
    }
}

/// A candidate play: six distinct numbers, kept ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Combination {
    numbers: [u8; NUMBERS_PER_DRAW],
}

impl Combination {
    pub fn new(numbers: &[u8]) -> Result<Self> {
        validate_numbers(numbers)?;
        Ok(Self {
            numbers: sorted_array(numbers),
        })
    }

    /// Build from wider integers such as spreadsheet cells
    pub fn from_values(values: &[i64]) -> Result<Self> {
        let numbers = values
            .iter()
            .map(|&v| {
                u8::try_from(v).map_err(|_| {
                    SenaForgeError::validation(format!(
                        "number {} out of range ({}-{})",
                        v, MIN_NUMBER, MAX_NUMBER
                    ))
                })
            })
            .collect::<Result<Vec<u8>>>()?;
        Self::new(&numbers)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }

    pub fn even_count(&self) -> usize {
        self.numbers.iter().filter(|&&n| n % 2 == 0).count()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    /// How many numbers this combination shares with `draw`
    pub fn shared_with(&self, draw: &Draw) -> usize {
        self.numbers.iter().filter(|&&n| draw.contains(n)).count()
    }
}

impl TryFrom<Vec<u8>> for Combination {
    type Error = SenaForgeError;

    fn try_from(numbers: Vec<u8>) -> Result<Self> {
        Combination::new(&numbers)
    }
}

impl From<Combination> for Vec<u8> {
    fn from(combination: Combination) -> Self {
        combination.numbers.to_vec()
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.numbers.iter().map(|n| format!("{:02}", n)).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Occurrence count per observed number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u32>,
}

impl FrequencyTable {
    pub(crate) fn from_counts(counts: BTreeMap<u8, u32>) -> Self {
        Self { counts }
    }

    /// Count for `number`; zero when never observed
    pub fn get(&self, number: u8) -> u32 {
        self.counts.get(&number).copied().unwrap_or(0)
    }

    /// Distinct numbers observed
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// (number, count) pairs in ascending number order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().map(|(&n, &c)| (n, c))
    }
}

/// Constraints for combination generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub required: BTreeSet<u8>,
    pub excluded: BTreeSet<u8>,
    pub sum_min: u32,
    pub sum_max: u32,
    /// Exact number of even values wanted
    pub even_count: usize,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            required: BTreeSet::new(),
            excluded: BTreeSet::new(),
            sum_min: 140,
            sum_max: 210,
            even_count: 3,
        }
    }
}

impl Constraints {
    /// Reasons the constraints can never be met, without sampling
    pub fn precondition_violation(&self) -> Option<String> {
        if self.required.len() > NUMBERS_PER_DRAW {
            return Some(format!(
                "{} required numbers exceed the {} per play",
                self.required.len(),
                NUMBERS_PER_DRAW
            ));
        }
        if let Some(n) = self
            .required
            .iter()
            .find(|n| !(MIN_NUMBER..=MAX_NUMBER).contains(*n))
        {
            return Some(format!("required number {} out of range", n));
        }
        let overlap: Vec<u8> = self.required.intersection(&self.excluded).copied().collect();
        if !overlap.is_empty() {
            return Some(format!("numbers both required and excluded: {:?}", overlap));
        }
        if self.even_count > NUMBERS_PER_DRAW {
            return Some(format!("cannot have {} even numbers", self.even_count));
        }
        if self.sum_min > self.sum_max {
            return Some(format!("empty sum range {}..={}", self.sum_min, self.sum_max));
        }
        None
    }

    /// Whether a finished combination satisfies every filter
    pub fn is_satisfied_by(&self, combination: &Combination) -> bool {
        let sum = combination.sum();
        self.required.iter().all(|&n| combination.contains(n))
            && !self.excluded.iter().any(|&n| combination.contains(n))
            && (self.sum_min..=self.sum_max).contains(&sum)
            && combination.even_count() == self.even_count
    }
}

/// Prize-relevant match tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Quadra,
    Quina,
    Sena,
}

impl MatchTier {
    pub const ALL: [MatchTier; 3] = [MatchTier::Quadra, MatchTier::Quina, MatchTier::Sena];

    /// Shared-number count for the tier
    pub fn hits(&self) -> usize {
        match self {
            MatchTier::Quadra => 4,
            MatchTier::Quina => 5,
            MatchTier::Sena => 6,
        }
    }

    pub fn from_hits(hits: usize) -> Option<Self> {
        match hits {
            4 => Some(MatchTier::Quadra),
            5 => Some(MatchTier::Quina),
            6 => Some(MatchTier::Sena),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Quadra => write!(f, "quadra"),
            MatchTier::Quina => write!(f, "quina"),
            MatchTier::Sena => write!(f, "sena"),
        }
    }
}

/// Historical hits per tier for one combination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
    pub quadra: u32,
    pub quina: u32,
    pub sena: u32,
}

impl MatchTally {
    pub fn get(&self, tier: MatchTier) -> u32 {
        match tier {
            MatchTier::Quadra => self.quadra,
            MatchTier::Quina => self.quina,
            MatchTier::Sena => self.sena,
        }
    }

    /// Copy of this tally with one more hit at `tier`
    pub fn with_hit(mut self, tier: MatchTier) -> Self {
        match tier {
            MatchTier::Quadra => self.quadra += 1,
            MatchTier::Quina => self.quina += 1,
            MatchTier::Sena => self.sena += 1,
        }
        self
    }

    pub fn total(&self) -> u32 {
        self.quadra + self.quina + self.sena
    }
}

impl std::fmt::Display for MatchTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "quadras: {}, quinas: {}, senas: {}",
            self.quadra, self.quina, self.sena
        )
    }
}

/// Configuration for fetching draws
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: format!("sena-forge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by `SENA_API_URL` and `SENA_FETCH_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SENA_API_URL") {
            if url.trim().is_empty() {
                return Err(SenaForgeError::config("SENA_API_URL is set but empty"));
            }
            config.endpoint = url.trim().to_string();
        }

        if let Ok(raw) = std::env::var("SENA_FETCH_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SenaForgeError::config(format!("SENA_FETCH_TIMEOUT_SECS must be a whole number, got '{}'", raw))
            })?;
            if secs == 0 {
                return Err(SenaForgeError::config("SENA_FETCH_TIMEOUT_SECS must be positive"));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Configuration for the combination generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_attempts: usize,
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}
