//! Sena Forge - Mega-Sena draw analysis and combination generation
//!
//! Fetches historical draws, counts number frequencies, generates
//! combinations under user constraints and scores combinations against
//! past results.

pub mod analysis;
pub mod draws;
pub mod error;
pub mod generator;
pub mod import;
pub mod input;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SenaForgeError};
pub use types::{
    Combination, Constraints, Draw, FetchConfig, FrequencyTable, GenerationConfig, MatchTally,
    MatchTier,
};

// Re-export main functionality
pub use analysis::{compute, most_frequent_combination, score, score_all, top_k};
pub use draws::{DrawRepository, DrawSource, FetchOutcome};
pub use generator::{generate, CombinationGenerator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
