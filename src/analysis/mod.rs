//! Statistics over historical draws

pub mod frequency;
pub mod scorer;

pub use frequency::{compute, most_frequent_combination, top_k};
pub use scorer::{score, score_all};
