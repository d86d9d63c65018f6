//! Parsing of user-typed number lists such as `"4, 8 15;16"`

use regex::Regex;
use std::collections::BTreeSet;

use crate::error::{Result, SenaForgeError};
use crate::types::{MAX_NUMBER, MIN_NUMBER};

/// Parse a list of ticket numbers separated by commas, semicolons or spaces.
///
/// Duplicates collapse; an empty string yields an empty set.
pub fn parse_number_list(text: &str) -> Result<BTreeSet<u8>> {
    let separators = Regex::new(r"[,;\s]+")
        .map_err(|e| SenaForgeError::internal(e.to_string()))?;

    separators
        .split(text.trim())
        .filter(|token| !token.is_empty())
        .map(|token| -> Result<u8> {
            let n: u8 = token.parse().map_err(|_| {
                SenaForgeError::validation(format!("'{}' is not a ticket number", token))
            })?;
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
                return Err(SenaForgeError::validation(format!(
                    "number {} out of range ({}-{})",
                    n, MIN_NUMBER, MAX_NUMBER
                )));
            }
            Ok(n)
        })
        .collect()
}
