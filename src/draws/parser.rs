//! Results payload parsing
//!
//! The results API answers either with a list of contest records or with a
//! single record. Each record carries the drawn numbers under `dezenas`, as
//! zero-padded strings or plain integers.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SenaForgeError};
use crate::types::Draw;

const NUMBERS_FIELD: &str = "dezenas";
const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Deserialize)]
struct ContestRecord {
    #[serde(default)]
    concurso: Option<u32>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    dezenas: Option<Vec<RawNumber>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Text(String),
}

impl RawNumber {
    fn to_number(&self) -> Result<u8> {
        let value = match self {
            RawNumber::Int(v) => *v,
            RawNumber::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                SenaForgeError::data_format(format!("'{}' is not a number", s), None)
            })?,
        };
        u8::try_from(value)
            .map_err(|_| SenaForgeError::data_format(format!("number {} out of range", value), None))
    }
}

/// Parse a results payload, keeping at most `count` records.
///
/// Records whose number list is present but empty are skipped. A record
/// without the numbers field fails the whole payload.
pub fn parse_payload(text: &str, count: usize) -> Result<Vec<Draw>> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        SenaForgeError::data_format(
            format!("results payload is not valid JSON: {}", e),
            Some(truncate(text)),
        )
    })?;

    let records = match value {
        Value::Array(items) => items.into_iter().take(count).collect::<Vec<_>>(),
        record @ Value::Object(_) => vec![record].into_iter().take(count).collect(),
        other => {
            return Err(SenaForgeError::data_format(
                "results payload must be a record or a list of records",
                Some(truncate(&other.to_string())),
            ))
        }
    };

    let mut draws = Vec::with_capacity(records.len());
    for (index, raw) in records.into_iter().enumerate() {
        if let Some(draw) = parse_record(index, raw)? {
            draws.push(draw);
        }
    }

    Ok(draws)
}

fn parse_record(index: usize, raw: Value) -> Result<Option<Draw>> {
    let snippet = truncate(&raw.to_string());
    let record: ContestRecord = serde_json::from_value(raw).map_err(|e| {
        SenaForgeError::data_format(format!("record {} is malformed: {}", index, e), Some(snippet.clone()))
    })?;

    let raw_numbers = record.dezenas.ok_or_else(|| {
        SenaForgeError::data_format(
            format!("record {} lacks the '{}' field", index, NUMBERS_FIELD),
            Some(snippet.clone()),
        )
    })?;

    if raw_numbers.is_empty() {
        tracing::debug!(record = index, "Skipping record with no drawn numbers");
        return Ok(None);
    }

    let numbers = raw_numbers
        .iter()
        .map(RawNumber::to_number)
        .collect::<Result<Vec<u8>>>()?;

    let mut draw = Draw::new(&numbers).map_err(|e| {
        SenaForgeError::data_format(format!("record {}: {}", index, e), Some(snippet))
    })?;

    if let Some(contest) = record.concurso {
        draw = draw.with_contest(contest);
    }
    if let Some(date) = record
        .data
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok())
    {
        draw = draw.with_date(date);
    }

    Ok(Some(draw))
}

fn truncate(text: &str) -> String {
    text.chars().take(200).collect()
}
