//! Boundary validation for allocation requests
//!
//! Everything that reaches the engine is already a `u64` and a known
//! [`Strategy`]. This module turns loosely-typed input (JSON values posted by
//! the browser form, or free text typed on the command line) into that shape,
//! failing fast with [`BlockfitError::InvalidInput`] before any allocation
//! happens.
//!
//! # Rules
//! - Sizes are non-negative integers
//! - JSON numbers with a zero fractional part (`100.0`) are accepted
//! - Digit-only strings (`"100"`) are accepted; anything else textual is not
//! - `null` (what `parseInt` yields for an empty field) is rejected

use crate::core::report::RawAllocationRequest;
use crate::core::strategy::Strategy;
use crate::error::{BlockfitError, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Pattern for a single size token
const SIZE_TOKEN_PATTERN: &str = r"^[0-9]+$";

fn size_token() -> Result<&'static Regex> {
    static SIZE_TOKEN: OnceLock<Regex> = OnceLock::new();

    if let Some(re) = SIZE_TOKEN.get() {
        return Ok(re);
    }

    let re = Regex::new(SIZE_TOKEN_PATTERN)
        .map_err(|e| BlockfitError::Config(format!("size pattern: {}", e)))?;
    Ok(SIZE_TOKEN.get_or_init(|| re))
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    pub blocks: Vec<u64>,
    pub processes: Vec<u64>,
    pub strategy: Strategy,
}

impl AllocationRequest {
    pub fn new(blocks: Vec<u64>, processes: Vec<u64>, strategy: Strategy) -> Self {
        AllocationRequest {
            blocks,
            processes,
            strategy,
        }
    }
}

impl TryFrom<RawAllocationRequest> for AllocationRequest {
    type Error = BlockfitError;

    fn try_from(raw: RawAllocationRequest) -> Result<Self> {
        let strategy: Strategy = raw.allocation_type.parse()?;
        let blocks = validate_sizes(&raw.block_sizes, "block")?;
        let processes = validate_sizes(&raw.process_sizes, "process")?;

        Ok(AllocationRequest {
            blocks,
            processes,
            strategy,
        })
    }
}

/// Validate a whole list of JSON sizes
///
/// `what` names the list in error messages ("block", "process"); positions are
/// reported 1-based, the way the form labels its rows.
pub fn validate_sizes(values: &[Value], what: &str) -> Result<Vec<u64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            validate_size(value).map_err(|reason| {
                BlockfitError::InvalidInput(format!("{} {} {}", what, index + 1, reason))
            })
        })
        .collect()
}

/// 2^64; `u64::MAX as f64` rounds up to this value, so the bound is exclusive
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Validate one JSON size, returning the reason on failure
fn validate_size(value: &Value) -> std::result::Result<u64, String> {
    match value {
        Value::Number(n) => {
            if let Some(size) = n.as_u64() {
                return Ok(size);
            }
            if n.as_i64().is_some() {
                return Err(format!("is negative ({})", n));
            }
            match n.as_f64() {
                Some(f) if f < 0.0 => Err(format!("is negative ({})", n)),
                Some(f) if f.fract() != 0.0 => Err(format!("is not an integer ({})", n)),
                Some(f) if f < U64_LIMIT => Ok(f as u64),
                _ => Err(format!("is out of range ({})", n)),
            }
        }
        Value::String(s) => parse_size_token(s.trim()),
        Value::Null => Err("is missing or not a number".to_string()),
        other => Err(format!("is not a number ({})", other)),
    }
}

/// Parse one free-text size token
fn parse_size_token(token: &str) -> std::result::Result<u64, String> {
    let re = size_token().map_err(|e| e.to_string())?;

    if !re.is_match(token) {
        let reason = if token.is_empty() {
            "is empty".to_string()
        } else if token.starts_with('-') && re.is_match(&token[1..]) {
            format!("is negative ({})", token)
        } else if token.parse::<f64>().is_ok() {
            format!("is not an integer ({})", token)
        } else {
            format!("is not a number ('{}')", token)
        };
        return Err(reason);
    }

    token
        .parse::<u64>()
        .map_err(|_| format!("is out of range ({})", token))
}

/// Parse a free-text size list such as `"100, 500 200"`
///
/// Tokens are separated by commas and/or whitespace. An empty or blank string
/// is an empty list.
///
/// # Examples
///
/// ```
/// use blockfit::core::validation::parse_size_list;
///
/// assert_eq!(parse_size_list("100, 500 200").unwrap(), vec![100, 500, 200]);
/// assert!(parse_size_list("").unwrap().is_empty());
/// assert!(parse_size_list("100, -5").is_err());
/// assert!(parse_size_list("12kb").is_err());
/// ```
pub fn parse_size_list(text: &str) -> Result<Vec<u64>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            parse_size_token(token).map_err(|reason| {
                BlockfitError::InvalidInput(format!("entry {} {}", index + 1, reason))
            })
        })
        .collect()
}
