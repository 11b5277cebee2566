//! Decoding of the single-key `/bfhl` request body.
//!
//! The body must be a JSON object with exactly one recognised key. Each key
//! has its own validator producing a typed [`Operation`]; anything else fails
//! closed with a 400.

use crate::services::arithmetic::FIBONACCI_MAX_TERMS;
use serde_json::{Map, Value};
use service_core::error::AppError;
use std::fmt;

pub const EXACTLY_ONE_KEY: &str = "Exactly one key required";
pub const INVALID_KEY: &str = "Invalid key";
pub const NOT_AN_OBJECT: &str = "Request body must be a JSON object";

/// Tag of a recognised request key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Fibonacci,
    Prime,
    Hcf,
    Lcm,
    Ai,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Fibonacci,
        OperationKind::Prime,
        OperationKind::Hcf,
        OperationKind::Lcm,
        OperationKind::Ai,
    ];

    /// Request key, case-sensitive.
    pub fn key(self) -> &'static str {
        match self {
            OperationKind::Fibonacci => "fibonacci",
            OperationKind::Prime => "prime",
            OperationKind::Hcf => "hcf",
            OperationKind::Lcm => "lcm",
            OperationKind::Ai => "AI",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Message returned when the value under this key is rejected.
    pub fn invalid_value_message(self) -> &'static str {
        match self {
            OperationKind::Fibonacci => "fibonacci must be integer between 0-1000",
            OperationKind::Prime => "prime must be integer array",
            OperationKind::Hcf => "hcf must be non-empty integer array",
            OperationKind::Lcm => "lcm must be non-empty integer array",
            OperationKind::Ai => "AI must be a non-empty string",
        }
    }

    /// Validate `value` for this key and build the typed operation.
    pub fn validate(self, value: &Value) -> Result<Operation, AppError> {
        let operation = match self {
            OperationKind::Fibonacci => as_integer(value)
                .and_then(|n| u16::try_from(n).ok())
                .filter(|&n| n <= FIBONACCI_MAX_TERMS)
                .map(Operation::Fibonacci),
            OperationKind::Prime => as_integer_array(value).map(Operation::Prime),
            OperationKind::Hcf => as_non_empty_integer_array(value).map(Operation::Hcf),
            OperationKind::Lcm => as_non_empty_integer_array(value).map(Operation::Lcm),
            OperationKind::Ai => value
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .map(|s| Operation::Ai(s.to_string())),
        };

        operation.ok_or_else(|| AppError::validation(self.invalid_value_message()))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Number of terms, at most 1000.
    Fibonacci(u16),
    Prime(Vec<i64>),
    /// Non-empty.
    Hcf(Vec<i64>),
    /// Non-empty.
    Lcm(Vec<i64>),
    /// Prompt exactly as received; never blank.
    Ai(String),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Fibonacci(_) => OperationKind::Fibonacci,
            Operation::Prime(_) => OperationKind::Prime,
            Operation::Hcf(_) => OperationKind::Hcf,
            Operation::Lcm(_) => OperationKind::Lcm,
            Operation::Ai(_) => OperationKind::Ai,
        }
    }

    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        let object = body
            .as_object()
            .ok_or_else(|| AppError::validation(NOT_AN_OBJECT))?;
        Self::from_object(object)
    }

    pub fn from_object(object: &Map<String, Value>) -> Result<Self, AppError> {
        let mut entries = object.iter();
        let (key, value) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => return Err(AppError::validation(EXACTLY_ONE_KEY)),
        };

        tracing::info!(key = %key, "Received operation key");

        let kind = OperationKind::from_key(key).ok_or_else(|| AppError::validation(INVALID_KEY))?;
        kind.validate(value)
    }
}

/// An integral JSON number. Floats with no fractional part count, so `5.0`
/// is accepted like `5`.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn as_integer_array(value: &Value) -> Option<Vec<i64>> {
    value.as_array()?.iter().map(as_integer).collect()
}

fn as_non_empty_integer_array(value: &Value) -> Option<Vec<i64>> {
    as_integer_array(value).filter(|values| !values.is_empty())
}
