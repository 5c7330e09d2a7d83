// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Parsing helpers for [HasAttributes](crate::traits::HasAttributes).

use thiserror::Error;

/// Why an attribute couldn't be applied.
#[derive(Debug, Error, PartialEq)]
pub enum AttributeError {
    #[allow(missing_docs)]
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
    #[allow(missing_docs)]
    #[error("unknown attribute")]
    Unknown,
    #[allow(missing_docs)]
    #[error("\"{0}\" is not a valid choice")]
    InvalidChoice(String),
    #[allow(missing_docs)]
    #[error("the range {min}..={max} is empty")]
    EmptyRange { min: f64, max: f64 },
    #[allow(missing_docs)]
    #[error("{0} is not a finite number")]
    NotFinite(f64),
}

/// Parses an integer attribute. Accepts integers and finite decimals (which
/// are truncated toward zero).
pub fn parse_int(value: &str) -> Result<i32, AttributeError> {
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32),
        _ => Err(AttributeError::NotANumber(value.to_string())),
    }
}

/// Parses a floating-point attribute. `NaN` and infinities are rejected.
pub fn parse_float(value: &str) -> Result<f64, AttributeError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AttributeError::NotANumber(value.to_string())),
    }
}

/// Boolean attributes are true when present. The one exception is the literal
/// `false`, which markup generators tend to produce.
pub fn parse_bool(value: &str) -> bool {
    !value.trim().eq_ignore_ascii_case("false")
}
