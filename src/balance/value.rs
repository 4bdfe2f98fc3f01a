//! On-chain balance encodings
//!
//! Pact returns a balance either as a bare JSON number or, when the value
//! would lose precision as a float, as `{"decimal": "<digits>"}`.

use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;
use thiserror::Error;

/// Balance as it appears on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Balance {
    Plain(Number),
    Decimal(String),
}

/// Balance text that does not parse as a decimal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unparseable balance '{raw}'")]
pub struct InvalidBalance {
    pub raw: String,
}

impl Balance {
    /// Classify a JSON balance field
    ///
    /// Returns `None` for shapes that carry no balance (null, strings,
    /// objects without a `decimal` member); callers treat that as zero.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Plain(n.clone())),
            Value::Object(fields) => match fields.get("decimal")? {
                Value::String(s) => Some(Self::Decimal(s.clone())),
                Value::Number(n) => Some(Self::Decimal(n.to_string())),
                _ => None,
            },
            _ => None,
        }
    }

    /// Canonical numeric value
    pub fn normalize(&self) -> Result<Decimal, InvalidBalance> {
        match self {
            Self::Plain(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Decimal::from(i));
                }
                if let Some(u) = n.as_u64() {
                    return Ok(Decimal::from(u));
                }
                parse_decimal(&n.to_string())
            }
            Self::Decimal(s) => parse_decimal(s.trim()),
        }
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, InvalidBalance> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| InvalidBalance {
            raw: raw.to_string(),
        })
}
