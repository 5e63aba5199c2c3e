//! Field values and the draft map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single field's value. Numeric fields hold either a valid number or
/// `Unset` — never a partially typed string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Unset,
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn number(n: f64) -> Self {
        FieldValue::Number(n)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True for `Unset` and for empty text — the states a required-field
    /// check treats as missing.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Unset => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Human-readable rendering for payload blocks. Whole numbers print
    /// without a trailing `.0` so an age of 30 renders as "30".
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            FieldValue::Number(n) => format!("{}", n),
            FieldValue::Unset => String::new(),
        }
    }
}

/// The user's in-progress form input, keyed by field id.
pub type Draft = BTreeMap<String, FieldValue>;
