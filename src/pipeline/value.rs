// src/pipeline/value.rs

//! Typed scalar values flowing through an execution context.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// A single evaluated value.
///
/// Raw configuration values arrive as one of these (TOML booleans, integers,
/// floats and strings). Rendered templates are coerced back into the most
/// specific variant via [`Scalar::coerce`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Name → value mapping handed to templates.
pub type Context = BTreeMap<String, Scalar>;

impl Scalar {
    /// Coerce rendered template output into a typed scalar.
    ///
    /// Tried in order: boolean, signed 64-bit integer, float. The first parse
    /// that succeeds wins; otherwise the text is kept as a string.
    pub fn coerce(text: String) -> Scalar {
        if let Some(b) = parse_bool(&text) {
            return Scalar::Bool(b);
        }
        if let Ok(i) = text.parse::<i64>() {
            return Scalar::Integer(i);
        }
        if let Ok(f) = text.parse::<f64>() {
            return Scalar::Float(f);
        }
        Scalar::String(text)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Some(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}
