// src/group/naming.rs

//! Deriving a group id from a filename.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("name '{name}' has {found} '{separator}'-separated tokens, expected at least {required}")]
    TooFewTokens {
        name: String,
        separator: String,
        found: usize,
        required: usize,
    },
}

/// How a group id is cut out of a filename (`[naming]`).
///
/// The extension is stripped, the stem is split on `separator`, and tokens
/// `id_start..id_end` are joined back with the separator. For
/// `SVDNB_npp_d20130101_t0000000_e0001000_b00000_c1_noaa_ops.h5` with the
/// defaults the id is `npp_d20130101_t0000000_e0001000`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamingScheme {
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,

    #[serde(default = "default_id_start")]
    pub id_start: usize,

    #[serde(default = "default_id_end")]
    pub id_end: usize,
}

fn default_separator() -> String {
    "_".to_string()
}

fn default_min_tokens() -> usize {
    6
}

fn default_id_start() -> usize {
    1
}

fn default_id_end() -> usize {
    5
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            min_tokens: default_min_tokens(),
            id_start: default_id_start(),
            id_end: default_id_end(),
        }
    }
}

impl NamingScheme {
    pub fn group_id(&self, name: &str) -> Result<String, NameError> {
        let tokens: Vec<&str> = file_stem(name).split(self.separator.as_str()).collect();
        let required = self.min_tokens.max(self.id_end);

        if tokens.len() < required {
            return Err(NameError::TooFewTokens {
                name: name.to_string(),
                separator: self.separator.clone(),
                found: tokens.len(),
                required,
            });
        }

        Ok(tokens[self.id_start..self.id_end].join(&self.separator))
    }
}

/// Filename without its last extension (`a_b.h5` → `a_b`).
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}
