// src/errors.rs

//! Crate-wide error type for startup and wiring failures.
//!
//! Per-group failures (bad names, stat errors, failing steps) never reach
//! this type; they are logged where they happen and polling continues.

use thiserror::Error;

use crate::pipeline::TemplateError;

#[derive(Error, Debug)]
pub enum GroupwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GroupwatchError>;
