// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile, WatchSettings};
use crate::errors::{GroupwatchError, Result};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = GroupwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        let period = parse_duration(&raw.watch.period).map_err(GroupwatchError::ConfigError)?;

        Ok(ConfigFile {
            watch: WatchSettings {
                root: raw.watch.root,
                period,
                extension: raw.watch.extension.trim_start_matches('.').to_string(),
                required: raw.watch.required,
            },
            naming: raw.naming,
            output: raw.output,
            template: raw.template,
            qualify: raw.qualify,
            pipeline: raw.pipeline,
        })
    }
}

/// Run every check against a raw config without converting it.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_raw_config(cfg)
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch(cfg)?;
    validate_naming(cfg)?;
    validate_template(cfg)?;
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    let watch = &cfg.watch;

    if watch.required.is_empty() {
        return Err(GroupwatchError::ConfigError(
            "[watch].required must list at least one prefix".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for prefix in &watch.required {
        if prefix.is_empty() {
            return Err(GroupwatchError::ConfigError(
                "[watch].required contains an empty prefix".to_string(),
            ));
        }
        if !seen.insert(prefix.as_str()) {
            return Err(GroupwatchError::ConfigError(format!(
                "[watch].required lists prefix '{prefix}' more than once"
            )));
        }
    }

    if watch.extension.trim_start_matches('.').is_empty() {
        return Err(GroupwatchError::ConfigError(
            "[watch].extension must not be empty".to_string(),
        ));
    }

    let period = parse_duration(&watch.period).map_err(|e| {
        GroupwatchError::ConfigError(format!("[watch].period is invalid: {e}"))
    })?;
    if period.is_zero() {
        return Err(GroupwatchError::ConfigError(
            "[watch].period must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_naming(cfg: &RawConfigFile) -> Result<()> {
    let naming = &cfg.naming;

    if naming.separator.is_empty() {
        return Err(GroupwatchError::ConfigError(
            "[naming].separator must not be empty".to_string(),
        ));
    }
    if naming.id_start >= naming.id_end {
        return Err(GroupwatchError::ConfigError(format!(
            "[naming].id_start ({}) must be less than id_end ({})",
            naming.id_start, naming.id_end
        )));
    }
    if naming.id_end > naming.min_tokens {
        return Err(GroupwatchError::ConfigError(format!(
            "[naming].id_end ({}) must not exceed min_tokens ({})",
            naming.id_end, naming.min_tokens
        )));
    }

    Ok(())
}

fn validate_template(cfg: &RawConfigFile) -> Result<()> {
    let syntax = &cfg.template;

    if syntax.open.is_empty() || syntax.close.is_empty() {
        return Err(GroupwatchError::ConfigError(
            "[template] delimiters must not be empty".to_string(),
        ));
    }
    if syntax.open == syntax.close {
        return Err(GroupwatchError::ConfigError(format!(
            "[template] open and close delimiters must differ (both '{}')",
            syntax.open
        )));
    }

    Ok(())
}
