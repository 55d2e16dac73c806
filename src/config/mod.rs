// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - `model.rs`: the TOML-backed data model and defaults.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: the raw → validated conversion.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{
    ConfigFile, OutputSection, PipelineConfig, QualifySection, RawConfigFile, StepConfig,
    Variables, WatchSection, WatchSettings,
};
pub use validate::validate_config;
