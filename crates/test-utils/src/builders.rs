#![allow(dead_code)]

use groupwatch::config::{ConfigFile, PipelineConfig, RawConfigFile, StepConfig, Variables};
use groupwatch::pipeline::{Pipeline, Scalar};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn root(mut self, root: &str) -> Self {
        self.config.watch.root = root.into();
        self
    }

    pub fn period(mut self, period: &str) -> Self {
        self.config.watch.period = period.to_string();
        self
    }

    pub fn required(mut self, prefixes: &[&str]) -> Self {
        self.config.watch.required = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Id = tokens `start..end` of at least `min_tokens` tokens.
    pub fn naming(mut self, separator: &str, min_tokens: usize, start: usize, end: usize) -> Self {
        self.config.naming.separator = separator.to_string();
        self.config.naming.min_tokens = min_tokens;
        self.config.naming.id_start = start;
        self.config.naming.id_end = end;
        self
    }

    pub fn output(mut self, dir: &str, version: &str) -> Self {
        self.config.output.dir = dir.to_string();
        self.config.output.version = version.to_string();
        self
    }

    pub fn pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.config.pipeline = pipeline;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `PipelineConfig`.
#[derive(Default)]
pub struct PipelineBuilder {
    pipeline: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.pipeline.variables.0.push((name.to_string(), value.into()));
        self
    }

    /// Bare command step.
    pub fn command(mut self, cmd: &str) -> Self {
        self.pipeline.steps.push(StepConfig::Command(cmd.to_string()));
        self
    }

    /// Named step with local variables.
    pub fn step(mut self, name: &str, vars: &[(&str, Scalar)], cmd: &str) -> Self {
        self.pipeline.steps.push(StepConfig::Full {
            name: Some(name.to_string()),
            variables: Variables(
                vars.iter()
                    .map(|(n, v)| (n.to_string(), v.clone()))
                    .collect(),
            ),
            command: cmd.to_string(),
        });
        self
    }

    pub fn config(self) -> PipelineConfig {
        self.pipeline
    }

    /// Compile with the default `((`/`))` delimiters.
    pub fn build(self) -> Pipeline {
        Pipeline::prepare(&self.pipeline, &Default::default())
            .expect("Failed to compile pipeline from builder")
    }
}
