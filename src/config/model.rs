// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::group::NamingScheme;
use crate::pipeline::{Scalar, TemplateSyntax};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// root = "/data"
/// period = "30s"
/// extension = "h5"
/// required = ["SVDNB", "GMTCO"]
///
/// [naming]
/// separator = "_"
/// min_tokens = 6
/// id_start = 1
/// id_end = 5
///
/// [output]
/// dir = "/output"
/// version = "v2.1"
///
/// [pipeline.variables]
/// Out = "((OutputDir))/((Id))"
///
/// [[pipeline.steps]]
/// name = "detect"
/// command = "viirs_detect -o ((Out)) ((SVDNB))"
/// ```
///
/// All sections are optional and default to the values of the original
/// VIIRS deployment.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub naming: NamingScheme,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub template: TemplateSyntax,

    /// `[qualify]`; when absent every ready group is processed.
    #[serde(default)]
    pub qualify: Option<QualifySection>,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Validated configuration. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSettings,
    pub naming: NamingScheme,
    pub output: OutputSection,
    pub template: TemplateSyntax,
    pub qualify: Option<QualifySection>,
    pub pipeline: PipelineConfig,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Poll interval, e.g. `"30s"` or `"500ms"`.
    #[serde(default = "default_period")]
    pub period: String,

    /// Extension (without the dot) every tracked file must have.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Ordered required prefixes; the length is the completeness threshold.
    #[serde(default = "default_required")]
    pub required: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from("/data")
}

fn default_period() -> String {
    "30s".to_string()
}

fn default_extension() -> String {
    "h5".to_string()
}

fn default_required() -> Vec<String> {
    [
        "SVM10", "GMTCO", "IICMO", "SVDNB", "SVM07", "SVM08", "SVM12", "SVM13", "SVM14",
        "SVM15", "SVM16",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            period: default_period(),
            extension: default_extension(),
            required: default_required(),
        }
    }
}

/// `[watch]` after validation, with the period parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    pub root: PathBuf,
    pub period: Duration,
    pub extension: String,
    pub required: Vec<String>,
}

/// `[output]` section; both values are seeded into every run's context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_output_dir")]
    pub dir: String,

    #[serde(default = "default_version")]
    pub version: String,
}

fn default_output_dir() -> String {
    "/output".to_string()
}

fn default_version() -> String {
    "v2.1".to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            version: default_version(),
        }
    }
}

/// `[qualify]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QualifySection {
    /// `h5dump` binary used to read granule attributes.
    #[serde(default = "default_h5dump")]
    pub h5dump: String,
}

fn default_h5dump() -> String {
    "h5dump".to_string()
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub variables: Variables,

    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// A step is either a bare command string or a full table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StepConfig {
    Command(String),
    Full {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        variables: Variables,
        command: String,
    },
}

impl StepConfig {
    pub fn name(&self) -> Option<&str> {
        match self {
            StepConfig::Command(_) => None,
            StepConfig::Full { name, .. } => name.as_deref(),
        }
    }

    pub fn variables(&self) -> &[(String, Scalar)] {
        match self {
            StepConfig::Command(_) => &[],
            StepConfig::Full { variables, .. } => &variables.0,
        }
    }

    pub fn command(&self) -> &str {
        match self {
            StepConfig::Command(cmd) => cmd,
            StepConfig::Full { command, .. } => command,
        }
    }
}

/// Variables table that keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(pub Vec<(String, Scalar)>);

impl Variables {
    pub fn iter(&self) -> std::slice::Iter<'_, (String, Scalar)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Variables {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VariablesVisitor;

        impl<'de> Visitor<'de> for VariablesVisitor {
            type Value = Variables;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of variable names to values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Variables, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut vars = Vec::new();
                while let Some((name, value)) = map.next_entry::<String, Scalar>()? {
                    vars.push((name, value));
                }
                Ok(Variables(vars))
            }
        }

        deserializer.deserialize_map(VariablesVisitor)
    }
}
