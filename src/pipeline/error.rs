// src/pipeline/error.rs

use thiserror::Error;

/// Errors raised while compiling or rendering a template.
///
/// The first three variants are compile-time errors and surface at startup;
/// `MissingVariable` happens while a pipeline run is in progress.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template}': unterminated action starting at byte {offset}")]
    Unterminated { template: String, offset: usize },

    #[error("template '{template}': empty variable name at byte {offset}")]
    EmptyName { template: String, offset: usize },

    #[error("template '{template}': invalid variable name '{name}'")]
    InvalidName { template: String, name: String },

    #[error("template '{template}': no value for variable '{name}'")]
    MissingVariable { template: String, name: String },
}

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("step '{step}': rendered command is empty")]
    EmptyCommand { step: String },

    #[error("step '{step}': failed to spawn '{program}': {source}")]
    Spawn {
        step: String,
        program: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("step '{step}': '{program}' exited with {}", exit_label(*.code))]
    CommandFailed {
        step: String,
        program: String,
        code: Option<i32>,
        /// Captured stdout followed by stderr.
        output: String,
    },
}

impl PipelineError {
    /// Diagnostic text captured from the failing command, if any.
    pub fn output(&self) -> &str {
        match self {
            PipelineError::CommandFailed { output, .. } => output,
            _ => "",
        }
    }
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
