// src/pipeline/mod.rs

//! Templated command pipeline.
//!
//! A pipeline is an ordered list of variables followed by an ordered list of
//! steps. Running it against a seed context:
//! 1. evaluates pipeline variables straight into the shared context,
//! 2. runs each step in declaration order, stopping at the first failure.
//!
//! - [`template`] is the substitution engine (`((name))` by default).
//! - [`value`] holds the scalar type and string coercion.
//! - [`tokenizer`] splits rendered commands into argv.
//! - [`variable`] and [`step`] are the compiled building blocks.

pub mod error;
pub mod step;
pub mod template;
pub mod tokenizer;
pub mod value;
pub mod variable;

use tracing::{debug, info};

use crate::config::model::PipelineConfig;
use crate::exec::CommandRunner;

pub use error::{PipelineError, TemplateError};
pub use step::Step;
pub use template::{Template, TemplateSyntax};
pub use tokenizer::{tokenize, CommandLine};
pub use value::{Context, Scalar};
pub use variable::Variable;

/// A compiled, immutable pipeline shared by every run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    variables: Vec<Variable>,
    steps: Vec<Step>,
}

impl Pipeline {
    /// Compile all variable templates and step commands.
    pub fn prepare(cfg: &PipelineConfig, syntax: &TemplateSyntax) -> Result<Self, TemplateError> {
        let variables = cfg
            .variables
            .iter()
            .map(|(name, value)| Variable::prepare(name.clone(), value.clone(), syntax))
            .collect::<Result<Vec<_>, _>>()?;

        let steps = cfg
            .steps
            .iter()
            .enumerate()
            .map(|(idx, step)| {
                let name = step
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("step-{}", idx + 1));
                Step::prepare(name, step.variables(), step.command(), syntax)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { variables, steps })
    }

    pub fn from_parts(variables: Vec<Variable>, steps: Vec<Step>) -> Self {
        Self { variables, steps }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Evaluate pipeline-level variables in order, writing each into `ctx`.
    pub fn eval_variables(&self, ctx: &mut Context) -> Result<(), TemplateError> {
        for var in &self.variables {
            let value = var.eval(ctx)?;
            debug!(variable = var.name(), %value, "evaluated pipeline variable");
            ctx.insert(var.name().to_string(), value);
        }
        Ok(())
    }

    /// Run the whole pipeline against `ctx`.
    ///
    /// `ctx` should be freshly seeded for this run; it is mutated in place.
    pub async fn exec(
        &self,
        ctx: &mut Context,
        runner: &dyn CommandRunner,
    ) -> Result<(), PipelineError> {
        self.eval_variables(ctx)?;

        for step in &self.steps {
            step.exec(ctx, runner).await?;
        }

        info!(steps = self.steps.len(), "pipeline finished");
        Ok(())
    }
}
