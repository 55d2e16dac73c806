// src/pipeline/step.rs

//! A single command step of a pipeline.

use tracing::{debug, info};

use crate::exec::CommandRunner;
use crate::pipeline::error::{PipelineError, TemplateError};
use crate::pipeline::template::{Template, TemplateSyntax};
use crate::pipeline::tokenizer::CommandLine;
use crate::pipeline::value::{Context, Scalar};
use crate::pipeline::variable::Variable;

#[derive(Debug, Clone)]
pub struct Step {
    name: String,
    variables: Vec<Variable>,
    command: Template,
}

impl Step {
    pub fn prepare(
        name: impl Into<String>,
        variables: &[(String, Scalar)],
        command: &str,
        syntax: &TemplateSyntax,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        let variables = variables
            .iter()
            .map(|(n, v)| Variable::prepare(n.clone(), v.clone(), syntax))
            .collect::<Result<Vec<_>, _>>()?;
        let command = Template::compile(&name, command, syntax)?;
        Ok(Self {
            name,
            variables,
            command,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn command(&self) -> &Template {
        &self.command
    }

    /// Evaluate step-local variables and return the step's own context.
    ///
    /// The local context starts as a copy of `ctx`. Afterwards every key that
    /// already existed in `ctx` takes the local value, so a step redefining a
    /// pipeline-level name changes it for all later steps. Names that only the
    /// step introduced stay in the returned local context.
    pub fn eval_variables(&self, ctx: &mut Context) -> Result<Context, TemplateError> {
        let mut local = ctx.clone();
        for var in &self.variables {
            let value = var.eval(&local)?;
            local.insert(var.name().to_string(), value);
        }

        for (key, value) in ctx.iter_mut() {
            if let Some(local_value) = local.get(key) {
                *value = local_value.clone();
            }
        }

        Ok(local)
    }

    /// Run the step: evaluate variables, render and tokenize the command,
    /// spawn it. Returns captured stdout on success.
    pub async fn exec(
        &self,
        ctx: &mut Context,
        runner: &dyn CommandRunner,
    ) -> Result<String, PipelineError> {
        let local = self.eval_variables(ctx)?;
        let rendered = self.command.render(&local)?;
        let line = CommandLine::parse(&rendered);

        if line.is_empty() {
            return Err(PipelineError::EmptyCommand {
                step: self.name.clone(),
            });
        }

        info!(step = %self.name, program = %line.program, args = ?line.args, "running step");

        let output = runner
            .run(&line.program, &line.args)
            .await
            .map_err(|source| PipelineError::Spawn {
                step: self.name.clone(),
                program: line.program.clone(),
                source,
            })?;

        if !output.success() {
            return Err(PipelineError::CommandFailed {
                step: self.name.clone(),
                program: line.program,
                code: output.code,
                output: format!("{}\n{}", output.stdout, output.stderr),
            });
        }

        debug!(step = %self.name, stdout = %output.stdout, "step finished");
        Ok(output.stdout)
    }
}
