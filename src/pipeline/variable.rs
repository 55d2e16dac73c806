// src/pipeline/variable.rs

use crate::pipeline::error::TemplateError;
use crate::pipeline::template::{Template, TemplateSyntax};
use crate::pipeline::value::{Context, Scalar};

/// A named value evaluated against a context.
///
/// Only string values are templates. Booleans and numbers from the config
/// have no compiled form and evaluate to themselves.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    value: Scalar,
    expression: Option<Template>,
}

impl Variable {
    pub fn prepare(
        name: impl Into<String>,
        value: Scalar,
        syntax: &TemplateSyntax,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        let expression = match &value {
            Scalar::String(source) => Some(Template::compile(&name, source, syntax)?),
            _ => None,
        };
        Ok(Self {
            name,
            value,
            expression,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw configured value (before rendering).
    pub fn raw(&self) -> &Scalar {
        &self.value
    }

    pub fn eval(&self, ctx: &Context) -> Result<Scalar, TemplateError> {
        match &self.expression {
            Some(template) => Ok(Scalar::coerce(template.render(ctx)?)),
            None => Ok(self.value.clone()),
        }
    }
}
