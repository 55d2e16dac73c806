// src/pipeline/template.rs

//! Minimal substitution templates.
//!
//! A template is literal text interleaved with actions of the form
//! `OPEN name CLOSE`. With the default delimiters that is `((Id))`. A leading
//! dot and surrounding whitespace are tolerated, so `(( .Id ))` is the same
//! action. There is no control flow: every action is a context lookup.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::pipeline::error::TemplateError;
use crate::pipeline::value::Context;

/// Delimiter pair used by all templates of a pipeline.
///
/// The defaults are chosen so they never collide with shell syntax that may
/// appear literally inside commands (`$(...)`, `${...}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateSyntax {
    #[serde(default = "default_open")]
    pub open: String,
    #[serde(default = "default_close")]
    pub close: String,
}

fn default_open() -> String {
    "((".to_string()
}

fn default_close() -> String {
    "))".to_string()
}

impl Default for TemplateSyntax {
    fn default() -> Self {
        Self {
            open: default_open(),
            close: default_close(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Lookup(String),
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Compile `source` using the given delimiters.
    ///
    /// `name` is only used in error messages.
    pub fn compile(
        name: &str,
        source: &str,
        syntax: &TemplateSyntax,
    ) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find(&syntax.open) {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }

            let action_offset = offset + start;
            let inner_start = start + syntax.open.len();
            let Some(len) = rest[inner_start..].find(&syntax.close) else {
                return Err(TemplateError::Unterminated {
                    template: name.to_string(),
                    offset: action_offset,
                });
            };

            let inner = rest[inner_start..inner_start + len].trim();
            let key = inner.strip_prefix('.').unwrap_or(inner);
            if key.is_empty() {
                return Err(TemplateError::EmptyName {
                    template: name.to_string(),
                    offset: action_offset,
                });
            }
            if !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(TemplateError::InvalidName {
                    template: name.to_string(),
                    name: inner.to_string(),
                });
            }
            segments.push(Segment::Lookup(key.to_string()));

            let consumed = inner_start + len + syntax.close.len();
            rest = &rest[consumed..];
            offset += consumed;
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Template {
            name: name.to_string(),
            segments,
        })
    }

    /// Render against `ctx`. Every referenced name must be present.
    pub fn render(&self, ctx: &Context) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Lookup(key) => {
                    let value = ctx.get(key).ok_or_else(|| TemplateError::MissingVariable {
                        template: self.name.clone(),
                        name: key.clone(),
                    })?;
                    // Writing into a String cannot fail.
                    let _ = write!(out, "{value}");
                }
            }
        }
        Ok(out)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names referenced by this template, in order of appearance.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Lookup(key) => Some(key.as_str()),
            Segment::Text(_) => None,
        })
    }
}
