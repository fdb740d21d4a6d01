//! Output path templates.
//!
//! Templates use Handlebars syntax. The `field` helper reads a value from the
//! record being rendered:
//!
//! ```text
//! out/{{ field "name" }}.yaml
//! ```
//!
//! The compiled template is immutable; the record is passed as render data on
//! every call, so one template can serve concurrent requests.

use std::fmt;

use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::Value as Json;
use thiserror::Error;

use crate::pipeline::record::Record;

const TEMPLATE_NAME: &str = "create_file.name";

/// A path template failed to render against a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to build file name from template {template:?}, {detail}")]
pub struct TemplateError {
    pub template: String,
    pub detail: String,
}

/// A compiled output path template.
pub struct PathTemplate {
    source: String,
    registry: Handlebars<'static>,
}

impl PathTemplate {
    /// Parse `source`, rejecting syntax errors.
    pub fn compile(source: &str) -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry.register_helper("field", Box::new(field_helper));
        registry.register_template_string(TEMPLATE_NAME, source)?;

        Ok(Self {
            source: source.to_string(),
            registry,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template with `record` bound to the `field` helper.
    pub fn render(&self, record: &Record) -> Result<String, TemplateError> {
        self.registry
            .render(TEMPLATE_NAME, record)
            .map_err(|e| TemplateError {
                template: self.source.clone(),
                detail: e.to_string(),
            })
    }
}

impl fmt::Debug for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTemplate")
            .field("source", &self.source)
            .finish()
    }
}

/// `{{ field "name" }}`: the record's value for `name`, empty when unset.
fn field_helper(
    h: &Helper,
    _: &Handlebars,
    ctx: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    if h.params().len() != 1 {
        return Err(RenderErrorReason::Other(format!(
            "field expects exactly one argument, got {}",
            h.params().len()
        ))
        .into());
    }

    let name = h
        .param(0)
        .and_then(|p| p.value().as_str())
        .ok_or_else(|| RenderErrorReason::Other("field argument must be a string".into()))?;

    let value = ctx
        .data()
        .get(name)
        .ok_or_else(|| RenderErrorReason::Other(format!("field {:?} is not declared", name)))?;

    match value {
        Json::Null => {}
        Json::String(s) => out.write(s)?,
        other => out.write(&other.to_string())?,
    }
    Ok(())
}
