//! Schema compilation errors.

use std::fmt;

use thiserror::Error;

/// A single structural problem found while compiling the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaProblem {
    /// The document is not valid YAML or does not have the expected shape.
    #[error("invalid schema document: {0}")]
    Document(String),

    #[error("receive[{route}] route path must start with \"/\"")]
    RoutePath { route: String },

    #[error("receive[{route}].fields.{field}.generate unexpected {value}, expected \"timestamp\"")]
    UnknownGenerate {
        route: String,
        field: String,
        value: String,
    },

    #[error("receive[{route}].fields.{field}.format invalid time layout {value:?}")]
    InvalidTimeLayout {
        route: String,
        field: String,
        value: String,
    },

    #[error("receive[{route}].fields.{field}.type unexpected type {value}, expected \"string\" or \"bool\"")]
    UnknownType {
        route: String,
        field: String,
        value: String,
    },

    #[error("receive[{route}].fields.{field}.value {reason}")]
    InvalidValue {
        route: String,
        field: String,
        reason: String,
    },

    #[error("receive[{route}].create_file.name template error, {detail}")]
    Template { route: String, detail: String },

    #[error("receive[{route}].create_file.format unexpected format {value}, expected \"yaml\"")]
    UnknownFormat { route: String, value: String },
}

/// Every problem found in one schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    problems: Vec<SchemaProblem>,
}

impl SchemaError {
    pub fn new(problems: Vec<SchemaProblem>) -> Self {
        Self { problems }
    }

    pub fn problems(&self) -> &[SchemaProblem] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_error_list(f, &self.problems)
    }
}

impl std::error::Error for SchemaError {}

/// Writes `N errors occurred:` followed by one bulleted line per error.
pub(crate) fn write_error_list<E: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    errors: &[E],
) -> fmt::Result {
    let noun = if errors.len() == 1 { "error" } else { "errors" };
    writeln!(f, "{} {} occurred:", errors.len(), noun)?;
    for err in errors {
        writeln!(f, "\t* {}", err)?;
    }
    Ok(())
}
