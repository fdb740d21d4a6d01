//! Schema compilation.
//!
//! # Responsibilities
//! - Resolve field `type` and `generate` names to enums
//! - Default timestamp layouts and validate explicit ones
//! - Coerce schema-declared field values to the field type
//! - Compile each route's output path template once
//!
//! # Design Decisions
//! - Returns all problems, not just the first
//! - Pure function: bytes → Result<Schema, SchemaError>

use std::collections::BTreeMap;

use chrono::format::{Item, StrftimeItems};

use crate::pipeline::field::parse_bool;
use crate::pipeline::record::FieldValue;
use crate::pipeline::template::PathTemplate;
use crate::receive::document::{CreateFileDocument, FieldDocument, RouteDocument, SchemaDocument};
use crate::receive::errors::{SchemaError, SchemaProblem};
use crate::receive::types::{
    FieldSpec, FieldType, FileFormat, FileSpec, Generate, Route, Schema, DEFAULT_TIMESTAMP_FORMAT,
};

/// Compile a YAML schema document.
pub fn compile(data: &[u8]) -> Result<Schema, SchemaError> {
    let document = SchemaDocument::from_slice(data)
        .map_err(|e| SchemaError::new(vec![SchemaProblem::Document(e.to_string())]))?;
    compile_document(document)
}

/// Compile an already-parsed document.
pub fn compile_document(document: SchemaDocument) -> Result<Schema, SchemaError> {
    let mut problems = Vec::new();
    let mut routes = BTreeMap::new();

    for (path, route) in document.receive {
        if !path.starts_with('/') {
            problems.push(SchemaProblem::RoutePath { route: path.clone() });
        }
        let compiled = compile_route(&path, route, &mut problems);
        routes.insert(path, compiled);
    }

    if problems.is_empty() {
        tracing::debug!(routes = routes.len(), "Schema compiled");
        Ok(Schema::new(routes))
    } else {
        Err(SchemaError::new(problems))
    }
}

fn compile_route(path: &str, route: RouteDocument, problems: &mut Vec<SchemaProblem>) -> Route {
    let fields = route
        .fields
        .into_iter()
        .map(|(name, field)| {
            let spec = compile_field(path, &name, field, problems);
            (name, spec)
        })
        .collect();

    let create_file = route
        .create_file
        .and_then(|file| compile_file(path, file, problems));

    Route {
        fields,
        create_file,
    }
}

fn compile_field(
    route: &str,
    name: &str,
    field: FieldDocument,
    problems: &mut Vec<SchemaProblem>,
) -> FieldSpec {
    let mut format = field.format.unwrap_or_default();

    let generate = match field.generate.as_deref().unwrap_or("") {
        "" => Generate::None,
        "timestamp" => {
            if format.is_empty() {
                format = DEFAULT_TIMESTAMP_FORMAT.to_string();
            } else if !is_valid_layout(&format) {
                problems.push(SchemaProblem::InvalidTimeLayout {
                    route: route.to_string(),
                    field: name.to_string(),
                    value: format.clone(),
                });
            }
            Generate::Timestamp
        }
        other => {
            problems.push(SchemaProblem::UnknownGenerate {
                route: route.to_string(),
                field: name.to_string(),
                value: other.to_string(),
            });
            Generate::None
        }
    };

    let field_type = match field.type_name.as_deref().unwrap_or("") {
        "" | "string" => FieldType::String,
        "bool" => FieldType::Bool,
        other => {
            problems.push(SchemaProblem::UnknownType {
                route: route.to_string(),
                field: name.to_string(),
                value: other.to_string(),
            });
            FieldType::String
        }
    };

    let value = field.value.and_then(|raw| match coerce_value(&raw, field_type) {
        Ok(value) => value,
        Err(reason) => {
            problems.push(SchemaProblem::InvalidValue {
                route: route.to_string(),
                field: name.to_string(),
                reason,
            });
            None
        }
    });

    FieldSpec {
        internal: field.internal,
        field_type,
        generate,
        format,
        required: field.required,
        value,
    }
}

fn compile_file(
    route: &str,
    file: CreateFileDocument,
    problems: &mut Vec<SchemaProblem>,
) -> Option<FileSpec> {
    let name = match PathTemplate::compile(&file.name) {
        Ok(template) => Some(template),
        Err(e) => {
            problems.push(SchemaProblem::Template {
                route: route.to_string(),
                detail: e.to_string(),
            });
            None
        }
    };

    let format = match file.format.as_deref().unwrap_or("") {
        "" | "yaml" => Some(FileFormat::Yaml),
        other => {
            problems.push(SchemaProblem::UnknownFormat {
                route: route.to_string(),
                value: other.to_string(),
            });
            None
        }
    };

    Some(FileSpec {
        name: name?,
        format: format?,
    })
}

/// Coerce a schema-declared scalar to `field_type`. `null` means no value.
fn coerce_value(
    raw: &serde_yaml::Value,
    field_type: FieldType,
) -> Result<Option<FieldValue>, String> {
    use serde_yaml::Value;

    match (field_type, raw) {
        (_, Value::Null) => Ok(None),
        (FieldType::String, Value::String(s)) => Ok(Some(FieldValue::String(s.clone()))),
        (FieldType::String, Value::Bool(b)) => Ok(Some(FieldValue::String(b.to_string()))),
        (FieldType::String, Value::Number(n)) => Ok(Some(FieldValue::String(n.to_string()))),
        (FieldType::Bool, Value::Bool(b)) => Ok(Some(FieldValue::Bool(*b))),
        (FieldType::Bool, Value::String(s)) => parse_bool(s)
            .map(|b| Some(FieldValue::Bool(b)))
            .ok_or_else(|| format!("cannot parse {:?} to boolean", s)),
        (field_type, _) => Err(format!("must be a scalar {}", field_type.as_str())),
    }
}

fn is_valid_layout(layout: &str) -> bool {
    !StrftimeItems::new(layout).any(|item| matches!(item, Item::Error))
}
