//! Compiled schema types.

use std::collections::BTreeMap;

use crate::pipeline::record::FieldValue;
use crate::pipeline::template::PathTemplate;

/// Layout applied to timestamp fields declared without a `format`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d.%H%M%S.%f";

/// Compiled receive schema: route path → route.
#[derive(Debug, Default)]
pub struct Schema {
    routes: BTreeMap<String, Route>,
}

impl Schema {
    pub(crate) fn new(routes: BTreeMap<String, Route>) -> Self {
        Self { routes }
    }

    /// Exact-match lookup of a request path.
    pub fn route(&self, path: &str) -> Option<&Route> {
        self.routes.get(path)
    }

    /// Iterate routes in path order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(path, route)| (path.as_str(), route))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// One receive endpoint.
#[derive(Debug)]
pub struct Route {
    pub fields: BTreeMap<String, FieldSpec>,
    pub create_file: Option<FileSpec>,
}

/// Declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Bool,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "bool",
        }
    }
}

/// Server-side value generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generate {
    None,
    /// Current UTC time rendered with the field's `format`.
    Timestamp,
}

/// Compiled field definition.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub internal: bool,
    pub field_type: FieldType,
    pub generate: Generate,
    /// strftime layout for generated timestamps.
    pub format: String,
    pub required: bool,
    /// Value declared in the schema, already coerced to `field_type`.
    pub value: Option<FieldValue>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            internal: false,
            field_type: FieldType::String,
            generate: Generate::None,
            format: String::new(),
            required: false,
            value: None,
        }
    }
}

/// Encoding of materialized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
}

/// Where and how a route persists its record.
#[derive(Debug)]
pub struct FileSpec {
    pub name: PathTemplate,
    pub format: FileFormat,
}
