//! Raw schema document as written by operators.
//!
//! Nothing here is validated beyond YAML well-formedness; `compiler.rs`
//! turns these structs into the typed `Schema`.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Root of `datamgr.yaml`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SchemaDocument {
    /// Route path → receive definition.
    pub receive: BTreeMap<String, RouteDocument>,
}

/// One `receive` entry.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RouteDocument {
    pub fields: BTreeMap<String, FieldDocument>,
    pub create_file: Option<CreateFileDocument>,
}

/// A field declaration before type resolution.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FieldDocument {
    /// Never read from request input.
    pub internal: bool,

    /// Static value used when nothing else supplies one.
    pub value: Option<serde_yaml::Value>,

    #[serde(rename = "type")]
    pub type_name: Option<String>,

    pub generate: Option<String>,

    pub required: bool,

    pub format: Option<String>,
}

/// The `create_file` block of a route.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CreateFileDocument {
    /// Path template source.
    pub name: String,
    pub format: Option<String>,
}

impl SchemaDocument {
    /// Parse raw YAML bytes. An empty document yields an empty schema.
    pub fn from_slice(data: &[u8]) -> Result<Self, serde_yaml::Error> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_yaml::from_slice(data)
    }
}
