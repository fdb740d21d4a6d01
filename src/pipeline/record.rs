//! Record assembly.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::field::{resolve_field, FieldErrors};
use crate::pipeline::form::FormValues;
use crate::receive::types::Route;

/// A resolved field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Resolved values of one submission, keyed by field name.
///
/// Every declared field of the route is present; fields that resolved to
/// nothing hold `None` and serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Option<FieldValue>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        self.fields.insert(name.into(), value);
    }

    /// Outer `None`: not a field of this record. Inner `None`: no value.
    pub fn get(&self, name: &str) -> Option<Option<&FieldValue>> {
        self.fields.get(name).map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolve every field of `route` against the submitted form.
///
/// Resolution continues past failures so the caller sees every problem at
/// once; any failure discards the record.
pub fn assemble(route: &Route, form: &FormValues, now: DateTime<Utc>) -> Result<Record, FieldErrors> {
    let mut record = Record::new();
    let mut errors = Vec::new();

    for (name, spec) in &route.fields {
        match resolve_field(name, spec, form, now) {
            Ok(value) => record.insert(name.clone(), value),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(FieldErrors(errors))
    }
}
