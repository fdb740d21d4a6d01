//! Field resolution: generation, coercion and required-field checks.

use std::fmt::{self, Write as _};

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::pipeline::form::FormValues;
use crate::pipeline::record::FieldValue;
use crate::receive::errors::write_error_list;
use crate::receive::types::{FieldSpec, FieldType, Generate};

/// A submitted value that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("required field field.{name} not set")]
    MissingRequired { name: String },

    #[error("cannot parse field field.{name} to {expected} (value is {values:?})")]
    TypeCoercion {
        name: String,
        expected: &'static str,
        values: Vec<String>,
    },
}

impl FieldError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            FieldError::MissingRequired { name } | FieldError::TypeCoercion { name, .. } => name,
        }
    }
}

/// All field errors of one request. Order is not meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_error_list(f, &self.0)
    }
}

impl std::error::Error for FieldErrors {}

/// Resolve one field of a submission.
///
/// Resolution order:
/// 1. start from the schema-declared `value`, if any
/// 2. a `timestamp` generator replaces it with `now` rendered in the field's layout
/// 3. `internal` fields stop here and never read the form
/// 4. with nothing submitted, `required` fields fail and others keep what they have
/// 5. otherwise the last submitted value is coerced to the field's type
pub fn resolve_field(
    name: &str,
    spec: &FieldSpec,
    form: &FormValues,
    now: DateTime<Utc>,
) -> Result<Option<FieldValue>, FieldError> {
    let mut value = spec.value.clone();

    if spec.generate == Generate::Timestamp {
        value = Some(FieldValue::String(render_timestamp(now, &spec.format)));
    }

    if spec.internal {
        return Ok(value);
    }

    let submitted = form.field(name);
    let Some(last) = submitted.last() else {
        if spec.required {
            return Err(FieldError::MissingRequired {
                name: name.to_string(),
            });
        }
        tracing::debug!(field = %name, "Empty field");
        return Ok(value);
    };

    let parsed = match spec.field_type {
        FieldType::String => FieldValue::String(last.clone()),
        FieldType::Bool => match parse_bool(last) {
            Some(b) => FieldValue::Bool(b),
            None => {
                return Err(FieldError::TypeCoercion {
                    name: name.to_string(),
                    expected: "boolean",
                    values: submitted.to_vec(),
                })
            }
        },
    };

    tracing::debug!(field = %name, value = ?parsed, "Parsed field");
    Ok(Some(parsed))
}

/// Parse the conventional textual booleans.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Render `now` with a strftime layout, or RFC 3339 when the layout is empty.
///
/// Layouts are validated when the schema is compiled; should one still fail
/// to format, the RFC 3339 rendering is used instead.
pub fn render_timestamp(now: DateTime<Utc>, layout: &str) -> String {
    let rfc3339 = || now.to_rfc3339_opts(SecondsFormat::Secs, true);
    if layout.is_empty() {
        return rfc3339();
    }

    let mut out = String::new();
    match write!(out, "{}", now.format(layout)) {
        Ok(()) => out,
        Err(_) => {
            tracing::warn!(layout = %layout, "Invalid time layout, using RFC 3339");
            rfc3339()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn form(pairs: &[(&str, &str)]) -> FormValues {
        pairs.iter().copied().collect()
    }

    fn bool_field() -> FieldSpec {
        FieldSpec {
            field_type: FieldType::Bool,
            ..FieldSpec::default()
        }
    }

    #[test]
    fn test_string_takes_last_value() {
        let spec = FieldSpec::default();
        let values = form(&[("field.name", "first"), ("field.name", "last")]);

        let value = resolve_field("name", &spec, &values, instant()).unwrap();
        assert_eq!(value, Some(FieldValue::String("last".into())));
    }

    #[test]
    fn test_bool_variants() {
        let spec = bool_field();
        for (text, expected) in [
            ("true", true),
            ("True", true),
            ("TRUE", true),
            ("t", true),
            ("1", true),
            ("false", false),
            ("F", false),
            ("0", false),
        ] {
            let values = form(&[("field.opt_in", text)]);
            let value = resolve_field("opt_in", &spec, &values, instant()).unwrap();
            assert_eq!(value, Some(FieldValue::Bool(expected)), "input {:?}", text);
        }
    }

    #[test]
    fn test_bool_rejects_garbage() {
        let values = form(&[("field.opt_in", "notabool")]);
        let err = resolve_field("opt_in", &bool_field(), &values, instant()).unwrap_err();

        assert!(matches!(err, FieldError::TypeCoercion { ref name, .. } if name == "opt_in"));
        assert!(err.to_string().contains("field.opt_in"));
        assert!(err.to_string().contains("notabool"));
    }

    #[test]
    fn test_bool_last_value_decides() {
        let values = form(&[("field.opt_in", "notabool"), ("field.opt_in", "true")]);
        let value = resolve_field("opt_in", &bool_field(), &values, instant()).unwrap();
        assert_eq!(value, Some(FieldValue::Bool(true)));
    }

    #[test]
    fn test_missing_required() {
        let spec = FieldSpec {
            required: true,
            ..FieldSpec::default()
        };
        let err = resolve_field("name", &spec, &FormValues::new(), instant()).unwrap_err();

        assert_eq!(
            err,
            FieldError::MissingRequired {
                name: "name".into()
            }
        );
        assert_eq!(err.to_string(), "required field field.name not set");
    }

    #[test]
    fn test_missing_optional_is_none() {
        let value = resolve_field("note", &FieldSpec::default(), &FormValues::new(), instant());
        assert_eq!(value, Ok(None));
    }

    #[test]
    fn test_missing_optional_keeps_declared_value() {
        let spec = FieldSpec {
            value: Some(FieldValue::String("web".into())),
            ..FieldSpec::default()
        };
        let value = resolve_field("source", &spec, &FormValues::new(), instant()).unwrap();
        assert_eq!(value, Some(FieldValue::String("web".into())));
    }

    #[test]
    fn test_timestamp_uses_layout() {
        let spec = FieldSpec {
            generate: Generate::Timestamp,
            format: "%Y%m%d.%H%M%S".into(),
            ..FieldSpec::default()
        };
        let value = resolve_field("at", &spec, &FormValues::new(), instant()).unwrap();
        assert_eq!(value, Some(FieldValue::String("20240309.140507".into())));
    }

    #[test]
    fn test_timestamp_differs_over_time() {
        let spec = FieldSpec {
            generate: Generate::Timestamp,
            format: "%Y%m%d.%H%M%S".into(),
            internal: true,
            ..FieldSpec::default()
        };
        let later = instant() + chrono::Duration::seconds(1);

        let a = resolve_field("at", &spec, &FormValues::new(), instant()).unwrap();
        let b = resolve_field("at", &spec, &FormValues::new(), later).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamp_empty_layout_is_rfc3339() {
        assert_eq!(render_timestamp(instant(), ""), "2024-03-09T14:05:07Z");
    }

    #[test]
    fn test_internal_ignores_submission() {
        let spec = FieldSpec {
            internal: true,
            generate: Generate::Timestamp,
            format: "%Y".into(),
            required: true,
            ..FieldSpec::default()
        };
        let values = form(&[("field.at", "forged")]);

        let value = resolve_field("at", &spec, &values, instant()).unwrap();
        assert_eq!(value, Some(FieldValue::String("2024".into())));
    }

    #[test]
    fn test_internal_without_value_is_none() {
        let spec = FieldSpec {
            internal: true,
            required: true,
            ..FieldSpec::default()
        };
        let values = form(&[("field.secret", "x")]);
        assert_eq!(resolve_field("secret", &spec, &values, instant()), Ok(None));
    }

    #[test]
    fn test_submission_overrides_generated_value() {
        let spec = FieldSpec {
            generate: Generate::Timestamp,
            format: "%Y".into(),
            ..FieldSpec::default()
        };
        let values = form(&[("field.at", "client")]);

        let value = resolve_field("at", &spec, &values, instant()).unwrap();
        assert_eq!(value, Some(FieldValue::String("client".into())));
    }

    #[test]
    fn test_generated_required_field_without_submission() {
        let spec = FieldSpec {
            generate: Generate::Timestamp,
            format: "%Y".into(),
            required: true,
            ..FieldSpec::default()
        };
        let err = resolve_field("at", &spec, &FormValues::new(), instant()).unwrap_err();
        assert_eq!(err.field(), "at");
    }
}
