//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the service configuration and apply command-line overrides
//! - Read and compile the receive schema
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The schema is compiled before the listener is bound

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{load_config, validate_config, ConfigError, ServiceConfig, ValidationError};
use crate::receive::{compile, Schema, SchemaError};

/// Reasons the service cannot start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {}", join(.0))]
    Invalid(Vec<ValidationError>),

    #[error("Error reading {}: {source}", .path.display())]
    ReadSchema {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing {}: {source}", .path.display())]
    CompileSchema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen: Option<String>,
    pub schema: Option<PathBuf>,
}

/// Build the effective configuration.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<ServiceConfig, StartupError> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(listen) = overrides.listen {
        config.listener.bind_address = normalize_listen(&listen);
    }
    if let Some(schema) = overrides.schema {
        config.schema.path = schema;
    }

    validate_config(&config).map_err(StartupError::Invalid)?;
    Ok(config)
}

/// Accept the host-less `:8080` form for listening on all interfaces.
pub fn normalize_listen(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

/// Read and compile the receive schema at `path`.
pub fn load_schema(path: &Path) -> Result<Schema, StartupError> {
    let data = fs::read(path).map_err(|source| StartupError::ReadSchema {
        path: path.to_path_buf(),
        source,
    })?;

    let schema = compile(&data).map_err(|source| StartupError::CompileSchema {
        path: path.to_path_buf(),
        source,
    })?;

    for (route, spec) in schema.routes() {
        tracing::info!(
            route = %route,
            fields = spec.fields.len(),
            creates_file = spec.create_file.is_some(),
            "Receive route loaded"
        );
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_listen() {
        assert_eq!(normalize_listen(":8080"), "0.0.0.0:8080");
        assert_eq!(normalize_listen("127.0.0.1:9000"), "127.0.0.1:9000");
    }

    #[test]
    fn test_overrides_win() {
        let config = resolve_config(
            None,
            Overrides {
                listen: Some(":9999".into()),
                schema: Some(PathBuf::from("other.yaml")),
            },
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9999");
        assert_eq!(config.schema.path, PathBuf::from("other.yaml"));
    }

    #[test]
    fn test_bad_listen_override() {
        let err = resolve_config(
            None,
            Overrides {
                listen: Some("nowhere".into()),
                schema: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, StartupError::Invalid(_)));
    }

    #[test]
    fn test_missing_schema_file() {
        let temp = TempDir::new().unwrap();
        let err = load_schema(&temp.path().join("datamgr.yaml")).unwrap_err();
        assert!(matches!(err, StartupError::ReadSchema { .. }));
        assert!(err.to_string().starts_with("Error reading"));
    }

    #[test]
    fn test_invalid_schema_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("datamgr.yaml");
        fs::write(&path, "receive:\n  /a:\n    fields:\n      x: { type: int }\n").unwrap();

        match load_schema(&path).unwrap_err() {
            StartupError::CompileSchema { source, .. } => assert_eq!(source.len(), 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_valid_schema_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("datamgr.yaml");
        fs::write(&path, "receive:\n  /a:\n    fields:\n      x: {}\n").unwrap();
        assert_eq!(load_schema(&path).unwrap().len(), 1);
    }
}
