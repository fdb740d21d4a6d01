//! Service configuration schema.
//!
//! This is the operator-facing configuration of the service itself (where to
//! listen, where to write, how much to log). The receive routes live in the
//! separate schema document handled by `crate::receive`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::pipeline::materialize::{DirectoryPolicy, OutputTarget};

/// Fixed name of the receive schema document.
pub const SCHEMA_FILE: &str = "datamgr.yaml";

/// Root configuration for datamgr.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Location of the receive schema document.
    pub schema: SchemaConfig,

    /// Output file placement.
    pub output: OutputConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Path of the receive schema, relative to the working directory.
    pub path: PathBuf,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(SCHEMA_FILE),
        }
    }
}

/// Where rendered output paths are resolved.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that rendered paths are relative to.
    pub root: PathBuf,

    /// Directory created before each file (`parent` or `base_name`).
    pub directory_policy: DirectoryPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            directory_policy: DirectoryPolicy::Parent,
        }
    }
}

impl OutputConfig {
    pub fn target(&self) -> OutputTarget {
        OutputTarget::new(self.root.clone(), self.directory_policy)
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted form body in bytes (urlencoded or multipart).
    pub max_form_bytes: usize,

    /// Total time allowed per request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_form_bytes: 32 << 20, // 32 MiB
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
