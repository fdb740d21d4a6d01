//! datamgr: schema-driven form ingestion.
//!
//! Each route under `receive` in `datamgr.yaml` becomes an HTTP endpoint.
//! Submitted `field.<name>` values are validated and coerced, generated
//! values are filled in, and the resulting record is optionally written as a
//! YAML file whose path comes from a template.

// Core pipeline
pub mod pipeline;
pub mod receive;

// Serving
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use receive::{compile, Schema, SchemaError};
