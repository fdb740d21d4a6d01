//! Receive schema subsystem.
//!
//! # Data Flow
//! ```text
//! datamgr.yaml bytes
//!     → document.rs (serde_yaml into raw, stringly-typed structs)
//!     → compiler.rs (resolve types, generators, formats; compile templates)
//!     → Schema (validated, immutable)
//!     → shared via Arc with every request handler
//! ```
//!
//! # Design Decisions
//! - Every problem in the document is collected before compilation fails
//! - Compiled schema is never mutated; per-request state lives in `Record`
//! - Route keys are matched exactly against the request path

pub mod compiler;
pub mod document;
pub mod errors;
pub mod types;

pub use compiler::compile;
pub use errors::SchemaError;
pub use types::{FieldSpec, FieldType, FileFormat, FileSpec, Generate, Route, Schema};
