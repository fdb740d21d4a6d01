//! Per-request submission pipeline.
//!
//! # Data Flow
//! ```text
//! FormValues (decoded by the HTTP layer)
//!     → field.rs (generate, coerce, enforce required; one field at a time)
//!     → record.rs (resolve every field of the route, aggregate errors)
//!     → template.rs (render output path from the record)
//!     → materialize.rs (create directory + file, encode record)
//! ```
//!
//! # Design Decisions
//! - A request either produces a whole record or nothing: any field error
//!   rejects the request before a file is touched
//! - Generated values use one clock reading per request
//! - No locking around file creation; concurrent writers to the same path
//!   race and the last one wins

pub mod field;
pub mod form;
pub mod materialize;
pub mod record;
pub mod template;

pub use field::{resolve_field, FieldError, FieldErrors};
pub use form::FormValues;
pub use materialize::{DirectoryPolicy, MaterializeError, OutputTarget};
pub use record::{assemble, FieldValue, Record};
pub use template::{PathTemplate, TemplateError};
