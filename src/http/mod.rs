//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, exact-path dispatch)
//!     → form.rs (urlencoded / multipart decoding)
//!     → [pipeline resolves, renders, writes]
//!     → response.rs (303 redirect or mapped error)
//!     → Send to client
//! ```

pub mod form;
pub mod request;
pub mod response;
pub mod server;

pub use form::{decode_form, FormError};
pub use request::X_REQUEST_ID;
pub use response::DispatchError;
pub use server::{AppState, HttpServer};
