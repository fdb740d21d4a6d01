//! Response mapping.
//!
//! # Responsibilities
//! - Map pipeline failures to HTTP status codes
//! - Keep filesystem and template details out of client responses
//! - Build the 303 redirect for successful submissions
//!
//! # Design Decisions
//! - Client defects (form, fields) are 400 with the full message
//! - Schema and system defects are 500 with a fixed, generic message
//! - Operators get the detailed error through the log

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::form::FormError;
use crate::pipeline::field::FieldErrors;
use crate::pipeline::materialize::MaterializeError;
use crate::pipeline::template::TemplateError;

pub const MSG_MISCONFIGURATION: &str = "Could not process request due to misconfiguration.";
pub const MSG_SYSTEM_ERROR: &str =
    "Could not process request due to a system error, please try again later.";
pub const MSG_DATA_ERROR: &str = "Could not process request because of data error.";
pub const MSG_UNSAFE_PATH: &str = "Could not process request: submitted values produce an invalid file name.";
pub const MSG_NOT_FOUND: &str = "404 page not found";

/// Everything that can stop a submission after its route was found.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Error parsing form: {0}")]
    Form(#[from] FormError),

    #[error("{0}")]
    Fields(#[from] FieldErrors),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error("file writer task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("redirect target {0:?} is not a valid header value")]
    Location(String),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::Form(_) | DispatchError::Fields(_) | DispatchError::Location(_) => {
                StatusCode::BAD_REQUEST
            }
            DispatchError::Materialize(MaterializeError::UnsafePath(_)) => StatusCode::BAD_REQUEST,
            DispatchError::Template(_)
            | DispatchError::Materialize(_)
            | DispatchError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client.
    pub fn public_message(&self) -> String {
        match self {
            DispatchError::Form(_) | DispatchError::Fields(_) | DispatchError::Location(_) => {
                self.to_string()
            }
            DispatchError::Template(_) => MSG_MISCONFIGURATION.to_string(),
            DispatchError::Materialize(MaterializeError::UnsafePath(_)) => {
                MSG_UNSAFE_PATH.to_string()
            }
            DispatchError::Materialize(MaterializeError::Encode { .. }) => {
                MSG_DATA_ERROR.to_string()
            }
            DispatchError::Materialize(_) | DispatchError::Worker(_) => {
                MSG_SYSTEM_ERROR.to_string()
            }
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}

/// 303 See Other to `location`.
pub fn see_other(location: &str) -> Result<Response, DispatchError> {
    let value = HeaderValue::from_str(location)
        .map_err(|_| DispatchError::Location(location.to_string()))?;
    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response())
}
