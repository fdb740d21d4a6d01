//! Form body decoding.
//!
//! # Responsibilities
//! - Detect urlencoded vs multipart bodies from `Content-Type`
//! - Decode every key/value pair, keeping repeated keys
//! - Append query-string pairs after body pairs
//!
//! # Design Decisions
//! - Body size is bounded by axum's `DefaultBodyLimit`
//! - Multipart file parts are not form values and are skipped
//! - Urlencoded bodies are only read for POST, PUT and PATCH

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, Method, Request};
use thiserror::Error;

use crate::pipeline::form::FormValues;

const URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// The request body could not be decoded as a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0}")]
    Body(String),

    #[error("{0}")]
    Multipart(String),
}

/// Decode the form carried by `request` (body first, then query string).
pub async fn decode_form(request: Request<Body>) -> Result<FormValues, FormError> {
    let query = request.uri().query().map(str::to_owned);
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    let mut form = if content_type.starts_with(MULTIPART) {
        decode_multipart(request).await?
    } else if content_type.starts_with(URLENCODED) && has_form_body(request.method()) {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| FormError::Body(e.to_string()))?;
        parse_urlencoded(&body)
    } else {
        FormValues::new()
    };

    if let Some(query) = query {
        form.extend(url::form_urlencoded::parse(query.as_bytes()).into_owned());
    }

    Ok(form)
}

fn has_form_body(method: &Method) -> bool {
    method == Method::POST || method == Method::PUT || method == Method::PATCH
}

fn parse_urlencoded(body: &[u8]) -> FormValues {
    url::form_urlencoded::parse(body).into_owned().collect()
}

async fn decode_multipart(request: Request<Body>) -> Result<FormValues, FormError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| FormError::Multipart(e.to_string()))?;

    let mut form = FormValues::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FormError::Multipart(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if field.file_name().is_some() {
            tracing::debug!(part = %name, "Skipping file part");
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| FormError::Multipart(e.to_string()))?;
        form.append(name, value);
    }

    Ok(form)
}
