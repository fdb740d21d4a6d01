//! Route lookup.
//!
//! # Responsibilities
//! - Hold the compiled schema
//! - Look up the receive route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Exact path match only; no prefixes, no trailing-slash folding
//! - Explicit NotFound rather than silent default

use std::sync::Arc;

use crate::receive::{Route, Schema};

/// Outcome of a lookup.
#[derive(Debug)]
pub enum RouteMatch<'a> {
    Found { path: &'a str, route: &'a Route },
    NotFound,
}

/// Exact-path router over the compiled schema.
#[derive(Debug, Clone)]
pub struct Router {
    schema: Arc<Schema>,
}

impl Router {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// Find the route configured for `path`.
    pub fn match_path<'a>(&'a self, path: &'a str) -> RouteMatch<'a> {
        match self.schema.route(path) {
            Some(route) => RouteMatch::Found { path, route },
            None => RouteMatch::NotFound,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}
