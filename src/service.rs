//! # Mock Service
//!
//! Ties the core together for the transport layer: registry lookup →
//! route resolution → response selection → body generation. The HTTP
//! listener itself lives outside this crate; it hands us a
//! [`MockRequest`] and turns the [`MockResponse`] (or the
//! [`ServeError`](crate::error::ServeError) status mapping) into a wire
//! response.

use crate::error::ServeError;
use crate::generator::MockGenerator;
use crate::registry::SpecRegistry;
use crate::response::{self, JSON_MEDIA_TYPE};
use crate::router::RouteMatch;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// One incoming request, as decomposed by the transport layer:
/// `METHOD /any/path?spec=<name>&status=<code>` plus the `Accept` header.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: http::Method,
    pub path: String,
    /// Explicit spec selector (`spec` query parameter).
    pub spec: Option<String>,
    /// Status override for exercising declared error responses.
    pub status: Option<u16>,
    pub accept: Option<String>,
}

impl MockRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        MockRequest {
            method: http::Method::GET,
            path: path.into(),
            spec: None,
            status: None,
            accept: None,
        }
    }

    #[must_use]
    pub fn new(method: http::Method, path: impl Into<String>) -> Self {
        MockRequest {
            method,
            path: path.into(),
            spec: None,
            status: None,
            accept: None,
        }
    }
}

/// The synthesized response handed back to the transport layer.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Value,
    /// The route match that produced this response, exposed for logging
    /// and for saved-response tooling built on top.
    pub matched: RouteMatch,
}

/// Facade over registry, router, selector, and generator.
#[derive(Debug, Clone)]
pub struct MockService {
    registry: Arc<SpecRegistry>,
    generator: MockGenerator,
}

impl MockService {
    #[must_use]
    pub fn new(registry: Arc<SpecRegistry>, generator: MockGenerator) -> Self {
        MockService {
            registry,
            generator,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<SpecRegistry> {
        &self.registry
    }

    /// Resolve, select, and generate a mock response for one request.
    pub fn respond(&self, request: &MockRequest) -> Result<MockResponse, ServeError> {
        let spec = self.registry.resolve(request.spec.as_deref())?;
        let matched = spec.routes.route(&request.method, &request.path)?;
        let selected = response::select(
            &matched.operation,
            request.status,
            request.accept.as_deref(),
        )?;

        // Media-level example beats schema generation outright.
        let body = if let Some(example) = selected.example {
            example
        } else if let Some(schema) = &selected.schema {
            self.generator.generate(schema, &spec.document.schemas)
        } else {
            Value::Null
        };

        info!(
            method = %request.method,
            path = %request.path,
            spec = %spec.document.slug,
            pattern = %matched.pattern,
            status = selected.status,
            media_type = %selected.media_type,
            "mock response generated"
        );

        Ok(MockResponse {
            status: selected.status,
            content_type: selected.media_type,
            body,
            matched,
        })
    }

    /// Deterministic variant used by tests and saved-response capture.
    pub fn respond_seeded(
        &self,
        request: &MockRequest,
        seed: u64,
    ) -> Result<MockResponse, ServeError> {
        let spec = self.registry.resolve(request.spec.as_deref())?;
        let matched = spec.routes.route(&request.method, &request.path)?;
        let selected = response::select(
            &matched.operation,
            request.status,
            request.accept.as_deref(),
        )?;

        let body = if let Some(example) = selected.example {
            example
        } else if let Some(schema) = &selected.schema {
            self.generator
                .generate_seeded(schema, &spec.document.schemas, seed)
        } else {
            Value::Null
        };

        debug!(seed, path = %request.path, "seeded mock response generated");
        Ok(MockResponse {
            status: selected.status,
            content_type: selected.media_type,
            body,
            matched,
        })
    }
}

/// Default content type helper for error bodies rendered by the transport.
#[must_use]
pub fn error_body(err: &ServeError) -> (u16, String, Value) {
    let status = err.status_code();
    let body = serde_json::json!({
        "status": status,
        "error": err.to_string(),
    });
    (status, JSON_MEDIA_TYPE.to_string(), body)
}
