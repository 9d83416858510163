use crate::schema::{Schema, SchemaIndex};
use http::Method;
use serde_json::Value;
use std::sync::Arc;

/// Where an operation parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

impl From<oas3::spec::ParameterIn> for ParameterLocation {
    fn from(loc: oas3::spec::ParameterIn) -> Self {
        match loc {
            oas3::spec::ParameterIn::Path => ParameterLocation::Path,
            oas3::spec::ParameterIn::Query => ParameterLocation::Query,
            oas3::spec::ParameterIn::Header => ParameterLocation::Header,
            oas3::spec::ParameterIn::Cookie => ParameterLocation::Cookie,
        }
    }
}

/// One declared parameter of an operation.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Schema>,
}

/// Response-map key: a concrete status code or the `default` catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKey {
    Code(u16),
    Default,
}

impl std::fmt::Display for StatusKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusKey::Code(code) => write!(f, "{code}"),
            StatusKey::Default => write!(f, "default"),
        }
    }
}

/// One media-type representation of a response body.
#[derive(Debug, Clone, Default)]
pub struct MediaContent {
    pub schema: Option<Schema>,
    /// Media-level example; wins over schema-level examples.
    pub example: Option<Value>,
}

/// Declared shape(s) of one response entry.
#[derive(Debug, Clone, Default)]
pub struct ResponseDefinition {
    pub description: String,
    /// Media types in declaration order; order is the no-preference tie-break.
    pub content: Vec<(String, MediaContent)>,
}

impl ResponseDefinition {
    /// Look up the content entry for an exact media type.
    #[must_use]
    pub fn media(&self, media_type: &str) -> Option<&MediaContent> {
        self.content
            .iter()
            .find(|(mt, _)| mt == media_type)
            .map(|(_, content)| content)
    }
}

/// Declared request body of an operation.
#[derive(Debug, Clone, Default)]
pub struct RequestBodySpec {
    pub required: bool,
    pub content: Vec<(String, MediaContent)>,
}

/// One method on one path template.
#[derive(Debug, Clone, Default)]
pub struct Operation {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub parameters: Vec<ParameterSpec>,
    pub request_body: Option<RequestBodySpec>,
    /// Responses in declaration order, keyed by status or `default`.
    pub responses: Vec<(StatusKey, ResponseDefinition)>,
}

impl Operation {
    /// Find the response entry for an exact status key.
    #[must_use]
    pub fn response(&self, key: StatusKey) -> Option<&ResponseDefinition> {
        self.responses
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, def)| def)
    }
}

/// A path template plus its method → operation mapping.
///
/// Invariant: within one document, (pattern, method) is unique; duplicates
/// in the source contract keep the first occurrence.
#[derive(Debug, Clone)]
pub struct PathItem {
    pub pattern: String,
    pub operations: Vec<(Method, Arc<Operation>)>,
}

/// Parsed in-memory model of one API contract.
///
/// Immutable once built: reload replaces the whole document, never mutates
/// it in place.
#[derive(Debug, Clone)]
pub struct SpecificationDocument {
    pub title: String,
    pub version: String,
    /// URL-safe identifier derived from the title; registry key by default.
    pub slug: String,
    /// Path items in declaration order (registration order for tie-breaks).
    pub paths: Vec<PathItem>,
    pub schemas: Arc<SchemaIndex>,
}

impl SpecificationDocument {
    /// Total number of operations across all path items.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|p| p.operations.len()).sum()
    }
}
