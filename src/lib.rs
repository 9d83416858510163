//! # specmock
//!
//! **specmock** is the core of a specification-driven mock API server:
//! given one or more OpenAPI contract documents, it builds a
//! request-routing table and a value-generation engine that synthesizes
//! realistic, schema-conformant responses without any hand-written
//! per-endpoint logic.
//!
//! ## Architecture
//!
//! Leaf-first composition:
//!
//! - **[`schema`]** - typed schema model lowered once from the contract's
//!   JSON-Schema fragments, plus the name → schema index used for lazy
//!   reference resolution
//! - **[`spec`]** - contract-document model and loading (parsing is
//!   delegated to the `oas3` crate)
//! - **[`generator`]** - the mock value generator: example precedence,
//!   reference cycles, composition keywords, constraint-aware primitives
//! - **[`registry`]** - loaded contracts behind an atomically-swapped
//!   immutable snapshot; readers never block on reload
//! - **[`router`]** - segment-wise path-template matching with parameter
//!   extraction and a most-literal-segments-wins tie-break
//! - **[`response`]** - status-code and media-type selection (content
//!   negotiation)
//! - **[`service`]** - the facade the transport layer drives
//! - **[`hot_reload`]** - filesystem watcher replacing the registry
//!   snapshot when contracts change
//!
//! ## Request flow
//!
//! ```text
//! request → registry picks active spec (explicit `spec` param or default)
//!         → route table matches the path template, extracts parameters
//!         → selector picks status code and media type
//!         → generator builds the body from the chosen schema
//!         → body + metadata back to the transport layer
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use specmock::config::GenConfig;
//! use specmock::generator::MockGenerator;
//! use specmock::registry::SpecRegistry;
//! use specmock::service::{MockRequest, MockService};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(SpecRegistry::new());
//! registry.load_dir("./specs", None)?;
//!
//! let service = MockService::new(registry, MockGenerator::new(GenConfig::from_env()));
//! let response = service.respond(&MockRequest::get("/pets/123"))?;
//! println!("{} {}", response.status, response.body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! Structural errors ([`error::ServeError`]) are terminal for the one
//! request and map onto HTTP status codes (400/404/405/406/500); they
//! never crash the process or corrupt the registry snapshot. Field-level
//! generation failures are recovered to `null` inside the generator,
//! because the system's obligation is a best-effort realistic mock, not a
//! strict validator.

pub mod config;
pub mod error;
pub mod generator;
pub mod hot_reload;
pub mod registry;
pub mod response;
pub mod router;
pub mod schema;
pub mod service;
pub mod spec;

pub use config::GenConfig;
pub use error::{RegistryError, RouteError, SelectError, ServeError};
pub use generator::MockGenerator;
pub use registry::SpecRegistry;
pub use router::{RouteMatch, RouteTable};
pub use schema::{Schema, SchemaIndex, SchemaKind};
pub use service::{MockRequest, MockResponse, MockService};
pub use spec::{
    load_document, load_document_from_str, Operation, ParameterLocation, PathItem,
    ResponseDefinition, SpecificationDocument, StatusKey,
};
