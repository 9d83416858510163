//! # Spec Module
//!
//! Contract-document model and loading: turns a raw OpenAPI file into an
//! immutable [`SpecificationDocument`] the registry, router, and generator
//! consume. Parsing itself is delegated to the `oas3` crate; this module
//! owns the conversion into the crate's typed model.

mod build;
mod load;
mod types;

pub use build::{build_document, slugify};
pub use load::{load_document, load_document_from_str};
pub use types::*;
