//! # Schema Module
//!
//! Typed in-memory representation of a contract's type definitions.
//!
//! Contract documents carry schemas as loosely-typed JSON fragments. This
//! module lowers each fragment once, at load time, into a closed tagged
//! variant ([`SchemaKind`]) so the value generator can switch over an
//! exhaustively-checked set of cases instead of probing nested maps on
//! every request.
//!
//! References (`$ref`) are *not* expanded here. They stay symbolic
//! ([`SchemaKind::Reference`]) and are resolved through a [`SchemaIndex`]
//! at generation time, which turns self-referential schema graphs into a
//! bounded recursion instead of a cyclic data structure.

mod parse;

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// One type definition from a contract document.
///
/// The shape discriminant lives in [`kind`](Self::kind); `example` and
/// `enum_values` apply uniformly across kinds, so they sit on the wrapper.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub kind: SchemaKind,
    /// Declared example value; takes precedence over generation when enabled.
    pub example: Option<Value>,
    /// Closed value set; generation must never leave it.
    pub enum_values: Option<Vec<Value>>,
}

/// Closed set of schema shapes the generator understands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaKind {
    Boolean,
    String(StringSchema),
    Integer(NumberSchema),
    Number(NumberSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    /// Symbolic reference to a named schema, resolved via [`SchemaIndex`].
    Reference(String),
    AllOf(Vec<Schema>),
    OneOf(Vec<Schema>),
    AnyOf(Vec<Schema>),
    Null,
    /// Fragment the lowering could not classify; generates as `null`.
    #[default]
    Any,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringSchema {
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberSchema {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Properties in declaration order so generated bodies read like the contract.
    pub properties: Vec<(String, Schema)>,
    pub required: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArraySchema {
    pub items: Option<Box<Schema>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl Schema {
    /// Shorthand for a schema with no example and no enum.
    #[must_use]
    pub fn of(kind: SchemaKind) -> Self {
        Schema {
            kind,
            example: None,
            enum_values: None,
        }
    }
}

/// Name → schema table built from a contract's component definitions.
///
/// Shared (via `Arc`) between the document model and every generation call
/// so reference resolution is a map lookup, never a graph walk.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), Arc::new(schema));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Names of all indexed schemas, sorted for stable listings.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
