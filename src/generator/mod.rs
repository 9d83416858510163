//! # Value Generator
//!
//! Produces mock values for a schema: the algorithmic heart of the mock
//! server. Generation is pure per invocation and draws from a
//! generator-local seedable RNG, so concurrent requests never contend and
//! tests can pin a seed for reproducible output.
//!
//! Failures here are always recovered locally: a field that cannot be
//! generated becomes `null`, never a request failure. The system's
//! obligation is a usable mock, not strict fidelity.
//!
//! ## Rules, in priority order
//!
//! 1. Declared example (when enabled) is returned verbatim.
//! 2. References resolve through the document's schema index; a reference
//!    already on the active resolution path short-circuits to `null`,
//!    bounding recursion for self-referential schemas.
//! 3. `allOf` branches are generated independently and structurally
//!    merged; `oneOf`/`anyOf` pick exactly one branch per call.
//! 4. Enum schemas always yield a declared member.
//! 5. Objects include every declared property; arrays pick a length
//!    clamped into `[minItems, maxItems]`; strings honor format, pattern,
//!    and length bounds; numbers stay inside `[minimum, maximum]` with
//!    exclusive bounds nudged.
//!
//! A configurable depth cap backs up the cycle detection for
//! pathologically nested schemas.

mod format;
mod pattern;

use crate::config::GenConfig;
use crate::schema::{
    ArraySchema, NumberSchema, ObjectSchema, Schema, SchemaIndex, SchemaKind, StringSchema,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Schema-driven mock value generator.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    config: GenConfig,
}

/// Per-call generation state: RNG, active reference path, recursion depth.
struct GenCtx<'a> {
    rng: StdRng,
    index: &'a SchemaIndex,
    resolving: HashSet<String>,
    depth: usize,
}

impl MockGenerator {
    #[must_use]
    pub fn new(config: GenConfig) -> Self {
        MockGenerator { config }
    }

    #[must_use]
    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Generate a mock value with fresh entropy.
    #[must_use]
    pub fn generate(&self, schema: &Schema, index: &SchemaIndex) -> Value {
        self.run(schema, index, StdRng::from_entropy())
    }

    /// Generate with a fixed seed; identical inputs produce identical
    /// output, which is what tests want.
    #[must_use]
    pub fn generate_seeded(&self, schema: &Schema, index: &SchemaIndex, seed: u64) -> Value {
        self.run(schema, index, StdRng::seed_from_u64(seed))
    }

    fn run(&self, schema: &Schema, index: &SchemaIndex, rng: StdRng) -> Value {
        let mut ctx = GenCtx {
            rng,
            index,
            resolving: HashSet::new(),
            depth: 0,
        };
        self.value_for(schema, &mut ctx)
    }

    fn value_for(&self, schema: &Schema, ctx: &mut GenCtx<'_>) -> Value {
        if ctx.depth >= self.config.max_depth {
            debug!(depth = ctx.depth, "generation depth cap reached");
            return Value::Null;
        }

        if self.config.use_examples {
            if let Some(example) = &schema.example {
                return example.clone();
            }
        }

        if let Some(values) = &schema.enum_values {
            // Uniform pick; never a value outside the declared set.
            return values[ctx.rng.gen_range(0..values.len())].clone();
        }

        match &schema.kind {
            SchemaKind::Boolean => Value::Bool(ctx.rng.gen_bool(0.5)),
            SchemaKind::String(s) => self.string_value(s, ctx),
            SchemaKind::Integer(n) => self.integer_value(n, ctx),
            SchemaKind::Number(n) => self.number_value(n, ctx),
            SchemaKind::Object(o) => self.object_value(o, ctx),
            SchemaKind::Array(a) => self.array_value(a, ctx),
            SchemaKind::Reference(name) => self.reference_value(name, ctx),
            SchemaKind::AllOf(branches) => self.all_of_value(branches, ctx),
            SchemaKind::OneOf(branches) | SchemaKind::AnyOf(branches) => {
                self.one_branch_value(branches, ctx)
            }
            SchemaKind::Null | SchemaKind::Any => Value::Null,
        }
    }

    fn string_value(&self, schema: &StringSchema, ctx: &mut GenCtx<'_>) -> Value {
        if let Some(format) = &schema.format {
            if let Some(v) = format::format_value(format, &mut ctx.rng, &self.config) {
                return Value::String(v);
            }
            debug!(format = %format, "unknown string format, generating plain string");
        }

        if let Some(pat) = &schema.pattern {
            match pattern::synthesize(pat, &mut ctx.rng) {
                Ok(v) => return Value::String(v),
                Err(err) => {
                    debug!(pattern = %pat, error = %err, "pattern synthesis failed, falling back");
                }
            }
        }

        let min = schema.min_length.unwrap_or(0);
        let max = schema.max_length.unwrap_or(usize::MAX);
        let len = if min > max {
            min
        } else {
            self.config.string_length.clamp(min, max)
        };
        Value::String(format::alnum(&mut ctx.rng, len))
    }

    fn integer_value(&self, schema: &NumberSchema, ctx: &mut GenCtx<'_>) -> Value {
        let mut lo = schema.minimum.unwrap_or(self.config.number_min).ceil() as i64;
        let mut hi = schema.maximum.unwrap_or(self.config.number_max).floor() as i64;
        if schema.exclusive_minimum {
            lo += 1;
        }
        if schema.exclusive_maximum {
            hi -= 1;
        }
        if lo > hi {
            // Degenerate bounds; honor the lower one.
            return Value::from(lo);
        }
        Value::from(ctx.rng.gen_range(lo..=hi))
    }

    fn number_value(&self, schema: &NumberSchema, ctx: &mut GenCtx<'_>) -> Value {
        const NUDGE: f64 = 1e-3;
        let mut lo = schema.minimum.unwrap_or(self.config.number_min);
        let mut hi = schema.maximum.unwrap_or(self.config.number_max);
        if schema.exclusive_minimum {
            lo += NUDGE;
        }
        if schema.exclusive_maximum {
            hi -= NUDGE;
        }
        if lo > hi {
            return serde_json::Number::from_f64(lo).map_or(Value::Null, Value::Number);
        }
        let raw: f64 = ctx.rng.gen_range(lo..=hi);
        // Two decimals read better in mock payloads and stay inside the
        // nudged bounds.
        let rounded = (raw * 100.0).round() / 100.0;
        let v = if (lo..=hi).contains(&rounded) { rounded } else { raw };
        serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
    }

    fn object_value(&self, schema: &ObjectSchema, ctx: &mut GenCtx<'_>) -> Value {
        let mut map = Map::with_capacity(schema.properties.len());
        for (name, prop) in &schema.properties {
            ctx.depth += 1;
            let value = self.value_for(prop, ctx);
            ctx.depth -= 1;
            // Required properties are always present; optional ones are
            // included too, keeping generation deterministic for tests.
            map.insert(name.clone(), value);
        }
        Value::Object(map)
    }

    fn array_value(&self, schema: &ArraySchema, ctx: &mut GenCtx<'_>) -> Value {
        let min = schema.min_items.unwrap_or(0);
        let max = schema.max_items.unwrap_or(usize::MAX);
        let len = if min > max {
            min
        } else {
            self.config.array_length.clamp(min, max)
        };
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            let value = match &schema.items {
                Some(item_schema) => {
                    ctx.depth += 1;
                    let v = self.value_for(item_schema, ctx);
                    ctx.depth -= 1;
                    v
                }
                None => Value::Null,
            };
            items.push(value);
        }
        Value::Array(items)
    }

    fn reference_value(&self, name: &str, ctx: &mut GenCtx<'_>) -> Value {
        if ctx.resolving.contains(name) {
            // Cycle on the active resolution path: short-circuit instead
            // of recursing forever through a self-referential schema.
            debug!(schema = %name, "reference cycle detected, emitting null");
            return Value::Null;
        }
        let Some(target) = ctx.index.get(name).map(Arc::clone) else {
            warn!(schema = %name, "unresolvable schema reference, emitting null");
            return Value::Null;
        };
        ctx.resolving.insert(name.to_string());
        ctx.depth += 1;
        let value = self.value_for(&target, ctx);
        ctx.depth -= 1;
        ctx.resolving.remove(name);
        value
    }

    /// Generate every branch and structurally merge: object branches union
    /// their properties with later branches overwriting on key conflict;
    /// a non-object branch replaces the accumulator outright.
    fn all_of_value(&self, branches: &[Schema], ctx: &mut GenCtx<'_>) -> Value {
        let mut merged = Value::Null;
        for branch in branches {
            ctx.depth += 1;
            let value = self.value_for(branch, ctx);
            ctx.depth -= 1;
            merged = match (merged, value) {
                (Value::Object(mut acc), Value::Object(next)) => {
                    for (k, v) in next {
                        acc.insert(k, v);
                    }
                    Value::Object(acc)
                }
                (acc, Value::Null) => acc,
                (_, next) => next,
            };
        }
        merged
    }

    /// Choose exactly one branch uniformly; the result never mixes fields
    /// from different branches.
    fn one_branch_value(&self, branches: &[Schema], ctx: &mut GenCtx<'_>) -> Value {
        if branches.is_empty() {
            return Value::Null;
        }
        let pick = ctx.rng.gen_range(0..branches.len());
        ctx.depth += 1;
        let value = self.value_for(&branches[pick], ctx);
        ctx.depth -= 1;
        value
    }
}
