//! # Router Module
//!
//! Path matching and route resolution: maps an incoming (method, path)
//! pair to an operation plus extracted path parameters.
//!
//! ## Architecture
//!
//! Two phases, both deterministic:
//!
//! 1. **Compilation**: at load time each path template (e.g. `/pets/{petId}`)
//!    is decomposed into literal and parameter segments, grouped per method.
//! 2. **Matching**: a request path is walked segment-by-segment against the
//!    candidate templates; a literal must match exactly, a parameter binds
//!    any single non-empty segment.
//!
//! When several templates structurally match the same path, the one with
//! the most literal segments wins; remaining ties go to the template
//! registered first. `/pets/mine` therefore always beats `/pets/{petId}`.

mod core;

pub use core::{ParamVec, RouteMatch, RouteTable, MAX_INLINE_PARAMS};
