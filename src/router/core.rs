//! Route table and the request-path matcher.

use crate::error::RouteError;
use crate::spec::{Operation, SpecificationDocument};
use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g. /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the match hot path.
///
/// Names come from the compiled route table and are shared as `Arc<str>`;
/// values are per-request data extracted from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// One segment of a compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(Arc<str>),
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    method: Method,
    pattern: Arc<str>,
    segments: Vec<Segment>,
    literal_count: usize,
    /// Position in the source document; first registered wins ties.
    order: usize,
    operation: Arc<Operation>,
}

/// Result of successfully matching a request to a route.
///
/// Ephemeral: created per request and discarded once the response body has
/// been built.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub operation: Arc<Operation>,
    /// The template that matched, e.g. `/pets/{petId}`.
    pub pattern: Arc<str>,
    /// Path parameters extracted from the URL (`{petId}` → `("petId", "123")`).
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name. Last occurrence wins for duplicate
    /// names at different depths.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Copy the extracted parameters into a map. Allocates; prefer
    /// [`get_path_param`](Self::get_path_param) on the hot path.
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Compiled lookup structure over one document's path templates.
///
/// Built once per loaded specification; matching never mutates it, so a
/// table can be shared freely across concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compile the route table for a specification document.
    #[must_use]
    pub fn new(document: &SpecificationDocument) -> Self {
        let mut routes = Vec::new();
        let mut order = 0usize;
        for item in &document.paths {
            let segments = compile_pattern(&item.pattern);
            let literal_count = segments
                .iter()
                .filter(|s| matches!(s, Segment::Literal(_)))
                .count();
            for (method, operation) in &item.operations {
                routes.push(CompiledRoute {
                    method: method.clone(),
                    pattern: Arc::from(item.pattern.as_str()),
                    segments: segments.clone(),
                    literal_count,
                    order,
                    operation: Arc::clone(operation),
                });
                order += 1;
            }
        }

        info!(
            spec = %document.slug,
            routes_count = routes.len(),
            "route table compiled"
        );
        RouteTable { routes }
    }

    /// Resolve a request to an operation and its extracted path parameters.
    ///
    /// # Errors
    ///
    /// [`RouteError::NotFound`] when no template matches the path at all;
    /// [`RouteError::MethodNotAllowed`] when a template matches the path but
    /// not the requested method (carrying the methods that would).
    pub fn route(&self, method: &Method, path: &str) -> Result<RouteMatch, RouteError> {
        let request_segments = split_path(path);

        let mut best: Option<(&CompiledRoute, ParamVec)> = None;
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(params) = match_segments(&route.segments, &request_segments) else {
                continue;
            };
            if route.method != *method {
                if !allowed.contains(&route.method) {
                    allowed.push(route.method.clone());
                }
                continue;
            }
            // Specificity tie-break: most literal segments, then first registered.
            let better = match &best {
                None => true,
                Some((current, _)) => {
                    route.literal_count > current.literal_count
                        || (route.literal_count == current.literal_count
                            && route.order < current.order)
                }
            };
            if better {
                best = Some((route, params));
            }
        }

        if let Some((route, params)) = best {
            debug!(
                method = %method,
                path = %path,
                pattern = %route.pattern,
                path_params = ?params,
                "route matched"
            );
            return Ok(RouteMatch {
                operation: Arc::clone(&route.operation),
                pattern: Arc::clone(&route.pattern),
                path_params: params,
            });
        }

        if !allowed.is_empty() {
            warn!(method = %method, path = %path, allowed = ?allowed, "method not allowed");
            return Err(RouteError::MethodNotAllowed {
                method: method.clone(),
                path: path.to_string(),
                allowed,
            });
        }

        warn!(method = %method, path = %path, "no route matched");
        Err(RouteError::NotFound {
            method: method.clone(),
            path: path.to_string(),
        })
    }

    /// All registered (method, template) pairs, for endpoint inventories.
    #[must_use]
    pub fn endpoints(&self) -> Vec<(Method, String)> {
        self.routes
            .iter()
            .map(|r| (r.method.clone(), r.pattern.to_string()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Decompose a path template into literal and parameter segments.
fn compile_pattern(pattern: &str) -> Vec<Segment> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            if let Some(name) = segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
            {
                Segment::Param(Arc::from(name))
            } else {
                Segment::Literal(segment.to_string())
            }
        })
        .collect()
}

/// Split a request path into segments. A trailing slash produces a final
/// empty segment, which no template segment can pair with, so `/pets/`
/// does not match `/pets`.
fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

/// Walk a template against the request segments; all segments must pair up.
fn match_segments(template: &[Segment], request: &[&str]) -> Option<ParamVec> {
    if template.len() != request.len() {
        return None;
    }
    let mut params = ParamVec::new();
    for (seg, value) in template.iter().zip(request.iter()) {
        match seg {
            Segment::Literal(lit) => {
                if lit != value {
                    return None;
                }
            }
            Segment::Param(name) => {
                if value.is_empty() {
                    return None;
                }
                params.push((Arc::clone(name), (*value).to_string()));
            }
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_pattern() {
        let segments = compile_pattern("/users/{id}/posts");
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], Segment::Literal(s) if s == "users"));
        assert!(matches!(&segments[1], Segment::Param(p) if p.as_ref() == "id"));
        assert!(matches!(&segments[2], Segment::Literal(s) if s == "posts"));
    }

    #[test]
    fn test_match_segments_binds_params() {
        let template = compile_pattern("/pets/{petId}");
        let params = match_segments(&template, &split_path("/pets/123")).expect("matches");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].0.as_ref(), "petId");
        assert_eq!(params[0].1, "123");
    }

    #[test]
    fn test_match_segments_rejects_length_mismatch() {
        let template = compile_pattern("/pets/{petId}");
        assert!(match_segments(&template, &split_path("/pets")).is_none());
        assert!(match_segments(&template, &split_path("/pets/1/extra")).is_none());
        // Trailing slash leaves an empty segment that nothing pairs with.
        assert!(match_segments(&template, &split_path("/pets/")).is_none());
    }

    #[test]
    fn test_empty_segment_never_binds() {
        let template = compile_pattern("/pets/{petId}/toys");
        assert!(match_segments(&template, &["pets", "", "toys"]).is_none());
    }

    #[test]
    fn test_root_template() {
        let template = compile_pattern("/");
        assert!(match_segments(&template, &split_path("/")).is_some());
        assert!(match_segments(&template, &split_path("/x")).is_none());
    }
}
