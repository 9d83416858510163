//! Error taxonomy for the mock server core.
//!
//! Structural errors are terminal for one request and map onto HTTP status
//! codes through [`ServeError::status_code`]. Field-level generation
//! failures never surface here; the generator recovers them to `null`.

use http::Method;
use thiserror::Error;

/// Registry-level failures.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The `spec` selector named a contract that is not loaded.
    #[error("unknown specification '{0}'")]
    UnknownSpecification(String),

    /// No contract loaded at all (empty directory, or every document failed).
    #[error("no specification loaded")]
    NoSpecificationLoaded,

    /// The configured contract source could not be read.
    #[error("failed to read specification source {path}: {source}")]
    SourceUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Route-resolution failures.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No path template matches the request path for any method.
    #[error("no route matches {method} {path}")]
    NotFound { method: Method, path: String },

    /// A template matches the path, but not with the requested method.
    /// Carries the methods that would match, for the `Allow` header.
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },
}

/// Response/content selection failures.
#[derive(Debug, Error)]
pub enum SelectError {
    /// The operation declares no response usable for this request.
    #[error("operation declares no usable response")]
    NoResponseDefined,

    /// No declared media type intersects the request's Accept preferences.
    #[error("no acceptable media type (declared: {declared:?})")]
    NotAcceptable { declared: Vec<String> },
}

/// Top-level per-request error, as seen by the transport layer.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Select(#[from] SelectError),
}

impl ServeError {
    /// HTTP status code the transport should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ServeError::Registry(RegistryError::UnknownSpecification(_)) => 400,
            ServeError::Registry(_) => 500,
            ServeError::Route(RouteError::NotFound { .. }) => 404,
            ServeError::Route(RouteError::MethodNotAllowed { .. }) => 405,
            ServeError::Select(SelectError::NoResponseDefined) => 500,
            ServeError::Select(SelectError::NotAcceptable { .. }) => 406,
        }
    }

    /// Methods for the `Allow` header, present only on 405 responses.
    #[must_use]
    pub fn allow(&self) -> Option<&[Method]> {
        match self {
            ServeError::Route(RouteError::MethodNotAllowed { allowed, .. }) => {
                Some(allowed.as_slice())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let err = ServeError::from(RegistryError::UnknownSpecification("x".into()));
        assert_eq!(err.status_code(), 400);

        let err = ServeError::from(RouteError::NotFound {
            method: Method::GET,
            path: "/missing".into(),
        });
        assert_eq!(err.status_code(), 404);

        let err = ServeError::from(SelectError::NotAcceptable { declared: vec![] });
        assert_eq!(err.status_code(), 406);
    }

    #[test]
    fn test_allow_only_on_method_not_allowed() {
        let err = ServeError::from(RouteError::MethodNotAllowed {
            method: Method::GET,
            path: "/pets".into(),
            allowed: vec![Method::POST],
        });
        assert_eq!(err.status_code(), 405);
        assert_eq!(err.allow(), Some(&[Method::POST][..]));

        let err = ServeError::from(SelectError::NoResponseDefined);
        assert!(err.allow().is_none());
    }
}
