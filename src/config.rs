//! # Generation Configuration
//!
//! Knobs consumed by the value generator. Loaded either from a serde
//! config section owned by the host process or from `SPECMOCK_*`
//! environment variables; parse failures fall back to defaults rather
//! than aborting startup.

use serde::Deserialize;
use std::env;

/// Configuration for mock value generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Array length used when the schema leaves the bounds open.
    pub array_length: usize,
    /// String length used when min/max length are absent.
    pub string_length: usize,
    /// Lower default bound for unconstrained numbers.
    pub number_min: f64,
    /// Upper default bound for unconstrained numbers.
    pub number_max: f64,
    /// chrono format string for `format: date` values.
    pub date_format: String,
    /// Return declared examples verbatim instead of generating.
    pub use_examples: bool,
    /// Recursion depth cap, independent of reference-cycle detection.
    pub max_depth: usize,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            array_length: 3,
            string_length: 12,
            number_min: 0.0,
            number_max: 100.0,
            date_format: "%Y-%m-%d".to_string(),
            use_examples: true,
            max_depth: 32,
        }
    }
}

impl GenConfig {
    /// Load configuration from `SPECMOCK_*` environment variables.
    ///
    /// Recognized variables: `SPECMOCK_ARRAY_LENGTH`,
    /// `SPECMOCK_STRING_LENGTH`, `SPECMOCK_DATE_FORMAT`,
    /// `SPECMOCK_USE_EXAMPLES`, `SPECMOCK_MAX_DEPTH`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = GenConfig::default();
        cfg.array_length = env_usize("SPECMOCK_ARRAY_LENGTH").unwrap_or(cfg.array_length);
        cfg.string_length = env_usize("SPECMOCK_STRING_LENGTH").unwrap_or(cfg.string_length);
        cfg.max_depth = env_usize("SPECMOCK_MAX_DEPTH").unwrap_or(cfg.max_depth);
        if let Ok(fmt) = env::var("SPECMOCK_DATE_FORMAT") {
            if !fmt.is_empty() {
                cfg.date_format = fmt;
            }
        }
        if let Ok(v) = env::var("SPECMOCK_USE_EXAMPLES") {
            cfg.use_examples = matches!(v.as_str(), "1" | "true" | "yes");
        }
        cfg
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GenConfig::default();
        assert_eq!(cfg.array_length, 3);
        assert!(cfg.use_examples);
        assert_eq!(cfg.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: GenConfig =
            serde_yaml::from_str("array_length: 5\nuse_examples: false").expect("parses");
        assert_eq!(cfg.array_length, 5);
        assert!(!cfg.use_examples);
        // Untouched knobs keep their defaults.
        assert_eq!(cfg.string_length, 12);
    }
}
