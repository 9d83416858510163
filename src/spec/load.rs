use super::build::build_document;
use super::types::SpecificationDocument;
use oas3::OpenApiV3Spec;
use std::path::Path;

/// Drop non-method keys some tools leave in path items so the strict oas3
/// deserializer does not reject the whole document.
fn strip_unknown_verbs(val: &mut serde_json::Value) {
    const METHODS: [&str; 8] = [
        "get", "post", "put", "delete", "patch", "options", "head", "trace",
    ];

    if let Some(serde_json::Value::Object(paths_map)) = val.get_mut("paths") {
        for item in paths_map.values_mut() {
            if let serde_json::Value::Object(obj) = item {
                let keys: Vec<String> = obj.keys().cloned().collect();
                for k in keys {
                    let lk = k.to_ascii_lowercase();
                    let keep = match lk.as_str() {
                        "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                        m if METHODS.contains(&m) => true,
                        _ => k.starts_with("x-"),
                    };
                    if !keep {
                        obj.remove(&k);
                    }
                }
            }
        }
    }
}

/// Load one contract document from disk.
///
/// YAML vs JSON is decided by file extension; either way the raw document
/// passes through [`strip_unknown_verbs`] before the oas3 parse.
pub fn load_document(path: impl AsRef<Path>) -> anyhow::Result<SpecificationDocument> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let mut value: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    strip_unknown_verbs(&mut value);
    let spec: OpenApiV3Spec = serde_json::from_value(value)?;
    build_document(&spec)
}

/// Build a document from contract text, used by tests and embedded fixtures.
pub fn load_document_from_str(content: &str) -> anyhow::Result<SpecificationDocument> {
    let mut value: serde_json::Value = serde_yaml::from_str(content)?;
    strip_unknown_verbs(&mut value);
    let spec: OpenApiV3Spec = serde_json::from_value(value)?;
    build_document(&spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_unknown_verbs() {
        let mut v = json!({
            "paths": {
                "/x": { "get": {}, "patch": {}, "unknown": {} }
            }
        });
        strip_unknown_verbs(&mut v);
        assert!(v["paths"]["/x"].get("unknown").is_none());
        assert!(v["paths"]["/x"].get("get").is_some());
    }

    #[test]
    fn test_load_document_from_str_rejects_garbage() {
        assert!(load_document_from_str("not: [valid").is_err());
    }
}
