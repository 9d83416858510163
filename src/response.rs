//! # Response Selector
//!
//! Picks which declared response (status code) and media type to honor for
//! a request, before the value generator materializes the body.
//!
//! Status selection order: an exact match for a caller-requested status
//! (the `status` query override used to exercise error paths); a declared
//! `default` entry materialized with the requested code; the lowest
//! declared 2xx; a bare `default` (rendered as 200); otherwise
//! [`SelectError::NoResponseDefined`].
//!
//! Media-type selection intersects the declared representations with the
//! request's `Accept` preference order (q-values, wildcards). A client
//! with no preference gets `application/json` when declared, else the
//! first declared type. An empty intersection falls back to JSON when the
//! response offers it and fails with [`SelectError::NotAcceptable`]
//! otherwise.

use crate::error::SelectError;
use crate::schema::Schema;
use crate::spec::{Operation, ResponseDefinition, StatusKey};
use serde_json::Value;
use tracing::debug;

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Outcome of selection: everything the generator needs to build a body.
#[derive(Debug, Clone)]
pub struct SelectedResponse {
    pub status: u16,
    pub media_type: String,
    pub schema: Option<Schema>,
    /// Media-level example; wins over schema-level examples.
    pub example: Option<Value>,
    pub description: String,
}

/// Select a response definition and media type for one request.
pub fn select(
    operation: &Operation,
    requested_status: Option<u16>,
    accept: Option<&str>,
) -> Result<SelectedResponse, SelectError> {
    let (status, definition) = select_status(operation, requested_status)?;
    let media_type = negotiate_media_type(definition, accept)?;

    let (schema, example) = match definition.media(&media_type) {
        Some(content) => (content.schema.clone(), content.example.clone()),
        // Response declared with no content at all: empty-bodied mock.
        None => (None, None),
    };

    debug!(status, media_type = %media_type, "response selected");
    Ok(SelectedResponse {
        status,
        media_type,
        schema,
        example,
        description: definition.description.clone(),
    })
}

fn select_status(
    operation: &Operation,
    requested: Option<u16>,
) -> Result<(u16, &ResponseDefinition), SelectError> {
    if let Some(code) = requested {
        if let Some(def) = operation.response(StatusKey::Code(code)) {
            return Ok((code, def));
        }
        // The override names an undeclared code: honor it through the
        // catch-all entry when the contract has one.
        if let Some(def) = operation.response(StatusKey::Default) {
            return Ok((code, def));
        }
    }

    let lowest_2xx = operation
        .responses
        .iter()
        .filter_map(|(key, def)| match key {
            StatusKey::Code(code) if (200..300).contains(code) => Some((*code, def)),
            _ => None,
        })
        .min_by_key(|(code, _)| *code);
    if let Some(found) = lowest_2xx {
        return Ok(found);
    }

    if let Some(def) = operation.response(StatusKey::Default) {
        return Ok((200, def));
    }

    Err(SelectError::NoResponseDefined)
}

fn negotiate_media_type(
    definition: &ResponseDefinition,
    accept: Option<&str>,
) -> Result<String, SelectError> {
    let declared: Vec<&str> = definition.content.iter().map(|(mt, _)| mt.as_str()).collect();
    if declared.is_empty() {
        // Nothing to negotiate; the body will be empty JSON.
        return Ok(JSON_MEDIA_TYPE.to_string());
    }

    let preferences = parse_accept(accept);
    if preferences.is_empty() {
        return Ok(pick_default(&declared));
    }

    for pref in &preferences {
        if let Some(found) = match_preference(pref, &declared) {
            return Ok(found.to_string());
        }
    }

    // Empty intersection: JSON is still served when declared, since the
    // system's obligation is a usable mock, not strict negotiation.
    if declared.contains(&JSON_MEDIA_TYPE) {
        return Ok(JSON_MEDIA_TYPE.to_string());
    }

    Err(SelectError::NotAcceptable {
        declared: declared.iter().map(|s| s.to_string()).collect(),
    })
}

fn pick_default(declared: &[&str]) -> String {
    if declared.contains(&JSON_MEDIA_TYPE) {
        JSON_MEDIA_TYPE.to_string()
    } else {
        declared[0].to_string()
    }
}

/// Find the first declared media type matching one Accept entry, honoring
/// `type/*` and `*/*` wildcards. Wildcards prefer JSON when declared.
fn match_preference<'a>(pref: &str, declared: &[&'a str]) -> Option<&'a str> {
    if pref == "*/*" {
        return Some(if declared.contains(&JSON_MEDIA_TYPE) {
            JSON_MEDIA_TYPE
        } else {
            declared[0]
        });
    }
    if let Some(main) = pref.strip_suffix("/*") {
        return declared
            .iter()
            .find(|mt| mt.split('/').next() == Some(main))
            .copied();
    }
    declared.iter().find(|mt| **mt == pref).copied()
}

/// Parse an `Accept` header into media types ordered by q-value (then by
/// position for ties). Entries with `q=0` are dropped.
fn parse_accept(accept: Option<&str>) -> Vec<String> {
    let Some(header) = accept else {
        return Vec::new();
    };
    let mut entries: Vec<(String, f32, usize)> = Vec::new();
    for (pos, item) in header.split(',').enumerate() {
        let mut parts = item.split(';');
        let media = match parts.next() {
            Some(m) if !m.trim().is_empty() => m.trim().to_string(),
            _ => continue,
        };
        let mut q = 1.0f32;
        for param in parts {
            if let Some(value) = param.trim().strip_prefix("q=") {
                q = value.trim().parse().unwrap_or(1.0);
            }
        }
        if q > 0.0 {
            entries.push((media, q, pos));
        }
    }
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.2.cmp(&b.2))
    });
    entries.into_iter().map(|(media, _, _)| media).collect()
}
