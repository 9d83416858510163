//! Lowering of a parsed [`OpenApiV3Spec`] into the crate's own document model.
//!
//! The oas3 crate is the contract-parsing collaborator; everything it hands
//! us is converted here, once per load, into [`SpecificationDocument`] so the
//! rest of the crate never touches oas3 types.

use super::types::{
    MediaContent, Operation, ParameterLocation, ParameterSpec, PathItem, RequestBodySpec,
    ResponseDefinition, SpecificationDocument, StatusKey,
};
use crate::schema::{Schema, SchemaIndex, SchemaKind};
use oas3::spec::{MediaTypeExamples, ObjectOrReference, Parameter};
use oas3::OpenApiV3Spec;
use std::sync::Arc;
use tracing::{debug, warn};

/// Derive a URL-safe slug from a contract title (`Pet Store` → `pet_store`).
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
        .trim_matches('_')
        .to_string()
}

/// Convert an inline-or-referenced oas3 schema into a typed [`Schema`].
///
/// Inline schemas are serialized back to JSON and lowered; references stay
/// symbolic so the generator resolves them through the document's
/// [`SchemaIndex`].
fn convert_schema(schema_ref: &ObjectOrReference<oas3::spec::ObjectSchema>) -> Schema {
    match schema_ref {
        ObjectOrReference::Object(obj) => match serde_json::to_value(obj) {
            Ok(value) => Schema::from_value(&value),
            Err(err) => {
                warn!(error = %err, "failed to serialize inline schema, generating null");
                Schema::default()
            }
        },
        ObjectOrReference::Ref { ref_path, .. } => {
            let name = ref_path
                .strip_prefix("#/components/schemas/")
                .unwrap_or(ref_path);
            Schema::of(SchemaKind::Reference(name.to_string()))
        }
    }
}

/// Build the name → schema table from `components.schemas`.
fn build_schema_index(spec: &OpenApiV3Spec) -> SchemaIndex {
    let mut index = SchemaIndex::new();
    if let Some(components) = spec.components.as_ref() {
        for (name, schema_ref) in &components.schemas {
            index.insert(name.clone(), convert_schema(schema_ref));
        }
    }
    index
}

fn resolve_parameter_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::Parameter> {
    if let Some(name) = ref_path.strip_prefix("#/components/parameters/") {
        spec.components
            .as_ref()?
            .parameters
            .get(name)
            .and_then(|param_ref| match param_ref {
                ObjectOrReference::Object(param) => Some(param),
                _ => None,
            })
    } else {
        None
    }
}

/// Extract parameter declarations, resolving component references.
fn extract_parameters(
    spec: &OpenApiV3Spec,
    params: &[ObjectOrReference<Parameter>],
) -> Vec<ParameterSpec> {
    let mut out = Vec::new();
    for p in params {
        let param = match p {
            ObjectOrReference::Object(obj) => Some(obj),
            ObjectOrReference::Ref { ref_path, .. } => resolve_parameter_ref(spec, ref_path),
        };
        if let Some(param) = param {
            out.push(ParameterSpec {
                name: param.name.clone(),
                location: ParameterLocation::from(param.location),
                required: param.required.unwrap_or(false),
                schema: param.schema.as_ref().map(convert_schema),
            });
        }
    }
    out
}

/// Convert a media-type map (response or request-body content) preserving
/// declaration order, with the media-level example pulled out of oas3's
/// example/examples split.
fn convert_content(
    content: &std::collections::BTreeMap<String, oas3::spec::MediaType>,
) -> Vec<(String, MediaContent)> {
    content
        .iter()
        .map(|(media_type, media)| {
            let example = match &media.examples {
                Some(MediaTypeExamples::Example { example }) => Some(example.clone()),
                Some(MediaTypeExamples::Examples { examples }) => {
                    examples.iter().find_map(|(_, v)| match v {
                        ObjectOrReference::Object(obj) => obj.value.clone(),
                        _ => None,
                    })
                }
                None => None,
            };
            (
                media_type.clone(),
                MediaContent {
                    schema: media.schema.as_ref().map(convert_schema),
                    example,
                },
            )
        })
        .collect()
}

fn extract_request_body(
    operation: &oas3::spec::Operation,
) -> Option<RequestBodySpec> {
    operation.request_body.as_ref().and_then(|r| match r {
        ObjectOrReference::Object(body) => Some(RequestBodySpec {
            required: body.required.unwrap_or(false),
            content: convert_content(&body.content),
        }),
        _ => None,
    })
}

/// Extract the status → response mapping, keeping `default` entries the
/// contract declares alongside concrete codes.
fn extract_responses(operation: &oas3::spec::Operation) -> Vec<(StatusKey, ResponseDefinition)> {
    let mut out = Vec::new();
    if let Some(responses) = operation.responses.as_ref() {
        for (status_str, resp_ref) in responses {
            let key = if status_str.eq_ignore_ascii_case("default") {
                StatusKey::Default
            } else {
                match status_str.parse::<u16>() {
                    Ok(code) => StatusKey::Code(code),
                    Err(_) => {
                        warn!(status = %status_str, "skipping unparseable response status");
                        continue;
                    }
                }
            };
            if let ObjectOrReference::Object(resp) = resp_ref {
                out.push((
                    key,
                    ResponseDefinition {
                        description: resp.description.clone().unwrap_or_default(),
                        content: convert_content(&resp.content),
                    },
                ));
            }
        }
    }
    out
}

/// Build a [`SpecificationDocument`] from an already parsed contract.
///
/// Operations missing responses are kept (the selector reports
/// `NoResponseDefined` for them); only structurally duplicate
/// (path, method) pairs are dropped, first declaration wins.
pub fn build_document(spec: &OpenApiV3Spec) -> anyhow::Result<SpecificationDocument> {
    let title = spec.info.title.clone();
    let version = spec.info.version.clone();
    let slug = slugify(&title);
    if slug.is_empty() {
        anyhow::bail!("contract has an empty or non-alphanumeric title");
    }

    let schemas = Arc::new(build_schema_index(spec));

    let mut paths = Vec::new();
    if let Some(paths_map) = spec.paths.as_ref() {
        for (pattern, item) in paths_map {
            let mut operations: Vec<(http::Method, Arc<Operation>)> = Vec::new();
            for (method, op) in item.methods() {
                if operations.iter().any(|(m, _)| *m == method) {
                    warn!(path = %pattern, method = %method, "duplicate operation ignored");
                    continue;
                }

                let mut parameters = extract_parameters(spec, &item.parameters);
                parameters.extend(extract_parameters(spec, &op.parameters));

                operations.push((
                    method.clone(),
                    Arc::new(Operation {
                        id: op.operation_id.clone(),
                        summary: op.summary.clone(),
                        parameters,
                        request_body: extract_request_body(op),
                        responses: extract_responses(op),
                    }),
                ));
            }
            if !operations.is_empty() {
                paths.push(PathItem {
                    pattern: pattern.clone(),
                    operations,
                });
            }
        }
    }

    debug!(
        title = %title,
        paths = paths.len(),
        schemas = schemas.len(),
        "built specification document"
    );

    Ok(SpecificationDocument {
        title,
        version,
        slug,
        paths,
        schemas,
    })
}
