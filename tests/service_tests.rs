use http::Method;
use specmock::config::GenConfig;
use specmock::generator::MockGenerator;
use specmock::registry::SpecRegistry;
use specmock::service::{error_body, MockRequest, MockService};
use std::sync::Arc;

mod common;

fn pet_store_spec() -> &'static str {
    r##"
openapi: 3.0.3
info:
  title: Pet Store
  version: "1.0.0"
paths:
  /pets:
    get:
      operationId: list_pets
      responses:
        "200":
          description: A page of pets
          content:
            application/json:
              schema:
                type: array
                minItems: 2
                maxItems: 5
                items:
                  $ref: "#/components/schemas/Pet"
    post:
      operationId: add_pet
      responses:
        "201":
          description: Created
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
  /pets/{petId}:
    get:
      operationId: get_pet
      parameters:
        - name: petId
          in: path
          required: true
          schema: { type: string }
      responses:
        "200":
          description: A pet
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
        "404":
          description: Not found
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Error"
components:
  schemas:
    Pet:
      type: object
      required: [id, name, status]
      properties:
        id: { type: integer, minimum: 1 }
        name: { type: string, minLength: 1 }
        status:
          type: string
          enum: [available, pending, sold]
    Error:
      type: object
      required: [code, message]
      properties:
        code: { type: integer }
        message: { type: string }
"##
}

fn service() -> MockService {
    common::init_tracing();
    let doc = specmock::load_document_from_str(pet_store_spec()).expect("fixture loads");
    let registry = Arc::new(SpecRegistry::new());
    registry.install(vec![doc], None);
    MockService::new(registry, MockGenerator::new(GenConfig::default()))
}

fn assert_pet(value: &serde_json::Value) {
    let obj = value.as_object().expect("pet object");
    let id = obj["id"].as_i64().expect("id integer");
    assert!(id >= 1, "id violates minimum: {id}");
    assert!(!obj["name"].as_str().expect("name string").is_empty());
    let status = obj["status"].as_str().expect("status string");
    assert!(
        ["available", "pending", "sold"].contains(&status),
        "status outside enum: {status}"
    );
}

#[test]
fn test_list_pets_array_within_bounds() {
    let service = service();
    for seed in 0..50 {
        let resp = service
            .respond_seeded(&MockRequest::get("/pets"), seed)
            .expect("responds");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, "application/json");
        let items = resp.body.as_array().expect("array body");
        assert!(
            (2..=5).contains(&items.len()),
            "array length {} outside [2, 5]",
            items.len()
        );
        for item in items {
            assert_pet(item);
        }
    }
}

#[test]
fn test_path_parameter_extraction() {
    let service = service();
    let resp = service
        .respond(&MockRequest::get("/pets/123"))
        .expect("responds");
    assert_eq!(
        resp.matched.get_path_param("petId"),
        Some("123"),
        "expected petId=123"
    );
    assert_pet(&resp.body);
}

#[test]
fn test_unknown_path_is_404() {
    let service = service();
    let err = service
        .respond(&MockRequest::get("/unknown-path"))
        .expect_err("no route");
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_wrong_method_is_405_with_allow() {
    let service = service();
    let err = service
        .respond(&MockRequest::new(Method::PUT, "/pets"))
        .expect_err("wrong method");
    assert_eq!(err.status_code(), 405);
    let allow = err.allow().expect("allow set");
    assert!(allow.contains(&Method::GET));
    assert!(allow.contains(&Method::POST));

    let (status, content_type, body) = error_body(&err);
    assert_eq!(status, 405);
    assert_eq!(content_type, "application/json");
    assert_eq!(body["status"], 405);
}

#[test]
fn test_status_override_selects_declared_error() {
    let service = service();
    let mut req = MockRequest::get("/pets/123");
    req.status = Some(404);
    let resp = service.respond_seeded(&req, 1).expect("responds");
    assert_eq!(resp.status, 404);
    let obj = resp.body.as_object().expect("error object");
    assert!(obj.contains_key("code"));
    assert!(obj.contains_key("message"));
}

#[test]
fn test_unknown_spec_selector_is_400() {
    let service = service();
    let mut req = MockRequest::get("/pets");
    req.spec = Some("other".to_string());
    let err = service.respond(&req).expect_err("unknown spec");
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_lowest_2xx_without_override() {
    let service = service();
    let resp = service
        .respond_seeded(&MockRequest::new(Method::POST, "/pets"), 2)
        .expect("responds");
    assert_eq!(resp.status, 201);
    assert_pet(&resp.body);
}

#[test]
fn test_enum_membership_over_many_generations() {
    let service = service();
    for seed in 0..1000 {
        let resp = service
            .respond_seeded(&MockRequest::get("/pets/9"), seed)
            .expect("responds");
        assert_pet(&resp.body);
    }
}

#[test]
fn test_seeded_responses_are_reproducible() {
    let service = service();
    let a = service
        .respond_seeded(&MockRequest::get("/pets"), 77)
        .expect("responds");
    let b = service
        .respond_seeded(&MockRequest::get("/pets"), 77)
        .expect("responds");
    assert_eq!(a.body, b.body);
}

#[test]
fn test_concurrent_requests_all_conformant() {
    let service = service();
    let mut handles = Vec::new();
    for i in 0..100u64 {
        let service = service.clone();
        handles.push(std::thread::spawn(move || {
            let resp = service
                .respond_seeded(&MockRequest::get("/pets"), i)
                .expect("responds");
            assert_eq!(resp.status, 200);
            let items = resp.body.as_array().expect("array body");
            assert!((2..=5).contains(&items.len()));
            for item in items {
                assert_pet(item);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("thread panicked");
    }
}

#[test]
fn test_media_level_example_wins() {
    common::init_tracing();
    let doc = specmock::load_document_from_str(
        r#"
openapi: 3.0.3
info: { title: Examples, version: "1" }
paths:
  /greeting:
    get:
      responses:
        "200":
          description: OK
          content:
            application/json:
              example: { greeting: "hello" }
              schema:
                type: object
                properties:
                  greeting: { type: string }
"#,
    )
    .expect("fixture loads");
    let registry = Arc::new(SpecRegistry::new());
    registry.install(vec![doc], None);
    let service = MockService::new(registry, MockGenerator::new(GenConfig::default()));

    let resp = service
        .respond(&MockRequest::get("/greeting"))
        .expect("responds");
    assert_eq!(resp.body, serde_json::json!({ "greeting": "hello" }));
}

#[test]
fn test_response_without_content_has_null_body() {
    common::init_tracing();
    let doc = specmock::load_document_from_str(
        r#"
openapi: 3.0.3
info: { title: Bare, version: "1" }
paths:
  /ping:
    get:
      responses:
        "204": { description: No content }
"#,
    )
    .expect("fixture loads");
    let registry = Arc::new(SpecRegistry::new());
    registry.install(vec![doc], None);
    let service = MockService::new(registry, MockGenerator::new(GenConfig::default()));

    let resp = service.respond(&MockRequest::get("/ping")).expect("responds");
    assert_eq!(resp.status, 204);
    assert!(resp.body.is_null());
}
