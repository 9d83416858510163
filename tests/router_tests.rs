use http::Method;
use specmock::error::RouteError;
use specmock::router::RouteTable;
use specmock::spec::SpecificationDocument;

mod common;

fn example_spec() -> &'static str {
    r#"
openapi: 3.0.3
info:
  title: Pet Zoo
  version: "1.0.0"
paths:
  "/":
    get:
      operationId: root
      responses:
        "200": { description: OK }
  /pets:
    get:
      operationId: list_pets
      responses:
        "200": { description: OK }
    post:
      operationId: add_pet
      responses:
        "201": { description: Created }
  /pets/mine:
    get:
      operationId: my_pets
      responses:
        "200": { description: OK }
  /pets/{petId}:
    get:
      operationId: get_pet
      responses:
        "200": { description: OK }
    delete:
      operationId: delete_pet
      responses:
        "204": { description: Deleted }
  /users/{userId}/posts/{postId}:
    get:
      operationId: get_user_post
      responses:
        "200": { description: OK }
"#
}

fn table() -> (SpecificationDocument, RouteTable) {
    common::init_tracing();
    let doc = specmock::load_document_from_str(example_spec()).expect("fixture loads");
    let table = RouteTable::new(&doc);
    (doc, table)
}

fn operation_id(table: &RouteTable, method: Method, path: &str) -> String {
    table
        .route(&method, path)
        .unwrap_or_else(|e| panic!("expected match for {method} {path}, got {e}"))
        .operation
        .id
        .clone()
        .expect("operation id")
}

#[test]
fn test_literal_routes_match() {
    let (_, table) = table();
    assert_eq!(operation_id(&table, Method::GET, "/"), "root");
    assert_eq!(operation_id(&table, Method::GET, "/pets"), "list_pets");
    assert_eq!(operation_id(&table, Method::POST, "/pets"), "add_pet");
}

#[test]
fn test_parameter_extraction() {
    let (_, table) = table();
    let m = table.route(&Method::GET, "/pets/123").expect("matches");
    assert_eq!(m.operation.id.as_deref(), Some("get_pet"));
    assert_eq!(m.get_path_param("petId"), Some("123"));
    assert_eq!(m.path_params_map().get("petId").map(String::as_str), Some("123"));
}

#[test]
fn test_multi_parameter_extraction() {
    let (_, table) = table();
    let m = table
        .route(&Method::GET, "/users/42/posts/99")
        .expect("matches");
    assert_eq!(m.get_path_param("userId"), Some("42"));
    assert_eq!(m.get_path_param("postId"), Some("99"));
}

#[test]
fn test_specificity_tie_break_prefers_literal() {
    let (_, table) = table();
    // /pets/mine structurally matches both /pets/mine and /pets/{petId};
    // the literal template must always win.
    for _ in 0..20 {
        assert_eq!(operation_id(&table, Method::GET, "/pets/mine"), "my_pets");
    }
    assert_eq!(operation_id(&table, Method::GET, "/pets/other"), "get_pet");
}

#[test]
fn test_route_determinism() {
    let (_, table) = table();
    let first = table.route(&Method::GET, "/pets/77").expect("matches");
    for _ in 0..100 {
        let m = table.route(&Method::GET, "/pets/77").expect("matches");
        assert_eq!(m.operation.id, first.operation.id);
        assert_eq!(m.path_params_map(), first.path_params_map());
    }
}

#[test]
fn test_not_found() {
    let (_, table) = table();
    let err = table
        .route(&Method::GET, "/unknown-path")
        .expect_err("no match");
    assert!(matches!(err, RouteError::NotFound { .. }));
}

#[test]
fn test_method_not_allowed_carries_allow_set() {
    let (_, table) = table();
    let err = table
        .route(&Method::PUT, "/pets")
        .expect_err("wrong method");
    match err {
        RouteError::MethodNotAllowed { allowed, .. } => {
            assert!(allowed.contains(&Method::GET));
            assert!(allowed.contains(&Method::POST));
            assert_eq!(allowed.len(), 2);
        }
        other => panic!("expected MethodNotAllowed, got {other}"),
    }
}

#[test]
fn test_trailing_slash_is_not_the_same_path() {
    let (_, table) = table();
    assert!(table.route(&Method::GET, "/pets/").is_err());
}

#[test]
fn test_extra_segments_do_not_match() {
    let (_, table) = table();
    assert!(table.route(&Method::GET, "/pets/1/extra").is_err());
}

#[test]
fn test_endpoints_inventory() {
    let (doc, table) = table();
    let endpoints = table.endpoints();
    assert_eq!(endpoints.len(), doc.operation_count());
    assert!(endpoints
        .iter()
        .any(|(m, p)| *m == Method::DELETE && p == "/pets/{petId}"));
}
