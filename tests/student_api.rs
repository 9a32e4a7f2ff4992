//! End-to-end request/response tests for the student API against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use student_records::store::StoreResult;
use student_records::{
    app, AppState, MemoryStudentStore, Student, StudentFields, StudentProjection, StudentStore,
};
use tower::ServiceExt;
use uuid::Uuid;

// == Helpers ==

fn test_app() -> (Arc<MemoryStudentStore>, Router) {
    let store = Arc::new(MemoryStudentStore::new());
    let router = app(AppState::new(store.clone()));
    (store, router)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn ada() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@x.com",
        "classEnrolled": "CS101"
    })
}

async fn create_ada(app: &Router) -> String {
    let response = send(app, Method::POST, "/students", Some(ada())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

// == Health ==

#[tokio::test]
async fn health_returns_success_string() {
    let (_, app) = test_app();
    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!("Success"));
}

#[tokio::test]
async fn ready_reports_store_state() {
    let (store, app) = test_app();
    let response = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    store.set_failing(true);
    let response = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["database"], "unavailable");
}

// == Create ==

#[tokio::test]
async fn create_returns_full_record() {
    let (_, app) = test_app();
    let response = send(&app, Method::POST, "/students", Some(ada())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["firstName"], "Ada");
    assert_eq!(data["lastName"], "Lovelace");
    assert_eq!(data["email"], "ada@x.com");
    assert_eq!(data["classEnrolled"], "CS101");
    assert!(Uuid::parse_str(data["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn create_generates_distinct_ids() {
    let (_, app) = test_app();
    let first = create_ada(&app).await;
    let second = create_ada(&app).await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn create_missing_field_is_rejected_without_write() {
    let (store, app) = test_app();
    for field in ["firstName", "lastName", "email", "classEnrolled"] {
        let mut body = ada();
        body.as_object_mut().unwrap().remove(field);
        let response = send(&app, Method::POST, "/students", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "missing {field}");
        assert_eq!(body_json(response).await["message"], "All fields are required");
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn create_empty_field_is_rejected() {
    let (store, app) = test_app();
    let mut body = ada();
    body["email"] = json!("");
    let response = send(&app, Method::POST, "/students", Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn malformed_json_gets_message_body() {
    let (_, app) = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/students")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (_, app) = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/students")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, student_records::routes::MAX_BODY_BYTES + 1)
        .body(Body::from(vec![b' '; student_records::routes::MAX_BODY_BYTES + 1]))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_json(response).await["message"].is_string());
}

// == List ==

#[tokio::test]
async fn list_empty() {
    let (_, app) = test_app();
    let response = send(&app, Method::GET, "/students", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "data": [] }));
}

#[tokio::test]
async fn list_returns_projection_without_id() {
    let (_, app) = test_app();
    create_ada(&app).await;
    let response = send(&app, Method::GET, "/students", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "data": [ada()] }));
}

// == Read ==

#[tokio::test]
async fn read_round_trips_projection() {
    let (_, app) = test_app();
    let id = create_ada(&app).await;
    let response = send(&app, Method::GET, &format!("/students/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "data": ada() }));
}

#[tokio::test]
async fn read_missing_is_single_404() {
    let (_, app) = test_app();
    let uri = format!("/students/{}", Uuid::new_v4());
    let response = send(&app, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Student with provided id not found" })
    );
}

#[tokio::test]
async fn read_non_uuid_is_404() {
    let (_, app) = test_app();
    let response = send(&app, Method::GET, "/students/abc", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Update ==

#[tokio::test]
async fn update_changes_only_given_fields() {
    let (_, app) = test_app();
    let id = create_ada(&app).await;
    let uri = format!("/students/{id}");

    let response = send(&app, Method::PATCH, &uri, Some(json!({ "input": { "lastName": "X" } }))).await;
    assert_eq!(response.status(), StatusCode::NON_AUTHORITATIVE_INFORMATION);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["id"], id.as_str());
    assert_eq!(data["lastName"], "X");

    let read = body_json(send(&app, Method::GET, &uri, None).await).await;
    assert_eq!(read["data"]["lastName"], "X");
    assert_eq!(read["data"]["firstName"], "Ada");
    assert_eq!(read["data"]["email"], "ada@x.com");
    assert_eq!(read["data"]["classEnrolled"], "CS101");
}

#[tokio::test]
async fn update_with_empty_value_keeps_old_value() {
    let (_, app) = test_app();
    let id = create_ada(&app).await;
    let uri = format!("/students/{id}");
    let response = send(&app, Method::PATCH, &uri, Some(json!({ "input": { "firstName": "" } }))).await;
    assert_eq!(response.status(), StatusCode::NON_AUTHORITATIVE_INFORMATION);
    assert_eq!(body_json(response).await["data"]["firstName"], "Ada");
}

#[tokio::test]
async fn update_missing_student_is_404_without_write() {
    let (store, app) = test_app();
    let uri = format!("/students/{}", Uuid::new_v4());
    let response = send(&app, Method::PATCH, &uri, Some(json!({ "input": { "lastName": "X" } }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Student not found");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn update_without_input_is_bad_request() {
    let (_, app) = test_app();
    let id = create_ada(&app).await;
    let response = send(&app, Method::PATCH, &format!("/students/{id}"), Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "input is required");
}

// == Delete ==

#[tokio::test]
async fn delete_missing_is_404_and_store_unchanged() {
    let (store, app) = test_app();
    create_ada(&app).await;
    let uri = format!("/students/{}", Uuid::new_v4());
    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Student not found");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn delete_existing_then_read_is_404() {
    let (store, app) = test_app();
    let id = create_ada(&app).await;
    let uri = format!("/students/{id}");

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());
    assert!(store.is_empty().await);

    let response = send(&app, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Store failures ==

#[tokio::test]
async fn store_failure_is_500_with_sanitized_message() {
    let (store, app) = test_app();
    store.set_failing(true);

    let response = send(&app, Method::POST, "/students", Some(ada())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "database unavailable");

    let response = send(&app, Method::GET, "/students", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn store_failure_on_single_student_routes_is_500() {
    let (store, app) = test_app();
    let id = create_ada(&app).await;
    let uri = format!("/students/{id}");
    store.set_failing(true);

    let requests = [
        (Method::GET, None),
        (Method::PATCH, Some(json!({ "input": { "lastName": "X" } }))),
        (Method::DELETE, None),
    ];
    for (method, body) in requests {
        let response = send(&app, method.clone(), &uri, body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method}");
        assert_eq!(body_json(response).await["message"], "database unavailable", "{method}");
    }

    store.set_failing(false);
    assert_eq!(store.len().await, 1);
}

// == Row removed between read and write ==

/// Finds rows normally, but reports every write as hitting no row, as if another
/// request deleted the student in between.
struct VanishingStore {
    inner: MemoryStudentStore,
}

#[async_trait]
impl StudentStore for VanishingStore {
    async fn create(&self, fields: StudentFields) -> StoreResult<Student> {
        self.inner.create(fields).await
    }

    async fn find_many(&self) -> StoreResult<Vec<StudentProjection>> {
        self.inner.find_many().await
    }

    async fn find_unique(&self, id: Uuid) -> StoreResult<Option<Student>> {
        self.inner.find_unique(id).await
    }

    async fn find_projection(&self, id: Uuid) -> StoreResult<Option<StudentProjection>> {
        self.inner.find_projection(id).await
    }

    async fn update(&self, _id: Uuid, _fields: StudentFields) -> StoreResult<Option<Student>> {
        Ok(None)
    }

    async fn delete(&self, _id: Uuid) -> StoreResult<bool> {
        Ok(false)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}

fn vanishing_app() -> Router {
    app(AppState::new(Arc::new(VanishingStore {
        inner: MemoryStudentStore::new(),
    })))
}

#[tokio::test]
async fn update_of_row_removed_mid_request_is_404() {
    let app = vanishing_app();
    let id = create_ada(&app).await;
    let uri = format!("/students/{id}");
    let response = send(&app, Method::PATCH, &uri, Some(json!({ "input": { "lastName": "X" } }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Student not found");
}

#[tokio::test]
async fn delete_of_row_removed_mid_request_is_404() {
    let app = vanishing_app();
    let id = create_ada(&app).await;
    let response = send(&app, Method::DELETE, &format!("/students/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Student not found");
}

#[tokio::test]
async fn validation_runs_before_store() {
    let (store, app) = test_app();
    store.set_failing(true);
    let response = send(&app, Method::POST, "/students", Some(json!({ "firstName": "Ada" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == CORS ==

#[tokio::test]
async fn cors_allows_any_origin() {
    let (_, app) = test_app();
    let request = Request::builder()
        .uri("/students")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

// == Full scenario ==

#[tokio::test]
async fn ada_lifecycle() {
    let (_, app) = test_app();

    let created = body_json(send(&app, Method::POST, "/students", Some(ada())).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/students/{id}");

    let listed = body_json(send(&app, Method::GET, "/students", None).await).await;
    assert!(listed["data"].as_array().unwrap().contains(&ada()));

    let response = send(&app, Method::PATCH, &uri, Some(json!({ "input": { "classEnrolled": "CS102" } }))).await;
    assert_eq!(response.status(), StatusCode::NON_AUTHORITATIVE_INFORMATION);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["classEnrolled"], "CS102");
    assert_eq!(updated["data"]["firstName"], "Ada");
    assert_eq!(updated["data"]["lastName"], "Lovelace");
    assert_eq!(updated["data"]["email"], "ada@x.com");

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
