use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use patient_cell::router::patient_routes;
use patient_cell::services::PatientDirectory;

fn test_app() -> Router {
    patient_routes(PatientDirectory::new())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn create_update_and_fetch_a_patient() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/",
            json!({
                "name": "John Smith",
                "phone": "+1 (555) 123-4567",
                "date_of_birth": "1985-06-02"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let patient = read_json(response).await;
    let id = patient["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", id))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "john.smith@example.com" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let fetched = read_json(response).await;
    assert_eq!(fetched["email"], "john.smith@example.com");
    assert_eq!(fetched["date_of_birth"], "1985-06-02");
}

#[tokio::test]
async fn missing_contact_details_are_rejected() {
    let app = test_app();

    let response = app
        .oneshot(post_json("/", json!({ "name": "", "phone": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json(response).await;
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("phone"));
}

#[tokio::test]
async fn search_matches_name_or_phone() {
    let app = test_app();

    for (name, phone) in [
        ("John Smith", "+1 (555) 123-4567"),
        ("Sarah Johnson", "+1 (555) 987-6543"),
    ] {
        app.clone()
            .oneshot(post_json("/", json!({ "name": name, "phone": phone })))
            .await
            .unwrap();
    }

    let request = Request::builder()
        .method("GET")
        .uri("/?q=john")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let body = read_json(response).await;
    // "john" hits both John Smith and Sarah Johnson.
    assert_eq!(body["total"], 2);

    let request = Request::builder()
        .method("GET")
        .uri("/?q=987")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["patients"][0]["name"], "Sarah Johnson");
}
