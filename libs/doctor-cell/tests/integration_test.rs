use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use doctor_cell::router::doctor_routes;
use doctor_cell::services::DoctorDirectory;

fn test_app() -> (Router, DoctorDirectory) {
    let directory = DoctorDirectory::new();
    (doctor_routes(directory.clone()), directory)
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
async fn create_and_fetch_a_doctor() {
    let (app, _directory) = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/",
            json!({
                "name": "Dr. Sarah Johnson",
                "specialty": "Cardiology",
                "phone": "+1 (555) 222-1111"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let doctor = read_json(response).await;
    assert_eq!(doctor["name"], "Dr. Sarah Johnson");
    assert_eq!(doctor["is_active"], true);

    let id = doctor["id"].as_str().unwrap();
    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["specialty"], "Cardiology");
}

#[tokio::test]
async fn blank_names_are_rejected_field_by_field() {
    let (app, _directory) = test_app();

    let response = app
        .oneshot(post_json("/", json!({ "name": " ", "specialty": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json(response).await;
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("specialty"));
}

#[tokio::test]
async fn search_filters_by_specialty_and_activity() {
    let (app, directory) = test_app();

    for (name, specialty) in [
        ("Dr. Sarah Johnson", "Cardiology"),
        ("Dr. Michael Chen", "Dermatology"),
        ("Dr. Emily Rodriguez", "Pediatric Cardiology"),
    ] {
        app.clone()
            .oneshot(post_json(
                "/",
                json!({ "name": name, "specialty": specialty }),
            ))
            .await
            .unwrap();
    }

    let inactive = directory
        .search(Default::default())
        .await
        .into_iter()
        .find(|d| d.name == "Dr. Emily Rodriguez")
        .unwrap();
    directory
        .update(
            inactive.id,
            doctor_cell::models::UpdateDoctorRequest {
                name: None,
                specialty: None,
                phone: None,
                email: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/?specialty=cardiology")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["total"], 2);

    let request = Request::builder()
        .method("GET")
        .uri("/?specialty=cardiology&active_only=true")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["doctors"][0]["name"], "Dr. Sarah Johnson");
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let (app, _directory) = test_app();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
