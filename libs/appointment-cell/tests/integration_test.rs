use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::router::appointment_routes;
use appointment_cell::services::AppointmentService;
use schedule_cell::models::{NewSlot, SlotStatus};
use schedule_cell::services::SlotStore;
use shared_config::DuplicateSlotPolicy;

struct TestContext {
    app: Router,
    slots: SlotStore,
    service: AppointmentService,
}

fn test_context() -> TestContext {
    let slots = SlotStore::new(DuplicateSlotPolicy::Allow);
    let service = AppointmentService::new(slots.clone());
    TestContext {
        app: appointment_routes(service.clone()),
        slots,
        service,
    }
}

async fn seed_slot(slots: &SlotStore, doctor_id: Uuid) -> Uuid {
    slots
        .create(
            NewSlot {
                doctor_id,
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                duration_minutes: 30,
                notes: String::new(),
            },
            None,
        )
        .await
        .unwrap()
        .id
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn book_body(slot_id: Uuid) -> Value {
    json!({
        "slot_id": slot_id,
        "patient": {
            "name": "John Smith",
            "phone": "+1 (555) 123-4567",
            "reason": "Regular checkup"
        }
    })
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn booking_marks_the_slot_and_creates_an_upcoming_appointment() {
    let ctx = test_context();
    let doctor_id = Uuid::new_v4();
    let slot_id = seed_slot(&ctx.slots, doctor_id).await;

    let response = ctx
        .app
        .oneshot(post_json("/book", book_body(slot_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let appointment = read_json(response).await;
    assert_eq!(appointment["status"], "upcoming");
    assert_eq!(appointment["date"], "2024-03-15");
    assert_eq!(appointment["time"], "09:00");
    assert_eq!(appointment["patient"]["name"], "John Smith");

    let slot = ctx.slots.get(slot_id).await.unwrap();
    assert_eq!(slot.status, SlotStatus::Booked);
    assert!(slot.occupancy_consistent());
}

#[tokio::test]
async fn double_booking_is_rejected() {
    let ctx = test_context();
    let slot_id = seed_slot(&ctx.slots, Uuid::new_v4()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(post_json("/book", book_body(slot_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .oneshot(post_json("/book", book_body(slot_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn booking_requires_patient_details() {
    let ctx = test_context();
    let slot_id = seed_slot(&ctx.slots, Uuid::new_v4()).await;

    let response = ctx
        .app
        .oneshot(post_json(
            "/book",
            json!({
                "slot_id": slot_id,
                "patient": { "name": "  ", "phone": "", "reason": "" }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json(response).await;
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("patient.name"));
    assert!(fields.contains_key("patient.phone"));
    assert!(fields.contains_key("patient.reason"));

    // The slot is untouched by the rejected booking.
    let slot = ctx.slots.get(slot_id).await.unwrap();
    assert_eq!(slot.status, SlotStatus::Available);
}

#[tokio::test]
async fn cancelling_requires_confirmation_then_frees_the_slot() {
    let ctx = test_context();
    let slot_id = seed_slot(&ctx.slots, Uuid::new_v4()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(post_json("/book", book_body(slot_id)))
        .await
        .unwrap();
    let appointment_id = read_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(post_json(
            &format!("/{}/cancel", appointment_id),
            json!({ "confirm": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .app
        .oneshot(post_json(
            &format!("/{}/cancel", appointment_id),
            json!({ "confirm": true, "reason": "Feeling better" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let appointment = read_json(response).await;
    assert_eq!(appointment["status"], "cancelled");
    assert_eq!(appointment["cancellation_reason"], "Feeling better");

    let slot = ctx.slots.get(slot_id).await.unwrap();
    assert_eq!(slot.status, SlotStatus::Available);
    assert_eq!(slot.patient, None);
}

#[tokio::test]
async fn completed_appointments_keep_the_slot_booked() {
    let ctx = test_context();
    let slot_id = seed_slot(&ctx.slots, Uuid::new_v4()).await;

    let appointment = ctx
        .service
        .book(
            slot_id,
            schedule_cell::models::SlotOccupant {
                name: "Sarah Johnson".to_string(),
                phone: "+1 (555) 987-6543".to_string(),
                reason: "Follow-up consultation".to_string(),
            },
        )
        .await
        .unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(post_json(&format!("/{}/complete", appointment.id), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "completed");

    let slot = ctx.slots.get(slot_id).await.unwrap();
    assert_eq!(slot.status, SlotStatus::Booked);

    // Terminal states stay terminal.
    let response = ctx
        .app
        .oneshot(post_json(
            &format!("/{}/cancel", appointment.id),
            json!({ "confirm": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn listing_filters_by_doctor_and_status() {
    let ctx = test_context();
    let doctor_a = Uuid::new_v4();
    let doctor_b = Uuid::new_v4();

    let slot_a = seed_slot(&ctx.slots, doctor_a).await;
    let slot_b = seed_slot(&ctx.slots, doctor_b).await;

    ctx.app
        .clone()
        .oneshot(post_json("/book", book_body(slot_a)))
        .await
        .unwrap();
    let response = ctx
        .app
        .clone()
        .oneshot(post_json("/book", book_body(slot_b)))
        .await
        .unwrap();
    let appointment_b = read_json(response).await["id"].as_str().unwrap().to_string();
    ctx.service
        .cancel(appointment_b.parse().unwrap(), true, None)
        .await
        .unwrap();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/?doctor_id={}", doctor_a))
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["appointments"][0]["doctor_id"], doctor_a.to_string());

    let request = Request::builder()
        .method("GET")
        .uri("/?status=cancelled")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.oneshot(request).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["appointments"][0]["status"], "cancelled");
}

#[tokio::test]
async fn unknown_appointments_are_not_found() {
    let ctx = test_context();

    let response = ctx
        .app
        .oneshot(post_json(
            &format!("/{}/complete", Uuid::new_v4()),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
