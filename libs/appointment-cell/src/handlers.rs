use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{AppointmentSearchQuery, BookAppointmentRequest, CancelAppointmentRequest};
use crate::services::AppointmentService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(service): State<AppointmentService>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let occupant = request.validate()?;
    let appointment = service.book(request.slot_id, occupant).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(service): State<AppointmentService>,
    Query(query): Query<AppointmentSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = service.list(query).await;
    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(service): State<AppointmentService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.get(id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(service): State<AppointmentService>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.cancel(id, request.confirm, request.reason).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(service): State<AppointmentService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.complete(id).await?;
    Ok(Json(json!(appointment)))
}
