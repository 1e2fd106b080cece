use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, DoctorSearchQuery, UpdateDoctorRequest};
use crate::services::DoctorDirectory;

#[axum::debug_handler]
pub async fn create_doctor(
    State(directory): State<DoctorDirectory>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory.create(request).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(directory): State<DoctorDirectory>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory.get(id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(directory): State<DoctorDirectory>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory.update(id, request).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn search_doctors(
    State(directory): State<DoctorDirectory>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let doctors = directory.search(query).await;
    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}
