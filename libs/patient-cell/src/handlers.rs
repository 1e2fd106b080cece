use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientSearchQuery, UpdatePatientRequest};
use crate::services::PatientDirectory;

#[axum::debug_handler]
pub async fn create_patient(
    State(directory): State<PatientDirectory>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = directory.create(request).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(directory): State<PatientDirectory>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let patient = directory.get(id).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(directory): State<PatientDirectory>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = directory.update(id, request).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn search_patients(
    State(directory): State<PatientDirectory>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let patients = directory.search(query).await;
    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}
