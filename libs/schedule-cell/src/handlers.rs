use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::{AppError, ValidationErrors};

use crate::calendar;
use crate::models::{BulkCreateRequest, CreateSlotRequest, SingleDayBulkRequest, UpdateSlotRequest};
use crate::services::SlotStore;

fn parse_date_param(raw: &str) -> Result<chrono::NaiveDate, AppError> {
    calendar::parse_date_key(raw).ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add("date", "must be a valid YYYY-MM-DD date");
        AppError::Validation(errors)
    })
}

#[axum::debug_handler]
pub async fn get_month_view(
    State(store): State<SlotStore>,
    Path((doctor_id, year, month0)): Path<(Uuid, i32, i32)>,
) -> Result<Json<Value>, AppError> {
    let view = store.month_view(doctor_id, year, month0).await;
    Ok(Json(json!(view)))
}

#[axum::debug_handler]
pub async fn get_day_view(
    State(store): State<SlotStore>,
    Path((doctor_id, date)): Path<(Uuid, String)>,
) -> Result<Json<Value>, AppError> {
    let date = parse_date_param(&date)?;
    let view = store.day_view(doctor_id, date).await;
    Ok(Json(json!(view)))
}

#[axum::debug_handler]
pub async fn create_slot(
    State(store): State<SlotStore>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let new_slot = request.validate()?;
    let slot = store.create(new_slot, request.on_duplicate).await?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn bulk_create_slots(
    State(store): State<SlotStore>,
    Json(request): Json<BulkCreateRequest>,
) -> Result<Json<Value>, AppError> {
    let plan = request.validate()?;
    let slots = store.bulk_create(plan).await?;
    Ok(Json(json!({
        "created": slots.len(),
        "slots": slots
    })))
}

#[axum::debug_handler]
pub async fn bulk_create_day_slots(
    State(store): State<SlotStore>,
    Json(request): Json<SingleDayBulkRequest>,
) -> Result<Json<Value>, AppError> {
    let plan = request.validate()?;
    let slots = store.bulk_create_day(plan).await?;
    Ok(Json(json!({
        "created": slots.len(),
        "slots": slots
    })))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(store): State<SlotStore>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let changes = request.validate()?;
    let slot = store.update(id, changes).await?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn block_slot(
    State(store): State<SlotStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let slot = store.block(id).await?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn unblock_slot(
    State(store): State<SlotStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let slot = store.unblock(id).await?;
    Ok(Json(json!(slot)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteSlotQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(store): State<SlotStore>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteSlotQuery>,
) -> Result<Json<Value>, AppError> {
    if !query.confirm {
        return Err(AppError::Conflict(
            "Deleting a slot cannot be undone; retry with confirm=true".to_string(),
        ));
    }

    let slot = store.delete(id).await?;
    Ok(Json(json!({
        "deleted": true,
        "slot": slot
    })))
}
