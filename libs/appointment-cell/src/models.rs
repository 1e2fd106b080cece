use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schedule_cell::models::SlotOccupant;
use shared_models::error::{AppError, ValidationErrors};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A booking made against a slot. Appointment status lives here, never
/// on the slot itself; the slot only knows whether it is occupied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedAppointment {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "schedule_cell::models::time_hm")]
    pub time: NaiveTime,
    pub duration_minutes: i32,
    pub patient: SlotOccupant,
    pub status: AppointmentStatus,
    pub cancellation_reason: Option<String>,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Upcoming => write!(f, "upcoming"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccupantForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub slot_id: Uuid,
    #[serde(default)]
    pub patient: OccupantForm,
}

impl BookAppointmentRequest {
    pub fn validate(&self) -> Result<SlotOccupant, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.patient.name.trim();
        if name.is_empty() {
            errors.add("patient.name", "is required");
        }
        let phone = self.patient.phone.trim();
        if phone.is_empty() {
            errors.add("patient.phone", "is required");
        }
        let reason = self.patient.reason.trim();
        if reason.is_empty() {
            errors.add("patient.reason", "is required");
        }
        errors.into_result()?;

        Ok(SlotOccupant {
            name: name.to_string(),
            phone: phone.to_string(),
            reason: reason.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    #[serde(default)]
    pub confirm: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentSearchQuery {
    pub doctor_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Slot not found")]
    SlotNotFound,

    #[error("Slot is not open for booking: {0}")]
    SlotNotAvailable(String),

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Cancelling an appointment cannot be undone; retry with confirm=true")]
    ConfirmationRequired,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::SlotNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::SlotNotAvailable(_)
            | AppointmentError::InvalidStatusTransition(_)
            | AppointmentError::ConfirmationRequired => AppError::Conflict(err.to_string()),
            AppointmentError::Validation(errors) => AppError::Validation(errors),
        }
    }
}
