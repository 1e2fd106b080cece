use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_config::DuplicateSlotPolicy;
use shared_models::error::{AppError, ValidationErrors};

use crate::calendar;

// ==============================================================================
// CORE SLOT MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Blocked,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Available => write!(f, "available"),
            SlotStatus::Booked => write!(f, "booked"),
            SlotStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// Who holds a booked slot. Deliberately not a foreign key into the
/// patient directory; the occupant is a point-in-time copy of contact
/// details, matching how bookings arrive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotOccupant {
    pub name: String,
    pub phone: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub duration_minutes: i32,
    pub status: SlotStatus,
    pub patient: Option<SlotOccupant>,
    pub notes: String,
}

impl Slot {
    /// End time is always derived, never stored.
    pub fn end_time(&self) -> NaiveTime {
        self.time + chrono::Duration::minutes(self.duration_minutes as i64)
    }

    /// A slot holds an occupant iff it is booked.
    pub fn occupancy_consistent(&self) -> bool {
        (self.status == SlotStatus::Booked) == self.patient.is_some()
    }
}

/// `HH:MM` on the wire, matching the canonical time key.
pub mod time_hm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&crate::calendar::time_key(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::calendar::parse_time_key(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid HH:MM time: {}", raw)))
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

fn default_slot_duration() -> i32 {
    30
}

fn default_start_time() -> String {
    "09:00".to_string()
}

fn default_end_time() -> String {
    "17:00".to_string()
}

fn default_weekdays() -> Vec<u8> {
    vec![1, 2, 3, 4, 5] // Mon-Fri
}

/// Date and time arrive as strings so malformed input maps to a
/// field-level message instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub doctor_id: Uuid,
    pub date: String,
    pub time: String,
    #[serde(default = "default_slot_duration")]
    pub duration_minutes: i32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub on_duplicate: Option<DuplicateSlotPolicy>,
}

/// A validated single-slot insert.
#[derive(Debug, Clone)]
pub struct NewSlot {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i32,
    pub notes: String,
}

impl CreateSlotRequest {
    pub fn validate(&self) -> Result<NewSlot, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let date = calendar::parse_date_key(&self.date);
        if date.is_none() {
            errors.add("date", "must be a valid YYYY-MM-DD date");
        }
        let time = calendar::parse_time_key(&self.time);
        if time.is_none() {
            errors.add("time", "must be a valid HH:MM time");
        }
        if self.duration_minutes <= 0 {
            errors.add("duration_minutes", "must be a positive number of minutes");
        }
        errors.into_result()?;

        Ok(NewSlot {
            doctor_id: self.doctor_id,
            date: date.unwrap_or_default(),
            time: time.unwrap_or_default(),
            duration_minutes: self.duration_minutes,
            notes: self.notes.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

/// Validated field updates. Status and occupant are never editable here.
#[derive(Debug, Clone, Default)]
pub struct SlotChanges {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

impl UpdateSlotRequest {
    pub fn validate(&self) -> Result<SlotChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut changes = SlotChanges::default();

        if let Some(raw) = &self.date {
            match calendar::parse_date_key(raw) {
                Some(date) => changes.date = Some(date),
                None => errors.add("date", "must be a valid YYYY-MM-DD date"),
            }
        }
        if let Some(raw) = &self.time {
            match calendar::parse_time_key(raw) {
                Some(time) => changes.time = Some(time),
                None => errors.add("time", "must be a valid HH:MM time"),
            }
        }
        if let Some(duration) = self.duration_minutes {
            if duration <= 0 {
                errors.add("duration_minutes", "must be a positive number of minutes");
            } else {
                changes.duration_minutes = Some(duration);
            }
        }
        changes.notes = self.notes.clone();

        errors.into_result()?;
        Ok(changes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateRequest {
    pub doctor_id: Uuid,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: i32,
    #[serde(default)]
    pub break_minutes: i32,
    /// ISO weekday numbers, 1 = Monday .. 7 = Sunday.
    #[serde(default = "default_weekdays")]
    pub weekdays: Vec<u8>,
    #[serde(default)]
    pub on_duplicate: Option<DuplicateSlotPolicy>,
}

#[derive(Debug, Clone)]
pub struct BulkPlan {
    pub doctor_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub break_minutes: i32,
    pub weekdays: BTreeSet<u8>,
    pub on_duplicate: Option<DuplicateSlotPolicy>,
}

impl BulkCreateRequest {
    pub fn validate(&self) -> Result<BulkPlan, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let start_date = calendar::parse_date_key(&self.start_date);
        if start_date.is_none() {
            errors.add("start_date", "must be a valid YYYY-MM-DD date");
        }
        let end_date = calendar::parse_date_key(&self.end_date);
        if end_date.is_none() {
            errors.add("end_date", "must be a valid YYYY-MM-DD date");
        }
        let (start_time, end_time) = validate_time_window(
            &self.start_time,
            &self.end_time,
            self.slot_duration_minutes,
            self.break_minutes,
            &mut errors,
        );
        if self.weekdays.iter().any(|d| !(1..=7).contains(d)) {
            errors.add("weekdays", "must contain only 1 (Monday) through 7 (Sunday)");
        }
        errors.into_result()?;

        Ok(BulkPlan {
            doctor_id: self.doctor_id,
            start_date: start_date.unwrap_or_default(),
            end_date: end_date.unwrap_or_default(),
            start_time: start_time.unwrap_or_default(),
            end_time: end_time.unwrap_or_default(),
            slot_duration_minutes: self.slot_duration_minutes,
            break_minutes: self.break_minutes,
            weekdays: self.weekdays.iter().copied().collect(),
            on_duplicate: self.on_duplicate,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleDayBulkRequest {
    pub doctor_id: Uuid,
    pub date: String,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: i32,
    #[serde(default)]
    pub break_minutes: i32,
    #[serde(default)]
    pub on_duplicate: Option<DuplicateSlotPolicy>,
}

#[derive(Debug, Clone)]
pub struct DayBulkPlan {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub break_minutes: i32,
    pub on_duplicate: Option<DuplicateSlotPolicy>,
}

impl SingleDayBulkRequest {
    pub fn validate(&self) -> Result<DayBulkPlan, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let date = calendar::parse_date_key(&self.date);
        if date.is_none() {
            errors.add("date", "must be a valid YYYY-MM-DD date");
        }
        let (start_time, end_time) = validate_time_window(
            &self.start_time,
            &self.end_time,
            self.slot_duration_minutes,
            self.break_minutes,
            &mut errors,
        );
        errors.into_result()?;

        Ok(DayBulkPlan {
            doctor_id: self.doctor_id,
            date: date.unwrap_or_default(),
            start_time: start_time.unwrap_or_default(),
            end_time: end_time.unwrap_or_default(),
            slot_duration_minutes: self.slot_duration_minutes,
            break_minutes: self.break_minutes,
            on_duplicate: self.on_duplicate,
        })
    }
}

/// Shared checks for the bulk forms. An end time at or before the start
/// time is NOT flagged here: it legitimately generates zero slots.
fn validate_time_window(
    start_raw: &str,
    end_raw: &str,
    slot_duration_minutes: i32,
    break_minutes: i32,
    errors: &mut ValidationErrors,
) -> (Option<NaiveTime>, Option<NaiveTime>) {
    let start = calendar::parse_time_key(start_raw);
    if start.is_none() {
        errors.add("start_time", "must be a valid HH:MM time");
    }
    let end = calendar::parse_time_key(end_raw);
    if end.is_none() {
        errors.add("end_time", "must be a valid HH:MM time");
    }
    if slot_duration_minutes <= 0 {
        errors.add("slot_duration_minutes", "must be a positive number of minutes");
    }
    if break_minutes < 0 {
        errors.add("break_minutes", "must be zero or more minutes");
    }
    (start, end)
}

// ==============================================================================
// READ MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayCounts {
    pub total: usize,
    pub available: usize,
    pub booked: usize,
    pub blocked: usize,
}

impl DayCounts {
    pub fn add(&mut self, status: SlotStatus) {
        self.total += 1;
        match status {
            SlotStatus::Available => self.available += 1,
            SlotStatus::Booked => self.booked += 1,
            SlotStatus::Blocked => self.blocked += 1,
        }
    }

    pub fn tally<'a>(slots: impl IntoIterator<Item = &'a Slot>) -> Self {
        let mut counts = Self::default();
        for slot in slots {
            counts.add(slot.status);
        }
        counts
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub counts: DayCounts,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCell {
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<DayCounts>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MonthRef {
    pub year: i32,
    pub month0: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub doctor_id: Uuid,
    pub year: i32,
    pub month0: u32,
    pub prev: MonthRef,
    pub next: MonthRef,
    pub weeks: Vec<Vec<MonthCell>>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Slot not found")]
    SlotNotFound,

    #[error("Booked slots cannot be deleted")]
    SlotBooked,

    #[error("Slot is {status}, cannot {action}")]
    InvalidStatus {
        status: SlotStatus,
        action: &'static str,
    },

    #[error("Slots already exist at: {}", .0.join(", "))]
    DuplicateSlots(Vec<String>),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::SlotNotFound => AppError::NotFound(err.to_string()),
            ScheduleError::SlotBooked
            | ScheduleError::InvalidStatus { .. }
            | ScheduleError::DuplicateSlots(_) => AppError::Conflict(err.to_string()),
            ScheduleError::Validation(errors) => AppError::Validation(errors),
        }
    }
}
