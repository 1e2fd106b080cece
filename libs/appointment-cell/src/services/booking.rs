use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use schedule_cell::models::{ScheduleError, SlotOccupant};
use schedule_cell::services::SlotStore;

use crate::models::{
    AppointmentError, AppointmentSearchQuery, AppointmentStatus, BookedAppointment,
};
use crate::services::lifecycle::AppointmentLifecycleService;

fn map_slot_error(err: ScheduleError) -> AppointmentError {
    match err {
        ScheduleError::SlotNotFound => AppointmentError::SlotNotFound,
        ScheduleError::InvalidStatus { status, .. } => {
            AppointmentError::SlotNotAvailable(status.to_string())
        }
        other => AppointmentError::SlotNotAvailable(other.to_string()),
    }
}

/// Books patients into slots and walks the resulting appointments through
/// their lifecycle. Holds the slot store it books against, so the slot
/// occupancy invariant is maintained in one place.
#[derive(Clone)]
pub struct AppointmentService {
    slots: SlotStore,
    appointments: Arc<RwLock<Vec<BookedAppointment>>>,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentService {
    pub fn new(slots: SlotStore) -> Self {
        Self {
            slots,
            appointments: Arc::new(RwLock::new(Vec::new())),
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Book an available slot. The occupant is copied onto both the slot
    /// and the appointment record.
    pub async fn book(
        &self,
        slot_id: Uuid,
        occupant: SlotOccupant,
    ) -> Result<BookedAppointment, AppointmentError> {
        let slot = self
            .slots
            .book(slot_id, occupant.clone())
            .await
            .map_err(map_slot_error)?;

        let appointment = BookedAppointment {
            id: Uuid::new_v4(),
            slot_id: slot.id,
            doctor_id: slot.doctor_id,
            date: slot.date,
            time: slot.time,
            duration_minutes: slot.duration_minutes,
            patient: occupant,
            status: AppointmentStatus::Upcoming,
            cancellation_reason: None,
            booked_at: Utc::now(),
        };

        self.appointments.write().await.push(appointment.clone());
        info!(
            "Appointment {} booked for doctor {} on {}",
            appointment.id, appointment.doctor_id, appointment.date
        );
        Ok(appointment)
    }

    /// Cancel an upcoming appointment and return its slot to availability.
    pub async fn cancel(
        &self,
        id: Uuid,
        confirm: bool,
        reason: Option<String>,
    ) -> Result<BookedAppointment, AppointmentError> {
        if !confirm {
            return Err(AppointmentError::ConfirmationRequired);
        }

        let appointment = {
            let mut guard = self.appointments.write().await;
            let appointment = guard
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or(AppointmentError::NotFound)?;

            self.lifecycle
                .validate_transition(appointment.status, AppointmentStatus::Cancelled)?;
            appointment.status = AppointmentStatus::Cancelled;
            appointment.cancellation_reason = reason;
            appointment.clone()
        };

        if let Err(err) = self.slots.release(appointment.slot_id).await {
            warn!(
                "Slot {} not released after cancelling appointment {}: {}",
                appointment.slot_id, appointment.id, err
            );
        }

        info!("Appointment {} cancelled", appointment.id);
        Ok(appointment)
    }

    /// Mark an upcoming appointment as completed. The slot keeps its
    /// booked status as history.
    pub async fn complete(&self, id: Uuid) -> Result<BookedAppointment, AppointmentError> {
        let mut guard = self.appointments.write().await;
        let appointment = guard
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppointmentError::NotFound)?;

        self.lifecycle
            .validate_transition(appointment.status, AppointmentStatus::Completed)?;
        appointment.status = AppointmentStatus::Completed;

        info!("Appointment {} completed", appointment.id);
        Ok(appointment.clone())
    }

    pub async fn get(&self, id: Uuid) -> Result<BookedAppointment, AppointmentError> {
        let guard = self.appointments.read().await;
        guard
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn list(&self, query: AppointmentSearchQuery) -> Vec<BookedAppointment> {
        let guard = self.appointments.read().await;
        let mut appointments: Vec<BookedAppointment> = guard
            .iter()
            .filter(|a| query.doctor_id.map_or(true, |d| a.doctor_id == d))
            .filter(|a| query.status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
        appointments
    }
}
