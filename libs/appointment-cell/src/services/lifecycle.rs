use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Appointment status machine. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn valid_transitions(&self, current: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Upcoming => {
                vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }

    pub fn validate_transition(
        &self,
        current: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating appointment transition {} -> {}", current, next);

        if !self.valid_transitions(current).contains(&next) {
            warn!("Invalid appointment transition attempted: {} -> {}", current, next);
            return Err(AppointmentError::InvalidStatusTransition(current));
        }

        Ok(())
    }
}
