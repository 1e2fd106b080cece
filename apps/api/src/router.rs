use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::AppointmentService;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::DoctorDirectory;
use patient_cell::router::patient_routes;
use patient_cell::services::PatientDirectory;
use schedule_cell::router::schedule_routes;
use schedule_cell::services::SlotStore;

/// The per-cell stores the routers are built over. The appointment
/// service shares the slot store so bookings and the calendar agree.
#[derive(Clone)]
pub struct CellStores {
    pub slots: SlotStore,
    pub appointments: AppointmentService,
    pub doctors: DoctorDirectory,
    pub patients: PatientDirectory,
}

pub fn create_router(stores: CellStores) -> Router {
    Router::new()
        .route("/", get(|| async { "Carelink Scheduling API is running!" }))
        .nest("/doctors", doctor_routes(stores.doctors))
        .nest("/patients", patient_routes(stores.patients))
        .nest("/schedule", schedule_routes(stores.slots))
        .nest("/appointments", appointment_routes(stores.appointments))
}
