use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::services::AppointmentService;

pub fn appointment_routes(service: AppointmentService) -> Router {
    Router::new()
        .route("/", get(list_appointments))
        .route("/book", post(book_appointment))
        .route("/{id}", get(get_appointment))
        .route("/{id}/cancel", post(cancel_appointment))
        .route("/{id}/complete", post(complete_appointment))
        .with_state(service)
}
