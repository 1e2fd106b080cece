use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::services::DoctorDirectory;

pub fn doctor_routes(directory: DoctorDirectory) -> Router {
    Router::new()
        .route("/", post(create_doctor))
        .route("/", get(search_doctors))
        .route("/{id}", get(get_doctor))
        .route("/{id}", put(update_doctor))
        .with_state(directory)
}
