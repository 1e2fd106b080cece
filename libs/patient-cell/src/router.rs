use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::services::PatientDirectory;

pub fn patient_routes(directory: PatientDirectory) -> Router {
    Router::new()
        .route("/", post(create_patient))
        .route("/", get(search_patients))
        .route("/{id}", get(get_patient))
        .route("/{id}", put(update_patient))
        .with_state(directory)
}
