use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::*;
use crate::services::SlotStore;

pub fn schedule_routes(store: SlotStore) -> Router {
    Router::new()
        .route("/{doctor_id}/month/{year}/{month0}", get(get_month_view))
        .route("/{doctor_id}/day/{date}", get(get_day_view))
        .route("/slots", post(create_slot))
        .route("/slots/bulk", post(bulk_create_slots))
        .route("/slots/bulk/day", post(bulk_create_day_slots))
        .route("/slots/{id}", put(update_slot))
        .route("/slots/{id}", delete(delete_slot))
        .route("/slots/{id}/block", post(block_slot))
        .route("/slots/{id}/unblock", post(unblock_slot))
        .with_state(store)
}
