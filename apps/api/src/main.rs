use std::net::SocketAddr;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;
mod seed;

use appointment_cell::services::AppointmentService;
use doctor_cell::services::DoctorDirectory;
use patient_cell::services::PatientDirectory;
use schedule_cell::services::SlotStore;
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Carelink scheduling API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Build the per-cell stores; the appointment service books against
    // the same slot store the schedule routes serve.
    let slots = SlotStore::new(config.duplicate_slot_policy);
    let stores = router::CellStores {
        appointments: AppointmentService::new(slots.clone()),
        slots,
        doctors: DoctorDirectory::new(),
        patients: PatientDirectory::new(),
    };

    let seed_requested = std::env::var("SEED_DEMO_DATA")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if seed_requested {
        seed::seed_demo_data(&stores).await?;
    }

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(stores)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
