use anyhow::Result;
use chrono::{NaiveTime, Utc};
use tracing::info;

use doctor_cell::models::CreateDoctorRequest;
use patient_cell::models::CreatePatientRequest;
use schedule_cell::models::{DayBulkPlan, SlotOccupant};

use crate::router::CellStores;

/// Populate the in-memory stores with a small demo schedule so the API
/// is explorable right after startup.
pub async fn seed_demo_data(stores: &CellStores) -> Result<()> {
    let sarah = stores
        .doctors
        .create(CreateDoctorRequest {
            name: "Dr. Sarah Johnson".to_string(),
            specialty: "Cardiology".to_string(),
            phone: Some("+1 (555) 222-1111".to_string()),
            email: Some("sarah.johnson@clinic.example".to_string()),
        })
        .await?;
    stores
        .doctors
        .create(CreateDoctorRequest {
            name: "Dr. Michael Chen".to_string(),
            specialty: "Dermatology".to_string(),
            phone: Some("+1 (555) 222-2222".to_string()),
            email: None,
        })
        .await?;
    stores
        .doctors
        .create(CreateDoctorRequest {
            name: "Dr. Emily Rodriguez".to_string(),
            specialty: "Pediatrics".to_string(),
            phone: None,
            email: None,
        })
        .await?;

    stores
        .patients
        .create(CreatePatientRequest {
            name: "John Smith".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            email: Some("john.smith@example.com".to_string()),
            date_of_birth: None,
        })
        .await?;

    let today = Utc::now().date_naive();
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();

    let slots = stores
        .slots
        .bulk_create_day(DayBulkPlan {
            doctor_id: sarah.id,
            date: today,
            start_time: nine,
            end_time: noon,
            slot_duration_minutes: 30,
            break_minutes: 0,
            on_duplicate: None,
        })
        .await?;

    if let Some(first) = slots.first() {
        stores
            .appointments
            .book(
                first.id,
                SlotOccupant {
                    name: "John Smith".to_string(),
                    phone: "+1 (555) 123-4567".to_string(),
                    reason: "Regular checkup".to_string(),
                },
            )
            .await?;
    }
    if let Some(last) = slots.last() {
        stores.slots.block(last.id).await?;
    }

    info!(
        "Seeded demo data: 3 doctors, {} slots for {} on {}",
        slots.len(),
        sarah.name,
        today
    );
    Ok(())
}
