use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    CreateDoctorRequest, Doctor, DoctorError, DoctorSearchQuery, UpdateDoctorRequest,
};

/// Flat in-memory doctor directory. Nothing here enforces referential
/// integrity toward the schedule: a slot's doctor id is taken at face
/// value, as the booking surfaces do.
#[derive(Clone)]
pub struct DoctorDirectory {
    doctors: Arc<RwLock<Vec<Doctor>>>,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self {
            doctors: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn create(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        request.validate()?;

        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            specialty: request.specialty.trim().to_string(),
            phone: request.phone,
            email: request.email,
            is_active: true,
            created_at: Utc::now(),
        };

        self.doctors.write().await.push(doctor.clone());
        info!("Doctor {} ({}) registered", doctor.name, doctor.id);
        Ok(doctor)
    }

    pub async fn get(&self, id: Uuid) -> Result<Doctor, DoctorError> {
        let guard = self.doctors.read().await;
        guard
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(DoctorError::NotFound)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        let mut guard = self.doctors.write().await;
        let doctor = guard
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(DoctorError::NotFound)?;

        if let Some(name) = request.name {
            doctor.name = name;
        }
        if let Some(specialty) = request.specialty {
            doctor.specialty = specialty;
        }
        if let Some(phone) = request.phone {
            doctor.phone = Some(phone);
        }
        if let Some(email) = request.email {
            doctor.email = Some(email);
        }
        if let Some(is_active) = request.is_active {
            doctor.is_active = is_active;
        }

        debug!("Doctor {} updated", doctor.id);
        Ok(doctor.clone())
    }

    pub async fn search(&self, query: DoctorSearchQuery) -> Vec<Doctor> {
        let guard = self.doctors.read().await;
        let specialty = query.specialty.as_deref().map(str::to_lowercase);

        let mut doctors: Vec<Doctor> = guard
            .iter()
            .filter(|d| {
                specialty
                    .as_deref()
                    .map_or(true, |s| d.specialty.to_lowercase().contains(s))
            })
            .filter(|d| !query.active_only.unwrap_or(false) || d.is_active)
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        doctors
    }
}

impl Default for DoctorDirectory {
    fn default() -> Self {
        Self::new()
    }
}
