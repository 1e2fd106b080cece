use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    CreatePatientRequest, Patient, PatientError, PatientSearchQuery, UpdatePatientRequest,
};

#[derive(Clone)]
pub struct PatientDirectory {
    patients: Arc<RwLock<Vec<Patient>>>,
}

impl PatientDirectory {
    pub fn new() -> Self {
        Self {
            patients: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        request.validate()?;

        let patient = Patient {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            email: request.email,
            date_of_birth: request.date_of_birth,
            created_at: Utc::now(),
        };

        self.patients.write().await.push(patient.clone());
        info!("Patient {} registered", patient.id);
        Ok(patient)
    }

    pub async fn get(&self, id: Uuid) -> Result<Patient, PatientError> {
        let guard = self.patients.read().await;
        guard
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(PatientError::NotFound)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        let mut guard = self.patients.write().await;
        let patient = guard
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PatientError::NotFound)?;

        if let Some(name) = request.name {
            patient.name = name;
        }
        if let Some(phone) = request.phone {
            patient.phone = phone;
        }
        if let Some(email) = request.email {
            patient.email = Some(email);
        }
        if let Some(date_of_birth) = request.date_of_birth {
            patient.date_of_birth = Some(date_of_birth);
        }

        debug!("Patient {} updated", patient.id);
        Ok(patient.clone())
    }

    pub async fn search(&self, query: PatientSearchQuery) -> Vec<Patient> {
        let guard = self.patients.read().await;
        let needle = query.q.as_deref().map(str::to_lowercase);

        let mut patients: Vec<Patient> = guard
            .iter()
            .filter(|p| {
                needle.as_deref().map_or(true, |n| {
                    p.name.to_lowercase().contains(n) || p.phone.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();
        patients.sort_by(|a, b| a.name.cmp(&b.name));
        patients
    }
}

impl Default for PatientDirectory {
    fn default() -> Self {
        Self::new()
    }
}
