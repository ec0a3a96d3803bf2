use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::models::{Appointment, AppointmentDetails, AppointmentStatus};

#[derive(Debug, Default)]
pub struct AppointmentStore {
    appointments: Mutex<HashMap<String, Appointment>>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, time: &str) -> Appointment {
        let appointment = Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            time: time.to_string(),
            status: AppointmentStatus::Confirmed,
            details: AppointmentDetails::default(),
            created_at: Utc::now(),
        };
        self.lock()
            .insert(appointment.id.clone(), appointment.clone());

        tracing::info!(
            appointment_id = %appointment.id,
            time = %appointment.time,
            status = appointment.status.as_str(),
            "appointment created"
        );
        appointment
    }

    pub fn get(&self, id: &str) -> Option<Appointment> {
        self.lock().get(id).cloned()
    }

    pub fn record_symptoms(&self, id: &str, symptoms: &str) -> bool {
        self.update_details(id, |details| details.symptoms = Some(symptoms.to_string()))
    }

    pub fn record_history(&self, id: &str, history: &str) -> bool {
        self.update_details(id, |details| details.history = Some(history.to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update_details(&self, id: &str, f: impl FnOnce(&mut AppointmentDetails)) -> bool {
        match self.lock().get_mut(id) {
            Some(appointment) => {
                f(&mut appointment.details);
                true
            }
            None => {
                tracing::debug!(appointment_id = id, "no appointment to update");
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Appointment>> {
        self.appointments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
