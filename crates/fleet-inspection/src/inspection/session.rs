use super::domain::{InspectionError, ServicePoint};
use super::sanitize;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Identifying fields shared by every checklist of an operator session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub matricule: String,
    pub vehicle_number: String,
    pub service_point: Option<ServicePoint>,
}

impl SessionContext {
    pub fn service_point_label(&self) -> &'static str {
        self.service_point.map(ServicePoint::label).unwrap_or("")
    }
}

/// Handle to the session owned by the containing application.
///
/// Checklists receive a clone at construction and only read through it; the
/// container mutates the identifying fields and resets them when the operator
/// returns to the landing view.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionContext>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionContext> {
        self.inner.lock().expect("session mutex poisoned")
    }

    /// Store the matricule after applying the `LETTER-DDDD` mask.
    pub fn set_matricule(&self, raw: &str) -> String {
        let value = sanitize::matricule(raw);
        self.lock().matricule = value.clone();
        value
    }

    pub fn set_vehicle_number(&self, raw: &str) -> String {
        let value = sanitize::vehicle_number(raw);
        self.lock().vehicle_number = value.clone();
        value
    }

    pub fn set_service_point(&self, label: &str) -> Result<ServicePoint, InspectionError> {
        let point = ServicePoint::from_label(label)
            .ok_or_else(|| InspectionError::UnknownServicePoint(label.to_string()))?;
        self.lock().service_point = Some(point);
        Ok(point)
    }

    pub fn snapshot(&self) -> SessionContext {
        self.lock().clone()
    }

    pub fn reset(&self) {
        *self.lock() = SessionContext::default();
    }
}
