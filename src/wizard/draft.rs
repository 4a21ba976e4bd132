use chrono::NaiveDate;

use crate::error::FieldError;
use crate::models::{AppointmentRequest, AppointmentType, Patient};

use super::validation;

/// Step-2 choices. The variant is the appointment type, so a draft can never
/// carry consultation fields for an exam or the other way round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSelection {
    Consultation {
        consultation_type_id: Option<i64>,
        professional_id: Option<i64>,
    },
    Exam {
        exam_type_id: Option<i64>,
    },
}

impl ServiceSelection {
    pub fn empty(kind: AppointmentType) -> Self {
        match kind {
            AppointmentType::Consulta => ServiceSelection::Consultation {
                consultation_type_id: None,
                professional_id: None,
            },
            AppointmentType::Exame => ServiceSelection::Exam { exam_type_id: None },
        }
    }

    pub fn appointment_type(&self) -> AppointmentType {
        match self {
            ServiceSelection::Consultation { .. } => AppointmentType::Consulta,
            ServiceSelection::Exam { .. } => AppointmentType::Exame,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub(crate) patient: Option<Patient>,
    pub(crate) service: Option<ServiceSelection>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) slot_id: Option<i64>,
    pub(crate) observations: String,
}

impl AppointmentDraft {
    pub fn appointment_type(&self) -> Option<AppointmentType> {
        self.service.as_ref().map(ServiceSelection::appointment_type)
    }

    pub fn service(&self) -> Option<&ServiceSelection> {
        self.service.as_ref()
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.patient.as_ref()
    }

    pub fn patient_id(&self) -> Option<i64> {
        self.patient.as_ref().map(|p| p.id)
    }

    pub fn consultation_type_id(&self) -> Option<i64> {
        match self.service {
            Some(ServiceSelection::Consultation { consultation_type_id, .. }) => consultation_type_id,
            _ => None,
        }
    }

    pub fn professional_id(&self) -> Option<i64> {
        match self.service {
            Some(ServiceSelection::Consultation { professional_id, .. }) => professional_id,
            _ => None,
        }
    }

    pub fn exam_type_id(&self) -> Option<i64> {
        match self.service {
            Some(ServiceSelection::Exam { exam_type_id }) => exam_type_id,
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn slot_id(&self) -> Option<i64> {
        self.slot_id
    }

    pub fn observations(&self) -> &str {
        &self.observations
    }

    /// Switching type drops every step-2 and step-3 choice. Returns whether
    /// anything changed.
    pub(crate) fn set_appointment_type(&mut self, kind: AppointmentType) -> bool {
        if self.appointment_type() == Some(kind) {
            return false;
        }
        self.service = Some(ServiceSelection::empty(kind));
        self.clear_schedule();
        true
    }

    pub(crate) fn set_consultation_type(&mut self, id: i64) {
        if let Some(ServiceSelection::Consultation {
            consultation_type_id,
            professional_id,
        }) = &mut self.service
        {
            *consultation_type_id = Some(id);
            *professional_id = None;
        }
        self.clear_schedule();
    }

    pub(crate) fn set_professional(&mut self, id: i64) {
        if let Some(ServiceSelection::Consultation { professional_id, .. }) = &mut self.service {
            if *professional_id != Some(id) {
                *professional_id = Some(id);
                self.date = None;
                self.slot_id = None;
            }
        }
    }

    pub(crate) fn set_exam_type(&mut self, id: i64) {
        if let Some(ServiceSelection::Exam { exam_type_id }) = &mut self.service {
            *exam_type_id = Some(id);
        }
        self.clear_schedule();
    }

    pub(crate) fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.slot_id = None;
    }

    pub(crate) fn clear_schedule(&mut self) {
        self.date = None;
        self.slot_id = None;
    }

    /// Full schema check, then the POST body.
    pub fn to_request(&self) -> Result<AppointmentRequest, Vec<FieldError>> {
        let mut errors = validation::patient_step(self);
        errors.extend(validation::service_step(self));
        errors.extend(validation::schedule_step(self));
        if !errors.is_empty() {
            return Err(errors);
        }

        // every Option below was just checked by the schema
        let (Some(patient_id), Some(kind), Some(date), Some(slot_id)) =
            (self.patient_id(), self.appointment_type(), self.date, self.slot_id)
        else {
            return Err(vec![FieldError::new("draft", "incomplete draft")]);
        };

        Ok(AppointmentRequest {
            appointment_type: kind,
            patient_id,
            consultation_type_id: self.consultation_type_id(),
            professional_id: self.professional_id(),
            exam_type_id: self.exam_type_id(),
            date,
            slot_id,
            observations: self.observations.trim().to_string(),
        })
    }
}
