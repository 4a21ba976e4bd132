// src/wizard/validation.rs
//
// Per-step field schemas. Validity is never stored: callers re-run these
// against the current draft whenever they need it.

use crate::error::FieldError;

use super::Step;
use super::draft::{AppointmentDraft, ServiceSelection};

pub const EXAM_PENDING_MESSAGE: &str = "Exam scheduling is not available yet";

pub fn patient_step(draft: &AppointmentDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if draft.appointment_type().is_none() {
        errors.push(FieldError::new("appointment_type", "Appointment type is required"));
    }
    if draft.patient.is_none() {
        errors.push(FieldError::new("patient_id", "Patient is required"));
    }
    errors
}

pub fn service_step(draft: &AppointmentDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match &draft.service {
        None => errors.push(FieldError::new("appointment_type", "Appointment type is required")),
        Some(ServiceSelection::Consultation {
            consultation_type_id,
            professional_id,
        }) => {
            if consultation_type_id.is_none() {
                errors.push(FieldError::new("consultation_type_id", "Consultation type is required"));
            }
            if professional_id.is_none() {
                errors.push(FieldError::new("professional_id", "Professional is required"));
            }
        }
        // Exams have no availability source yet; the branch stays closed
        // until the exam-type contract exists.
        Some(ServiceSelection::Exam { exam_type_id }) => match exam_type_id {
            None => errors.push(FieldError::new("exam_type_id", "Exam type is required")),
            Some(_) => errors.push(FieldError::new("exam_type_id", EXAM_PENDING_MESSAGE)),
        },
    }
    errors
}

pub fn schedule_step(draft: &AppointmentDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if draft.date.is_none() {
        errors.push(FieldError::new("date", "Date is required"));
    }
    if draft.slot_id.is_none() {
        errors.push(FieldError::new("slot_id", "Time is required"));
    }
    errors
}

pub fn step_errors(step: Step, draft: &AppointmentDraft) -> Vec<FieldError> {
    match step {
        Step::PatientSelection => patient_step(draft),
        Step::ServiceSelection => service_step(draft),
        Step::DateTimeConfirmation => schedule_step(draft),
    }
}

pub fn is_step_valid(step: Step, draft: &AppointmentDraft) -> bool {
    step_errors(step, draft).is_empty()
}
