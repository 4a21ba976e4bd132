// src/wizard/mod.rs
//
// New-appointment wizard: type + patient, then service, then date/time.
// Each selector exposes issue/apply pairs so an event loop can run fetches
// concurrently; the async helpers here run one fetch to completion for
// callers that simply await.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

pub mod draft;
pub mod patient;
pub mod schedule;
pub mod sequence;
pub mod service;
pub mod validation;

use crate::api::SchedulingApi;
use crate::error::{FieldError, WizardError};
use crate::format::{format_cpf, format_date, format_time_range};
use crate::models::{AppointmentAck, AppointmentType};
use crate::store::{DASHBOARD_PATH, UiState};

pub use draft::{AppointmentDraft, ServiceSelection};
pub use patient::{PatientSearchQuery, PatientSelector};
pub use schedule::{AppointmentSummary, AvailableDaysQuery, AvailableSlotsQuery, DateTimeConfirmation};
pub use sequence::{Fetched, Pending, Query, RequestSeq, Ticket};
pub use service::{ConsultationTypesQuery, ProfessionalsQuery, ServiceSelector};

pub const SUBMIT_SUCCESS_TITLE: &str = "Appointment scheduled";
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Appointment confirmed successfully!";
pub const SUBMIT_FAILURE_TITLE: &str = "Could not schedule appointment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    PatientSelection = 1,
    ServiceSelection = 2,
    DateTimeConfirmation = 3,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::PatientSelection, Step::ServiceSelection, Step::DateTimeConfirmation];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::PatientSelection => "Patient",
            Step::ServiceSelection => "Service",
            Step::DateTimeConfirmation => "Date & time",
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::PatientSelection => Some(Step::ServiceSelection),
            Step::ServiceSelection => Some(Step::DateTimeConfirmation),
            Step::DateTimeConfirmation => None,
        }
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::PatientSelection => None,
            Step::ServiceSelection => Some(Step::PatientSelection),
            Step::DateTimeConfirmation => Some(Step::ServiceSelection),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIndicator {
    pub step: Step,
    pub label: &'static str,
    pub state: StepState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStatus {
    Editing,
    Submitted(AppointmentAck),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Advanced(Step),
    /// Current step invalid; nothing changed.
    Blocked(Vec<FieldError>),
    Submitted(AppointmentAck),
    /// The POST failed; the alert is open and the draft is intact.
    SubmitFailed,
}

#[derive(Debug)]
pub struct WizardController {
    step: Step,
    status: WizardStatus,
    draft: AppointmentDraft,
    today: NaiveDate,
    pub patients: PatientSelector,
    pub services: ServiceSelector,
    pub schedule: DateTimeConfirmation,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    /// `today` bounds the calendar: earlier dates are never selectable.
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            step: Step::PatientSelection,
            status: WizardStatus::Editing,
            draft: AppointmentDraft::default(),
            today,
            patients: PatientSelector::default(),
            services: ServiceSelector::default(),
            schedule: DateTimeConfirmation::default(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn status(&self) -> &WizardStatus {
        &self.status
    }

    pub fn draft(&self) -> &AppointmentDraft {
        &self.draft
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn field_errors(&self) -> Vec<FieldError> {
        validation::step_errors(self.step, &self.draft)
    }

    pub fn is_step_valid(&self, step: Step) -> bool {
        validation::is_step_valid(step, &self.draft)
    }

    /// Drives the enabled state of the "Next"/"Confirm" button.
    pub fn can_advance(&self) -> bool {
        self.status == WizardStatus::Editing && self.is_step_valid(self.step)
    }

    pub fn steps(&self) -> Vec<StepIndicator> {
        Step::ALL
            .iter()
            .map(|&step| StepIndicator {
                step,
                label: step.label(),
                state: match step.cmp(&self.step) {
                    std::cmp::Ordering::Less => StepState::Completed,
                    std::cmp::Ordering::Equal => StepState::Current,
                    std::cmp::Ordering::Greater => StepState::Pending,
                },
            })
            .collect()
    }

    fn ensure_step(&self, expected: Step) -> Result<(), WizardError> {
        if self.status != WizardStatus::Editing {
            return Err(WizardError::Finished);
        }
        if self.step != expected {
            return Err(WizardError::WrongStep {
                expected: expected.number(),
                actual: self.step.number(),
            });
        }
        Ok(())
    }

    /* ============================================================
       Step 1: type + patient
       ============================================================ */

    pub fn set_appointment_type(&mut self, kind: AppointmentType) -> Result<(), WizardError> {
        self.ensure_step(Step::PatientSelection)?;
        if self.draft.set_appointment_type(kind) {
            debug!(?kind, "appointment type changed");
            self.services.reset();
            self.schedule.reset();
        }
        Ok(())
    }

    pub fn begin_patient_search(&mut self, term: &str) -> Result<Pending<PatientSearchQuery>, WizardError> {
        self.ensure_step(Step::PatientSelection)?;
        Ok(self.patients.search(term))
    }

    pub fn apply_patients(&mut self, fetched: Fetched<PatientSearchQuery>, ui: &mut UiState) -> bool {
        self.patients.apply(fetched, ui)
    }

    pub async fn search_patients(
        &mut self,
        api: &dyn SchedulingApi,
        ui: &mut UiState,
        term: &str,
    ) -> Result<(), WizardError> {
        let pending = self.begin_patient_search(term)?;
        ui.loading.set();
        let fetched = pending.run(api).await;
        self.apply_patients(fetched, ui);
        ui.loading.clear();
        Ok(())
    }

    pub fn select_patient(&mut self, patient_id: i64) -> Result<(), WizardError> {
        self.ensure_step(Step::PatientSelection)?;
        let patient = self
            .patients
            .find(patient_id)
            .cloned()
            .ok_or(WizardError::UnknownId { kind: "patient", id: patient_id })?;
        self.draft.patient = Some(patient);
        Ok(())
    }

    /* ============================================================
       Step 2: service
       ============================================================ */

    pub fn apply_consultation_types(&mut self, fetched: Fetched<ConsultationTypesQuery>, ui: &mut UiState) -> bool {
        self.services.apply_consultation_types(fetched, ui)
    }

    /// Sets the type, clears the professional and everything after it, and
    /// returns the professional fetch for the new type.
    pub fn select_consultation_type(&mut self, consultation_type_id: i64) -> Result<Pending<ProfessionalsQuery>, WizardError> {
        self.ensure_step(Step::ServiceSelection)?;
        match self.draft.appointment_type() {
            None => return Err(WizardError::NoAppointmentType),
            Some(AppointmentType::Exame) => return Err(WizardError::NotConsultation),
            Some(AppointmentType::Consulta) => {}
        }
        if self.services.find_consultation_type(consultation_type_id).is_none() {
            return Err(WizardError::UnknownId {
                kind: "consultation type",
                id: consultation_type_id,
            });
        }
        self.draft.set_consultation_type(consultation_type_id);
        self.schedule.reset();
        Ok(self.services.load_professionals(consultation_type_id))
    }

    pub fn apply_professionals(&mut self, fetched: Fetched<ProfessionalsQuery>, ui: &mut UiState) -> bool {
        self.services.apply_professionals(fetched, ui)
    }

    pub async fn change_consultation_type(
        &mut self,
        api: &dyn SchedulingApi,
        ui: &mut UiState,
        consultation_type_id: i64,
    ) -> Result<(), WizardError> {
        let pending = self.select_consultation_type(consultation_type_id)?;
        ui.loading.set();
        let fetched = pending.run(api).await;
        self.apply_professionals(fetched, ui);
        ui.loading.clear();
        Ok(())
    }

    pub fn select_professional(&mut self, professional_id: i64) -> Result<(), WizardError> {
        self.ensure_step(Step::ServiceSelection)?;
        if self.draft.appointment_type() != Some(AppointmentType::Consulta) {
            return Err(WizardError::NotConsultation);
        }
        if self.services.find_professional(professional_id).is_none() {
            return Err(WizardError::UnknownId {
                kind: "professional",
                id: professional_id,
            });
        }
        if self.draft.professional_id() != Some(professional_id) {
            self.draft.set_professional(professional_id);
            self.schedule.reset();
        }
        Ok(())
    }

    pub fn select_exam_type(&mut self, exam_type_id: i64) -> Result<(), WizardError> {
        self.ensure_step(Step::ServiceSelection)?;
        if self.draft.appointment_type() != Some(AppointmentType::Exame) {
            return Err(WizardError::NotExam);
        }
        self.draft.set_exam_type(exam_type_id);
        self.schedule.reset();
        Ok(())
    }

    /* ============================================================
       Step 3: date, time, observations
       ============================================================ */

    pub fn begin_available_days(&mut self) -> Result<Pending<AvailableDaysQuery>, WizardError> {
        self.ensure_step(Step::DateTimeConfirmation)?;
        let professional_id = self.draft.professional_id().ok_or(WizardError::NoProfessional)?;
        Ok(self.schedule.load_available_days(professional_id))
    }

    pub fn apply_available_days(&mut self, fetched: Fetched<AvailableDaysQuery>, ui: &mut UiState) -> bool {
        self.schedule.apply_available_days(fetched, ui)
    }

    pub fn is_date_disabled(&self, date: NaiveDate) -> bool {
        self.schedule.is_date_disabled(date, self.today)
    }

    /// Rejects disabled dates without touching state. Otherwise sets the
    /// date, clears the slot and returns the slot fetch for that day.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<Pending<AvailableSlotsQuery>, WizardError> {
        self.ensure_step(Step::DateTimeConfirmation)?;
        let professional_id = self.draft.professional_id().ok_or(WizardError::NoProfessional)?;
        if self.is_date_disabled(date) {
            return Err(WizardError::DateUnavailable(date));
        }
        self.draft.set_date(date);
        Ok(self.schedule.load_slots(professional_id, date))
    }

    pub fn apply_slots(&mut self, fetched: Fetched<AvailableSlotsQuery>, ui: &mut UiState) -> bool {
        self.schedule.apply_slots(fetched, ui)
    }

    pub async fn choose_date(
        &mut self,
        api: &dyn SchedulingApi,
        ui: &mut UiState,
        date: NaiveDate,
    ) -> Result<(), WizardError> {
        let pending = self.select_date(date)?;
        ui.loading.set();
        let fetched = pending.run(api).await;
        self.apply_slots(fetched, ui);
        ui.loading.clear();
        Ok(())
    }

    pub fn time_selector_enabled(&self) -> bool {
        self.draft.date().is_some() && !self.schedule.is_loading_slots()
    }

    pub fn select_slot(&mut self, slot_id: i64) -> Result<(), WizardError> {
        self.ensure_step(Step::DateTimeConfirmation)?;
        if self.draft.date().is_none() {
            return Err(WizardError::NoDate);
        }
        if self.schedule.find_slot(slot_id).is_none() {
            return Err(WizardError::UnknownId { kind: "slot", id: slot_id });
        }
        self.draft.slot_id = Some(slot_id);
        Ok(())
    }

    pub fn set_observations(&mut self, text: &str) -> Result<(), WizardError> {
        self.ensure_step(Step::DateTimeConfirmation)?;
        self.draft.observations = text.to_string();
        Ok(())
    }

    pub fn summary(&self) -> AppointmentSummary {
        let draft = &self.draft;
        AppointmentSummary {
            appointment_type: draft.appointment_type(),
            patient_name: draft.patient().map(|p| p.full_name.clone()),
            patient_cpf: draft.patient().map(|p| format_cpf(&p.cpf)),
            consultation_type: draft
                .consultation_type_id()
                .and_then(|id| self.services.find_consultation_type(id))
                .map(|t| t.name.clone()),
            professional: draft
                .professional_id()
                .and_then(|id| self.services.find_professional(id))
                .map(|p| format!("{} - {}", p.name, p.specialty)),
            date: draft.date().map(format_date),
            time: draft
                .slot_id()
                .and_then(|id| self.schedule.find_slot(id))
                .and_then(|s| format_time_range(&s.start_time, &s.end_time)),
            observations: draft.observations().to_string(),
        }
    }

    /* ============================================================
       Navigation
       ============================================================ */

    /// Advances when the current step is valid; on the last step submits
    /// instead. Entering a step loads the data it needs up front.
    pub async fn next(&mut self, api: &dyn SchedulingApi, ui: &mut UiState) -> Result<NextOutcome, WizardError> {
        if self.status != WizardStatus::Editing {
            return Err(WizardError::Finished);
        }
        let errors = self.field_errors();
        if !errors.is_empty() {
            debug!(step = self.step.number(), ?errors, "next blocked");
            return Ok(NextOutcome::Blocked(errors));
        }

        let Some(next) = self.step.next() else {
            return Ok(self.submit(api, ui).await);
        };
        self.step = next;
        debug!(step = next.number(), "wizard advanced");

        ui.loading.set();
        match next {
            Step::ServiceSelection => {
                if self.draft.appointment_type() == Some(AppointmentType::Consulta) {
                    let fetched = self.services.load_consultation_types().run(api).await;
                    self.services.apply_consultation_types(fetched, ui);
                }
            }
            Step::DateTimeConfirmation => {
                if let Some(professional_id) = self.draft.professional_id() {
                    let fetched = self.schedule.load_available_days(professional_id).run(api).await;
                    self.schedule.apply_available_days(fetched, ui);
                }
            }
            Step::PatientSelection => {}
        }
        ui.loading.clear();

        Ok(NextOutcome::Advanced(next))
    }

    async fn submit(&mut self, api: &dyn SchedulingApi, ui: &mut UiState) -> NextOutcome {
        let request = match self.draft.to_request() {
            Ok(r) => r,
            Err(errors) => return NextOutcome::Blocked(errors),
        };

        ui.loading.set();
        let result = api.create_appointment(&request).await;
        ui.loading.clear();

        match result {
            Ok(ack) => {
                info!(
                    patient_id = request.patient_id,
                    slot_id = request.slot_id,
                    appointment_id = ?ack.appointment_id,
                    "appointment submitted"
                );
                let message = if ack.message.trim().is_empty() {
                    SUBMIT_SUCCESS_MESSAGE.to_string()
                } else {
                    ack.message.clone()
                };
                ui.success(SUBMIT_SUCCESS_TITLE, message);
                self.discard();
                self.status = WizardStatus::Submitted(ack.clone());
                ui.navigate(DASHBOARD_PATH);
                NextOutcome::Submitted(ack)
            }
            Err(e) => {
                ui.report(SUBMIT_FAILURE_TITLE, &e);
                NextOutcome::SubmitFailed
            }
        }
    }

    /// Goes back one step without validating. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        if self.status != WizardStatus::Editing {
            return false;
        }
        match self.step.previous() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self, ui: &mut UiState) {
        if self.status != WizardStatus::Editing {
            return;
        }
        info!(step = self.step.number(), "wizard cancelled");
        self.discard();
        self.status = WizardStatus::Cancelled;
        ui.navigate(DASHBOARD_PATH);
    }

    fn discard(&mut self) {
        self.draft = AppointmentDraft::default();
        self.patients = PatientSelector::default();
        self.services = ServiceSelector::default();
        self.schedule = DateTimeConfirmation::default();
    }
}
