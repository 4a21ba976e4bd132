// src/wizard/schedule.rs
//
// Step 3: bookable days for the chosen professional, slots for the chosen
// day, free-text observations, and the read-only summary.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

use super::sequence::{Fetched, Pending, Query, RequestSeq};
use crate::api::SchedulingApi;
use crate::error::ApiResult;
use crate::format::parse_date;
use crate::models::{AppointmentType, TimeSlot};
use crate::store::UiState;

#[derive(Debug, Clone, Copy)]
pub struct AvailableDaysQuery {
    pub professional_id: i64,
}

#[async_trait]
impl Query for AvailableDaysQuery {
    type Output = Vec<String>;

    async fn run(&self, api: &dyn SchedulingApi) -> ApiResult<Vec<String>> {
        api.professional_available_days(self.professional_id).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AvailableSlotsQuery {
    pub professional_id: i64,
    pub date: NaiveDate,
}

#[async_trait]
impl Query for AvailableSlotsQuery {
    type Output = Vec<TimeSlot>;

    async fn run(&self, api: &dyn SchedulingApi) -> ApiResult<Vec<TimeSlot>> {
        api.professional_available_slots(self.professional_id, self.date)
            .await
    }
}

#[derive(Debug, Default)]
pub struct DateTimeConfirmation {
    available_days: BTreeSet<NaiveDate>,
    slots: Vec<TimeSlot>,
    loading_days: bool,
    loading_slots: bool,
    days_seq: RequestSeq,
    slots_seq: RequestSeq,
}

impl DateTimeConfirmation {
    pub fn available_days(&self) -> &BTreeSet<NaiveDate> {
        &self.available_days
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn is_loading_days(&self) -> bool {
        self.loading_days
    }

    /// The time selector shows a placeholder and stays disabled meanwhile.
    pub fn is_loading_slots(&self) -> bool {
        self.loading_slots
    }

    pub fn find_slot(&self, slot_id: i64) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }

    /// Past days and days the professional does not work are disabled.
    pub fn is_date_disabled(&self, date: NaiveDate, today: NaiveDate) -> bool {
        date < today || !self.available_days.contains(&date)
    }

    pub fn selectable_days(&self, today: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        self.available_days.range(today..).copied()
    }

    pub fn load_available_days(&mut self, professional_id: i64) -> Pending<AvailableDaysQuery> {
        self.available_days.clear();
        self.loading_days = true;
        Pending::new(self.days_seq.issue(), AvailableDaysQuery { professional_id })
    }

    pub fn apply_available_days(&mut self, fetched: Fetched<AvailableDaysQuery>, ui: &mut UiState) -> bool {
        if !self.days_seq.is_current(fetched.ticket) {
            warn!(professional_id = fetched.query.professional_id, "discarding stale available days");
            return false;
        }
        self.loading_days = false;
        match fetched.result {
            Ok(days) => {
                self.available_days = days
                    .iter()
                    .filter_map(|raw| {
                        let parsed = parse_date(raw);
                        if parsed.is_none() {
                            warn!(value = %raw, "skipping unparsable available day");
                        }
                        parsed
                    })
                    .collect();
                debug!(
                    professional_id = fetched.query.professional_id,
                    count = self.available_days.len(),
                    "available days loaded"
                );
                true
            }
            Err(e) => {
                ui.report("Could not load available days", &e);
                false
            }
        }
    }

    pub fn load_slots(&mut self, professional_id: i64, date: NaiveDate) -> Pending<AvailableSlotsQuery> {
        self.slots.clear();
        self.loading_slots = true;
        Pending::new(
            self.slots_seq.issue(),
            AvailableSlotsQuery { professional_id, date },
        )
    }

    pub fn apply_slots(&mut self, fetched: Fetched<AvailableSlotsQuery>, ui: &mut UiState) -> bool {
        if !self.slots_seq.is_current(fetched.ticket) {
            warn!(date = %fetched.query.date, "discarding stale slot list");
            return false;
        }
        self.loading_slots = false;
        match fetched.result {
            Ok(slots) => {
                self.slots = slots;
                true
            }
            Err(e) => {
                ui.report("Could not load available times", &e);
                false
            }
        }
    }

    /// Upstream professional changed.
    pub fn reset(&mut self) {
        self.available_days.clear();
        self.slots.clear();
        self.loading_days = false;
        self.loading_slots = false;
        self.days_seq.invalidate();
        self.slots_seq.invalidate();
    }
}

/// What the confirmation panel shows. Recomputed from state on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentSummary {
    pub appointment_type: Option<AppointmentType>,
    pub patient_name: Option<String>,
    pub patient_cpf: Option<String>,
    pub consultation_type: Option<String>,
    pub professional: Option<String>,
    /// dd/mm/yyyy
    pub date: Option<String>,
    /// `HH:MM - HH:MM`
    pub time: Option<String>,
    pub observations: String,
}
