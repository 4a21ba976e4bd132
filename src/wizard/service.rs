// src/wizard/service.rs
//
// Step 2: consultation type, then the professionals offering it.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::sequence::{Fetched, Pending, Query, RequestSeq};
use crate::api::SchedulingApi;
use crate::error::ApiResult;
use crate::models::{ConsultationType, Professional};
use crate::store::UiState;

#[derive(Debug, Clone, Copy)]
pub struct ConsultationTypesQuery;

#[async_trait]
impl Query for ConsultationTypesQuery {
    type Output = Vec<ConsultationType>;

    async fn run(&self, api: &dyn SchedulingApi) -> ApiResult<Vec<ConsultationType>> {
        api.list_consultation_types().await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProfessionalsQuery {
    pub consultation_type_id: i64,
}

#[async_trait]
impl Query for ProfessionalsQuery {
    type Output = Vec<Professional>;

    async fn run(&self, api: &dyn SchedulingApi) -> ApiResult<Vec<Professional>> {
        api.professionals_by_consultation_type(self.consultation_type_id)
            .await
    }
}

#[derive(Debug, Default)]
pub struct ServiceSelector {
    consultation_types: Vec<ConsultationType>,
    professionals: Vec<Professional>,
    loading_types: bool,
    loading_professionals: bool,
    types_seq: RequestSeq,
    professionals_seq: RequestSeq,
}

impl ServiceSelector {
    /// Active types only. Empty means "no options", not an error.
    pub fn consultation_types(&self) -> &[ConsultationType] {
        &self.consultation_types
    }

    pub fn professionals(&self) -> &[Professional] {
        &self.professionals
    }

    pub fn is_loading_types(&self) -> bool {
        self.loading_types
    }

    pub fn is_loading_professionals(&self) -> bool {
        self.loading_professionals
    }

    pub fn find_consultation_type(&self, id: i64) -> Option<&ConsultationType> {
        self.consultation_types.iter().find(|t| t.id == id)
    }

    pub fn find_professional(&self, id: i64) -> Option<&Professional> {
        self.professionals.iter().find(|p| p.id == id)
    }

    pub fn load_consultation_types(&mut self) -> Pending<ConsultationTypesQuery> {
        self.loading_types = true;
        Pending::new(self.types_seq.issue(), ConsultationTypesQuery)
    }

    pub fn apply_consultation_types(&mut self, fetched: Fetched<ConsultationTypesQuery>, ui: &mut UiState) -> bool {
        if !self.types_seq.is_current(fetched.ticket) {
            warn!("discarding stale consultation type list");
            return false;
        }
        self.loading_types = false;
        match fetched.result {
            Ok(types) => {
                self.consultation_types = types.into_iter().filter(|t| t.active).collect();
                debug!(count = self.consultation_types.len(), "consultation types loaded");
                true
            }
            Err(e) => {
                ui.report("Could not load consultation types", &e);
                false
            }
        }
    }

    /// Drops the previous type's professionals and issues the new fetch.
    pub fn load_professionals(&mut self, consultation_type_id: i64) -> Pending<ProfessionalsQuery> {
        self.professionals.clear();
        self.loading_professionals = true;
        Pending::new(
            self.professionals_seq.issue(),
            ProfessionalsQuery { consultation_type_id },
        )
    }

    pub fn apply_professionals(&mut self, fetched: Fetched<ProfessionalsQuery>, ui: &mut UiState) -> bool {
        if !self.professionals_seq.is_current(fetched.ticket) {
            warn!(
                consultation_type_id = fetched.query.consultation_type_id,
                "discarding stale professional list"
            );
            return false;
        }
        self.loading_professionals = false;
        match fetched.result {
            Ok(professionals) => {
                debug!(
                    consultation_type_id = fetched.query.consultation_type_id,
                    count = professionals.len(),
                    "professionals loaded"
                );
                self.professionals = professionals;
                true
            }
            Err(e) => {
                ui.report("Could not load professionals", &e);
                false
            }
        }
    }

    /// Appointment type changed: drop the professional list and any
    /// professional fetch still in flight. Consultation types are kept.
    pub fn reset(&mut self) {
        self.professionals.clear();
        self.loading_professionals = false;
        self.professionals_seq.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn prof(id: i64) -> Professional {
        Professional {
            id,
            name: format!("Dr. {id}"),
            specialty: "Clínica geral".into(),
        }
    }

    #[test]
    fn test_last_issued_professional_fetch_wins() {
        let mut selector = ServiceSelector::default();
        let mut ui = UiState::default();

        let slow = selector.load_professionals(1);
        let fast = selector.load_professionals(2);

        // the later request answers first, then the earlier one straggles in
        let fast_done = Fetched { ticket: fast.ticket, query: fast.query, result: Ok(vec![prof(5)]) };
        let slow_done = Fetched { ticket: slow.ticket, query: slow.query, result: Ok(vec![prof(9)]) };

        assert!(selector.apply_professionals(fast_done, &mut ui));
        assert!(!selector.apply_professionals(slow_done, &mut ui));

        assert_eq!(selector.professionals(), &[prof(5)]);
        assert!(!selector.is_loading_professionals());
    }

    #[test]
    fn test_failed_fetch_reports_and_keeps_state() {
        let mut selector = ServiceSelector::default();
        let mut ui = UiState::default();

        let pending = selector.load_consultation_types();
        let ok = Fetched {
            ticket: pending.ticket,
            query: pending.query,
            result: Ok(vec![ConsultationType { id: 2, name: "Retorno".into(), duration_minutes: 30, active: true }]),
        };
        assert!(selector.apply_consultation_types(ok, &mut ui));

        let pending = selector.load_consultation_types();
        let failed = Fetched {
            ticket: pending.ticket,
            query: pending.query,
            result: Err(ApiError::Transport("connection refused".into())),
        };
        assert!(!selector.apply_consultation_types(failed, &mut ui));

        assert_eq!(selector.consultation_types().len(), 1);
        assert!(ui.alert.is_open());
        assert!(!selector.is_loading_types());
    }

    #[test]
    fn test_inactive_types_are_hidden_and_empty_is_fine() {
        let mut selector = ServiceSelector::default();
        let mut ui = UiState::default();

        let pending = selector.load_consultation_types();
        let fetched = Fetched {
            ticket: pending.ticket,
            query: pending.query,
            result: Ok(vec![ConsultationType { id: 7, name: "Antiga".into(), duration_minutes: 15, active: false }]),
        };
        assert!(selector.apply_consultation_types(fetched, &mut ui));
        assert!(selector.consultation_types().is_empty());
        assert!(!ui.alert.is_open());
    }

    #[test]
    fn test_reset_discards_in_flight_professionals() {
        let mut selector = ServiceSelector::default();
        let mut ui = UiState::default();

        let pending = selector.load_professionals(3);
        selector.reset();
        let late = Fetched { ticket: pending.ticket, query: pending.query, result: Ok(vec![prof(1)]) };

        assert!(!selector.apply_professionals(late, &mut ui));
        assert!(selector.professionals().is_empty());
    }
}
