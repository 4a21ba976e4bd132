// src/wizard/patient.rs
//
// Step 1: appointment type and patient. Searching by CPF sends the digits to
// the server as a filter; the returned page is also matched locally against
// name, e-mail and phone so a free-text term behaves the same either way.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::sequence::{Fetched, Pending, Query, RequestSeq};
use crate::api::SchedulingApi;
use crate::error::ApiResult;
use crate::format::digits_only;
use crate::models::{PaginationMeta, Patient, PatientListParams, PatientPage};
use crate::pagination::{self, PageControls};
use crate::store::UiState;

pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct PatientSearchQuery {
    pub params: PatientListParams,
}

#[async_trait]
impl Query for PatientSearchQuery {
    type Output = PatientPage;

    async fn run(&self, api: &dyn SchedulingApi) -> ApiResult<PatientPage> {
        api.list_patients(&self.params).await
    }
}

#[derive(Debug, Default)]
pub struct PatientSelector {
    term: String,
    results: Vec<Patient>,
    page: Option<PaginationMeta>,
    loading: bool,
    seq: RequestSeq,
}

impl PatientSelector {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search(&mut self, term: &str) -> Pending<PatientSearchQuery> {
        self.term = term.trim().to_string();
        self.fetch_page(1)
    }

    pub fn go_to_page(&mut self, page: u32) -> Pending<PatientSearchQuery> {
        self.fetch_page(page.max(1))
    }

    fn fetch_page(&mut self, page: u32) -> Pending<PatientSearchQuery> {
        let params = PatientListParams {
            page,
            limit_per_page: PAGE_SIZE,
            cpf: cpf_filter(&self.term),
        };
        self.loading = true;
        debug!(?params, "patient search issued");
        Pending::new(self.seq.issue(), PatientSearchQuery { params })
    }

    pub fn apply(&mut self, fetched: Fetched<PatientSearchQuery>, ui: &mut UiState) -> bool {
        if !self.seq.is_current(fetched.ticket) {
            warn!(params = ?fetched.query.params, "discarding stale patient search");
            return false;
        }
        self.loading = false;
        match fetched.result {
            Ok(page) => {
                self.results = page.data;
                self.page = Some(page.pagination);
                true
            }
            Err(e) => {
                ui.report("Could not load patients", &e);
                false
            }
        }
    }

    /// Current page filtered by the search term.
    pub fn results(&self) -> Vec<&Patient> {
        self.results
            .iter()
            .filter(|p| matches_term(p, &self.term))
            .collect()
    }

    /// Looks the id up among `results()`; a row hidden by the term is not selectable.
    pub fn find(&self, id: i64) -> Option<&Patient> {
        self.results
            .iter()
            .filter(|p| matches_term(p, &self.term))
            .find(|p| p.id == id)
    }

    pub fn pagination(&self) -> Option<PageControls> {
        let page = self.page.as_ref()?;
        pagination::controls(page.page, page.total, page.limit_per_page)
    }
}

/// Only a term made of digits and CPF punctuation is sent as a CPF filter.
fn cpf_filter(term: &str) -> Option<String> {
    let digits = digits_only(term);
    let cpf_like = term
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | ' '));
    (cpf_like && !digits.is_empty()).then_some(digits)
}

pub fn matches_term(patient: &Patient, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let lower = term.to_lowercase();
    let digits = digits_only(term);

    patient.full_name.to_lowercase().contains(&lower)
        || patient.email.to_lowercase().contains(&lower)
        || patient.phone.contains(term)
        || (!digits.is_empty() && digits_only(&patient.cpf).contains(&digits))
}
