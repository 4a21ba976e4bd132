// src/wizard/sequence.rs
//
// Last-issued-wins guard for dependent fetches. Each field that is refetched
// when an upstream choice changes owns a `RequestSeq`; a response is applied
// only while its ticket is still the newest one issued for that field.

use async_trait::async_trait;

use crate::api::SchedulingApi;
use crate::error::ApiResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Makes every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// One API read, detached from the state that issued it so it can run while
/// the wizard keeps handling input.
#[async_trait]
pub trait Query: Send + Sync {
    type Output: Send;

    async fn run(&self, api: &dyn SchedulingApi) -> ApiResult<Self::Output>;
}

#[derive(Debug)]
#[must_use = "a pending fetch does nothing until it is run and applied"]
pub struct Pending<Q> {
    pub ticket: Ticket,
    pub query: Q,
}

pub struct Fetched<Q: Query> {
    pub ticket: Ticket,
    pub query: Q,
    pub result: ApiResult<Q::Output>,
}

impl<Q: Query> Pending<Q> {
    pub fn new(ticket: Ticket, query: Q) -> Self {
        Self { ticket, query }
    }

    pub async fn run(self, api: &dyn SchedulingApi) -> Fetched<Q> {
        let result = self.query.run(api).await;
        Fetched {
            ticket: self.ticket,
            query: self.query,
            result,
        }
    }
}
