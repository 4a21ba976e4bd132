//! Shared setup for tests that talk to the development API over HTTP.
//!
//! `spawn_mock()` starts the stub on an ephemeral port and returns a client
//! pointed at it with an empty in-memory session; `signed_in()` does the same
//! and logs in as the seeded admin first.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, Weekday};

use scheduling_client::api::{HttpApi, SchedulingApi};
use scheduling_client::mock_api::data::MockData;
use scheduling_client::mock_api::{self, MockState};
use scheduling_client::models::LoginRequest;
use scheduling_client::session::{MemorySessionStore, SessionStore};

pub const ADMIN_EMAIL: &str = "admin@clinic.local";
pub const ADMIN_PASS: &str = "admin123";

pub struct TestServer {
    pub api: HttpApi,
    pub session: Arc<MemorySessionStore>,
    pub state: MockState,
    pub base_url: String,
}

impl TestServer {
    /// Second client on the same server with its own session.
    pub fn fresh_client(&self) -> (HttpApi, Arc<MemorySessionStore>) {
        let session = Arc::new(MemorySessionStore::new());
        let api = HttpApi::new(&self.base_url, Duration::from_secs(5), session.clone()).expect("client");
        (api, session)
    }
}

pub async fn spawn_mock() -> TestServer {
    let data = MockData::seeded(ADMIN_EMAIL, ADMIN_PASS, Local::now().date_naive()).expect("seed data");
    let state = MockState::new(data);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = mock_api::router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    let base_url = format!("http://{addr}/api");
    let session = Arc::new(MemorySessionStore::new());
    let api = HttpApi::new(&base_url, Duration::from_secs(5), session.clone()).expect("client");

    TestServer {
        api,
        session,
        state,
        base_url,
    }
}

pub async fn signed_in() -> TestServer {
    let server = spawn_mock().await;
    login(&server.api, &*server.session, ADMIN_EMAIL, ADMIN_PASS).await;
    server
}

pub async fn login(api: &HttpApi, session: &dyn SessionStore, email: &str, password: &str) {
    let resp = api
        .login(&LoginRequest {
            email: email.into(),
            password: password.into(),
        })
        .await
        .expect("login");
    session.save(&resp.token, &resp.user).expect("save session");
}

/// First weekday at least three days out, so it is never "today".
pub fn upcoming_weekday() -> NaiveDate {
    let mut day = Local::now().date_naive() + chrono::Duration::days(3);
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day += chrono::Duration::days(1);
    }
    day
}
