/// HttpApi against the development API: envelopes, status mapping and the
/// session round trip.

use chrono::NaiveDate;

use scheduling_client::api::SchedulingApi;
use scheduling_client::auth::{AuthSession, LOGIN_FAILED_TITLE};
use scheduling_client::error::ApiError;
use scheduling_client::models::{AppointmentRequest, AppointmentType, LoginRequest, PatientListParams};
use scheduling_client::session::SessionStore;
use scheduling_client::store::{DASHBOARD_PATH, UiState};

mod common;
use common::{ADMIN_EMAIL, ADMIN_PASS, signed_in, spawn_mock, upcoming_weekday};

#[tokio::test]
async fn test_auth_session_login_and_logout() {
    let server = spawn_mock().await;
    let auth = AuthSession::new(server.session.clone());
    let mut ui = UiState::default();

    assert!(auth.login(&server.api, &mut ui, ADMIN_EMAIL, ADMIN_PASS).await);
    assert!(auth.is_authenticated());
    assert!(auth.has_permission(&["admin"]));
    assert_eq!(ui.location(), DASHBOARD_PATH);

    // the stored token is what the client now sends
    let types = server.api.list_consultation_types().await.unwrap();
    assert_eq!(types.len(), 7);

    auth.logout(&mut ui).unwrap();
    assert!(server.session.token().is_none());
    assert!(matches!(
        server.api.list_consultation_types().await,
        Err(ApiError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_wrong_password_is_a_login_failure_not_a_redirect() {
    let server = spawn_mock().await;
    let auth = AuthSession::new(server.session.clone());
    let mut ui = UiState::default();

    assert!(!auth.login(&server.api, &mut ui, ADMIN_EMAIL, "nope").await);

    assert_eq!(ui.alert.current().map(|a| a.title.as_str()), Some(LOGIN_FAILED_TITLE));
    assert!(ui.history().is_empty());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_login_response_carries_user() {
    let server = spawn_mock().await;
    let resp = server
        .api
        .login(&LoginRequest {
            email: "ADMIN@clinic.local".into(),
            password: ADMIN_PASS.into(),
        })
        .await
        .unwrap();
    assert!(!resp.token.is_empty());
    assert_eq!(resp.user.email, ADMIN_EMAIL);
    assert_eq!(resp.user.roles, vec!["admin".to_string()]);
}

#[tokio::test]
async fn test_server_side_logout_revokes_token() {
    let server = signed_in().await;
    let token = server.session.token().unwrap();

    let resp = reqwest::Client::new()
        .post(format!("{}/logout", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    // the client still holds the token, but the server no longer knows it
    assert!(server.session.token().is_some());
    assert!(matches!(
        server.api.list_consultation_types().await,
        Err(ApiError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_patient_pages_and_cpf_filter() {
    let server = signed_in().await;

    let page = server
        .api
        .list_patients(&PatientListParams {
            page: 2,
            limit_per_page: 5,
            cpf: None,
        })
        .await
        .unwrap();
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.pagination.total, 12);
    assert_eq!(page.pagination.page, 2);

    let by_cpf = server
        .api
        .list_patients(&PatientListParams {
            cpf: Some("12345678901".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_cpf.data.len(), 1);
    assert_eq!(by_cpf.data[0].full_name, "Maria Souza");
}

#[tokio::test]
async fn test_error_envelopes_become_rejections() {
    let server = signed_in().await;

    match server.api.professionals_by_consultation_type(99).await {
        Err(ApiError::Rejected { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Consultation type not found");
        }
        other => panic!("unexpected {other:?}"),
    }

    let exam = AppointmentRequest {
        appointment_type: AppointmentType::Exame,
        patient_id: 1,
        consultation_type_id: None,
        professional_id: None,
        exam_type_id: Some(3),
        date: upcoming_weekday(),
        slot_id: 100,
        observations: String::new(),
    };
    let err = server.api.create_appointment(&exam).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
    assert_eq!(err.user_message(), "Exam scheduling is not available");
}

#[tokio::test]
async fn test_available_days_and_slots_agree() {
    let server = signed_in().await;

    let days = server.api.professional_available_days(5).await.unwrap();
    assert!(!days.is_empty());
    let first: NaiveDate = days[0].parse().unwrap();

    let slots = server.api.professional_available_slots(5, first).await.unwrap();
    assert!(!slots.is_empty());
    assert!(slots.iter().all(|s| s.start_time.starts_with(&days[0])));

    let unknown = server.api.professional_available_days(404).await.unwrap_err();
    assert!(matches!(unknown, ApiError::Rejected { status: 404, .. }));
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let server = spawn_mock().await;
    let (api, session) = server.fresh_client();
    assert!(session.token().is_none());

    let err = api.professional_available_days(5).await.unwrap_err();
    assert!(err.is_auth());
    assert!(matches!(err, ApiError::Unauthorized(m) if m == "Session expired"));

    // a session on one client does not leak into another
    common::login(&server.api, &*server.session, ADMIN_EMAIL, ADMIN_PASS).await;
    assert!(api.professional_available_days(5).await.is_err());
    assert!(server.api.professional_available_days(5).await.is_ok());
}
