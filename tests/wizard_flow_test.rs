/// End-to-end wizard runs against the development API over HTTP.

use scheduling_client::api::SchedulingApi;
use scheduling_client::error::ApiError;
use scheduling_client::models::{AppointmentType, AppointmentRequest};
use scheduling_client::store::{DASHBOARD_PATH, LOGIN_PATH, UiState};
use scheduling_client::wizard::{NextOutcome, Step, WizardController, WizardStatus};

mod common;
use common::{signed_in, spawn_mock, upcoming_weekday};

const SLOT_ID: i64 = 14;
const PROFESSIONAL_ID: i64 = 5;
const RETORNO: i64 = 2;

/// Runs steps 1 and 2 for Maria Souza, Retorno with Dr. Roberto Almeida.
async fn through_step_two(api: &dyn SchedulingApi, ui: &mut UiState) -> WizardController {
    let mut wizard = WizardController::new();
    wizard.set_appointment_type(AppointmentType::Consulta).unwrap();
    wizard.search_patients(api, ui, "123.456.789-01").await.unwrap();
    assert_eq!(wizard.patients.results().len(), 1);
    wizard.select_patient(1).unwrap();

    assert_eq!(wizard.next(api, ui).await.unwrap(), NextOutcome::Advanced(Step::ServiceSelection));
    wizard.change_consultation_type(api, ui, RETORNO).await.unwrap();
    wizard.select_professional(PROFESSIONAL_ID).unwrap();
    assert_eq!(wizard.next(api, ui).await.unwrap(), NextOutcome::Advanced(Step::DateTimeConfirmation));
    wizard
}

#[tokio::test]
async fn test_full_consultation_booking() {
    let server = signed_in().await;
    let date = upcoming_weekday();
    let start = date.and_hms_opt(7, 0, 0).unwrap();
    assert!(server.state.data.write().await.add_slot(SLOT_ID, PROFESSIONAL_ID, start));

    let mut ui = UiState::default();
    let mut wizard = through_step_two(&server.api, &mut ui).await;

    // inactive "Consulta domiciliar" never reaches the selector
    assert_eq!(wizard.services.consultation_types().len(), 6);
    let professionals: Vec<i64> = wizard.services.professionals().iter().map(|p| p.id).collect();
    assert_eq!(professionals, vec![1, 5, 6]);

    assert!(!wizard.is_date_disabled(date));
    wizard.choose_date(&server.api, &mut ui, date).await.unwrap();
    assert_eq!(wizard.schedule.slots().first().map(|s| s.slot_id), Some(SLOT_ID));
    wizard.select_slot(SLOT_ID).unwrap();
    wizard.set_observations("  Trazer exames anteriores ").unwrap();

    let summary = wizard.summary();
    assert_eq!(summary.patient_cpf.as_deref(), Some("123.456.789-01"));
    assert_eq!(summary.time.as_deref(), Some("07:00 - 07:30"));

    let outcome = wizard.next(&server.api, &mut ui).await.unwrap();
    let NextOutcome::Submitted(ack) = outcome else {
        panic!("expected submission, got {outcome:?}");
    };
    assert_eq!(ack.appointment_id, Some(1));
    assert!(matches!(wizard.status(), WizardStatus::Submitted(_)));
    assert_eq!(ui.location(), DASHBOARD_PATH);
    assert_eq!(ui.alert.current().map(|a| a.message.as_str()), Some("Appointment created successfully"));

    let data = server.state.data.read().await;
    let booked = &data.appointments()[0].request;
    assert_eq!(booked.patient_id, 1);
    assert_eq!(booked.consultation_type_id, Some(RETORNO));
    assert_eq!(booked.professional_id, Some(PROFESSIONAL_ID));
    assert_eq!(booked.slot_id, SLOT_ID);
    assert_eq!(booked.date, date);
    assert_eq!(booked.observations, "Trazer exames anteriores");
}

#[tokio::test]
async fn test_taken_slot_keeps_draft_and_alerts() {
    let server = signed_in().await;
    let date = upcoming_weekday();
    server
        .state
        .data
        .write()
        .await
        .add_slot(SLOT_ID, PROFESSIONAL_ID, date.and_hms_opt(7, 0, 0).unwrap());

    let mut ui = UiState::default();
    let mut wizard = through_step_two(&server.api, &mut ui).await;
    wizard.choose_date(&server.api, &mut ui, date).await.unwrap();
    wizard.select_slot(SLOT_ID).unwrap();

    // someone else books it between loading and confirming
    let request = AppointmentRequest {
        appointment_type: AppointmentType::Consulta,
        patient_id: 2,
        consultation_type_id: Some(RETORNO),
        professional_id: Some(PROFESSIONAL_ID),
        exam_type_id: None,
        date,
        slot_id: SLOT_ID,
        observations: String::new(),
    };
    server.api.create_appointment(&request).await.unwrap();

    let outcome = wizard.next(&server.api, &mut ui).await.unwrap();

    assert_eq!(outcome, NextOutcome::SubmitFailed);
    assert_eq!(wizard.status(), &WizardStatus::Editing);
    assert_eq!(wizard.draft().slot_id(), Some(SLOT_ID));
    assert_eq!(
        ui.alert.current().map(|a| a.message.as_str()),
        Some("Time slot is no longer available")
    );
    assert!(ui.history().is_empty());
}

#[tokio::test]
async fn test_missing_session_redirects_to_login() {
    let server = spawn_mock().await;
    let mut ui = UiState::default();
    let mut wizard = WizardController::new();

    wizard.search_patients(&server.api, &mut ui, "maria").await.unwrap();

    assert_eq!(ui.location(), LOGIN_PATH);
    assert!(!ui.alert.is_open());
    assert!(wizard.patients.results().is_empty());
    assert!(!ui.loading.is_active());
}

#[tokio::test]
async fn test_non_staff_submission_redirects_to_dashboard() {
    let server = spawn_mock().await;
    server
        .state
        .data
        .write()
        .await
        .add_user("Paciente Portal", "portal@clinic.local", "portal123", &["patient"])
        .unwrap();
    common::login(&server.api, &*server.session, "portal@clinic.local", "portal123").await;

    let date = upcoming_weekday();
    server
        .state
        .data
        .write()
        .await
        .add_slot(SLOT_ID, PROFESSIONAL_ID, date.and_hms_opt(7, 0, 0).unwrap());

    let mut ui = UiState::default().at("/appointments/new");
    let mut wizard = through_step_two(&server.api, &mut ui).await;
    wizard.choose_date(&server.api, &mut ui, date).await.unwrap();
    wizard.select_slot(SLOT_ID).unwrap();

    let outcome = wizard.next(&server.api, &mut ui).await.unwrap();

    assert_eq!(outcome, NextOutcome::SubmitFailed);
    assert_eq!(ui.location(), DASHBOARD_PATH);
    assert!(!ui.alert.is_open());
    assert!(server.state.data.read().await.appointments().is_empty());

    let direct = server
        .api
        .create_appointment(&wizard.draft().to_request().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(direct, ApiError::Forbidden(_)));
}
