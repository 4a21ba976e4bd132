// src/mock_api/data.rs
//
// In-memory tables behind the development API. Seeded with the clinic's
// reference data and a few weeks of generated availability.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

use super::credentials::{generate_access_token, hash_access_token, hash_password};
use super::error::RouteError;
use crate::format::digits_only;
use crate::models::{
    AppointmentRequest, AppointmentType, ConsultationType, PaginationMeta, Patient, PatientPage, Professional,
    TimeSlot, User,
};

/// Roles allowed to create appointments.
pub const STAFF_ROLES: &[&str] = &["admin", "receptionist", "professional"];

pub const SESSION_TTL_HOURS: i64 = 12;

const SLOT_MINUTES: i64 = 30;
const SLOTS_PER_DAY: i64 = 8;
const FIRST_SLOT_HOUR: i64 = 8;
const SCHEDULE_DAYS: i64 = 21;
const FIRST_GENERATED_SLOT_ID: i64 = 100;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct StaffUser {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub active: bool,
}

impl StaffUser {
    pub fn profile(&self) -> User {
        User {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }

    pub fn is_staff(&self) -> bool {
        self.roles.iter().any(|r| STAFF_ROLES.contains(&r.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct SessionRow {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SlotRow {
    pub slot_id: i64,
    pub professional_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub booked: bool,
}

impl SlotRow {
    fn to_time_slot(&self) -> TimeSlot {
        TimeSlot {
            slot_id: self.slot_id,
            start_time: self.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            end_time: self.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppointmentRow {
    pub appointment_id: i64,
    pub request: AppointmentRequest,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MockData {
    users: Vec<StaffUser>,
    sessions: HashMap<String, SessionRow>,
    consultation_types: Vec<ConsultationType>,
    professionals: Vec<Professional>,
    /// (consultation_type_id, professional_id)
    offerings: Vec<(i64, i64)>,
    patients: Vec<Patient>,
    slots: Vec<SlotRow>,
    appointments: Vec<AppointmentRow>,
}

impl MockData {
    /// Reference data, one admin login, and availability for the weekdays
    /// after `today`.
    pub fn seeded(admin_email: &str, admin_password: &str, today: NaiveDate) -> anyhow::Result<Self> {
        let mut data = MockData {
            consultation_types: seed_consultation_types(),
            professionals: seed_professionals(),
            offerings: SEED_OFFERINGS.to_vec(),
            patients: seed_patients(),
            ..Default::default()
        };
        data.add_user("Administrador", admin_email, admin_password, &["admin"])?;
        data.generate_slots(today);
        Ok(data)
    }

    pub fn add_user(&mut self, full_name: &str, email: &str, password: &str, roles: &[&str]) -> anyhow::Result<i64> {
        let id = self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        self.users.push(StaffUser {
            id,
            full_name: full_name.to_string(),
            email: email.trim().to_lowercase(),
            password_hash: hash_password(password)?,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            active: true,
        });
        Ok(id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&StaffUser> {
        let email = email.trim().to_lowercase();
        self.users.iter().find(|u| u.email == email)
    }

    /// Returns the plain token; only its hash is kept. Sessions already
    /// expired at `now` are dropped first.
    pub fn open_session(&mut self, user_id: i64, now: DateTime<Utc>) -> String {
        self.sessions.retain(|_, s| s.expires_at > now);
        let token = generate_access_token();
        self.sessions.insert(
            hash_access_token(&token),
            SessionRow {
                user_id,
                expires_at: now + Duration::hours(SESSION_TTL_HOURS),
            },
        );
        token
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Active user behind a live session.
    pub fn session_user(&self, token_hash: &str, now: DateTime<Utc>) -> Option<&StaffUser> {
        let session = self.sessions.get(token_hash).filter(|s| s.expires_at > now)?;
        self.users.iter().find(|u| u.id == session.user_id && u.active)
    }

    pub fn revoke_session(&mut self, token_hash: &str) -> bool {
        self.sessions.remove(token_hash).is_some()
    }

    pub fn consultation_types(&self) -> &[ConsultationType] {
        &self.consultation_types
    }

    pub fn professionals_for(&self, consultation_type_id: i64) -> Option<Vec<Professional>> {
        self.consultation_types.iter().find(|t| t.id == consultation_type_id)?;
        Some(
            self.professionals
                .iter()
                .filter(|p| self.offerings.contains(&(consultation_type_id, p.id)))
                .cloned()
                .collect(),
        )
    }

    fn has_professional(&self, professional_id: i64) -> bool {
        self.professionals.iter().any(|p| p.id == professional_id)
    }

    /// Days from `today` on with at least one free slot, ascending.
    pub fn available_days(&self, professional_id: i64, today: NaiveDate) -> Option<Vec<NaiveDate>> {
        if !self.has_professional(professional_id) {
            return None;
        }
        let mut days: Vec<NaiveDate> = self
            .free_slots(professional_id)
            .map(|s| s.start.date())
            .filter(|d| *d >= today)
            .collect();
        days.sort();
        days.dedup();
        Some(days)
    }

    pub fn available_slots(&self, professional_id: i64, date: NaiveDate) -> Option<Vec<TimeSlot>> {
        if !self.has_professional(professional_id) {
            return None;
        }
        let mut slots: Vec<&SlotRow> = self
            .free_slots(professional_id)
            .filter(|s| s.start.date() == date)
            .collect();
        slots.sort_by_key(|s| s.start);
        Some(slots.into_iter().map(SlotRow::to_time_slot).collect())
    }

    fn free_slots(&self, professional_id: i64) -> impl Iterator<Item = &SlotRow> {
        self.slots
            .iter()
            .filter(move |s| s.professional_id == professional_id && !s.booked)
    }

    /// Adds one free slot. Returns false when the id is taken.
    pub fn add_slot(&mut self, slot_id: i64, professional_id: i64, start: NaiveDateTime) -> bool {
        if self.slots.iter().any(|s| s.slot_id == slot_id) {
            return false;
        }
        self.slots.push(SlotRow {
            slot_id,
            professional_id,
            start,
            end: start + Duration::minutes(SLOT_MINUTES),
            booked: false,
        });
        true
    }

    /// Even ids work Monday/Wednesday/Friday, odd ids Tuesday/Thursday.
    fn generate_slots(&mut self, today: NaiveDate) {
        let mut next_id = FIRST_GENERATED_SLOT_ID;
        let ids: Vec<i64> = self.professionals.iter().map(|p| p.id).collect();
        for offset in 1..=SCHEDULE_DAYS {
            let date = today + Duration::days(offset);
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            let weekday = i64::from(date.weekday().num_days_from_monday());
            for &professional_id in &ids {
                if (weekday + professional_id) % 2 != 0 {
                    continue;
                }
                let opening = date.and_time(NaiveTime::MIN) + Duration::hours(FIRST_SLOT_HOUR);
                for n in 0..SLOTS_PER_DAY {
                    self.add_slot(next_id, professional_id, opening + Duration::minutes(n * SLOT_MINUTES));
                    next_id += 1;
                }
            }
        }
    }

    pub fn list_patients(&self, page: u32, limit_per_page: u32, cpf: Option<&str>) -> PatientPage {
        let page = page.max(1);
        let limit = limit_per_page.clamp(1, MAX_PAGE_SIZE);
        let cpf = cpf.map(digits_only).filter(|c| !c.is_empty());

        let matching: Vec<&Patient> = self
            .patients
            .iter()
            .filter(|p| p.active)
            .filter(|p| cpf.as_ref().is_none_or(|c| digits_only(&p.cpf).contains(c.as_str())))
            .collect();

        let offset = u64::from(page - 1).saturating_mul(u64::from(limit));
        let data = matching
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .map(|p| (*p).clone())
            .collect();

        PatientPage {
            data,
            pagination: PaginationMeta {
                total: matching.len() as u64,
                page,
                limit_per_page: limit,
            },
        }
    }

    pub fn appointments(&self) -> &[AppointmentRow] {
        &self.appointments
    }

    /// Checks the request against reference data and the slot table, then
    /// takes the slot.
    pub fn book(&mut self, user_id: i64, req: &AppointmentRequest) -> Result<i64, RouteError> {
        let professional_id = match req.appointment_type {
            AppointmentType::Exame => {
                return Err(RouteError::BadRequest(
                    "EXAM_UNAVAILABLE",
                    "Exam scheduling is not available".into(),
                ));
            }
            AppointmentType::Consulta => {
                let (Some(type_id), Some(professional_id)) = (req.consultation_type_id, req.professional_id) else {
                    return Err(RouteError::validation(
                        "consultation_type_id and professional_id are required",
                    ));
                };
                if !self.consultation_types.iter().any(|t| t.id == type_id && t.active) {
                    return Err(RouteError::validation("Unknown consultation type"));
                }
                if !self.offerings.contains(&(type_id, professional_id)) {
                    return Err(RouteError::validation(
                        "Professional does not offer this consultation type",
                    ));
                }
                professional_id
            }
        };

        if !self.patients.iter().any(|p| p.id == req.patient_id && p.active) {
            return Err(RouteError::NotFound("PATIENT_NOT_FOUND", "Patient not found".into()));
        }

        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.slot_id == req.slot_id && s.professional_id == professional_id && s.start.date() == req.date)
            .ok_or_else(|| RouteError::NotFound("SLOT_NOT_FOUND", "Time slot not found".into()))?;
        if slot.booked {
            return Err(RouteError::Conflict(
                "SLOT_TAKEN",
                "Time slot is no longer available".into(),
            ));
        }
        slot.booked = true;

        let appointment_id = self.appointments.len() as i64 + 1;
        self.appointments.push(AppointmentRow {
            appointment_id,
            request: req.clone(),
            created_by: user_id,
            created_at: Utc::now(),
        });
        Ok(appointment_id)
    }
}

const SEED_OFFERINGS: &[(i64, i64)] = &[
    (1, 1), (1, 2), (1, 3), (1, 4),
    (2, 1), (2, 5), (2, 6),
    (3, 1), (3, 3), (3, 7),
    (4, 2), (4, 4), (4, 8),
    (5, 3), (5, 5),
    (6, 3), (6, 6), (6, 7),
];

fn seed_consultation_types() -> Vec<ConsultationType> {
    [
        (1, "Primeira consulta", 60, true),
        (2, "Retorno", 30, true),
        (3, "Consulta de urgência", 30, true),
        (4, "Consulta de rotina", 30, true),
        (5, "Consulta pré-operatória", 45, true),
        (6, "Consulta pós-operatória", 30, true),
        (7, "Consulta domiciliar", 60, false),
    ]
    .into_iter()
    .map(|(id, name, duration_minutes, active)| ConsultationType {
        id,
        name: name.to_string(),
        duration_minutes,
        active,
    })
    .collect()
}

fn seed_professionals() -> Vec<Professional> {
    [
        (1, "Dr. João Silva", "Cardiologia"),
        (2, "Dra. Maria Santos", "Dermatologia"),
        (3, "Dr. Carlos Lima", "Ortopedia"),
        (4, "Dra. Ana Costa", "Pediatria"),
        (5, "Dr. Roberto Almeida", "Neurologia"),
        (6, "Dra. Fernanda Rodrigues", "Ginecologia"),
        (7, "Dr. Pedro Santos", "Urologia"),
        (8, "Dra. Juliana Pereira", "Endocrinologia"),
    ]
    .into_iter()
    .map(|(id, name, specialty)| Professional {
        id,
        name: name.to_string(),
        specialty: specialty.to_string(),
    })
    .collect()
}

fn seed_patients() -> Vec<Patient> {
    [
        ("Maria Souza", "12345678901", "maria.souza@email.com", "11987654321", (1985, 3, 12)),
        ("José Oliveira", "23456789012", "jose.oliveira@email.com", "11976543210", (1972, 7, 30)),
        ("Ana Paula Ferreira", "34567890123", "ana.ferreira@email.com", "21965432109", (1990, 11, 2)),
        ("Carlos Eduardo Lima", "45678901234", "carlos.lima@email.com", "31954321098", (1968, 1, 19)),
        ("Beatriz Gomes", "56789012345", "beatriz.gomes@email.com", "41943210987", (2001, 5, 25)),
        ("Rafael Martins", "67890123456", "rafael.martins@email.com", "51932109876", (1995, 9, 8)),
        ("Luciana Ribeiro", "78901234567", "luciana.ribeiro@email.com", "61921098765", (1980, 12, 14)),
        ("Fernando Alves", "89012345678", "fernando.alves@email.com", "71910987654", (1959, 4, 3)),
        ("Patrícia Carvalho", "90123456789", "patricia.carvalho@email.com", "81909876543", (1988, 8, 21)),
        ("Gustavo Rocha", "01234567890", "gustavo.rocha@email.com", "91998765432", (1976, 6, 17)),
        ("Camila Barbosa", "11223344556", "camila.barbosa@email.com", "11988776655", (1999, 10, 29)),
        ("Ricardo Teixeira", "22334455667", "ricardo.teixeira@email.com", "11977665544", (1964, 2, 11)),
    ]
    .into_iter()
    .zip(1..)
    .map(|((full_name, cpf, email, phone, (y, m, d)), id)| Patient {
        id,
        full_name: full_name.to_string(),
        cpf: cpf.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        birth_date: NaiveDate::from_ymd_opt(y, m, d),
        health_conditions: None,
        active: true,
    })
    .collect()
}
