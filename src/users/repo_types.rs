use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Patient identity record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub age: Option<i32>,
    pub email: String,                     // unique
    pub contact: Option<String>,           // alternate lookup key for the QR flow
    pub emergency_contact: Option<String>,
    pub current_doctor: Option<Uuid>,      // None means unassigned
    pub created_at: OffsetDateTime,
}

/// Fields supplied when registering a patient; the store assigns the rest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub age: Option<i32>,
    pub email: String,
    pub contact: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Doctor identity. Only read here; doctor-side services own the lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: OffsetDateTime,
}

/// Self-submitted patient report. `file` is an opaque content reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub file: String,
    pub patient: Uuid,
    pub created_at: OffsetDateTime,
}

/// Prescription with its referenced doctor expanded, as the profile read
/// returns it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionWithDoctor {
    pub id: Uuid,
    pub patient: Uuid,
    pub medication: Option<String>,
    pub notes: Option<String>,
    pub doctor: Doctor,
    pub created_at: OffsetDateTime,
}

/// Flat row produced by the prescriptions/doctors join.
#[derive(Debug, Clone, FromRow)]
pub struct PrescriptionDoctorRow {
    pub id: Uuid,
    pub patient: Uuid,
    pub medication: Option<String>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub doctor_email: String,
    pub doctor_created_at: OffsetDateTime,
}

impl From<PrescriptionDoctorRow> for PrescriptionWithDoctor {
    fn from(row: PrescriptionDoctorRow) -> Self {
        Self {
            id: row.id,
            patient: row.patient,
            medication: row.medication,
            notes: row.notes,
            doctor: Doctor {
                id: row.doctor_id,
                name: row.doctor_name,
                email: row.doctor_email,
                created_at: row.doctor_created_at,
            },
            created_at: row.created_at,
        }
    }
}
