use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo_types::{
    Doctor, NewUser, PrescriptionDoctorRow, PrescriptionWithDoctor, Report, User,
};

impl User {
    /// Find a user by primary id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, age, email, contact, emergency_contact, current_doctor, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, age, email, contact, emergency_contact, current_doctor, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by contact number, the lookup key the QR flow carries.
    pub async fn find_by_contact(db: &PgPool, contact: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, age, email, contact, emergency_contact, current_doctor, created_at
            FROM users
            WHERE contact = $1
            "#,
        )
        .bind(contact)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user; unsupplied optional fields stay NULL.
    pub async fn create(db: &PgPool, new: &NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, age, email, contact, emergency_contact)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, age, email, contact, emergency_contact, current_doctor, created_at
            "#,
        )
        .bind(&new.name)
        .bind(new.age)
        .bind(&new.email)
        .bind(&new.contact)
        .bind(&new.emergency_contact)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Set or clear the current doctor association, returning the updated
    /// row. Last write wins under concurrent calls; row-level atomicity is
    /// the only guarantee.
    pub async fn set_current_doctor(
        db: &PgPool,
        id: Uuid,
        doctor: Option<Uuid>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET current_doctor = $2
            WHERE id = $1
            RETURNING id, name, age, email, contact, emergency_contact, current_doctor, created_at
            "#,
        )
        .bind(id)
        .bind(doctor)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}

impl Doctor {
    /// Find a doctor by email, the identifier a scanned QR code carries.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Doctor>> {
        let doctor = sqlx::query_as::<_, Doctor>(
            r#"
            SELECT id, name, email, created_at
            FROM doctors
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(doctor)
    }
}

impl Report {
    /// Persist a self-submitted report for a patient.
    pub async fn create(
        db: &PgPool,
        title: &str,
        file: &str,
        patient: Uuid,
    ) -> anyhow::Result<Report> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (title, file, patient)
            VALUES ($1, $2, $3)
            RETURNING id, title, file, patient, created_at
            "#,
        )
        .bind(title)
        .bind(file)
        .bind(patient)
        .fetch_one(db)
        .await?;
        Ok(report)
    }

    pub async fn list_by_patient(db: &PgPool, patient: Uuid) -> anyhow::Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, title, file, patient, created_at
            FROM reports
            WHERE patient = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(patient)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

impl PrescriptionWithDoctor {
    /// List a patient's prescriptions with each referenced doctor expanded.
    pub async fn list_by_patient(
        db: &PgPool,
        patient: Uuid,
    ) -> anyhow::Result<Vec<PrescriptionWithDoctor>> {
        let rows = sqlx::query_as::<_, PrescriptionDoctorRow>(
            r#"
            SELECT p.id, p.patient, p.medication, p.notes, p.created_at,
                   d.id AS doctor_id, d.name AS doctor_name,
                   d.email AS doctor_email, d.created_at AS doctor_created_at
            FROM prescriptions p
            JOIN doctors d ON d.id = p.doctor
            WHERE p.patient = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(patient)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
