use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::{PrescriptionWithDoctor, Report, User};

/// Request body for patient registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    pub email: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
}

/// Request body for login. Password-less: possession of the email is the
/// whole credential.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Request body for a self-submitted report. `user` is the patient id.
#[derive(Debug, Deserialize)]
pub struct SelfReportRequest {
    pub title: String,
    pub file: String,
    pub user: Uuid,
}

/// Request body carried by a QR scan: the scanned doctor's email plus the
/// patient's contact number.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrAuthRequest {
    pub doctor_email: String,
    pub contact: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrAuthResponse {
    pub updated_user: User,
}

/// Everything a patient sees on their own profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_prescriptions: Vec<PrescriptionWithDoctor>,
    pub user_reports: Vec<Report>,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct FindUserRequest {
    pub contact: String,
}

#[derive(Debug, Serialize)]
pub struct FindUserResponse {
    pub msg: &'static str,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// `doctor_id` is accepted for wire compatibility but never validated; the
/// outcome depends only on `user_id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDoctorRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub doctor_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Asha Rao".into(),
            age: None,
            email: "asha@example.com".into(),
            contact: Some("9876543210".into()),
            emergency_contact: None,
            current_doctor: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn find_user_miss_omits_user_key() {
        let body = FindUserResponse {
            msg: "User not found",
            found: false,
            user: None,
        };
        let json = serde_json::to_value(&body).expect("serialize miss");
        assert_eq!(json["found"], false);
        assert!(json.get("user").is_none());
    }

    #[test]
    fn find_user_hit_includes_user_payload() {
        let body = FindUserResponse {
            msg: "User found",
            found: true,
            user: Some(sample_user()),
        };
        let json = serde_json::to_value(&body).expect("serialize hit");
        assert_eq!(json["found"], true);
        assert_eq!(json["user"]["email"], "asha@example.com");
    }

    #[test]
    fn qr_auth_response_uses_updated_user_key() {
        let body = QrAuthResponse {
            updated_user: sample_user(),
        };
        let json = serde_json::to_value(&body).expect("serialize qr auth");
        assert!(json.get("updatedUser").is_some());
    }

    #[test]
    fn profile_response_uses_wire_key_names() {
        let body = ProfileResponse {
            user_prescriptions: vec![],
            user_reports: vec![],
            user: sample_user(),
        };
        let json = serde_json::to_value(&body).expect("serialize profile");
        assert!(json.get("userPrescriptions").is_some());
        assert!(json.get("userReports").is_some());
        assert!(json.get("user").is_some());
    }

    #[test]
    fn register_request_accepts_missing_optionals() {
        let parsed: RegisterRequest =
            serde_json::from_str(r#"{"name": "Asha Rao", "email": "asha@example.com"}"#)
                .expect("deserialize minimal register body");
        assert_eq!(parsed.name, "Asha Rao");
        assert!(parsed.age.is_none());
        assert!(parsed.contact.is_none());
        assert!(parsed.emergency_contact.is_none());
    }

    #[test]
    fn remove_doctor_request_takes_any_doctor_id() {
        let parsed: RemoveDoctorRequest = serde_json::from_str(&format!(
            r#"{{"userId": "{}", "doctorId": "definitely-not-a-doctor"}}"#,
            Uuid::new_v4()
        ))
        .expect("deserialize remove body");
        assert_eq!(parsed.doctor_id.as_deref(), Some("definitely-not-a-doctor"));
    }
}
