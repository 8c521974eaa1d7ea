use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::JwtKeys,
    error::ApiError,
    state::AppState,
    users::{
        dto::{
            AuthResponse, FindUserRequest, FindUserResponse, LoginRequest, ProfileResponse,
            QrAuthRequest, QrAuthResponse, RegisterRequest, RemoveDoctorRequest,
            SelfReportRequest,
        },
        repo_types::{Doctor, NewUser, PrescriptionWithDoctor, Report, User},
        services::{has_history, validate_login, validate_registration},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/userReports", post(submit_self_report))
        .route("/qrauth", post(qr_authenticate))
        .route("/findUser", post(find_user))
        .route("/removeCurrentDoctor", post(remove_current_doctor))
        .route("/:id", get(get_user_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    validate_registration(&payload.name, &payload.email)?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::bad_request("User already exists"));
    }

    let user = User::create(
        &state.db,
        &NewUser {
            name: payload.name,
            age: payload.age,
            email: payload.email,
            contact: payload.contact,
            emergency_contact: payload.emergency_contact,
        },
    )
    .await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(AuthResponse { token, user }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    validate_login(&payload.email)?;

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login for unknown email");
            ApiError::bad_request("User not found")
        })?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse { token, user }))
}

#[instrument(skip(state, payload))]
pub async fn submit_self_report(
    State(state): State<AppState>,
    Json(payload): Json<SelfReportRequest>,
) -> Result<Json<Report>, ApiError> {
    let report = Report::create(&state.db, &payload.title, &payload.file, payload.user).await?;
    info!(report_id = %report.id, patient = %report.patient, "self report stored");
    Ok(Json(report))
}

/// Associates the scanned doctor with the patient identified by contact.
/// Both parties must resolve before anything is written.
#[instrument(skip(state, payload))]
pub async fn qr_authenticate(
    State(state): State<AppState>,
    Json(payload): Json<QrAuthRequest>,
) -> Result<Json<QrAuthResponse>, ApiError> {
    let user = User::find_by_contact(&state.db, &payload.contact)
        .await?
        .ok_or_else(|| {
            warn!(contact = %payload.contact, "qr auth for unknown contact");
            ApiError::not_found("User not found")
        })?;

    let doctor = Doctor::find_by_email(&state.db, &payload.doctor_email)
        .await?
        .ok_or_else(|| {
            warn!(doctor_email = %payload.doctor_email, "qr auth for unknown doctor");
            ApiError::not_found("Doctor not found")
        })?;

    let updated_user = User::set_current_doctor(&state.db, user.id, Some(doctor.id)).await?;
    info!(user_id = %updated_user.id, doctor_id = %doctor.id, "doctor associated");
    Ok(Json(QrAuthResponse { updated_user }))
}

#[instrument(skip(state))]
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let user = User::find_by_id(&state.db, id).await?.ok_or_else(|| {
        warn!(user_id = %id, "profile for unknown user");
        ApiError::not_found("User not found")
    })?;

    let user_reports = Report::list_by_patient(&state.db, id).await?;
    let user_prescriptions = PrescriptionWithDoctor::list_by_patient(&state.db, id).await?;

    if !has_history(user_reports.len(), user_prescriptions.len()) {
        return Err(ApiError::bad_request(
            "No previous reports and prescriptions available",
        ));
    }

    // 201 on this read is part of the wire contract; existing clients key on it.
    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            user_prescriptions,
            user_reports,
            user,
        }),
    ))
}

/// Exactly one response per request: a hit is a 200 with the user, a miss
/// is a 404 with `found: false` and no user key.
#[instrument(skip(state, payload))]
pub async fn find_user(
    State(state): State<AppState>,
    Json(payload): Json<FindUserRequest>,
) -> Result<(StatusCode, Json<FindUserResponse>), ApiError> {
    match User::find_by_contact(&state.db, &payload.contact).await? {
        Some(user) => Ok((
            StatusCode::OK,
            Json(FindUserResponse {
                msg: "User found",
                found: true,
                user: Some(user),
            }),
        )),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(FindUserResponse {
                msg: "User not found",
                found: false,
                user: None,
            }),
        )),
    }
}

#[instrument(skip(state, payload))]
pub async fn remove_current_doctor(
    State(state): State<AppState>,
    Json(payload): Json<RemoveDoctorRequest>,
) -> Result<Json<User>, ApiError> {
    // doctor_id arrives with the request but plays no part in the outcome
    debug!(doctor_id = ?payload.doctor_id, "doctor id on remove request ignored");

    User::find_by_id(&state.db, payload.user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %payload.user_id, "remove doctor for unknown user");
            ApiError::not_found("User not found")
        })?;

    let updated = User::set_current_doctor(&state.db, payload.user_id, None).await?;
    info!(user_id = %updated.id, "current doctor cleared");
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Validation runs before any store access, so these exercise the
    // short-circuit paths against a lazily-connecting pool.

    #[tokio::test]
    async fn register_rejects_invalid_email_before_store_access() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            name: "Asha Rao".into(),
            age: None,
            email: "not-an-email".into(),
            contact: None,
            emergency_contact: None,
        };
        let result = register(State(state), Json(payload)).await;
        match result {
            Err(ApiError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].param, "email");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_reports_every_invalid_field() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            name: "".into(),
            age: None,
            email: "still not an email".into(),
            contact: None,
            emergency_contact: None,
        };
        let result = register(State(state), Json(payload)).await;
        match result {
            Err(ApiError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.param == "name"));
                assert!(errors.iter().any(|e| e.param == "email"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_rejects_invalid_email_before_store_access() {
        let state = AppState::fake();
        let payload = LoginRequest {
            email: "bad address".into(),
        };
        let result = login(State(state), Json(payload)).await;
        match result {
            Err(ApiError::Validation(errors)) => {
                assert_eq!(errors[0].param, "email");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
