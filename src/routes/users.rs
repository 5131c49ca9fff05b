use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, Result},
    models::{NewInvite, Role, User},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub user: InviteParams,
}

#[derive(Debug, Deserialize)]
pub struct InviteParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub user: RedeemParams,
}

#[derive(Debug, Deserialize)]
pub struct RedeemParams {
    pub uuid: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub user: ForgotPasswordParams,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordParams {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for StudentResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub students: Vec<StudentResponse>,
}

/// Admin action: provision a pending account and send the set-password email
pub async fn invite(
    State(state): State<AppState>,
    Json(payload): Json<InviteRequest>,
) -> Result<StatusCode> {
    let params = payload.user;

    if params.first_name.trim().is_empty()
        || params.last_name.trim().is_empty()
        || params.email.trim().is_empty()
    {
        return Err(AppError::Validation(
            "invite requires first name, last name, and email".to_string(),
        ));
    }

    state
        .account
        .invite(NewInvite {
            first_name: params.first_name.trim().to_string(),
            last_name: params.last_name.trim().to_string(),
            email: params.email.trim().to_string(),
            role: params.role,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Redeem a pending invite: choose a password, activate the account
pub async fn set_password(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> Result<StatusCode> {
    let params = payload.user;
    let one_time_id = parse_one_time_id(&params.uuid)?;

    state
        .account
        .redeem_invite(one_time_id, &params.password, &params.password_confirmation)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Request a password reset email for an existing account
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<StatusCode> {
    state.account.request_reset(&payload.user.email).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Redeem a pending password reset
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> Result<StatusCode> {
    let params = payload.user;
    let one_time_id = parse_one_time_id(&params.uuid)?;

    state
        .account
        .redeem_reset(one_time_id, &params.password, &params.password_confirmation)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List all students
pub async fn list_students(State(state): State<AppState>) -> Result<Json<StudentListResponse>> {
    let students = state.users.list_by_role(Role::Student).await?;

    Ok(Json(StudentListResponse {
        students: students.iter().map(StudentResponse::from).collect(),
    }))
}

/// A malformed one-time id can never match a pending record; it folds into
/// the same denial as an unknown one.
fn parse_one_time_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("malformed one-time id".to_string()))
}
