use axum::{extract::State, Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::Claims,
    errors::{AppError, Result},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(rename = "firstName")]
    pub first_name: String,
}

/// Student landing data: the caller's own first name
pub async fn student_dashboard(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>> {
    show(state, claims).await
}

/// Teacher landing data: the caller's own first name
pub async fn teacher_dashboard(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>> {
    show(state, claims).await
}

async fn show(state: AppState, claims: Claims) -> Result<Json<DashboardResponse>> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("invalid subject id in token".to_string()))?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} for token subject", user_id)))?;

    Ok(Json(DashboardResponse {
        first_name: user.first_name,
    }))
}
