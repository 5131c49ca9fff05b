use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{auth::authz, auth::jwt, models::Role, state::AppState};

/// Guard for student-gated routes.
pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    gate(state, Role::Student, req, next).await
}

/// Guard for teacher-gated routes.
pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    gate(state, Role::Teacher, req, next).await
}

/// Guard for admin-gated routes.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    gate(state, Role::Admin, req, next).await
}

/// Evaluates the route's declared role requirement before the handler runs.
/// On success the decoded claims are inserted into request extensions for
/// downstream handlers; every failure mode renders the same response.
async fn gate(state: AppState, required: Role, mut req: Request, next: Next) -> Response {
    let claims = match authz::bearer_token(req.headers()) {
        Some(token) => match jwt::decode(token, &state.config.jwt.secret) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(%err, "request denied: token failed to decode");
                return denied();
            }
        },
        None => {
            tracing::debug!("request denied: no bearer token");
            return denied();
        }
    };

    if claims.role != required {
        tracing::debug!(?required, got = ?claims.role, "request denied: role mismatch");
        return denied();
    }

    req.extensions_mut().insert(claims);

    next.run(req).await
}

/// The uniform denial response. Unauthenticated, wrong role, and missing
/// resource are indistinguishable to the caller.
fn denied() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
}
