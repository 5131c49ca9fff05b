pub mod dashboard;
pub mod health;
pub mod lessons;
pub mod users;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{auth::guard, state::AppState};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new().nest("/api", api_routes(state))
}

/// API routes under /api prefix. Each guarded sub-router declares its
/// required role; the guard runs before any handler and returns the
/// uniform denial response on failure.
fn api_routes(state: AppState) -> Router {
    // Public routes: health probes and the provisioning redemption flows
    // (no role exists yet for those callers).
    let public = Router::new()
        .merge(health::routes())
        .route("/v1/users/set_password", post(users::set_password))
        .route("/v1/users/forgot_password", post(users::forgot_password))
        .route("/v1/users/reset_password", post(users::reset_password));

    let student = Router::new()
        .route("/v1/student/dashboard", get(dashboard::student_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_student,
        ));

    let teacher = Router::new()
        .route(
            "/v1/lessons",
            post(lessons::create_lesson).get(lessons::list_lessons),
        )
        .route("/v1/lessons/:id", get(lessons::get_lesson))
        .route("/v1/students", get(users::list_students))
        .route("/v1/teacher/dashboard", get(dashboard::teacher_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_teacher,
        ));

    let admin = Router::new()
        .route("/v1/users/invite", post(users::invite))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_admin,
        ));

    public
        .merge(student)
        .merge(teacher)
        .merge(admin)
        .with_state(state)
}
