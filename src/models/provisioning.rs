use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::Role;

/// A user account an administrator has provisioned but whose owner has not
/// yet chosen a password. Keyed by an opaque one-time id; consumed exactly
/// once by the set-password flow.
#[derive(Debug, Clone, FromRow)]
pub struct PendingInvite {
    pub one_time_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInvite {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

/// An outstanding password-reset request. Keyed by an opaque one-time id;
/// consumed exactly once by the reset flow.
#[derive(Debug, Clone, FromRow)]
pub struct PendingPasswordReset {
    pub one_time_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
