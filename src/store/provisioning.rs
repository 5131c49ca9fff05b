use async_trait::async_trait;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{NewInvite, PendingInvite, PendingPasswordReset};

use super::StoreResult;

/// Storage for the two kinds of one-time provisioning records.
///
/// Consumption is atomic per id: of any number of concurrent consumers of
/// the same one_time_id, exactly one receives the record and the rest
/// observe `None`. The backend's delete-and-return is the only
/// synchronization primitive; callers never do separate read-then-delete.
#[async_trait]
pub trait ProvisioningStore: Send + Sync {
    async fn create_invite(&self, invite: NewInvite) -> StoreResult<PendingInvite>;

    async fn find_invite(&self, one_time_id: Uuid) -> StoreResult<Option<PendingInvite>>;

    /// Atomic find-then-delete.
    async fn consume_invite(&self, one_time_id: Uuid) -> StoreResult<Option<PendingInvite>>;

    /// Reinstates a consumed invite after a downstream failure so the
    /// redemption can be retried.
    async fn restore_invite(&self, invite: PendingInvite) -> StoreResult<()>;

    /// Mints a reset record with a fresh opaque one_time_id.
    async fn create_reset(&self, user_id: Uuid) -> StoreResult<PendingPasswordReset>;

    async fn find_reset(&self, one_time_id: Uuid) -> StoreResult<Option<PendingPasswordReset>>;

    /// Atomic find-then-delete.
    async fn consume_reset(&self, one_time_id: Uuid)
        -> StoreResult<Option<PendingPasswordReset>>;

    async fn restore_reset(&self, reset: PendingPasswordReset) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct PgProvisioningStore {
    pool: DbPool,
}

impl PgProvisioningStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProvisioningStore for PgProvisioningStore {
    async fn create_invite(&self, invite: NewInvite) -> StoreResult<PendingInvite> {
        let created = sqlx::query_as::<_, PendingInvite>(
            r#"
            INSERT INTO pending_invites (one_time_id, first_name, last_name, email, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING one_time_id, first_name, last_name, email, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&invite.first_name)
        .bind(&invite.last_name)
        .bind(&invite.email)
        .bind(invite.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_invite(&self, one_time_id: Uuid) -> StoreResult<Option<PendingInvite>> {
        let invite = sqlx::query_as::<_, PendingInvite>(
            r#"
            SELECT one_time_id, first_name, last_name, email, role, created_at
            FROM pending_invites
            WHERE one_time_id = $1
            "#,
        )
        .bind(one_time_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invite)
    }

    async fn consume_invite(&self, one_time_id: Uuid) -> StoreResult<Option<PendingInvite>> {
        let invite = sqlx::query_as::<_, PendingInvite>(
            r#"
            DELETE FROM pending_invites
            WHERE one_time_id = $1
            RETURNING one_time_id, first_name, last_name, email, role, created_at
            "#,
        )
        .bind(one_time_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invite)
    }

    async fn restore_invite(&self, invite: PendingInvite) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pending_invites (one_time_id, first_name, last_name, email, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (one_time_id) DO NOTHING
            "#,
        )
        .bind(invite.one_time_id)
        .bind(&invite.first_name)
        .bind(&invite.last_name)
        .bind(&invite.email)
        .bind(invite.role)
        .bind(invite.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_reset(&self, user_id: Uuid) -> StoreResult<PendingPasswordReset> {
        let created = sqlx::query_as::<_, PendingPasswordReset>(
            r#"
            INSERT INTO password_resets (one_time_id, user_id)
            VALUES ($1, $2)
            RETURNING one_time_id, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_reset(&self, one_time_id: Uuid) -> StoreResult<Option<PendingPasswordReset>> {
        let reset = sqlx::query_as::<_, PendingPasswordReset>(
            r#"
            SELECT one_time_id, user_id, created_at
            FROM password_resets
            WHERE one_time_id = $1
            "#,
        )
        .bind(one_time_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reset)
    }

    async fn consume_reset(
        &self,
        one_time_id: Uuid,
    ) -> StoreResult<Option<PendingPasswordReset>> {
        let reset = sqlx::query_as::<_, PendingPasswordReset>(
            r#"
            DELETE FROM password_resets
            WHERE one_time_id = $1
            RETURNING one_time_id, user_id, created_at
            "#,
        )
        .bind(one_time_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reset)
    }

    async fn restore_reset(&self, reset: PendingPasswordReset) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO password_resets (one_time_id, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (one_time_id) DO NOTHING
            "#,
        )
        .bind(reset.one_time_id)
        .bind(reset.user_id)
        .bind(reset.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
