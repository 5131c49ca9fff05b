use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{credential, NewInvite, NewUser, PendingInvite};
use crate::notify::{Notification, Notifier};
use crate::store::{ProvisioningStore, StoreError, UserStore};

/// Failures of the provisioning flows. All variants collapse to the same
/// wire response at the handler boundary.
#[derive(Debug)]
pub enum ProvisionError {
    NotFound,
    Validation(String),
    Store(StoreError),
    Internal(String),
}

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionError::NotFound => write!(f, "no matching pending record"),
            ProvisionError::Validation(msg) => write!(f, "validation failed: {}", msg),
            ProvisionError::Store(e) => write!(f, "{}", e),
            ProvisionError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ProvisionError {}

impl From<StoreError> for ProvisionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => ProvisionError::Validation(msg),
            other => ProvisionError::Store(other),
        }
    }
}

/// Turns pending invites and password-reset requests into committed
/// credential changes. Owns the one-time-redemption state machine; the
/// stores' atomic consume is the only cross-request synchronization.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    provisioning: Arc<dyn ProvisioningStore>,
    notifier: Arc<dyn Notifier>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        provisioning: Arc<dyn ProvisioningStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            users,
            provisioning,
            notifier,
        }
    }

    /// Admin action: records a pending invite and dispatches the
    /// set-password email carrying its one-time id. Delivery failures are
    /// logged, not surfaced.
    pub async fn invite(&self, invite: NewInvite) -> Result<PendingInvite, ProvisionError> {
        let pending = self.provisioning.create_invite(invite).await?;

        tracing::info!(
            one_time_id = %pending.one_time_id,
            email = %pending.email,
            "pending invite created"
        );

        let notification = Notification::SetPassword {
            email: pending.email.clone(),
            first_name: pending.first_name.clone(),
            one_time_id: pending.one_time_id,
        };
        if let Err(err) = self.notifier.send(notification).await {
            tracing::warn!(%err, "failed to dispatch set-password notification");
        }

        Ok(pending)
    }

    /// Consumes the matching invite and creates the user from its identity
    /// fields plus the submitted password pair.
    ///
    /// The password is validated before the invite is touched, so a
    /// rejected password leaves the invite redeemable. If user creation
    /// fails after consumption, the invite is reinstated; exactly one
    /// concurrent redemption of an id can ever succeed.
    pub async fn redeem_invite(
        &self,
        one_time_id: Uuid,
        password: &str,
        confirmation: &str,
    ) -> Result<Uuid, ProvisionError> {
        credential::validate_password(password, confirmation)
            .map_err(ProvisionError::Validation)?;
        let password_hash = credential::hash_password(password)
            .map_err(|e| ProvisionError::Internal(e.to_string()))?;

        let invite = self
            .provisioning
            .consume_invite(one_time_id)
            .await?
            .ok_or(ProvisionError::NotFound)?;

        let new_user = NewUser {
            first_name: invite.first_name.clone(),
            last_name: invite.last_name.clone(),
            email: invite.email.clone(),
            role: invite.role,
            password_hash,
        };

        match self.users.create(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "invite redeemed, account active");
                Ok(user.id)
            }
            Err(err) => {
                if let Err(restore_err) = self.provisioning.restore_invite(invite).await {
                    tracing::error!(
                        %restore_err,
                        "failed to reinstate invite after user creation failure"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Mints a password-reset record for the user owning the given email
    /// and dispatches the reset email. Unknown emails mint nothing and
    /// send nothing.
    pub async fn request_reset(&self, email: &str) -> Result<(), ProvisionError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ProvisionError::NotFound)?;

        let reset = self.provisioning.create_reset(user.id).await?;

        tracing::info!(user_id = %user.id, "password reset requested");

        let notification = Notification::ResetPassword {
            email: user.email,
            first_name: user.first_name,
            one_time_id: reset.one_time_id,
        };
        if let Err(err) = self.notifier.send(notification).await {
            tracing::warn!(%err, "failed to dispatch reset-password notification");
        }

        Ok(())
    }

    /// Consumes the matching reset record and replaces the owning user's
    /// password hash. Same validate-before-consume and reinstate-on-failure
    /// rules as invite redemption.
    pub async fn redeem_reset(
        &self,
        one_time_id: Uuid,
        password: &str,
        confirmation: &str,
    ) -> Result<(), ProvisionError> {
        credential::validate_password(password, confirmation)
            .map_err(ProvisionError::Validation)?;
        let password_hash = credential::hash_password(password)
            .map_err(|e| ProvisionError::Internal(e.to_string()))?;

        let reset = self
            .provisioning
            .consume_reset(one_time_id)
            .await?
            .ok_or(ProvisionError::NotFound)?;

        match self.users.update_password(reset.user_id, &password_hash).await {
            Ok(true) => {
                tracing::info!(user_id = %reset.user_id, "password reset redeemed");
                Ok(())
            }
            Ok(false) => {
                if let Err(restore_err) = self.provisioning.restore_reset(reset).await {
                    tracing::error!(
                        %restore_err,
                        "failed to reinstate reset after missing-user failure"
                    );
                }
                Err(ProvisionError::NotFound)
            }
            Err(err) => {
                if let Err(restore_err) = self.provisioning.restore_reset(reset).await {
                    tracing::error!(
                        %restore_err,
                        "failed to reinstate reset after credential update failure"
                    );
                }
                Err(err.into())
            }
        }
    }
}
