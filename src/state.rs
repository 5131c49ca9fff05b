use std::sync::Arc;

use crate::{
    account::AccountService,
    config::Config,
    db::DbPool,
    notify::Notifier,
    store::{LessonStore, ProvisioningStore, UserStore},
};

/// Application state shared across all handlers. Stores and the notifier
/// sit behind their boundary traits so tests can swap in the in-memory
/// implementations.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: Option<DbPool>,
    pub users: Arc<dyn UserStore>,
    pub lessons: Arc<dyn LessonStore>,
    pub account: AccountService,
}

impl AppState {
    pub fn new(
        config: Config,
        pool: Option<DbPool>,
        users: Arc<dyn UserStore>,
        lessons: Arc<dyn LessonStore>,
        provisioning: Arc<dyn ProvisioningStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let account = AccountService::new(users.clone(), provisioning, notifier);
        Self {
            config,
            pool,
            users,
            lessons,
            account,
        }
    }
}
