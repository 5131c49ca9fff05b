//! In-memory store implementations backing the integration tests and
//! database-less local runs.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    Asset, Lesson, LessonWithAssets, NewInvite, NewLesson, NewUser, PendingInvite,
    PendingPasswordReset, Role, User,
};

use super::{LessonStore, ProvisioningStore, StoreError, StoreResult, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.lock().expect("lock poisoned");

        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Validation("email is already taken".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(users.get(&id).cloned())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut users = self.users.lock().expect("lock poisoned");
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_role(&self, role: Role) -> StoreResult<Vec<User>> {
        let users = self.users.lock().expect("lock poisoned");
        let mut matching: Vec<User> = users.values().filter(|u| u.role == role).cloned().collect();
        matching.sort_by_key(|u| u.created_at);
        Ok(matching)
    }
}

#[derive(Default)]
pub struct MemoryProvisioningStore {
    invites: Mutex<HashMap<Uuid, PendingInvite>>,
    resets: Mutex<HashMap<Uuid, PendingPasswordReset>>,
}

impl MemoryProvisioningStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProvisioningStore for MemoryProvisioningStore {
    async fn create_invite(&self, invite: NewInvite) -> StoreResult<PendingInvite> {
        let created = PendingInvite {
            one_time_id: Uuid::new_v4(),
            first_name: invite.first_name,
            last_name: invite.last_name,
            email: invite.email,
            role: invite.role,
            created_at: Utc::now(),
        };
        self.invites
            .lock()
            .expect("lock poisoned")
            .insert(created.one_time_id, created.clone());
        Ok(created)
    }

    async fn find_invite(&self, one_time_id: Uuid) -> StoreResult<Option<PendingInvite>> {
        let invites = self.invites.lock().expect("lock poisoned");
        Ok(invites.get(&one_time_id).cloned())
    }

    async fn consume_invite(&self, one_time_id: Uuid) -> StoreResult<Option<PendingInvite>> {
        // Remove under the lock: exactly one concurrent consumer wins.
        let mut invites = self.invites.lock().expect("lock poisoned");
        Ok(invites.remove(&one_time_id))
    }

    async fn restore_invite(&self, invite: PendingInvite) -> StoreResult<()> {
        self.invites
            .lock()
            .expect("lock poisoned")
            .entry(invite.one_time_id)
            .or_insert(invite);
        Ok(())
    }

    async fn create_reset(&self, user_id: Uuid) -> StoreResult<PendingPasswordReset> {
        let created = PendingPasswordReset {
            one_time_id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
        };
        self.resets
            .lock()
            .expect("lock poisoned")
            .insert(created.one_time_id, created.clone());
        Ok(created)
    }

    async fn find_reset(&self, one_time_id: Uuid) -> StoreResult<Option<PendingPasswordReset>> {
        let resets = self.resets.lock().expect("lock poisoned");
        Ok(resets.get(&one_time_id).cloned())
    }

    async fn consume_reset(
        &self,
        one_time_id: Uuid,
    ) -> StoreResult<Option<PendingPasswordReset>> {
        let mut resets = self.resets.lock().expect("lock poisoned");
        Ok(resets.remove(&one_time_id))
    }

    async fn restore_reset(&self, reset: PendingPasswordReset) -> StoreResult<()> {
        self.resets
            .lock()
            .expect("lock poisoned")
            .entry(reset.one_time_id)
            .or_insert(reset);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryLessonStore {
    lessons: Mutex<Vec<LessonWithAssets>>,
}

impl MemoryLessonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LessonStore for MemoryLessonStore {
    async fn create(&self, lesson: NewLesson) -> StoreResult<LessonWithAssets> {
        let now = Utc::now();
        let created = Lesson {
            id: Uuid::new_v4(),
            title: lesson.title,
            text: lesson.text,
            created_at: now,
            updated_at: now,
        };
        let assets = lesson
            .asset_urls
            .into_iter()
            .map(|url| Asset {
                id: Uuid::new_v4(),
                lesson_id: created.id,
                storage_url: url,
            })
            .collect();

        let entry = LessonWithAssets {
            lesson: created,
            assets,
        };
        self.lessons
            .lock()
            .expect("lock poisoned")
            .push(entry.clone());
        Ok(entry)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<LessonWithAssets>> {
        let lessons = self.lessons.lock().expect("lock poisoned");
        Ok(lessons.iter().find(|l| l.lesson.id == id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<LessonWithAssets>> {
        let lessons = self.lessons.lock().expect("lock poisoned");
        Ok(lessons.clone())
    }
}
