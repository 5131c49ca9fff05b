use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub storage_url: String,
}

#[derive(Debug, Clone)]
pub struct LessonWithAssets {
    pub lesson: Lesson,
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone)]
pub struct NewLesson {
    pub title: String,
    pub text: String,
    pub asset_urls: Vec<String>,
}
