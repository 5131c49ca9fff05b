use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{Asset, Lesson, LessonWithAssets, NewLesson};

use super::StoreResult;

/// Lesson and asset persistence boundary.
#[async_trait]
pub trait LessonStore: Send + Sync {
    /// Creates a lesson together with its assets, atomically.
    async fn create(&self, lesson: NewLesson) -> StoreResult<LessonWithAssets>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<LessonWithAssets>>;

    async fn list(&self) -> StoreResult<Vec<LessonWithAssets>>;
}

#[derive(Clone)]
pub struct PgLessonStore {
    pool: DbPool,
}

impl PgLessonStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonStore for PgLessonStore {
    async fn create(&self, lesson: NewLesson) -> StoreResult<LessonWithAssets> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (id, title, text)
            VALUES ($1, $2, $3)
            RETURNING id, title, text, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&lesson.title)
        .bind(&lesson.text)
        .fetch_one(&mut *tx)
        .await?;

        let mut assets = Vec::with_capacity(lesson.asset_urls.len());
        for url in &lesson.asset_urls {
            let asset = sqlx::query_as::<_, Asset>(
                r#"
                INSERT INTO assets (id, lesson_id, storage_url)
                VALUES ($1, $2, $3)
                RETURNING id, lesson_id, storage_url
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(created.id)
            .bind(url)
            .fetch_one(&mut *tx)
            .await?;
            assets.push(asset);
        }

        tx.commit().await?;

        Ok(LessonWithAssets {
            lesson: created,
            assets,
        })
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<LessonWithAssets>> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, title, text, created_at, updated_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(lesson) = lesson else {
            return Ok(None);
        };

        let assets = sqlx::query_as::<_, Asset>(
            r#"
            SELECT id, lesson_id, storage_url
            FROM assets
            WHERE lesson_id = $1
            "#,
        )
        .bind(lesson.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(LessonWithAssets { lesson, assets }))
    }

    async fn list(&self) -> StoreResult<Vec<LessonWithAssets>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, title, text, created_at, updated_at
            FROM lessons
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = lessons.iter().map(|l| l.id).collect();
        let assets = sqlx::query_as::<_, Asset>(
            r#"
            SELECT id, lesson_id, storage_url
            FROM assets
            WHERE lesson_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_lesson: HashMap<Uuid, Vec<Asset>> = HashMap::new();
        for asset in assets {
            by_lesson.entry(asset.lesson_id).or_default().push(asset);
        }

        Ok(lessons
            .into_iter()
            .map(|lesson| {
                let assets = by_lesson.remove(&lesson.id).unwrap_or_default();
                LessonWithAssets { lesson, assets }
            })
            .collect())
    }
}
