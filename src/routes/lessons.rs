use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, Result},
    models::{Asset, Lesson, LessonWithAssets, NewLesson},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub lesson: LessonParams,
}

#[derive(Debug, Deserialize)]
pub struct LessonParams {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub assets_attributes: Vec<AssetParams>,
}

#[derive(Debug, Deserialize)]
pub struct AssetParams {
    #[serde(rename = "storageURL")]
    pub storage_url: String,
}

#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub id: Uuid,
    pub title: String,
    pub text: String,
}

impl From<&Lesson> for LessonResponse {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
            text: lesson.text.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub id: Uuid,
    #[serde(rename = "storageURL")]
    pub storage_url: String,
}

impl From<&Asset> for AssetResponse {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id,
            storage_url: asset.storage_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateLessonResponse {
    pub lesson: LessonResponse,
    pub assets: Vec<AssetResponse>,
}

#[derive(Debug, Serialize)]
pub struct LessonDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub assets: Vec<AssetResponse>,
}

impl From<&LessonWithAssets> for LessonDetailResponse {
    fn from(entry: &LessonWithAssets) -> Self {
        Self {
            id: entry.lesson.id,
            title: entry.lesson.title.clone(),
            text: entry.lesson.text.clone(),
            assets: entry.assets.iter().map(AssetResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LessonListResponse {
    pub lessons: Vec<LessonDetailResponse>,
}

/// Create a lesson together with its assets
pub async fn create_lesson(
    State(state): State<AppState>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<impl IntoResponse> {
    let params = payload.lesson;

    if params.title.trim().is_empty() {
        return Err(AppError::Validation("lesson title cannot be empty".to_string()));
    }
    if params.text.trim().is_empty() {
        return Err(AppError::Validation("lesson text cannot be empty".to_string()));
    }
    if params.assets_attributes.is_empty() {
        return Err(AppError::Validation(
            "lesson requires at least one asset".to_string(),
        ));
    }

    let created = state
        .lessons
        .create(NewLesson {
            title: params.title.trim().to_string(),
            text: params.text.trim().to_string(),
            asset_urls: params
                .assets_attributes
                .into_iter()
                .map(|a| a.storage_url)
                .collect(),
        })
        .await?;

    Ok(Json(CreateLessonResponse {
        lesson: LessonResponse::from(&created.lesson),
        assets: created.assets.iter().map(AssetResponse::from).collect(),
    }))
}

/// Fetch a single lesson with its assets. A malformed id folds into the
/// same denial as an unknown one.
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<LessonDetailResponse>> {
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| AppError::NotFound(format!("lesson {}", raw_id)))?;

    let entry = state
        .lessons
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("lesson {}", id)))?;

    Ok(Json(LessonDetailResponse::from(&entry)))
}

/// List all lessons with their assets
pub async fn list_lessons(State(state): State<AppState>) -> Result<Json<LessonListResponse>> {
    let entries = state.lessons.list().await?;

    Ok(Json(LessonListResponse {
        lessons: entries.iter().map(LessonDetailResponse::from).collect(),
    }))
}
