//! Read paths for study materials, video lectures, and live classes.

use axum::{
    extract::{Query, State},
    Json,
};
use diesel::{dsl::count_star, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::AppResult,
    models::{LiveClass, StudyMaterial, VideoLecture},
    schema::{live_classes, study_materials, video_lectures},
    state::AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 9;
const MAX_PAGE_SIZE: i64 = 50;

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
}

fn page_window(params: &PageQuery) -> (i64, i64, i64) {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;
    (page, limit, offset)
}

fn total_pages(total: i64, limit: i64) -> i64 {
    ((total + limit - 1) / limit).max(1)
}

#[derive(Serialize)]
pub struct StudyMaterialItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub file_url: String,
    pub created_at: String,
}

impl From<StudyMaterial> for StudyMaterialItem {
    fn from(material: StudyMaterial) -> Self {
        Self {
            id: material.id,
            title: material.title,
            description: material.description,
            subject: material.subject,
            file_url: material.file_url,
            created_at: material.created_at.and_utc().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct StudyMaterialsPage {
    pub materials: Vec<StudyMaterialItem>,
    pub total_pages: i64,
    pub current_page: i64,
}

pub async fn list_study_materials(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
    user: AuthenticatedUser,
) -> AppResult<Json<StudyMaterialsPage>> {
    user.require_intern()?;
    let mut conn = state.db()?;
    let (page, limit, offset) = page_window(&params);

    let total: i64 = study_materials::table.select(count_star()).first(&mut conn)?;

    let materials: Vec<StudyMaterial> = study_materials::table
        .order(study_materials::created_at.desc())
        .offset(offset)
        .limit(limit)
        .load(&mut conn)?;

    Ok(Json(StudyMaterialsPage {
        materials: materials.into_iter().map(StudyMaterialItem::from).collect(),
        total_pages: total_pages(total, limit),
        current_page: page,
    }))
}

pub async fn search_study_materials(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
    user: AuthenticatedUser,
) -> AppResult<Json<StudyMaterialsPage>> {
    user.require_intern()?;
    let mut conn = state.db()?;
    let (page, limit, offset) = page_window(&params);

    let needle = params
        .query
        .as_ref()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty());
    let Some(needle) = needle else {
        return Ok(Json(StudyMaterialsPage {
            materials: Vec::new(),
            total_pages: 1,
            current_page: 1,
        }));
    };
    let pattern = format!("%{needle}%");

    let matching = study_materials::table.filter(
        study_materials::title
            .ilike(pattern.clone())
            .or(study_materials::description.ilike(pattern.clone()))
            .or(study_materials::subject.ilike(pattern.clone())),
    );

    let total: i64 = matching.select(count_star()).first(&mut conn)?;

    let materials: Vec<StudyMaterial> = study_materials::table
        .filter(
            study_materials::title
                .ilike(pattern.clone())
                .or(study_materials::description.ilike(pattern.clone()))
                .or(study_materials::subject.ilike(pattern)),
        )
        .order(study_materials::created_at.desc())
        .offset(offset)
        .limit(limit)
        .load(&mut conn)?;

    Ok(Json(StudyMaterialsPage {
        materials: materials.into_iter().map(StudyMaterialItem::from).collect(),
        total_pages: total_pages(total, limit),
        current_page: page,
    }))
}

#[derive(Serialize)]
pub struct VideoLectureItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub video_url: String,
}

pub async fn list_video_lectures(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<VideoLectureItem>>> {
    user.require_intern()?;
    let mut conn = state.db()?;

    let videos: Vec<VideoLecture> = video_lectures::table
        .order(video_lectures::created_at.desc())
        .load(&mut conn)?;

    let response = videos
        .into_iter()
        .map(|video| VideoLectureItem {
            id: video.id,
            title: video.title,
            description: video.description,
            subject: video.subject,
            thumbnail: video.thumbnail_url,
            duration: video.duration,
            video_url: video.video_url,
        })
        .collect();

    Ok(Json(response))
}

#[derive(Serialize)]
pub struct LiveClassItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub class_type: String,
    pub meeting_link: String,
    pub start_time: String,
    pub end_time: String,
    pub thumbnail_url: Option<String>,
}

pub async fn list_classes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<LiveClassItem>>> {
    user.require_intern()?;
    let mut conn = state.db()?;

    let classes: Vec<LiveClass> = live_classes::table
        .order(live_classes::start_time.asc())
        .load(&mut conn)?;

    let response = classes
        .into_iter()
        .map(|class| LiveClassItem {
            id: class.id,
            title: class.title,
            description: class.description,
            subject: class.subject,
            class_type: class.class_type,
            meeting_link: class.meeting_link,
            start_time: class.start_time.and_utc().to_rfc3339(),
            end_time: class.end_time.and_utc().to_rfc3339(),
            thumbnail_url: class.thumbnail_url,
        })
        .collect();

    Ok(Json(response))
}
