//! Hiring-team and mentor surfaces: job postings, application review,
//! and intern feedback.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    auth::{AuthenticatedUser, ROLE_MENTOR},
    error::{AppError, AppResult},
    forms::{self, CustomField},
    models::{JobApplication, JobPost, NewFeedbackEntry, NewJobPost},
    routes::applications::APPLICATION_STATUSES,
    routes::interns::{FEEDBACK_SOURCE_HIRING, FEEDBACK_SOURCE_MENTOR},
    routes::jobs::{JobSummary, JOB_STATUS_CLOSED, JOB_STATUS_OPEN},
    schema::{feedback_entries, interns, job_applications, job_posts},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company_name: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub work_mode: String,
    pub job_type: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    pub total_vacancies: Option<i32>,
}

pub async fn create_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateJobRequest>,
) -> AppResult<(StatusCode, Json<JobSummary>)> {
    user.require_staff()?;

    if payload.title.trim().is_empty() || payload.company_name.trim().is_empty() {
        return Err(AppError::bad_request("title and company_name are required"));
    }
    forms::validate_schema(&payload.custom_fields)
        .map_err(|err| AppError::bad_request(err.to_string()))?;
    if let (Some(min), Some(max)) = (payload.salary_min, payload.salary_max) {
        if min > max {
            return Err(AppError::bad_request("salary_min must not exceed salary_max"));
        }
    }

    let mut conn = state.db()?;
    let new_job = NewJobPost {
        id: Uuid::new_v4(),
        title: payload.title.trim().to_string(),
        company_name: payload.company_name.trim().to_string(),
        description: payload.description,
        required_skills: serde_json::to_value(&payload.required_skills)?,
        salary_min: payload.salary_min,
        salary_max: payload.salary_max,
        work_mode: payload.work_mode,
        job_type: payload.job_type,
        status: JOB_STATUS_OPEN.to_string(),
        is_active: true,
        custom_fields: serde_json::to_value(&payload.custom_fields)?,
        total_vacancies: payload.total_vacancies.unwrap_or(1).max(1),
    };

    diesel::insert_into(job_posts::table)
        .values(&new_job)
        .execute(&mut conn)?;

    let job: JobPost = job_posts::table.find(new_job.id).first(&mut conn)?;
    tracing::info!(job_id = %new_job.id, "created job posting");

    Ok((StatusCode::CREATED, Json(JobSummary::from(job))))
}

#[derive(Deserialize)]
pub struct UpdateJobRequest {
    pub status: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = job_posts)]
struct UpdateJobChangeset {
    status: Option<String>,
    is_active: Option<bool>,
}

pub async fn update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateJobRequest>,
) -> AppResult<Json<JobSummary>> {
    user.require_staff()?;

    if let Some(status) = payload.status.as_deref() {
        if status != JOB_STATUS_OPEN && status != JOB_STATUS_CLOSED {
            return Err(AppError::bad_request("status must be 'Open' or 'Closed'"));
        }
    }

    let mut conn = state.db()?;

    // An all-None changeset is not a valid UPDATE; treat it as a no-op.
    if payload.status.is_none() && payload.is_active.is_none() {
        let job: JobPost = job_posts::table
            .find(job_id)
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| AppError::not_found_with("job not found"))?;
        return Ok(Json(JobSummary::from(job)));
    }

    let changeset = UpdateJobChangeset {
        status: payload.status,
        is_active: payload.is_active,
    };

    let updated = diesel::update(job_posts::table.find(job_id))
        .set(&changeset)
        .execute(&mut conn)?;
    if updated == 0 {
        return Err(AppError::not_found_with("job not found"));
    }

    let job: JobPost = job_posts::table.find(job_id).first(&mut conn)?;
    Ok(Json(JobSummary::from(job)))
}

#[derive(Serialize)]
pub struct ApplicationItem {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub resume: Value,
    pub custom_field_answers: Value,
    pub status: String,
    pub applied_at: String,
}

impl From<JobApplication> for ApplicationItem {
    fn from(application: JobApplication) -> Self {
        Self {
            id: application.id,
            job_id: application.job_id,
            applicant_id: application.applicant_id,
            full_name: application.full_name,
            email: application.email,
            mobile_number: application.mobile_number,
            resume: application.resume,
            custom_field_answers: application.custom_field_answers,
            status: application.status,
            applied_at: application.applied_at.and_utc().to_rfc3339(),
        }
    }
}

pub async fn list_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<ApplicationItem>>> {
    user.require_staff()?;
    let mut conn = state.db()?;

    let exists = job_posts::table
        .find(job_id)
        .select(job_posts::id)
        .first::<Uuid>(&mut conn)
        .optional()?;
    if exists.is_none() {
        return Err(AppError::not_found_with("job not found"));
    }

    let applications: Vec<JobApplication> = job_applications::table
        .filter(job_applications::job_id.eq(job_id))
        .order(job_applications::applied_at.desc())
        .load(&mut conn)?;

    Ok(Json(
        applications.into_iter().map(ApplicationItem::from).collect(),
    ))
}

#[derive(Deserialize)]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
}

pub async fn update_application_status(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateApplicationStatusRequest>,
) -> AppResult<Json<ApplicationItem>> {
    user.require_staff()?;

    if !APPLICATION_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::bad_request(format!(
            "status must be one of {:?}",
            APPLICATION_STATUSES
        )));
    }

    let mut conn = state.db()?;
    let updated = diesel::update(job_applications::table.find(application_id))
        .set(job_applications::status.eq(&payload.status))
        .execute(&mut conn)?;
    if updated == 0 {
        return Err(AppError::not_found_with("application not found"));
    }

    let application: JobApplication = job_applications::table
        .find(application_id)
        .first(&mut conn)?;
    Ok(Json(ApplicationItem::from(application)))
}

#[derive(Deserialize)]
pub struct AddFeedbackRequest {
    pub comment: String,
    pub rating: i32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    #[serde(default)]
    pub improvement_suggestions: String,
    #[serde(default)]
    pub actionable_items: Vec<String>,
    #[serde(default)]
    pub follow_up_required: bool,
    pub sentiment: Option<String>,
}

pub async fn add_feedback(
    State(state): State<AppState>,
    Path(intern_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<AddFeedbackRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    user.require_staff()?;

    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::bad_request("rating must be between 1 and 5"));
    }
    if payload.comment.trim().is_empty() {
        return Err(AppError::bad_request("comment must not be empty"));
    }

    let source = if user.role == ROLE_MENTOR {
        FEEDBACK_SOURCE_MENTOR
    } else {
        FEEDBACK_SOURCE_HIRING
    };

    let mut conn = state.db()?;
    let exists = interns::table
        .find(intern_id)
        .select(interns::id)
        .first::<Uuid>(&mut conn)
        .optional()?;
    if exists.is_none() {
        return Err(AppError::not_found_with("intern not found"));
    }

    let entry = NewFeedbackEntry {
        id: Uuid::new_v4(),
        intern_id,
        source: source.to_string(),
        comment: payload.comment.trim().to_string(),
        rating: payload.rating,
        strengths: serde_json::to_value(&payload.strengths)?,
        areas_for_improvement: serde_json::to_value(&payload.areas_for_improvement)?,
        improvement_suggestions: payload.improvement_suggestions,
        actionable_items: serde_json::to_value(&payload.actionable_items)?,
        follow_up_required: payload.follow_up_required,
        sentiment: payload.sentiment.unwrap_or_else(|| "neutral".to_string()),
    };

    diesel::insert_into(feedback_entries::table)
        .values(&entry)
        .execute(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "feedback_id": entry.id })),
    ))
}
