use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    forms::CustomField,
    models::{Intern, JobPost},
    plans::{self, PlanCategory},
    schema::{interns, job_applications, job_posts},
    state::AppState,
};

pub const JOB_STATUS_OPEN: &str = "Open";
pub const JOB_STATUS_CLOSED: &str = "Closed";

#[derive(Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub required_skills: serde_json::Value,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub work_mode: String,
    pub job_type: String,
    pub status: String,
    pub applicants_count: i32,
    pub total_vacancies: i32,
    pub created_at: String,
}

impl From<JobPost> for JobSummary {
    fn from(job: JobPost) -> Self {
        Self {
            id: job.id,
            title: job.title,
            company_name: job.company_name,
            description: job.description,
            required_skills: job.required_skills,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            work_mode: job.work_mode,
            job_type: job.job_type,
            status: job.status,
            applicants_count: job.applicants_count,
            total_vacancies: job.total_vacancies,
            created_at: job.created_at.and_utc().to_rfc3339(),
        }
    }
}

pub async fn list_jobs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<JobSummary>>> {
    user.require_intern()?;
    let mut conn = state.db()?;

    let jobs: Vec<JobPost> = job_posts::table
        .filter(job_posts::is_active.eq(true))
        .order(job_posts::created_at.desc())
        .load(&mut conn)?;

    Ok(Json(jobs.into_iter().map(JobSummary::from).collect()))
}

#[derive(Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobSummary,
    pub custom_fields: Vec<CustomField>,
    pub already_applied: bool,
    pub can_apply: bool,
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Json<JobDetail>> {
    let intern_id = user.require_intern()?;
    let mut conn = state.db()?;

    let job: JobPost = job_posts::table
        .find(job_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::not_found_with("job not found"))?;

    let intern: Intern = interns::table.find(intern_id).first(&mut conn)?;
    let already_applied = has_applied(&mut conn, job_id, intern_id)?;

    let now = Utc::now().naive_utc();
    let plan = PlanCategory::parse(&intern.plan_type).unwrap_or(PlanCategory::None);
    let covered = plans::has_plan_coverage(plan, intern.plan_expiry, now);
    let accepting = job.status == JOB_STATUS_OPEN && job.is_active;
    let can_apply =
        accepting && plans::can_apply(already_applied, covered, intern.job_credits);

    let custom_fields = parse_custom_fields(&job)?;

    Ok(Json(JobDetail {
        job: JobSummary::from(job),
        custom_fields,
        already_applied,
        can_apply,
    }))
}

#[derive(Serialize)]
pub struct ApplicationFormResponse {
    pub success: bool,
    pub custom_fields: Vec<CustomField>,
}

/// Form fetch mirrors the apply gate but reports closed/duplicate as 400,
/// matching the original form endpoint contract.
pub async fn get_application_form(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApplicationFormResponse>> {
    let intern_id = user.require_intern()?;
    let mut conn = state.db()?;

    let job: JobPost = job_posts::table
        .find(job_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::not_found_with("job not found"))?;

    if job.status != JOB_STATUS_OPEN || !job.is_active {
        return Err(AppError::bad_request(
            "this job is no longer accepting applications",
        ));
    }

    if has_applied(&mut conn, job_id, intern_id)? {
        return Err(AppError::bad_request("you have already applied for this job"));
    }

    Ok(Json(ApplicationFormResponse {
        success: true,
        custom_fields: parse_custom_fields(&job)?,
    }))
}

pub fn parse_custom_fields(job: &JobPost) -> AppResult<Vec<CustomField>> {
    serde_json::from_value(job.custom_fields.clone())
        .map_err(|err| AppError::internal(format!("job {} has a corrupt field schema: {err}", job.id)))
}

pub fn has_applied(
    conn: &mut PgConnection,
    job_id: Uuid,
    intern_id: Uuid,
) -> AppResult<bool> {
    let existing = job_applications::table
        .filter(job_applications::job_id.eq(job_id))
        .filter(job_applications::applicant_id.eq(intern_id))
        .select(job_applications::id)
        .first::<Uuid>(conn)
        .optional()?;
    Ok(existing.is_some())
}
