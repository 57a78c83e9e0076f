use axum::{extract::State, Json};
use diesel::{dsl::count_star, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    models::{FeedbackEntry, Intern, JobPost},
    routes::applications::CREDIT_ACTION_APPLIED_JOB,
    schema::{credit_events, feedback_entries, interns, job_posts},
    state::AppState,
};

pub const FEEDBACK_SOURCE_MENTOR: &str = "mentor";
pub const FEEDBACK_SOURCE_HIRING: &str = "hiring_team";

/// Intern profile as exposed to the intern. The password hash never
/// leaves the persistence layer.
#[derive(Serialize)]
pub struct InternProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub course: String,
    pub year_of_study: String,
    pub domain: Option<String>,
    pub skills: Value,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub profile_image: Option<String>,
    pub is_paid: bool,
    pub plan_type: String,
    pub plan_expiry: Option<String>,
    pub job_credits: i32,
}

impl From<Intern> for InternProfile {
    fn from(intern: Intern) -> Self {
        Self {
            id: intern.id,
            name: intern.name,
            email: intern.email,
            phone: intern.phone,
            college: intern.college,
            course: intern.course,
            year_of_study: intern.year_of_study,
            domain: intern.domain,
            skills: intern.skills,
            resume_url: intern.resume_url,
            linkedin_url: intern.linkedin_url,
            github_url: intern.github_url,
            profile_image: intern.profile_image,
            is_paid: intern.is_paid,
            plan_type: intern.plan_type,
            plan_expiry: intern.plan_expiry.map(|dt| dt.and_utc().to_rfc3339()),
            job_credits: intern.job_credits,
        }
    }
}

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<InternProfile>> {
    let intern_id = user.require_intern()?;
    let mut conn = state.db()?;

    let intern: Intern = interns::table
        .find(intern_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::not_found_with("intern not found"))?;

    Ok(Json(InternProfile::from(intern)))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub course: Option<String>,
    pub year_of_study: Option<String>,
    pub domain: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub profile_image: Option<String>,
    pub skills: Option<Value>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = interns)]
struct UpdateInternChangeset {
    name: Option<String>,
    phone: Option<String>,
    college: Option<String>,
    course: Option<String>,
    year_of_study: Option<String>,
    domain: Option<String>,
    resume_url: Option<String>,
    linkedin_url: Option<String>,
    github_url: Option<String>,
    profile_image: Option<String>,
    skills: Option<Value>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<InternProfile>> {
    let intern_id = user.require_intern()?;
    let mut conn = state.db()?;

    // An all-None changeset is not a valid UPDATE; treat it as a no-op.
    let no_changes = payload.name.is_none()
        && payload.phone.is_none()
        && payload.college.is_none()
        && payload.course.is_none()
        && payload.year_of_study.is_none()
        && payload.domain.is_none()
        && payload.resume_url.is_none()
        && payload.linkedin_url.is_none()
        && payload.github_url.is_none()
        && payload.profile_image.is_none()
        && payload.skills.is_none();
    if no_changes {
        let intern: Intern = interns::table
            .find(intern_id)
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| AppError::not_found_with("intern not found"))?;
        return Ok(Json(InternProfile::from(intern)));
    }

    let skills = match payload.skills {
        Some(raw) => Some(normalize_skills(raw)?),
        None => None,
    };

    let changeset = UpdateInternChangeset {
        name: payload.name,
        phone: payload.phone,
        college: payload.college,
        course: payload.course,
        year_of_study: payload.year_of_study,
        domain: payload.domain,
        resume_url: payload.resume_url,
        linkedin_url: payload.linkedin_url,
        github_url: payload.github_url,
        profile_image: payload.profile_image,
        skills,
    };

    let updated = diesel::update(interns::table.find(intern_id))
        .set(&changeset)
        .execute(&mut conn)?;
    if updated == 0 {
        return Err(AppError::not_found_with("intern not found"));
    }

    let intern: Intern = interns::table.find(intern_id).first(&mut conn)?;
    Ok(Json(InternProfile::from(intern)))
}

/// Skills arrive in several historical shapes: a JSON array of strings, an
/// array of `{name}` objects, or a single string (possibly itself JSON).
/// Normalize everything to an ordered `[{name}]` list.
fn normalize_skills(raw: Value) -> AppResult<Value> {
    let items = match raw {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            _ => vec![Value::String(text)],
        },
        Value::Array(items) => items,
        other => {
            return Err(AppError::bad_request(format!(
                "skills must be a list, got {other}"
            )))
        }
    };

    let normalized: Vec<Value> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) if !name.trim().is_empty() => {
                Some(serde_json::json!({ "name": name.trim() }))
            }
            Value::Object(map) => map
                .get("name")
                .and_then(Value::as_str)
                .filter(|name| !name.trim().is_empty())
                .map(|name| serde_json::json!({ "name": name.trim() })),
            _ => None,
        })
        .collect();

    Ok(Value::Array(normalized))
}

#[derive(Serialize)]
pub struct DashboardStats {
    pub jobs_applied: i64,
    pub free_applications_left: i32,
    pub mentor_feedback_count: i64,
    pub hiring_feedback_count: i64,
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<DashboardStats>> {
    let intern_id = user.require_intern()?;
    let mut conn = state.db()?;

    let intern: Intern = interns::table
        .find(intern_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::not_found_with("intern not found"))?;

    let jobs_applied: i64 = credit_events::table
        .filter(credit_events::intern_id.eq(intern_id))
        .filter(credit_events::action.eq(CREDIT_ACTION_APPLIED_JOB))
        .select(count_star())
        .first(&mut conn)?;

    let mentor_feedback_count: i64 = feedback_entries::table
        .filter(feedback_entries::intern_id.eq(intern_id))
        .filter(feedback_entries::source.eq(FEEDBACK_SOURCE_MENTOR))
        .select(count_star())
        .first(&mut conn)?;

    let hiring_feedback_count: i64 = feedback_entries::table
        .filter(feedback_entries::intern_id.eq(intern_id))
        .filter(feedback_entries::source.eq(FEEDBACK_SOURCE_HIRING))
        .select(count_star())
        .first(&mut conn)?;

    Ok(Json(DashboardStats {
        jobs_applied,
        free_applications_left: intern.job_credits,
        mentor_feedback_count,
        hiring_feedback_count,
    }))
}

#[derive(Serialize)]
pub struct FeedbackItem {
    pub id: Uuid,
    pub comment: String,
    pub rating: i32,
    pub date: String,
    pub strengths: Value,
    pub areas_for_improvement: Value,
    pub improvement_suggestions: String,
    pub actionable_items: Value,
    pub follow_up_required: bool,
    pub sentiment: String,
}

impl From<FeedbackEntry> for FeedbackItem {
    fn from(entry: FeedbackEntry) -> Self {
        Self {
            id: entry.id,
            comment: entry.comment,
            rating: entry.rating,
            date: entry.given_at.and_utc().to_rfc3339(),
            strengths: entry.strengths,
            areas_for_improvement: entry.areas_for_improvement,
            improvement_suggestions: entry.improvement_suggestions,
            actionable_items: entry.actionable_items,
            follow_up_required: entry.follow_up_required,
            sentiment: entry.sentiment,
        }
    }
}

#[derive(Serialize)]
pub struct RecentFeedbackResponse {
    pub mentor_feedback: Vec<FeedbackItem>,
    pub hiring_team_feedback: Vec<FeedbackItem>,
}

pub async fn recent_feedback(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<RecentFeedbackResponse>> {
    let intern_id = user.require_intern()?;
    let mut conn = state.db()?;

    let entries: Vec<FeedbackEntry> = feedback_entries::table
        .filter(feedback_entries::intern_id.eq(intern_id))
        .order(feedback_entries::given_at.desc())
        .load(&mut conn)?;

    let (mentor, hiring): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|entry| entry.source == FEEDBACK_SOURCE_MENTOR);

    Ok(Json(RecentFeedbackResponse {
        mentor_feedback: mentor.into_iter().map(FeedbackItem::from).collect(),
        hiring_team_feedback: hiring.into_iter().map(FeedbackItem::from).collect(),
    }))
}

#[derive(Serialize)]
pub struct RecentJobPost {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub status: String,
    pub posted_at: String,
}

pub async fn recent_job_posts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<RecentJobPost>>> {
    user.require_intern()?;
    let mut conn = state.db()?;

    let jobs: Vec<JobPost> = job_posts::table
        .filter(job_posts::is_active.eq(true))
        .order(job_posts::created_at.desc())
        .limit(5)
        .load(&mut conn)?;

    let response = jobs
        .into_iter()
        .map(|job| RecentJobPost {
            id: job.id,
            title: job.title,
            company: job.company_name,
            status: job.status.to_lowercase(),
            posted_at: job.created_at.and_utc().to_rfc3339(),
        })
        .collect();

    Ok(Json(response))
}
