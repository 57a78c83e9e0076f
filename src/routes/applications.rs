//! The job-application workflow: eligibility gate, custom-field
//! validation, and the single-transaction persist of application +
//! ledger effects.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    forms::{self, FieldValue, FileRef},
    models::{Intern, JobPost, NewCreditEvent, NewJobApplication},
    plans::{self, PlanCategory},
    routes::jobs::{has_applied, parse_custom_fields, JOB_STATUS_OPEN},
    schema::{credit_events, interns, job_applications, job_posts},
    state::AppState,
};

pub const APPLICATION_STATUS_APPLIED: &str = "Applied";
pub const CREDIT_ACTION_APPLIED_JOB: &str = "APPLIED JOB";

/// Application statuses a hiring team may move an application through.
pub const APPLICATION_STATUSES: [&str; 5] =
    ["Applied", "Reviewed", "Shortlisted", "Rejected", "Hired"];

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub resume: Option<FileRef>,
    #[serde(default)]
    pub answers: HashMap<String, FieldValue>,
}

#[derive(Serialize)]
pub struct ApplyResponse {
    pub success: bool,
    pub application_id: Uuid,
    pub status: String,
}

/// Outcome of the ledger step inside the submit transaction. Mapped to an
/// HTTP error only after the transaction has rolled back.
enum LedgerFailure {
    Duplicate,
    OutOfCredits,
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for LedgerFailure {
    fn from(value: diesel::result::Error) -> Self {
        LedgerFailure::Db(value)
    }
}

pub async fn submit_application(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<ApplyRequest>,
) -> AppResult<(StatusCode, Json<ApplyResponse>)> {
    let intern_id = user.require_intern()?;
    let mut conn = state.db()?;

    // Preconditions, fail-fast in contract order.
    let job: JobPost = job_posts::table
        .find(job_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::not_found_with("job not found"))?;

    if job.status != JOB_STATUS_OPEN || !job.is_active {
        return Err(AppError::conflict(
            "this job is no longer accepting applications",
        ));
    }

    if has_applied(&mut conn, job_id, intern_id)? {
        return Err(AppError::conflict("you have already applied for this job"));
    }

    let intern: Intern = interns::table.find(intern_id).first(&mut conn)?;
    let now = Utc::now().naive_utc();
    let plan = PlanCategory::parse(&intern.plan_type).unwrap_or(PlanCategory::None);
    let covered = plans::has_plan_coverage(plan, intern.plan_expiry, now);

    if !plans::can_apply(false, covered, intern.job_credits) {
        return Err(AppError::payment_required(
            "no job credits left; upgrade your plan to keep applying",
        ));
    }

    let schema = parse_custom_fields(&job)?;
    let answers = forms::validate_answers(&schema, &payload.answers)
        .map_err(|err| AppError::bad_request(err.to_string()))?;

    if payload.full_name.trim().is_empty() {
        return Err(AppError::bad_request("full_name is required"));
    }
    if !forms::is_valid_email(payload.email.trim()) {
        return Err(AppError::bad_request("email must be a valid address"));
    }
    if !forms::is_valid_mobile(payload.mobile_number.trim()) {
        return Err(AppError::bad_request(
            "mobile_number must be a 10 digit number",
        ));
    }
    let resume = payload
        .resume
        .ok_or_else(|| AppError::bad_request("resume is required"))?;
    if resume.url.trim().is_empty() {
        return Err(AppError::bad_request("resume is required"));
    }

    let new_application = NewJobApplication {
        id: Uuid::new_v4(),
        job_id,
        applicant_id: intern_id,
        full_name: payload.full_name.trim().to_string(),
        email: payload.email.trim().to_lowercase(),
        mobile_number: payload.mobile_number.trim().to_string(),
        resume: serde_json::to_value(&resume)?,
        custom_field_answers: serde_json::to_value(&answers)?,
        status: APPLICATION_STATUS_APPLIED.to_string(),
    };
    let application_id = new_application.id;
    let charge_credit = plans::charges_credit(covered);

    // All writes land together or not at all. The duplicate check above is
    // advisory; the unique (job_id, applicant_id) index is authoritative,
    // as is the conditional decrement for the credit floor.
    let result = conn.transaction::<_, LedgerFailure, _>(|conn| {
        match diesel::insert_into(job_applications::table)
            .values(&new_application)
            .execute(conn)
        {
            Ok(_) => {}
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )) => return Err(LedgerFailure::Duplicate),
            Err(err) => return Err(err.into()),
        }

        if charge_credit {
            let updated = diesel::update(
                interns::table
                    .filter(interns::id.eq(intern_id))
                    .filter(interns::job_credits.gt(0)),
            )
            .set(interns::job_credits.eq(interns::job_credits - 1))
            .execute(conn)?;
            if updated == 0 {
                return Err(LedgerFailure::OutOfCredits);
            }
        }

        diesel::insert_into(credit_events::table)
            .values(&NewCreditEvent {
                id: Uuid::new_v4(),
                intern_id,
                action: CREDIT_ACTION_APPLIED_JOB.to_string(),
            })
            .execute(conn)?;

        diesel::update(job_posts::table.find(job_id))
            .set(job_posts::applicants_count.eq(job_posts::applicants_count + 1))
            .execute(conn)?;

        Ok(())
    });

    match result {
        Ok(()) => {}
        Err(LedgerFailure::Duplicate) => {
            return Err(AppError::conflict("you have already applied for this job"));
        }
        Err(LedgerFailure::OutOfCredits) => {
            return Err(AppError::payment_required(
                "no job credits left; upgrade your plan to keep applying",
            ));
        }
        Err(LedgerFailure::Db(err)) => return Err(AppError::from(err)),
    }

    tracing::info!(
        %application_id,
        %job_id,
        intern_id = %intern_id,
        charged_credit = charge_credit,
        "job application accepted"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            success: true,
            application_id,
            status: APPLICATION_STATUS_APPLIED.to_string(),
        }),
    ))
}
