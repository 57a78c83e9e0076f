use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{password, AuthenticatedUser, ROLE_HIRING, ROLE_INTERN, ROLE_MENTOR},
    error::{AppError, AppResult},
    models::{Intern, NewIntern, NewStaff, Staff},
    plans::PlanCategory,
    schema::{interns, staff},
    state::AppState,
};

const AUTH_COOKIE_NAME: &str = "token";

#[derive(Deserialize)]
pub struct RegisterInternRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub college: String,
    pub course: String,
    pub year_of_study: String,
    pub domain: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
}

#[derive(Serialize)]
pub struct RegisterInternResponse {
    pub message: String,
    pub intern: InternSummary,
}

#[derive(Serialize)]
pub struct InternSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

pub async fn register_intern(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInternRequest>,
) -> AppResult<(StatusCode, Json<RegisterInternResponse>)> {
    let required = [
        ("name", &payload.name),
        ("email", &payload.email),
        ("phone", &payload.phone),
        ("password", &payload.password),
        ("college", &payload.college),
        ("course", &payload.course),
        ("year_of_study", &payload.year_of_study),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::bad_request(format!("{field} is required")));
        }
    }
    if !crate::forms::is_valid_email(payload.email.trim()) {
        return Err(AppError::bad_request("email must be a valid address"));
    }

    let mut conn = state.db()?;
    let password_hash = password::hash_password(&payload.password)?;
    let new_intern = NewIntern {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        email: payload.email.trim().to_lowercase(),
        phone: payload.phone.trim().to_string(),
        password_hash,
        college: payload.college,
        course: payload.course,
        year_of_study: payload.year_of_study,
        domain: payload.domain,
        skills: serde_json::to_value(&payload.skills)?,
        resume_url: payload.resume_url,
        linkedin_url: payload.linkedin_url,
        github_url: payload.github_url,
        profile_image: None,
        plan_type: PlanCategory::None.as_str().to_string(),
        job_credits: state.config.default_job_credits,
    };

    match diesel::insert_into(interns::table)
        .values(&new_intern)
        .execute(&mut conn)
    {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return Err(AppError::conflict("email already exists"));
        }
        Err(err) => return Err(AppError::from(err)),
    }

    tracing::info!(intern_id = %new_intern.id, "registered intern account");

    Ok((
        StatusCode::CREATED,
        Json(RegisterInternResponse {
            message: "registration successful".to_string(),
            intern: InternSummary {
                id: new_intern.id,
                name: new_intern.name,
                email: new_intern.email,
            },
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: serde_json::Value,
}

pub async fn login_intern(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(HeaderMap, Json<LoginResponse>)> {
    let mut conn = state.db()?;

    let intern: Intern = interns::table
        .filter(interns::email.eq(payload.email.trim().to_lowercase()))
        .first(&mut conn)?;

    let valid = password::verify_password(&payload.password, &intern.password_hash)
        .map_err(|_| AppError::unauthorized())?;
    if !valid {
        return Err(AppError::unauthorized());
    }

    let token = state.jwt.generate_token(intern.id, ROLE_INTERN)?;
    let headers = auth_cookie_headers(&state, &token);

    Ok((
        headers,
        Json(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt.expiry_seconds(),
            user: json!({ "name": intern.name, "email": intern.email, "role": ROLE_INTERN }),
        }),
    ))
}

#[derive(Deserialize)]
pub struct RegisterStaffRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: String,
    pub registration_key: String,
    pub experience: Option<String>,
    pub domain: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

pub async fn register_staff(
    State(state): State<AppState>,
    Json(payload): Json<RegisterStaffRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if payload.registration_key != state.config.staff_registration_key {
        return Err(AppError::unauthorized_with("invalid registration key"));
    }
    if payload.role != ROLE_MENTOR && payload.role != ROLE_HIRING {
        return Err(AppError::bad_request("role must be 'mentor' or 'hiring'"));
    }
    if payload.email.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }

    let mut conn = state.db()?;
    let new_staff = NewStaff {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email.trim().to_lowercase(),
        phone: payload.phone,
        password_hash: password::hash_password(&payload.password)?,
        role: payload.role.clone(),
        experience: payload.experience,
        domain: payload.domain,
        linkedin_url: payload.linkedin_url,
        github_url: payload.github_url,
        profile_image: None,
    };

    match diesel::insert_into(staff::table)
        .values(&new_staff)
        .execute(&mut conn)
    {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return Err(AppError::conflict("email already exists"));
        }
        Err(err) => return Err(AppError::from(err)),
    }

    tracing::info!(staff_id = %new_staff.id, role = %payload.role, "registered staff account");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "registration successful", "staff_id": new_staff.id })),
    ))
}

pub async fn login_staff(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(HeaderMap, Json<LoginResponse>)> {
    let mut conn = state.db()?;

    let member: Staff = staff::table
        .filter(staff::email.eq(payload.email.trim().to_lowercase()))
        .first(&mut conn)?;

    let valid = password::verify_password(&payload.password, &member.password_hash)
        .map_err(|_| AppError::unauthorized())?;
    if !valid {
        return Err(AppError::unauthorized());
    }

    let token = state.jwt.generate_token(member.id, &member.role)?;
    let headers = auth_cookie_headers(&state, &token);

    Ok((
        headers,
        Json(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt.expiry_seconds(),
            user: json!({ "name": member.name, "email": member.email, "role": member.role }),
        }),
    ))
}

pub async fn me(user: AuthenticatedUser) -> Json<AuthenticatedUser> {
    Json(user)
}

fn auth_cookie_headers(state: &AppState, token: &str) -> HeaderMap {
    let expires_at = Utc::now() + ChronoDuration::days(state.config.jwt_expiry_days);
    let max_age = ChronoDuration::days(state.config.jwt_expiry_days).num_seconds();

    let mut parts = vec![format!("{}={}", AUTH_COOKIE_NAME, token)];
    parts.push("Path=/".into());
    parts.push("HttpOnly".into());
    parts.push("SameSite=Strict".into());
    parts.push(format!("Max-Age={}", max_age));
    parts.push(format!("Expires={}", expires_at.to_rfc2822()));
    if state.config.auth_cookie_secure {
        parts.push("Secure".into());
    }
    if let Some(domain) = &state.config.auth_cookie_domain {
        parts.push(format!("Domain={}", domain));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&parts.join("; ")).expect("valid auth cookie"),
    );
    headers
}
