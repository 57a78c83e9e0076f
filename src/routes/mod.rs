use axum::http::HeaderValue;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{auth::AuthenticatedUser, state::AppState};

pub mod applications;
pub mod auth;
pub mod content;
pub mod health;
pub mod interns;
pub mod jobs;
pub mod payments;
pub mod staff;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = if let Some(origins) = state.config.cors_allowed_origin.as_ref() {
        let headers: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|value| {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| {
                    trimmed
                        .parse::<HeaderValue>()
                        .expect("invalid CORS allowed origin")
                })
            })
            .collect();

        let allow_origin = AllowOrigin::list(headers);

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    let auth_routes = Router::new()
        .route("/intern/register", post(auth::register_intern))
        .route("/intern/login", post(auth::login_intern))
        .route("/staff/register", post(auth::register_staff))
        .route("/staff/login", post(auth::login_staff))
        .route("/me", get(auth::me));

    let intern_routes = Router::new()
        .route(
            "/profile",
            get(interns::get_profile).put(interns::update_profile),
        )
        .route("/classes", get(content::list_classes))
        .route("/study-materials", get(content::list_study_materials))
        .route(
            "/study-materials/search",
            get(content::search_study_materials),
        )
        .route("/video-lectures", get(content::list_video_lectures))
        .route("/dashboard-stats", get(interns::dashboard_stats))
        .route("/recent-feedback", get(interns::recent_feedback))
        .route("/recent-job-posts", get(interns::recent_job_posts))
        .route(
            "/jobs/:job_id/application-form",
            get(jobs::get_application_form),
        );

    let jobs_routes = Router::new()
        .route("/", get(jobs::list_jobs))
        .route("/:job_id", get(jobs::get_job))
        .route("/:job_id/apply", post(applications::submit_application));

    let payments_routes = Router::new()
        .route("/create-order", post(payments::create_order))
        .route("/verify", post(payments::verify_payment));

    let staff_routes = Router::new()
        .route("/jobs", post(staff::create_job))
        .route("/jobs/:job_id", patch(staff::update_job))
        .route(
            "/jobs/:job_id/applications",
            get(staff::list_job_applications),
        )
        .route(
            "/applications/:application_id/status",
            patch(staff::update_application_status),
        )
        .route("/interns/:intern_id/feedback", post(staff::add_feedback));

    let protected_state = state.clone();
    let protected_routes = Router::new()
        .nest("/api/intern", intern_routes)
        .nest("/api/jobs", jobs_routes)
        .nest("/api/payments", payments_routes)
        .nest("/api/staff", staff_routes)
        .layer(middleware::from_extractor_with_state::<AuthenticatedUser, _>(protected_state));

    Router::new()
        .merge(protected_routes)
        .nest("/api/auth", auth_routes)
        .route("/api/health", get(health::health_check))
        .with_state(state)
        .layer(cors)
}
