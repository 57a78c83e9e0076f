use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, ensure, Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use http_body_util::BodyExt;
use internhub::auth::jwt::JwtService;
use internhub::auth::password;
use internhub::config::AppConfig;
use internhub::db::{self, PgPool};
use internhub::models::{NewIntern, NewJobPost, NewStaff};
use internhub::payments::{self, GatewayOrder, PaymentGateway};
use internhub::routes;
use internhub::state::AppState;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::util::ServiceExt;
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TEST_PAYMENT_SECRET: &str = "test-payment-secret";

/// Deterministic in-process stand-in for the payment gateway.
#[derive(Default)]
pub struct FakeGateway {
    counter: AtomicU64,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(
        &self,
        amount_paise: i64,
        currency: &str,
        _receipt: &str,
    ) -> Result<GatewayOrder> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(GatewayOrder {
            order_ref: format!("order_test_{n}"),
            amount_paise,
            currency: currency.to_string(),
        })
    }
}

impl FakeGateway {
    #[allow(dead_code)]
    pub fn orders_created(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

pub struct TestApp {
    pub state: AppState,
    router: Router,
    #[allow(dead_code)]
    gateway: Arc<FakeGateway>,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let database_url = env::var("TEST_DATABASE_URL")
            .context("TEST_DATABASE_URL must be set for integration tests")?;

        let config = AppConfig {
            database_url: database_url.clone(),
            database_max_pool_size: db::DEFAULT_MAX_POOL_SIZE,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            jwt_secret: "test-secret".to_string(),
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            jwt_expiry_days: 7,
            auth_cookie_secure: false,
            auth_cookie_domain: None,
            cors_allowed_origin: None,
            payment_key_id: "rzp_test_key".to_string(),
            payment_key_secret: TEST_PAYMENT_SECRET.to_string(),
            payment_api_url: "http://127.0.0.1:0".to_string(),
            plan_validity_days: 30,
            default_job_credits: 5,
            staff_registration_key: "test-staff-key".to_string(),
        };

        let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;
        prepare_database(&pool).await?;

        let gateway = Arc::new(FakeGateway::default());
        let gateway_for_state: Arc<dyn PaymentGateway> = gateway.clone();
        let jwt = JwtService::from_config(&config)?;
        let state = AppState::new(pool.clone(), config, gateway_for_state, jwt);
        let router = routes::create_router(state.clone());

        Ok(Self {
            state,
            router,
            gateway,
        })
    }

    pub async fn cleanup(&self) -> Result<()> {
        let pool = self.state.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool
                .get()
                .map_err(|err| anyhow!("failed to get cleanup connection: {err}"))?;
            truncate_all(&mut conn)?;
            Ok(())
        })
        .await
        .context("cleanup task panicked")?
    }

    /// Insert an intern directly, with ledger knobs for gating scenarios.
    pub async fn insert_intern(
        &self,
        email: &str,
        password_text: &str,
        plan_type: &str,
        plan_expiry: Option<chrono::NaiveDateTime>,
        job_credits: i32,
    ) -> Result<Uuid> {
        let email = email.to_string();
        let password_text = password_text.to_string();
        let plan_type = plan_type.to_string();
        self.with_conn(move |conn| {
            let intern = NewIntern {
                id: Uuid::new_v4(),
                name: "Test Intern".to_string(),
                email,
                phone: "9000000000".to_string(),
                password_hash: password::hash_password(&password_text)?,
                college: "Test College".to_string(),
                course: "B.Tech".to_string(),
                year_of_study: "3".to_string(),
                domain: None,
                skills: serde_json::json!([]),
                resume_url: None,
                linkedin_url: None,
                github_url: None,
                profile_image: None,
                plan_type,
                job_credits,
            };
            let id = intern.id;
            diesel::insert_into(internhub::schema::interns::table)
                .values(&intern)
                .execute(conn)
                .context("failed to insert intern")?;
            if let Some(expiry) = plan_expiry {
                diesel::update(internhub::schema::interns::table.find(id))
                    .set((
                        internhub::schema::interns::plan_expiry.eq(expiry),
                        internhub::schema::interns::is_paid.eq(true),
                    ))
                    .execute(conn)
                    .context("failed to set plan expiry")?;
            }
            Ok(id)
        })
        .await
    }

    pub async fn insert_staff(&self, email: &str, password_text: &str, role: &str) -> Result<Uuid> {
        let email = email.to_string();
        let password_text = password_text.to_string();
        let role = role.to_string();
        self.with_conn(move |conn| {
            let member = NewStaff {
                id: Uuid::new_v4(),
                name: "Test Staff".to_string(),
                email,
                phone: "9111111111".to_string(),
                password_hash: password::hash_password(&password_text)?,
                role,
                experience: None,
                domain: None,
                linkedin_url: None,
                github_url: None,
                profile_image: None,
            };
            let id = member.id;
            diesel::insert_into(internhub::schema::staff::table)
                .values(&member)
                .execute(conn)
                .context("failed to insert staff")?;
            Ok(id)
        })
        .await
    }

    pub async fn insert_job(
        &self,
        title: &str,
        status: &str,
        is_active: bool,
        custom_fields: Value,
    ) -> Result<Uuid> {
        let title = title.to_string();
        let status = status.to_string();
        self.with_conn(move |conn| {
            let job = NewJobPost {
                id: Uuid::new_v4(),
                title,
                company_name: "Acme Corp".to_string(),
                description: "Build things".to_string(),
                required_skills: serde_json::json!(["rust"]),
                salary_min: Some(10_000),
                salary_max: Some(20_000),
                work_mode: "Remote".to_string(),
                job_type: "Internship".to_string(),
                status,
                is_active,
                custom_fields,
                total_vacancies: 2,
            };
            let id = job.id;
            diesel::insert_into(internhub::schema::job_posts::table)
                .values(&job)
                .execute(conn)
                .context("failed to insert job")?;
            Ok(id)
        })
        .await
    }

    pub async fn login_intern(&self, email: &str, password_text: &str) -> Result<String> {
        self.login("/api/auth/intern/login", email, password_text).await
    }

    pub async fn login_staff(&self, email: &str, password_text: &str) -> Result<String> {
        self.login("/api/auth/staff/login", email, password_text).await
    }

    async fn login(&self, path: &str, email: &str, password_text: &str) -> Result<String> {
        #[derive(Serialize)]
        struct LoginPayload<'a> {
            email: &'a str,
            password: &'a str,
        }

        let response = self
            .post_json(
                path,
                &LoginPayload {
                    email,
                    password: password_text,
                },
                None,
            )
            .await?;

        ensure!(
            response.status() == StatusCode::OK,
            "login failed with status {}",
            response.status()
        );

        let body = body_to_vec(response.into_body()).await?;
        let parsed: Value = serde_json::from_slice(&body)?;
        parsed["token"]
            .as_str()
            .map(|token| token.to_string())
            .ok_or_else(|| anyhow!("login response missing token"))
    }

    /// Signature a well-behaved gateway would attach to this payment.
    pub fn sign_payment(&self, order_ref: &str, payment_ref: &str) -> String {
        payments::payment_signature(TEST_PAYMENT_SECRET, order_ref, payment_ref)
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.request_json(Method::POST, path, payload, token).await
    }

    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.request_json(Method::PATCH, path, payload, token).await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.request_json(Method::PUT, path, payload, token).await
    }

    async fn request_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let body = serde_json::to_vec(payload)?;
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body))?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    pub async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PgConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.state.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|err| anyhow!("failed to get database connection: {err}"))?;
            f(&mut conn)
        })
        .await
        .context("connection task panicked")?
    }
}

pub async fn acquire_db_lock() -> tokio::sync::MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

pub async fn body_to_json(body: Body) -> Result<Value> {
    let bytes = body_to_vec(body).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn prepare_database(pool: &PgPool) -> Result<()> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut conn = pool
            .get()
            .map_err(|err| anyhow!("failed to acquire connection: {err}"))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| anyhow!("failed to run migrations: {err}"))?;
        truncate_all(&mut conn)?;
        Ok(())
    })
    .await
    .context("migration task panicked")?
}

fn truncate_all(conn: &mut PgConnection) -> Result<()> {
    conn.batch_execute(
        "TRUNCATE TABLE credit_events, payment_records, feedback_entries, job_applications, \
         job_posts, study_materials, video_lectures, live_classes, staff, interns \
         RESTART IDENTITY CASCADE;",
    )
    .context("failed to truncate tables")?;
    Ok(())
}
